use serde::{Deserialize, Serialize};

use super::ApiMeta;
use crate::error::DecodeError;
use crate::types::EmbeddingType;

/// Embeddings keyed by encoding. Only the encodings that were requested are
/// present; several can come back from the same call.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EmbeddingsByType {
    #[serde(default)]
    pub float: Option<Vec<Vec<f64>>>,
    #[serde(default)]
    pub int8: Option<Vec<Vec<i32>>>,
    #[serde(default)]
    pub uint8: Option<Vec<Vec<i32>>>,
    #[serde(default)]
    pub binary: Option<Vec<Vec<i32>>>,
    #[serde(default)]
    pub ubinary: Option<Vec<Vec<i32>>>,
    #[serde(default)]
    pub base64: Option<Vec<String>>,
}

/// Borrowed view over the vectors of a single encoding.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EmbeddingVectors<'a> {
    Float(&'a [Vec<f64>]),
    Integer(&'a [Vec<i32>]),
    Base64(&'a [String]),
}

impl EmbeddingVectors<'_> {
    /// Number of vectors, one per input.
    pub fn len(&self) -> usize {
        match self {
            EmbeddingVectors::Float(v) => v.len(),
            EmbeddingVectors::Integer(v) => v.len(),
            EmbeddingVectors::Base64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Dimensionality of the vector at `index`. Base64 strings have no
    /// numeric dimension and report `None`.
    pub fn dimension(&self, index: usize) -> Option<usize> {
        match self {
            EmbeddingVectors::Float(v) => v.get(index).map(Vec::len),
            EmbeddingVectors::Integer(v) => v.get(index).map(Vec::len),
            EmbeddingVectors::Base64(_) => None,
        }
    }
}

/// Embed API response structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmbedResponse {
    #[serde(default)]
    pub id: String,
    pub embeddings: EmbeddingsByType,
    #[serde(default)]
    pub texts: Option<Vec<String>>,
    #[serde(default)]
    pub response_type: Option<String>,
    #[serde(default)]
    pub meta: Option<ApiMeta>,
}

impl EmbedResponse {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn embeddings_of(&self, kind: EmbeddingType) -> Option<EmbeddingVectors<'_>> {
        let e = &self.embeddings;
        match kind {
            EmbeddingType::Float => e.float.as_deref().map(EmbeddingVectors::Float),
            EmbeddingType::Int8 => e.int8.as_deref().map(EmbeddingVectors::Integer),
            EmbeddingType::Uint8 => e.uint8.as_deref().map(EmbeddingVectors::Integer),
            EmbeddingType::Binary => e.binary.as_deref().map(EmbeddingVectors::Integer),
            EmbeddingType::Ubinary => e.ubinary.as_deref().map(EmbeddingVectors::Integer),
            EmbeddingType::Base64 => e.base64.as_deref().map(EmbeddingVectors::Base64),
        }
    }

    /// Encodings present in this response, in declaration order.
    pub fn available_types(&self) -> Vec<EmbeddingType> {
        EmbeddingType::ALL
            .iter()
            .copied()
            .filter(|kind| self.embeddings_of(*kind).is_some())
            .collect()
    }

    pub fn float(&self) -> Option<&[Vec<f64>]> {
        self.embeddings.float.as_deref()
    }

    /// Pair each input with its float vector. Fails when float embeddings are
    /// missing or their count does not match the inputs.
    pub fn float_by_input<'a>(&'a self, inputs: &'a [String]) -> Result<Vec<(&'a str, &'a [f64])>, DecodeError> {
        let vectors = self
            .float()
            .ok_or_else(|| DecodeError::new("embed", "response has no float embeddings"))?;
        if vectors.len() != inputs.len() {
            return Err(DecodeError::new(
                "embed",
                format!("expected {} embeddings, got {}", inputs.len(), vectors.len()),
            ));
        }
        Ok(inputs
            .iter()
            .zip(vectors)
            .map(|(input, vector)| (input.as_str(), vector.as_slice()))
            .collect())
    }

    pub fn meta(&self) -> Option<&ApiMeta> {
        self.meta.as_ref()
    }

    pub fn billed_input_tokens(&self) -> Option<f64> {
        self.meta.as_ref()?.billed_units.as_ref()?.input_tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn sample() -> EmbedResponse {
        serde_json::from_value(json!({
            "id": "e1",
            "response_type": "embeddings_by_type",
            "embeddings": {
                "float": [[0.1, 0.2, 0.3], [0.4, 0.5, 0.6]],
                "int8": [[1, -2, 3], [4, 5, -6]],
                "base64": ["AAAA", "BBBB"]
            },
            "texts": ["a", "b"],
            "meta": {"api_version": {"version": "2"}, "billed_units": {"input_tokens": 2}}
        }))
        .unwrap()
    }

    #[test]
    fn test_available_types() {
        let response = sample();
        assert_eq!(
            response.available_types(),
            vec![EmbeddingType::Float, EmbeddingType::Int8, EmbeddingType::Base64]
        );
        assert!(response.embeddings_of(EmbeddingType::Uint8).is_none());
    }

    #[test]
    fn test_vectors_view() {
        let response = sample();
        let int8 = response.embeddings_of(EmbeddingType::Int8).unwrap();
        assert_eq!(int8.len(), 2);
        assert_eq!(int8.dimension(1), Some(3));
        assert_eq!(int8.dimension(2), None);
        assert_eq!(response.embeddings_of(EmbeddingType::Base64).unwrap().dimension(0), None);
    }

    #[test]
    fn test_float_by_input() {
        let response = sample();
        let inputs = vec!["a".to_string(), "b".to_string()];
        let pairs = response.float_by_input(&inputs).unwrap();
        assert_eq!(pairs[1], ("b", &[0.4, 0.5, 0.6][..]));

        let too_few = vec!["a".to_string()];
        assert!(response.float_by_input(&too_few).is_err());
        assert_eq!(response.billed_input_tokens(), Some(2.0));
    }
}
