use serde::Serialize;

use crate::error::{check_non_empty, check_range, ValidationError};
use crate::types::{EmbedInputType, EmbeddingType, Truncate};

/// Maximum number of texts per embed call.
pub const MAX_EMBED_TEXTS: usize = 96;

/// Output dimensions supported by models with configurable output size.
pub const OUTPUT_DIMENSIONS: [u32; 4] = [256, 512, 1024, 1536];

/// A validated request for `POST /v2/embed`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EmbedRequest {
    model: String,
    input_type: EmbedInputType,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    texts: Vec<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    images: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    truncate: Option<Truncate>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    embedding_types: Vec<EmbeddingType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    output_dimension: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

impl EmbedRequest {
    pub fn builder(model: impl Into<String>, input_type: EmbedInputType) -> EmbedRequestBuilder {
        EmbedRequestBuilder::new(model, input_type)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn input_type(&self) -> EmbedInputType {
        self.input_type
    }

    pub fn texts(&self) -> &[String] {
        &self.texts
    }

    pub fn images(&self) -> &[String] {
        &self.images
    }

    /// Texts or images, whichever this request carries.
    pub fn inputs(&self) -> &[String] {
        if self.texts.is_empty() {
            &self.images
        } else {
            &self.texts
        }
    }

    pub fn truncate(&self) -> Option<Truncate> {
        self.truncate
    }

    /// Requested encodings. The API returns `float` when none were requested.
    pub fn embedding_types(&self) -> &[EmbeddingType] {
        &self.embedding_types
    }

    pub fn output_dimension(&self) -> Option<u32> {
        self.output_dimension
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }
}

#[derive(Debug, Clone)]
pub struct EmbedRequestBuilder {
    model: String,
    input_type: EmbedInputType,
    texts: Vec<String>,
    images: Vec<String>,
    truncate: Option<Truncate>,
    embedding_types: Vec<EmbeddingType>,
    output_dimension: Option<u32>,
    max_tokens: Option<i64>,
}

impl EmbedRequestBuilder {
    pub fn new(model: impl Into<String>, input_type: EmbedInputType) -> Self {
        Self {
            model: model.into(),
            input_type,
            texts: Vec::new(),
            images: Vec::new(),
            truncate: None,
            embedding_types: Vec::new(),
            output_dimension: None,
            max_tokens: None,
        }
    }

    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.texts.push(text.into());
        self
    }

    pub fn texts<I, S>(mut self, texts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.texts.extend(texts.into_iter().map(Into::into));
        self
    }

    /// Add an image as a data URI (`data:image/png;base64,...`).
    pub fn image(mut self, data_uri: impl Into<String>) -> Self {
        self.images.push(data_uri.into());
        self
    }

    pub fn truncate(mut self, truncate: Truncate) -> Self {
        self.truncate = Some(truncate);
        self
    }

    /// Request an additional encoding. Requesting the same one twice is a no-op.
    pub fn embedding_type(mut self, kind: EmbeddingType) -> Self {
        if !self.embedding_types.contains(&kind) {
            self.embedding_types.push(kind);
        }
        self
    }

    pub fn embedding_types(self, kinds: impl IntoIterator<Item = EmbeddingType>) -> Self {
        kinds.into_iter().fold(self, |builder, kind| builder.embedding_type(kind))
    }

    pub fn output_dimension(mut self, dimension: u32) -> Self {
        self.output_dimension = Some(dimension);
        self
    }

    pub fn max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn build(self) -> Result<EmbedRequest, ValidationError> {
        check_non_empty("model", &self.model)?;

        match (self.texts.is_empty(), self.images.is_empty()) {
            (true, true) => return Err(ValidationError::missing("texts")),
            (false, false) => {
                return Err(ValidationError::invalid(
                    "images",
                    "texts and images cannot be embedded in the same call",
                ))
            }
            _ => {}
        }
        if self.texts.len() > MAX_EMBED_TEXTS {
            return Err(ValidationError::invalid(
                "texts",
                format!("at most {} texts per call, got {}", MAX_EMBED_TEXTS, self.texts.len()),
            ));
        }
        for text in &self.texts {
            check_non_empty("texts", text)?;
        }
        for image in &self.images {
            check_non_empty("images", image)?;
        }
        if !self.images.is_empty() && self.input_type != EmbedInputType::Image {
            return Err(ValidationError::invalid(
                "input_type",
                format!("images require input type `image`, got `{}`", self.input_type),
            ));
        }

        if let Some(dimension) = self.output_dimension {
            if !OUTPUT_DIMENSIONS.contains(&dimension) {
                return Err(ValidationError::invalid(
                    "output_dimension",
                    format!("must be one of {:?}, got {}", OUTPUT_DIMENSIONS, dimension),
                ));
            }
        }
        let max_tokens = match self.max_tokens {
            Some(m) => {
                check_range("max_tokens", m as f64, 1.0, u32::MAX as f64)?;
                Some(m as u32)
            }
            None => None,
        };

        Ok(EmbedRequest {
            model: self.model,
            input_type: self.input_type,
            texts: self.texts,
            images: self.images,
            truncate: self.truncate,
            embedding_types: self.embedding_types,
            output_dimension: self.output_dimension,
            max_tokens,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_payload_uses_wire_names() {
        let request = EmbedRequest::builder("embed-english-light-v3.0", EmbedInputType::Clustering)
            .texts(["Hello, world!", "Goodmem is awesome."])
            .truncate(Truncate::End)
            .embedding_types([EmbeddingType::Float, EmbeddingType::Int8])
            .build()
            .unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "embed-english-light-v3.0",
                "input_type": "clustering",
                "texts": ["Hello, world!", "Goodmem is awesome."],
                "truncate": "END",
                "embedding_types": ["float", "int8"]
            })
        );
    }

    #[test]
    fn test_embedding_types_collapse_duplicates() {
        let request = EmbedRequest::builder("m1", EmbedInputType::SearchQuery)
            .text("q")
            .embedding_types([EmbeddingType::Int8, EmbeddingType::Float, EmbeddingType::Int8])
            .build()
            .unwrap();
        assert_eq!(request.embedding_types(), &[EmbeddingType::Int8, EmbeddingType::Float]);
    }

    #[test]
    fn test_images_need_image_input_type() {
        let err = EmbedRequest::builder("m1", EmbedInputType::SearchDocument)
            .image("data:image/png;base64,AAAA")
            .build()
            .unwrap_err();
        assert_eq!(err.field(), "input_type");

        let ok = EmbedRequest::builder("m1", EmbedInputType::Image)
            .image("data:image/png;base64,AAAA")
            .build()
            .unwrap();
        assert_eq!(ok.inputs().len(), 1);
    }

    #[test]
    fn test_texts_and_images_are_exclusive() {
        let err = EmbedRequest::builder("m1", EmbedInputType::Image)
            .text("a")
            .image("data:image/png;base64,AAAA")
            .build()
            .unwrap_err();
        assert_eq!(err.field(), "images");
    }

    #[test]
    fn test_output_dimension_must_be_supported() {
        let err = EmbedRequest::builder("m1", EmbedInputType::Classification)
            .text("a")
            .output_dimension(300)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), "output_dimension");
    }

    #[test]
    fn test_too_many_texts() {
        let texts: Vec<String> = (0..=MAX_EMBED_TEXTS).map(|i| format!("t{}", i)).collect();
        let err = EmbedRequest::builder("m1", EmbedInputType::Clustering)
            .texts(texts)
            .build()
            .unwrap_err();
        assert_eq!(err.field(), "texts");
    }
}
