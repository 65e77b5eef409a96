// Response values and their read-only accessors
pub mod chat;
pub mod embed;
pub mod rerank;

use serde::{Deserialize, Serialize};

use crate::types::deserialize_token_count;

pub use chat::{AssistantMessage, ChatResponse, Citation, ContentBlock, MessageContent};
pub use embed::{EmbedResponse, EmbeddingVectors, EmbeddingsByType};
pub use rerank::{RankedDocument, RerankResponse, RerankResult};

/// Tokens actually consumed by the model.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TokenCounts {
    #[serde(default, deserialize_with = "deserialize_token_count")]
    pub input_tokens: Option<u64>,
    #[serde(default, deserialize_with = "deserialize_token_count")]
    pub output_tokens: Option<u64>,
}

/// Units the account is billed for. The API reports these as doubles.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BilledUnits {
    #[serde(default)]
    pub input_tokens: Option<f64>,
    #[serde(default)]
    pub output_tokens: Option<f64>,
    #[serde(default)]
    pub search_units: Option<f64>,
    #[serde(default)]
    pub classifications: Option<f64>,
    #[serde(default)]
    pub images: Option<f64>,
}

/// Token usage information from API response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub billed_units: Option<BilledUnits>,
    #[serde(default)]
    pub tokens: Option<TokenCounts>,
}

impl Usage {
    pub fn input_tokens(&self) -> Option<u64> {
        self.tokens.as_ref().and_then(|t| t.input_tokens)
    }

    pub fn output_tokens(&self) -> Option<u64> {
        self.tokens.as_ref().and_then(|t| t.output_tokens)
    }

    /// Input plus output tokens. `None` unless both counts are present and
    /// their sum fits in a `u64`.
    pub fn total_tokens(&self) -> Option<u64> {
        self.input_tokens()?.checked_add(self.output_tokens()?)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiVersion {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub is_deprecated: Option<bool>,
    #[serde(default)]
    pub is_experimental: Option<bool>,
}

/// Metadata attached to embed and rerank responses.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ApiMeta {
    #[serde(default)]
    pub api_version: Option<ApiVersion>,
    #[serde(default)]
    pub billed_units: Option<BilledUnits>,
    #[serde(default)]
    pub tokens: Option<TokenCounts>,
    #[serde(default)]
    pub warnings: Option<Vec<String>>,
}

impl ApiMeta {
    pub fn api_version(&self) -> Option<&str> {
        self.api_version.as_ref().and_then(|v| v.version.as_deref())
    }

    pub fn warnings(&self) -> &[String] {
        self.warnings.as_deref().unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_total_tokens_needs_both_counts() {
        let usage: Usage =
            serde_json::from_value(serde_json::json!({"tokens": {"input_tokens": 3, "output_tokens": 1}})).unwrap();
        assert_eq!(usage.total_tokens(), Some(4));

        let partial: Usage = serde_json::from_value(serde_json::json!({"tokens": {"input_tokens": 3}})).unwrap();
        assert_eq!(partial.input_tokens(), Some(3));
        assert_eq!(partial.total_tokens(), None);

        assert_eq!(Usage::default().total_tokens(), None);
    }

    #[test]
    fn test_total_tokens_overflow_is_none() {
        let usage: Usage = serde_json::from_value(serde_json::json!({
            "tokens": {"input_tokens": u64::MAX, "output_tokens": 1}
        }))
        .unwrap();
        assert_eq!(usage.input_tokens(), Some(u64::MAX));
        assert_eq!(usage.total_tokens(), None);
    }

    #[test]
    fn test_meta_accessors() {
        let meta: ApiMeta = serde_json::from_value(serde_json::json!({
            "api_version": {"version": "2"},
            "billed_units": {"search_units": 1.0}
        }))
        .unwrap();
        assert_eq!(meta.api_version(), Some("2"));
        assert_eq!(meta.billed_units.unwrap().search_units, Some(1.0));
        assert!(meta.warnings.is_none());
    }
}
