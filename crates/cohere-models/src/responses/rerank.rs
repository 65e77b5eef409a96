use serde::{Deserialize, Serialize};

use super::ApiMeta;
use crate::error::DecodeError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResult {
    /// Position of the document in the request's `documents`.
    pub index: usize,
    pub relevance_score: f64,
}

/// Rerank API response structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RerankResponse {
    #[serde(default)]
    pub id: Option<String>,
    pub results: Vec<RerankResult>,
    #[serde(default)]
    pub meta: Option<ApiMeta>,
}

/// A rerank result joined back to the document text it refers to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RankedDocument<'a> {
    /// 1-based position in the ranking.
    pub rank: usize,
    pub index: usize,
    pub relevance_score: f64,
    pub text: &'a str,
}

impl RerankResponse {
    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    /// Results in the order the API returned them (most relevant first).
    pub fn results(&self) -> &[RerankResult] {
        &self.results
    }

    pub fn top(&self) -> Option<&RerankResult> {
        self.results.first()
    }

    /// Map each result to the original document text by index. An index
    /// outside `documents` means the response does not belong to the request.
    pub fn resolve<'a>(&self, documents: &'a [String]) -> Result<Vec<RankedDocument<'a>>, DecodeError> {
        self.results
            .iter()
            .enumerate()
            .map(|(position, result)| {
                let text = documents.get(result.index).ok_or_else(|| {
                    DecodeError::new(
                        "rerank",
                        format!(
                            "result index {} is out of range for {} documents",
                            result.index,
                            documents.len()
                        ),
                    )
                })?;
                Ok(RankedDocument {
                    rank: position + 1,
                    index: result.index,
                    relevance_score: result.relevance_score,
                    text: text.as_str(),
                })
            })
            .collect()
    }

    pub fn meta(&self) -> Option<&ApiMeta> {
        self.meta.as_ref()
    }

    pub fn search_units(&self) -> Option<f64> {
        self.meta.as_ref()?.billed_units.as_ref()?.search_units
    }
}
