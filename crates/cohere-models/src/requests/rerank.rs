use serde::Serialize;

use crate::error::{check_non_empty, check_range, ValidationError};

/// A validated request for `POST /v2/rerank`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RerankRequest {
    model: String,
    query: String,
    documents: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_n: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens_per_doc: Option<u32>,
}

impl RerankRequest {
    pub fn builder(model: impl Into<String>, query: impl Into<String>) -> RerankRequestBuilder {
        RerankRequestBuilder::new(model, query)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn documents(&self) -> &[String] {
        &self.documents
    }

    pub fn top_n(&self) -> Option<u32> {
        self.top_n
    }

    pub fn max_tokens_per_doc(&self) -> Option<u32> {
        self.max_tokens_per_doc
    }
}

#[derive(Debug, Clone)]
pub struct RerankRequestBuilder {
    model: String,
    query: String,
    documents: Vec<String>,
    top_n: Option<i64>,
    max_tokens_per_doc: Option<i64>,
}

impl RerankRequestBuilder {
    pub fn new(model: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            query: query.into(),
            documents: Vec::new(),
            top_n: None,
            max_tokens_per_doc: None,
        }
    }

    pub fn document(mut self, document: impl Into<String>) -> Self {
        self.documents.push(document.into());
        self
    }

    pub fn documents<I, S>(mut self, documents: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.documents.extend(documents.into_iter().map(Into::into));
        self
    }

    /// Limit the number of results. The API returns every document by default.
    pub fn top_n(mut self, top_n: i64) -> Self {
        self.top_n = Some(top_n);
        self
    }

    /// Long documents are truncated to this many tokens server-side.
    pub fn max_tokens_per_doc(mut self, max_tokens: i64) -> Self {
        self.max_tokens_per_doc = Some(max_tokens);
        self
    }

    pub fn build(self) -> Result<RerankRequest, ValidationError> {
        check_non_empty("model", &self.model)?;
        check_non_empty("query", &self.query)?;
        if self.documents.is_empty() {
            return Err(ValidationError::missing("documents"));
        }
        for document in &self.documents {
            check_non_empty("documents", document)?;
        }

        let top_n = match self.top_n {
            Some(n) => {
                check_range("top_n", n as f64, 1.0, u32::MAX as f64)?;
                Some(n as u32)
            }
            None => None,
        };
        let max_tokens_per_doc = match self.max_tokens_per_doc {
            Some(n) => {
                check_range("max_tokens_per_doc", n as f64, 1.0, u32::MAX as f64)?;
                Some(n as u32)
            }
            None => None,
        };

        Ok(RerankRequest {
            model: self.model,
            query: self.query,
            documents: self.documents,
            top_n,
            max_tokens_per_doc,
        })
    }
}
