use serde::{Deserialize, Serialize};

use super::Usage;
use crate::types::{FinishReason, ToolCall};

/// One block of assistant output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContentBlock {
    #[serde(rename = "type", default)]
    pub block_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Assistant content is either a bare string or a list of typed blocks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

impl MessageContent {
    /// Concatenate every text block. Non-text blocks are skipped.
    pub fn text(&self) -> String {
        match self {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Blocks(blocks) => blocks
                .iter()
                .filter(|b| b.block_type.as_deref().map(|t| t == "text").unwrap_or(true))
                .filter_map(|b| b.text.as_deref())
                .collect(),
        }
    }
}

/// A span of the answer backed by one or more sources.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    #[serde(default)]
    pub start: Option<usize>,
    #[serde(default)]
    pub end: Option<usize>,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub sources: Vec<serde_json::Value>,
    #[serde(rename = "type", default)]
    pub citation_type: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AssistantMessage {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<MessageContent>,
    #[serde(default)]
    pub tool_plan: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<Vec<ToolCall>>,
    #[serde(default)]
    pub citations: Option<Vec<Citation>>,
}

/// Chat API response structure
///
/// `id` and `message` are required; a body without them is not a chat
/// response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatResponse {
    pub id: String,
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
    pub message: AssistantMessage,
    #[serde(default)]
    pub usage: Option<Usage>,
}

impl ChatResponse {
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Assistant text. `None` when the response carried no content at all,
    /// `Some("")` when content was present but empty.
    pub fn text(&self) -> Option<String> {
        self.message.content.as_ref().map(MessageContent::text)
    }

    pub fn tool_plan(&self) -> Option<&str> {
        self.message.tool_plan.as_deref()
    }

    pub fn tool_calls(&self) -> &[ToolCall] {
        self.message.tool_calls.as_deref().unwrap_or(&[])
    }

    pub fn has_tool_calls(&self) -> bool {
        !self.tool_calls().is_empty()
    }

    pub fn citations(&self) -> &[Citation] {
        self.message.citations.as_deref().unwrap_or(&[])
    }

    pub fn finish_reason(&self) -> Option<&FinishReason> {
        self.finish_reason.as_ref()
    }

    pub fn usage(&self) -> Option<&Usage> {
        self.usage.as_ref()
    }

    pub fn input_tokens(&self) -> Option<u64> {
        self.usage.as_ref().and_then(Usage::input_tokens)
    }

    pub fn output_tokens(&self) -> Option<u64> {
        self.usage.as_ref().and_then(Usage::output_tokens)
    }

    pub fn total_tokens(&self) -> Option<u64> {
        self.usage.as_ref().and_then(Usage::total_tokens)
    }
}
