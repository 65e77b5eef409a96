use serde::Deserialize;
use std::collections::BTreeMap;

use crate::responses::{AssistantMessage, ChatResponse, Citation, MessageContent, Usage};
use crate::types::{FinishReason, ToolCall};

// ============================================================================
// Streaming Response Structures
// ============================================================================

/// One server-sent event of a streamed chat response.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ChatStreamEvent {
    MessageStart {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        delta: StreamDelta,
    },
    ContentStart {
        #[serde(default)]
        index: usize,
        #[serde(default)]
        delta: StreamDelta,
    },
    ContentDelta {
        #[serde(default)]
        index: usize,
        #[serde(default)]
        delta: StreamDelta,
    },
    ContentEnd {
        #[serde(default)]
        index: usize,
    },
    ToolPlanDelta {
        #[serde(default)]
        delta: StreamDelta,
    },
    ToolCallStart {
        #[serde(default)]
        index: usize,
        #[serde(default)]
        delta: StreamDelta,
    },
    ToolCallDelta {
        #[serde(default)]
        index: usize,
        #[serde(default)]
        delta: StreamDelta,
    },
    ToolCallEnd {
        #[serde(default)]
        index: usize,
    },
    CitationStart {
        #[serde(default)]
        index: usize,
        #[serde(default)]
        delta: StreamDelta,
    },
    CitationEnd {
        #[serde(default)]
        index: usize,
    },
    MessageEnd {
        #[serde(default)]
        id: Option<String>,
        #[serde(default)]
        delta: MessageEndDelta,
    },
    /// Event types this client does not model (`debug`, future additions).
    #[serde(other)]
    Unknown,
}

/// Delta structure shared by the non-terminal events
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamDelta {
    #[serde(default)]
    pub message: Option<StreamMessageDelta>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamMessageDelta {
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub content: Option<StreamContentDelta>,
    #[serde(default)]
    pub tool_plan: Option<String>,
    #[serde(default)]
    pub tool_calls: Option<StreamToolCallDelta>,
    #[serde(default)]
    pub citations: Option<Citation>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamContentDelta {
    #[serde(rename = "type", default)]
    pub content_type: Option<String>,
    #[serde(default)]
    pub text: Option<String>,
}

/// Tool call delta in streaming response
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamToolCallDelta {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(rename = "type", default)]
    pub tool_type: Option<String>,
    #[serde(default)]
    pub function: Option<StreamFunctionDelta>,
}

/// Function delta in streaming tool call
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct StreamFunctionDelta {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub arguments: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct MessageEndDelta {
    #[serde(default)]
    pub finish_reason: Option<FinishReason>,
    #[serde(default)]
    pub usage: Option<Usage>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ChatStreamEvent {
    fn message(&self) -> Option<&StreamMessageDelta> {
        match self {
            Self::MessageStart { delta, .. }
            | Self::ContentStart { delta, .. }
            | Self::ContentDelta { delta, .. }
            | Self::ToolPlanDelta { delta }
            | Self::ToolCallStart { delta, .. }
            | Self::ToolCallDelta { delta, .. }
            | Self::CitationStart { delta, .. } => delta.message.as_ref(),
            _ => None,
        }
    }

    /// Text carried by a content event, if any.
    pub fn text_delta(&self) -> Option<&str> {
        match self {
            Self::ContentStart { .. } | Self::ContentDelta { .. } => {
                self.message()?.content.as_ref()?.text.as_deref()
            }
            _ => None,
        }
    }

    pub fn tool_plan_delta(&self) -> Option<&str> {
        match self {
            Self::ToolPlanDelta { .. } => self.message()?.tool_plan.as_deref(),
            _ => None,
        }
    }

    /// `message-end` closes the stream; nothing follows it.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::MessageEnd { .. })
    }
}

/// Folds stream events into the [`ChatResponse`] a non-streamed call would
/// have returned.
#[derive(Debug, Default)]
pub struct ChatStreamAccumulator {
    id: Option<String>,
    role: Option<String>,
    text: String,
    saw_content: bool,
    tool_plan: Option<String>,
    /// Keyed by the stream's `index`, which need not be contiguous.
    tool_calls: BTreeMap<usize, ToolCall>,
    citations: Vec<Citation>,
    finish_reason: Option<FinishReason>,
    usage: Option<Usage>,
    finished: bool,
}

impl ChatStreamAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn apply(&mut self, event: &ChatStreamEvent) {
        match event {
            ChatStreamEvent::MessageStart { id, delta } => {
                if id.is_some() {
                    self.id = id.clone();
                }
                if let Some(role) = delta.message.as_ref().and_then(|m| m.role.clone()) {
                    self.role = Some(role);
                }
            }
            ChatStreamEvent::ContentStart { .. } | ChatStreamEvent::ContentDelta { .. } => {
                self.saw_content = true;
                if let Some(text) = event.text_delta() {
                    self.text.push_str(text);
                }
            }
            ChatStreamEvent::ToolPlanDelta { .. } => {
                if let Some(plan) = event.tool_plan_delta() {
                    self.tool_plan.get_or_insert_with(String::new).push_str(plan);
                }
            }
            ChatStreamEvent::ToolCallStart { index, delta } => {
                let Some(call_delta) = delta.message.as_ref().and_then(|m| m.tool_calls.as_ref()) else {
                    return;
                };
                let tool_call = self
                    .tool_calls
                    .entry(*index)
                    .or_insert_with(|| ToolCall::new(String::new(), String::new(), String::new()));
                merge_tool_call(tool_call, call_delta);
            }
            ChatStreamEvent::ToolCallDelta { index, delta } => {
                let Some(call_delta) = delta.message.as_ref().and_then(|m| m.tool_calls.as_ref()) else {
                    return;
                };
                // Deltas for a call that was never started are dropped.
                if let Some(tool_call) = self.tool_calls.get_mut(index) {
                    merge_tool_call(tool_call, call_delta);
                }
            }
            ChatStreamEvent::CitationStart { delta, .. } => {
                if let Some(citation) = delta.message.as_ref().and_then(|m| m.citations.clone()) {
                    self.citations.push(citation);
                }
            }
            ChatStreamEvent::MessageEnd { id, delta } => {
                if self.id.is_none() {
                    self.id = id.clone();
                }
                self.finish_reason = delta.finish_reason.clone();
                self.usage = delta.usage.clone();
                self.finished = true;
            }
            ChatStreamEvent::ContentEnd { .. }
            | ChatStreamEvent::ToolCallEnd { .. }
            | ChatStreamEvent::CitationEnd { .. }
            | ChatStreamEvent::Unknown => {}
        }
    }

    /// Whether the terminal event has been applied.
    pub fn is_finished(&self) -> bool {
        self.finished
    }

    /// Text received so far.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_response(self) -> ChatResponse {
        ChatResponse {
            id: self.id.unwrap_or_default(),
            finish_reason: self.finish_reason,
            message: AssistantMessage {
                role: Some(self.role.unwrap_or_else(|| "assistant".to_string())),
                content: self.saw_content.then(|| MessageContent::Text(self.text)),
                tool_plan: self.tool_plan,
                tool_calls: (!self.tool_calls.is_empty()).then(|| self.tool_calls.into_values().collect()),
                citations: (!self.citations.is_empty()).then_some(self.citations),
            },
            usage: self.usage,
        }
    }
}

fn merge_tool_call(tool_call: &mut ToolCall, delta: &StreamToolCallDelta) {
    if let Some(id) = &delta.id {
        tool_call.id = id.clone();
    }
    if let Some(tool_type) = &delta.tool_type {
        tool_call.tool_type = tool_type.clone();
    }
    if let Some(function) = &delta.function {
        if let Some(name) = &function.name {
            tool_call.function.name = name.clone();
        }
        if let Some(args) = &function.arguments {
            tool_call.function.arguments.push_str(args);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn event(value: serde_json::Value) -> ChatStreamEvent {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_decode_event_types() {
        let start = event(json!({"type": "message-start", "id": "abc", "delta": {"message": {"role": "assistant"}}}));
        assert_eq!(
            start,
            ChatStreamEvent::MessageStart {
                id: Some("abc".to_string()),
                delta: StreamDelta {
                    message: Some(StreamMessageDelta {
                        role: Some("assistant".to_string()),
                        ..Default::default()
                    })
                }
            }
        );

        let delta = event(json!({"type": "content-delta", "index": 0, "delta": {"message": {"content": {"text": "Hi"}}}}));
        assert_eq!(delta.text_delta(), Some("Hi"));
        assert!(!delta.is_terminal());

        let debug = event(json!({"type": "debug", "prompt": "..."}));
        assert_eq!(debug, ChatStreamEvent::Unknown);

        let end = event(json!({
            "type": "message-end",
            "delta": {"finish_reason": "COMPLETE", "usage": {"tokens": {"input_tokens": 5, "output_tokens": 2}}}
        }));
        assert!(end.is_terminal());
    }

    #[test]
    fn test_accumulate_text() {
        let events = vec![
            event(json!({"type": "message-start", "id": "r1", "delta": {"message": {"role": "assistant"}}})),
            event(json!({"type": "content-start", "index": 0, "delta": {"message": {"content": {"type": "text", "text": ""}}}})),
            event(json!({"type": "content-delta", "index": 0, "delta": {"message": {"content": {"text": "hel"}}}})),
            event(json!({"type": "content-delta", "index": 0, "delta": {"message": {"content": {"text": "lo"}}}})),
            event(json!({"type": "content-end", "index": 0})),
            event(json!({
                "type": "message-end",
                "delta": {"finish_reason": "COMPLETE", "usage": {"tokens": {"input_tokens": 3, "output_tokens": 1}}}
            })),
        ];

        let mut acc = ChatStreamAccumulator::new();
        for e in &events {
            acc.apply(e);
        }
        assert!(acc.is_finished());

        let response = acc.into_response();
        assert_eq!(response.id(), "r1");
        assert_eq!(response.text().as_deref(), Some("hello"));
        assert_eq!(response.finish_reason(), Some(&FinishReason::Complete));
        assert_eq!(response.total_tokens(), Some(4));
    }

    #[test]
    fn test_accumulate_tool_calls_by_index() {
        let events = vec![
            event(json!({"type": "tool-plan-delta", "delta": {"message": {"tool_plan": "I will "}}})),
            event(json!({"type": "tool-plan-delta", "delta": {"message": {"tool_plan": "check"}}})),
            event(json!({
                "type": "tool-call-start", "index": 0,
                "delta": {"message": {"tool_calls": {"id": "c0", "type": "function", "function": {"name": "get_weather", "arguments": ""}}}}
            })),
            event(json!({
                "type": "tool-call-start", "index": 1,
                "delta": {"message": {"tool_calls": {"id": "c1", "type": "function", "function": {"name": "get_time", "arguments": ""}}}}
            })),
            event(json!({"type": "tool-call-delta", "index": 0, "delta": {"message": {"tool_calls": {"function": {"arguments": "{\"city\":"}}}}})),
            event(json!({"type": "tool-call-delta", "index": 1, "delta": {"message": {"tool_calls": {"function": {"arguments": "{}"}}}}})),
            event(json!({"type": "tool-call-delta", "index": 0, "delta": {"message": {"tool_calls": {"function": {"arguments": "\"Paris\"}"}}}}})),
            event(json!({"type": "tool-call-end", "index": 0})),
            event(json!({"type": "tool-call-end", "index": 1})),
            event(json!({"type": "message-end", "delta": {"finish_reason": "TOOL_CALL"}})),
        ];

        let mut acc = ChatStreamAccumulator::new();
        events.iter().for_each(|e| acc.apply(e));
        let response = acc.into_response();

        assert_eq!(response.text(), None);
        assert_eq!(response.tool_plan(), Some("I will check"));
        assert_eq!(response.tool_calls().len(), 2);
        assert_eq!(response.tool_calls()[0].id, "c0");
        assert_eq!(response.tool_calls()[0].function.arguments, "{\"city\":\"Paris\"}");
        assert_eq!(response.tool_calls()[1].name(), "get_time");
        assert_eq!(response.finish_reason(), Some(&FinishReason::ToolCall));
    }

    #[test]
    fn test_sparse_tool_call_indices() {
        let events = vec![
            event(json!({
                "type": "tool-call-start", "index": 100000,
                "delta": {"message": {"tool_calls": {"id": "far", "type": "function", "function": {"name": "lookup", "arguments": ""}}}}
            })),
            event(json!({"type": "tool-call-delta", "index": 100000, "delta": {"message": {"tool_calls": {"function": {"arguments": "{}"}}}}})),
            event(json!({
                "type": "tool-call-start", "index": 3,
                "delta": {"message": {"tool_calls": {"id": "near", "type": "function", "function": {"name": "search", "arguments": ""}}}}
            })),
            event(json!({"type": "tool-call-delta", "index": 7, "delta": {"message": {"tool_calls": {"function": {"arguments": "ignored"}}}}})),
        ];

        let mut acc = ChatStreamAccumulator::new();
        events.iter().for_each(|e| acc.apply(e));
        let response = acc.into_response();

        let names: Vec<&str> = response.tool_calls().iter().map(|c| c.name()).collect();
        assert_eq!(names, vec!["search", "lookup"]);
        assert_eq!(response.tool_calls()[1].function.arguments, "{}");
    }
}
