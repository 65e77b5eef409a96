use serde::Serialize;
use std::collections::HashSet;

use crate::error::{check_non_empty, check_range, ValidationError};
use crate::types::{CitationMode, Role, SafetyMode, ToolCall};

/// Maximum number of stop sequences the chat endpoint accepts.
pub const MAX_STOP_SEQUENCES: usize = 5;

/// Maximum value accepted for top-k sampling.
pub const MAX_TOP_K: i64 = 500;

/// A message in the conversation sent to the chat endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum ChatMessage {
    System {
        content: String,
    },
    User {
        content: String,
    },
    Assistant {
        #[serde(skip_serializing_if = "Option::is_none")]
        content: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        tool_plan: Option<String>,
        #[serde(skip_serializing_if = "Vec::is_empty")]
        tool_calls: Vec<ToolCall>,
    },
    Tool {
        tool_call_id: String,
        content: String,
    },
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self::System { content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::User { content: content.into() }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::Assistant {
            content: Some(content.into()),
            tool_plan: None,
            tool_calls: Vec::new(),
        }
    }

    /// An earlier assistant turn that asked for tools to be run.
    pub fn assistant_tool_calls(tool_plan: Option<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self::Assistant {
            content: None,
            tool_plan,
            tool_calls,
        }
    }

    /// The result of running the tool call `tool_call_id`.
    pub fn tool_result(tool_call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self::Tool {
            tool_call_id: tool_call_id.into(),
            content: content.into(),
        }
    }

    /// Build a plain text message for `role`. Tool results need a call id,
    /// so they have to go through [`ChatMessage::tool_result`].
    pub fn with_role(role: Role, content: impl Into<String>) -> Result<Self, ValidationError> {
        match role {
            Role::System => Ok(Self::system(content)),
            Role::User => Ok(Self::user(content)),
            Role::Assistant => Ok(Self::assistant(content)),
            Role::Tool => Err(ValidationError::invalid(
                "messages",
                "tool messages must reference a tool call id",
            )),
        }
    }

    pub fn role(&self) -> Role {
        match self {
            Self::System { .. } => Role::System,
            Self::User { .. } => Role::User,
            Self::Assistant { .. } => Role::Assistant,
            Self::Tool { .. } => Role::Tool,
        }
    }

    pub fn content(&self) -> Option<&str> {
        match self {
            Self::System { content } | Self::User { content } | Self::Tool { content, .. } => Some(content),
            Self::Assistant { content, .. } => content.as_deref(),
        }
    }

    fn validate(&self) -> Result<(), ValidationError> {
        match self {
            Self::System { content } | Self::User { content } => check_non_empty("messages.content", content),
            Self::Assistant { content, tool_calls, .. } => {
                let has_text = content.as_deref().map(|c| !c.trim().is_empty()).unwrap_or(false);
                if !has_text && tool_calls.is_empty() {
                    return Err(ValidationError::invalid(
                        "messages",
                        "assistant messages need content or at least one tool call",
                    ));
                }
                for call in tool_calls {
                    check_non_empty("messages.tool_calls.function.name", &call.function.name)?;
                }
                Ok(())
            }
            Self::Tool { tool_call_id, .. } => check_non_empty("messages.tool_call_id", tool_call_id),
        }
    }
}

/// Tool definition for chat API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Tool {
    #[serde(rename = "type")]
    pub tool_type: String,
    pub function: FunctionDef,
}

/// Function definition within a tool
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FunctionDef {
    pub name: String,
    pub description: String,
    /// JSON schema describing the arguments.
    pub parameters: serde_json::Value,
}

impl Tool {
    pub fn function(name: impl Into<String>, description: impl Into<String>, parameters: serde_json::Value) -> Self {
        Self {
            tool_type: "function".to_string(),
            function: FunctionDef {
                name: name.into(),
                description: description.into(),
                parameters,
            },
        }
    }
}

/// A grounding document for retrieval-augmented generation.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ChatDocument {
    Text(String),
    Structured {
        #[serde(skip_serializing_if = "Option::is_none")]
        id: Option<String>,
        data: serde_json::Map<String, serde_json::Value>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CitationOptions {
    pub mode: CitationMode,
}

/// Constrains the shape of the generated text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ResponseFormat {
    Text,
    JsonObject {
        #[serde(skip_serializing_if = "Option::is_none")]
        json_schema: Option<serde_json::Value>,
    },
}

/// A validated request for `POST /v2/chat`.
///
/// Only [`ChatRequestBuilder::build`] can produce one, and it exposes no
/// setters, so a value that exists has already passed validation.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    strict_tools: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    documents: Vec<ChatDocument>,
    #[serde(skip_serializing_if = "Option::is_none")]
    citation_options: Option<CitationOptions>,
    #[serde(skip_serializing_if = "Option::is_none")]
    response_format: Option<ResponseFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    safety_mode: Option<SafetyMode>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    stop_sequences: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    frequency_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    presence_penalty: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    k: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    p: Option<f64>,
}

impl ChatRequest {
    pub fn builder(model: impl Into<String>) -> ChatRequestBuilder {
        ChatRequestBuilder::new(model)
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    pub fn is_streaming(&self) -> bool {
        self.stream
    }

    pub fn tools(&self) -> &[Tool] {
        &self.tools
    }

    pub fn documents(&self) -> &[ChatDocument] {
        &self.documents
    }

    pub fn citation_mode(&self) -> Option<CitationMode> {
        self.citation_options.map(|o| o.mode)
    }

    pub fn safety_mode(&self) -> Option<SafetyMode> {
        self.safety_mode
    }

    pub fn temperature(&self) -> Option<f64> {
        self.temperature
    }

    pub fn p(&self) -> Option<f64> {
        self.p
    }

    pub fn k(&self) -> Option<u32> {
        self.k
    }

    pub fn max_tokens(&self) -> Option<u32> {
        self.max_tokens
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    pub fn stop_sequences(&self) -> &[String] {
        &self.stop_sequences
    }
}

/// Collects chat parameters; every range check happens in [`build`](Self::build).
#[derive(Debug, Clone)]
pub struct ChatRequestBuilder {
    model: String,
    messages: Vec<ChatMessage>,
    stream: bool,
    tools: Vec<Tool>,
    strict_tools: Option<bool>,
    documents: Vec<ChatDocument>,
    citation_mode: Option<CitationMode>,
    response_format: Option<ResponseFormat>,
    safety_mode: Option<SafetyMode>,
    max_tokens: Option<i64>,
    stop_sequences: Vec<String>,
    temperature: Option<f64>,
    seed: Option<u64>,
    frequency_penalty: Option<f64>,
    presence_penalty: Option<f64>,
    k: Option<i64>,
    p: Option<f64>,
}

impl ChatRequestBuilder {
    pub fn new(model: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            messages: Vec::new(),
            stream: false,
            tools: Vec::new(),
            strict_tools: None,
            documents: Vec::new(),
            citation_mode: None,
            response_format: None,
            safety_mode: None,
            max_tokens: None,
            stop_sequences: Vec::new(),
            temperature: None,
            seed: None,
            frequency_penalty: None,
            presence_penalty: None,
            k: None,
            p: None,
        }
    }

    pub fn message(mut self, message: ChatMessage) -> Self {
        self.messages.push(message);
        self
    }

    pub fn messages(mut self, messages: impl IntoIterator<Item = ChatMessage>) -> Self {
        self.messages.extend(messages);
        self
    }

    pub fn stream(mut self, stream: bool) -> Self {
        self.stream = stream;
        self
    }

    pub fn tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn strict_tools(mut self, strict: bool) -> Self {
        self.strict_tools = Some(strict);
        self
    }

    pub fn document(mut self, document: ChatDocument) -> Self {
        self.documents.push(document);
        self
    }

    pub fn citation_mode(mut self, mode: CitationMode) -> Self {
        self.citation_mode = Some(mode);
        self
    }

    pub fn response_format(mut self, format: ResponseFormat) -> Self {
        self.response_format = Some(format);
        self
    }

    pub fn safety_mode(mut self, mode: SafetyMode) -> Self {
        self.safety_mode = Some(mode);
        self
    }

    pub fn max_tokens(mut self, max_tokens: i64) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn stop_sequence(mut self, stop: impl Into<String>) -> Self {
        self.stop_sequences.push(stop.into());
        self
    }

    pub fn temperature(mut self, temperature: f64) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    pub fn frequency_penalty(mut self, penalty: f64) -> Self {
        self.frequency_penalty = Some(penalty);
        self
    }

    pub fn presence_penalty(mut self, penalty: f64) -> Self {
        self.presence_penalty = Some(penalty);
        self
    }

    /// Top-k sampling, 0 disables it.
    pub fn k(mut self, k: i64) -> Self {
        self.k = Some(k);
        self
    }

    /// Nucleus sampling probability mass.
    pub fn p(mut self, p: f64) -> Self {
        self.p = Some(p);
        self
    }

    pub fn build(self) -> Result<ChatRequest, ValidationError> {
        check_non_empty("model", &self.model)?;

        if self.messages.is_empty() {
            return Err(ValidationError::missing("messages"));
        }
        for message in &self.messages {
            message.validate()?;
        }

        if let Some(t) = self.temperature {
            check_range("temperature", t, 0.0, 1.0)?;
        }
        if let Some(p) = self.p {
            check_range("p", p, 0.01, 0.99)?;
        }
        let k = match self.k {
            Some(k) => {
                check_range("k", k as f64, 0.0, MAX_TOP_K as f64)?;
                Some(k as u32)
            }
            None => None,
        };
        if let Some(v) = self.frequency_penalty {
            check_range("frequency_penalty", v, 0.0, 1.0)?;
        }
        if let Some(v) = self.presence_penalty {
            check_range("presence_penalty", v, 0.0, 1.0)?;
        }
        let max_tokens = match self.max_tokens {
            Some(m) => {
                check_range("max_tokens", m as f64, 1.0, u32::MAX as f64)?;
                Some(m as u32)
            }
            None => None,
        };

        if self.stop_sequences.len() > MAX_STOP_SEQUENCES {
            return Err(ValidationError::invalid(
                "stop_sequences",
                format!("at most {} stop sequences are allowed, got {}", MAX_STOP_SEQUENCES, self.stop_sequences.len()),
            ));
        }
        if self.stop_sequences.iter().any(|s| s.is_empty()) {
            return Err(ValidationError::invalid("stop_sequences", "stop sequences must not be empty"));
        }

        let mut names = HashSet::new();
        for tool in &self.tools {
            check_non_empty("tools.function.name", &tool.function.name)?;
            if !names.insert(tool.function.name.as_str()) {
                return Err(ValidationError::invalid(
                    "tools",
                    format!("duplicate tool name `{}`", tool.function.name),
                ));
            }
        }

        Ok(ChatRequest {
            model: self.model,
            messages: self.messages,
            stream: self.stream,
            tools: self.tools,
            strict_tools: self.strict_tools,
            documents: self.documents,
            citation_options: self.citation_mode.map(|mode| CitationOptions { mode }),
            response_format: self.response_format,
            safety_mode: self.safety_mode,
            max_tokens,
            stop_sequences: self.stop_sequences,
            temperature: self.temperature,
            seed: self.seed,
            frequency_penalty: self.frequency_penalty,
            presence_penalty: self.presence_penalty,
            k,
            p: self.p,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_messages_serialize_with_role_tag() {
        let messages = vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("hi"),
            ChatMessage::assistant_tool_calls(
                Some("look it up".to_string()),
                vec![ToolCall::new("call_1", "search", r#"{"q":"x"}"#)],
            ),
            ChatMessage::tool_result("call_1", "found"),
        ];

        assert_eq!(
            serde_json::to_value(&messages).unwrap(),
            json!([
                {"role": "system", "content": "be brief"},
                {"role": "user", "content": "hi"},
                {
                    "role": "assistant",
                    "tool_plan": "look it up",
                    "tool_calls": [{"id": "call_1", "type": "function", "function": {"name": "search", "arguments": "{\"q\":\"x\"}"}}]
                },
                {"role": "tool", "tool_call_id": "call_1", "content": "found"}
            ])
        );
    }

    #[test]
    fn test_minimal_request_payload() {
        let request = ChatRequest::builder("m1").message(ChatMessage::user("hi")).build().unwrap();

        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            json!({
                "model": "m1",
                "messages": [{"role": "user", "content": "hi"}],
                "stream": false
            })
        );
    }

    #[test]
    fn test_options_use_wire_names() {
        let request = ChatRequest::builder("m1")
            .message(ChatMessage::user("hi"))
            .citation_mode(CitationMode::Accurate)
            .safety_mode(SafetyMode::Disabled)
            .response_format(ResponseFormat::JsonObject { json_schema: None })
            .document(ChatDocument::Text("Paris is in France".to_string()))
            .build()
            .unwrap();

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["citation_options"], json!({"mode": "ACCURATE"}));
        assert_eq!(json["safety_mode"], "OFF");
        assert_eq!(json["response_format"], json!({"type": "json_object"}));
        assert_eq!(json["documents"], json!(["Paris is in France"]));
    }

    #[test]
    fn test_tool_role_requires_call_id() {
        assert!(ChatMessage::with_role(Role::Tool, "x").is_err());
        assert_eq!(ChatMessage::with_role(Role::User, "x").unwrap().role(), Role::User);
    }

    #[test]
    fn test_assistant_message_needs_content_or_calls() {
        let err = ChatRequest::builder("m1")
            .message(ChatMessage::assistant_tool_calls(None, vec![]))
            .build()
            .unwrap_err();
        assert_eq!(err.field(), "messages");
    }
}
