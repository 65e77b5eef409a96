use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

use crate::error::{DecodeError, ValidationError};

// ============================================================================
// Closed enumerations
// ============================================================================

/// Declares a closed enum whose wire representation is a fixed string.
///
/// `parse` is case-insensitive and is the only place a raw string is turned
/// into a variant; serde goes through it as well.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident ($kind:literal) {
            $( $(#[$vmeta:meta])* $variant:ident => $wire:literal $(| $alias:literal)* ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn parse(value: &str) -> Result<Self, ValidationError> {
                let value = value.trim();
                $(
                    if value.eq_ignore_ascii_case($wire) $(|| value.eq_ignore_ascii_case($alias))* {
                        return Ok($name::$variant);
                    }
                )+
                Err(ValidationError::UnknownVariant {
                    kind: $kind,
                    value: value.to_string(),
                })
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $wire),+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $name {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::parse(s)
            }
        }

        impl Serialize for $name {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.as_str())
            }
        }

        impl<'de> Deserialize<'de> for $name {
            fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
                let raw = String::deserialize(deserializer)?;
                Self::parse(&raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

wire_enum! {
    /// Author of a chat message.
    pub enum Role ("role") {
        System => "system",
        User => "user",
        Assistant => "assistant",
        Tool => "tool",
    }
}

wire_enum! {
    /// Safety instruction injected by the API in front of the prompt.
    ///
    /// `Disabled` is sent as `OFF`; `false` is also accepted when parsing
    /// because older configuration files spell it that way.
    pub enum SafetyMode ("safety mode") {
        Contextual => "CONTEXTUAL",
        Strict => "STRICT",
        Disabled => "OFF" | "false" | "disabled" | "none",
    }
}

wire_enum! {
    /// How citations are generated for grounded answers.
    pub enum CitationMode ("citation mode") {
        Fast => "FAST",
        Accurate => "ACCURATE",
        Off => "OFF",
    }
}

wire_enum! {
    /// What the embeddings will be used for. Required by v3+ embed models.
    pub enum EmbedInputType ("input type") {
        SearchDocument => "search_document",
        SearchQuery => "search_query",
        Classification => "classification",
        Clustering => "clustering",
        Image => "image",
    }
}

wire_enum! {
    /// What to do with inputs longer than the model's context.
    pub enum Truncate ("truncation policy") {
        None => "NONE",
        Start => "START",
        End => "END",
    }
}

wire_enum! {
    /// Encoding of the returned embedding vectors.
    pub enum EmbeddingType ("embedding type") {
        Float => "float",
        Int8 => "int8",
        Uint8 => "uint8",
        Binary => "binary",
        Ubinary => "ubinary",
        Base64 => "base64",
    }
}

/// Why generation stopped.
///
/// Unlike the request-side enums this one is open: a reason the client does
/// not know about decodes into `Other` instead of failing the whole response.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FinishReason {
    Complete,
    StopSequence,
    MaxTokens,
    ToolCall,
    Error,
    Timeout,
    Other(String),
}

impl FinishReason {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_uppercase().as_str() {
            "COMPLETE" => Self::Complete,
            "STOP_SEQUENCE" => Self::StopSequence,
            "MAX_TOKENS" => Self::MaxTokens,
            "TOOL_CALL" => Self::ToolCall,
            "ERROR" => Self::Error,
            "TIMEOUT" => Self::Timeout,
            _ => Self::Other(value.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Complete => "COMPLETE",
            Self::StopSequence => "STOP_SEQUENCE",
            Self::MaxTokens => "MAX_TOKENS",
            Self::ToolCall => "TOOL_CALL",
            Self::Error => "ERROR",
            Self::Timeout => "TIMEOUT",
            Self::Other(raw) => raw,
        }
    }
}

impl fmt::Display for FinishReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for FinishReason {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for FinishReason {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

// ============================================================================
// Tool calls
// ============================================================================

fn default_tool_type() -> String {
    "function".to_string()
}

/// A function invocation requested by the model.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ToolCall {
    #[serde(default)]
    pub id: String,
    #[serde(rename = "type", default = "default_tool_type")]
    pub tool_type: String,
    pub function: FunctionCall,
}

/// Function call structure within a tool call
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
pub struct FunctionCall {
    #[serde(default)]
    pub name: String,
    /// JSON-encoded argument object, exactly as the model produced it.
    #[serde(deserialize_with = "deserialize_string_or_null", default)]
    pub arguments: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, arguments: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            tool_type: default_tool_type(),
            function: FunctionCall {
                name: name.into(),
                arguments: arguments.into(),
            },
        }
    }

    pub fn name(&self) -> &str {
        &self.function.name
    }

    /// Parse the argument payload. An empty payload is treated as `{}`.
    pub fn arguments_json(&self) -> Result<serde_json::Value, DecodeError> {
        if self.function.arguments.trim().is_empty() {
            return Ok(serde_json::Value::Object(Default::default()));
        }
        serde_json::from_str(&self.function.arguments).map_err(|e| {
            DecodeError::new("tool call", format!("arguments of `{}` are not valid JSON: {}", self.function.name, e))
                .with_body(self.function.arguments.clone())
        })
    }
}

// ============================================================================
// Deserialization helpers
// ============================================================================

/// Helper function to deserialize string or null values
pub fn deserialize_string_or_null<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match serde_json::Value::deserialize(deserializer)? {
        serde_json::Value::String(s) => Ok(s),
        serde_json::Value::Null => Ok(String::new()),
        other => Ok(other.to_string()),
    }
}

/// Token counts arrive as JSON numbers that may be encoded as floats (`3.0`).
/// Accept any non-negative integral number.
pub fn deserialize_token_count<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    match Option::<serde_json::Number>::deserialize(deserializer)? {
        None => Ok(None),
        Some(n) => {
            if let Some(v) = n.as_u64() {
                return Ok(Some(v));
            }
            match n.as_f64() {
                Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
                _ => Err(D::Error::custom(format!("token count must be a non-negative integer, got {}", n))),
            }
        }
    }
}
