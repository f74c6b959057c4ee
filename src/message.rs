// src/message.rs
use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

impl ChatRequest {
    pub fn new(message: impl Into<String>) -> Self {
        Self { message: message.into() }
    }
}

/// A server-suggested reply. Its text is both the button label and the
/// payload resent when the option is chosen.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatOption {
    pub text: String,
}

impl ChatOption {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Decoding reads `ok` first; `reply` and `options` are only checked
/// when it is `true`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawResponse")]
pub struct ChatResponse {
    pub ok: bool,
    pub reply: String,
    pub options: Vec<ChatOption>,
    /// Current conversation node id, when the server reports one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub node: Option<String>,
    /// Server diagnostic attached to `ok: false` responses.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ChatResponse {
    pub fn reply(reply: impl Into<String>, options: Vec<ChatOption>) -> Self {
        Self {
            ok: true,
            reply: reply.into(),
            options,
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

// Wire shape before validation. Null and missing fields both land as None.
#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    ok: Option<Value>,
    #[serde(default)]
    reply: Option<Value>,
    #[serde(default)]
    options: Option<Value>,
    #[serde(default)]
    node: Option<Value>,
    #[serde(default)]
    error: Option<Value>,
}

impl TryFrom<RawResponse> for ChatResponse {
    type Error = serde_json::Error;

    fn try_from(raw: RawResponse) -> Result<Self, Self::Error> {
        let text = |v: Option<Value>| -> Option<String> { v.and_then(|v| v.as_str().map(str::to_owned)) };
        let node = text(raw.node);
        let error = text(raw.error);

        // Anything but a literal `true` is a failure; reply and options are not looked at.
        if raw.ok != Some(Value::Bool(true)) {
            return Ok(Self { ok: false, node, error, ..Default::default() });
        }

        let reply = match raw.reply {
            Some(v) => serde_json::from_value(v)?,
            None => String::new(),
        };
        let options = match raw.options {
            Some(v) => serde_json::from_value(v)?,
            None => Vec::new(),
        };
        Ok(Self { ok: true, reply, options, node, error })
    }
}

/// What the widget asks the transport to deliver.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OutboundRequest {
    /// Fetch the initial conversation node.
    Start,
    Message(ChatRequest),
}

impl OutboundRequest {
    pub fn kind(&self) -> &'static str {
        match self {
            OutboundRequest::Start => "start",
            OutboundRequest::Message(_) => "message",
        }
    }
}
