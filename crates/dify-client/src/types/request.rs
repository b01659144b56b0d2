use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// How the API should deliver the completion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResponseMode {
    Streaming,
    Blocking,
}

impl Default for ResponseMode {
    fn default() -> Self {
        ResponseMode::Blocking
    }
}

/// One conversation turn sent to `/v1/chat-messages`.
///
/// The streaming call overwrites `response_mode` with
/// [`ResponseMode::Streaming`] regardless of what the caller set; the
/// blocking call does the same with [`ResponseMode::Blocking`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessageRequest {
    /// App-defined input variables.
    #[serde(default)]
    pub inputs: Map<String, Value>,
    pub query: String,
    #[serde(default)]
    pub response_mode: ResponseMode,
    /// Empty for the first turn of a conversation.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub conversation_id: String,
    pub user: String,
}

impl ChatMessageRequest {
    pub fn new(query: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            inputs: Map::new(),
            query: query.into(),
            response_mode: ResponseMode::default(),
            conversation_id: String::new(),
            user: user.into(),
        }
    }

    pub fn with_conversation_id(mut self, conversation_id: impl Into<String>) -> Self {
        self.conversation_id = conversation_id.into();
        self
    }

    pub fn with_input(mut self, key: impl Into<String>, value: Value) -> Self {
        self.inputs.insert(key.into(), value);
        self
    }

    pub fn with_inputs(mut self, inputs: Map<String, Value>) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn with_response_mode(mut self, mode: ResponseMode) -> Self {
        self.response_mode = mode;
        self
    }
}
