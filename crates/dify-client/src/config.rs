use serde::{Deserialize, Serialize};

pub const DIFY_API_BASE: &str = "https://api.dify.ai";

/// Configuration for a [`DifyClient`](crate::DifyClient).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DifyConfig {
    pub api_key: String,
    /// Base URL for the Dify API (optional, defaults to https://api.dify.ai)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl DifyConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }
}
