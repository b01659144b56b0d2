pub mod client;
pub mod config;
pub mod error;
pub mod streaming;
pub mod traits;
pub mod types;

pub use client::DifyClient;
pub use config::DifyConfig;
pub use error::DifyError;
pub use streaming::process_sse_stream;
pub use traits::EventHandler;
pub use types::{
    ChatMessageRequest, ChatMessageResponse, EventKind, ResponseMode, StreamingResponse,
    TtsMessage,
};
