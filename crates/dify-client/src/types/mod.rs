pub mod events;
pub mod request;

pub use events::{ChatMessageResponse, EventKind, StreamingResponse, TtsMessage};
pub use request::{ChatMessageRequest, ResponseMode};
