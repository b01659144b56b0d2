use crate::types::{StreamingResponse, TtsMessage};
use async_trait::async_trait;

/// Callbacks invoked by the streaming loop, one per decoded frame.
///
/// Supplied by the caller to [`DifyClient::chat_stream`](crate::DifyClient::chat_stream).
/// Invocations happen sequentially, in exact frame arrival order; the loop
/// never calls the handler from two frames concurrently. Handler-internal
/// failures are not observed or retried by the loop.
#[async_trait]
pub trait EventHandler: Send {
    /// Called for `tts_message` and `tts_message_end` frames.
    async fn handle_tts_message(&mut self, message: TtsMessage);

    /// Called for every other frame, including `message_end`.
    async fn handle_streaming_response(&mut self, response: StreamingResponse);
}
