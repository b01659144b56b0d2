use crate::error::DifyError;
use crate::traits::EventHandler;
use crate::types::{EventKind, StreamingResponse, TtsMessage};
use bytes::Bytes;
use futures::{Stream, StreamExt};
use serde::Deserialize;
use std::collections::VecDeque;
use tracing::warn;

const DATA_PREFIX: &str = "data: ";

/// Cheap partial decode of a frame, just enough to route it.
#[derive(Deserialize)]
struct Envelope {
    event: EventKind,
}

enum Flow {
    Continue,
    Done,
}

/// Consume a byte stream of newline-terminated event frames and dispatch
/// each decoded frame to `handler`, in arrival order.
///
/// Lines without the `data: ` prefix (blank keep-alives, comments) are
/// skipped. A frame that fails to decode is logged and skipped; it never
/// aborts the stream. The loop ends successfully on a `message_end` frame —
/// without reading any remaining input — or on clean end of stream. A read
/// failure ends it with [`DifyError::StreamRead`].
pub async fn process_sse_stream<S, E, H>(stream: S, handler: &mut H) -> Result<(), DifyError>
where
    S: Stream<Item = Result<Bytes, E>>,
    E: std::error::Error + Send + Sync + 'static,
    H: EventHandler + ?Sized,
{
    let mut chunks = Box::pin(stream);
    let mut buffer: VecDeque<u8> = VecDeque::with_capacity(8192);

    while let Some(chunk_result) = chunks.next().await {
        let bytes = chunk_result.map_err(|e| DifyError::StreamRead(Box::new(e)))?;
        buffer.extend(bytes);

        // Process every complete line currently buffered.
        while let Some(newline_pos) = buffer.iter().position(|&b| b == b'\n') {
            let line_bytes: Vec<u8> = buffer.drain(..=newline_pos).collect();

            let line = match std::str::from_utf8(&line_bytes) {
                Ok(s) => s.trim(),
                Err(e) => {
                    warn!(error = %e, "skipping non-UTF-8 stream line");
                    continue;
                }
            };

            if let Some(data) = line.strip_prefix(DATA_PREFIX) {
                if let Flow::Done = dispatch_frame(data, handler).await {
                    return Ok(());
                }
            }
        }
    }

    // End of stream without message_end is a normal termination, not an
    // error. A trailing partial line is dropped.
    Ok(())
}

async fn dispatch_frame<H>(data: &str, handler: &mut H) -> Flow
where
    H: EventHandler + ?Sized,
{
    let envelope: Envelope = match serde_json::from_str(data) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(error = %e, "error decoding event type, skipping frame");
            return Flow::Continue;
        }
    };

    match envelope.event {
        EventKind::TtsMessage | EventKind::TtsMessageEnd => {
            match serde_json::from_str::<TtsMessage>(data) {
                Ok(message) => handler.handle_tts_message(message).await,
                Err(e) => warn!(error = %e, "error decoding TTS message, skipping frame"),
            }
            Flow::Continue
        }
        kind => {
            match serde_json::from_str::<StreamingResponse>(data) {
                Ok(response) => {
                    handler.handle_streaming_response(response).await;
                    if kind == EventKind::MessageEnd {
                        return Flow::Done;
                    }
                }
                Err(e) => {
                    warn!(error = %e, "error decoding streaming response, skipping frame")
                }
            }
            Flow::Continue
        }
    }
}
