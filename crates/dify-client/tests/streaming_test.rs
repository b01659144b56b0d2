use async_trait::async_trait;
use bytes::Bytes;
use dify_client::{process_sse_stream, DifyError, EventHandler, StreamingResponse, TtsMessage};
use futures::stream;

/// Records every handler invocation in order.
#[derive(Default)]
struct RecordingHandler {
    tts: Vec<TtsMessage>,
    responses: Vec<StreamingResponse>,
}

#[async_trait]
impl EventHandler for RecordingHandler {
    async fn handle_tts_message(&mut self, message: TtsMessage) {
        self.tts.push(message);
    }

    async fn handle_streaming_response(&mut self, response: StreamingResponse) {
        self.responses.push(response);
    }
}

/// Build a byte stream from fixed chunks.
fn chunked(chunks: &[&str]) -> impl futures::Stream<Item = Result<Bytes, std::io::Error>> {
    let items: Vec<Result<Bytes, std::io::Error>> = chunks
        .iter()
        .map(|c| Ok(Bytes::copy_from_slice(c.as_bytes())))
        .collect();
    stream::iter(items)
}

#[tokio::test]
async fn test_handler_order_matches_frame_order() {
    let mut handler = RecordingHandler::default();
    let body = "data: {\"event\":\"message\",\"answer\":\"Hel\"}\n\
                data: {\"event\":\"agent_message\",\"answer\":\"lo\"}\n\
                data: {\"event\":\"message\",\"answer\":\"!\"}\n";

    let result = process_sse_stream(chunked(&[body]), &mut handler).await;

    assert!(result.is_ok());
    let answers: Vec<_> = handler
        .responses
        .iter()
        .map(|r| r.answer.as_deref().unwrap())
        .collect();
    assert_eq!(answers, vec!["Hel", "lo", "!"]);
}

#[tokio::test]
async fn test_message_end_terminates_before_remaining_frames() {
    let mut handler = RecordingHandler::default();
    // Everything after message_end is already buffered but must never be
    // dispatched.
    let body = "data: {\"event\":\"message\",\"answer\":\"hi\"}\n\
                data: {\"event\":\"message_end\"}\n\
                data: {\"event\":\"message\",\"answer\":\"late\"}\n\
                data: {\"event\":\"tts_message\",\"audio\":\"zzz\"}\n";

    let result = process_sse_stream(chunked(&[body]), &mut handler).await;

    assert!(result.is_ok());
    assert_eq!(handler.responses.len(), 2);
    assert_eq!(handler.responses[1].event, "message_end");
    assert!(handler.tts.is_empty());
}

#[tokio::test]
async fn test_end_of_stream_without_message_end_is_success() {
    let mut handler = RecordingHandler::default();
    let body = "data: {\"event\":\"message\",\"answer\":\"only\"}\n";

    let result = process_sse_stream(chunked(&[body]), &mut handler).await;

    assert!(result.is_ok());
    assert_eq!(handler.responses.len(), 1);
}

#[tokio::test]
async fn test_malformed_frame_is_skipped_not_fatal() {
    let mut handler = RecordingHandler::default();
    let body = "data: {\"event\":\"message\",\"answer\":\"a\"}\n\
                data: {bad json\n\
                data: {\"event\":\"message\",\"answer\":\"b\"}\n";

    let result = process_sse_stream(chunked(&[body]), &mut handler).await;

    assert!(result.is_ok());
    assert_eq!(handler.responses.len(), 2);
    assert_eq!(handler.responses[1].answer.as_deref(), Some("b"));
}

#[tokio::test]
async fn test_tts_frames_route_to_tts_handler() {
    let mut handler = RecordingHandler::default();
    let body = "data: {\"event\":\"tts_message\",\"audio\":\"abc\"}\n\
                data: {\"event\":\"tts_message_end\"}\n";

    let result = process_sse_stream(chunked(&[body]), &mut handler).await;

    assert!(result.is_ok());
    assert_eq!(handler.tts.len(), 2);
    assert_eq!(handler.tts[0].audio, "abc");
    assert_eq!(handler.tts[1].audio, "");
    assert!(handler.responses.is_empty());
}

#[tokio::test]
async fn test_unknown_event_routes_to_streaming_handler() {
    let mut handler = RecordingHandler::default();
    let body = "data: {\"event\":\"workflow_started\",\"task_id\":\"t1\"}\n\
                data: {\"event\":\"message\",\"answer\":\"x\"}\n";

    let result = process_sse_stream(chunked(&[body]), &mut handler).await;

    assert!(result.is_ok());
    assert_eq!(handler.responses.len(), 2);
    assert_eq!(handler.responses[0].event, "workflow_started");
}

#[tokio::test]
async fn test_lines_without_data_prefix_are_ignored() {
    let mut handler = RecordingHandler::default();
    let body = "\n\
                : keep-alive comment\n\
                event: ping\n\
                data: {\"event\":\"message\",\"answer\":\"ok\"}\n";

    let result = process_sse_stream(chunked(&[body]), &mut handler).await;

    assert!(result.is_ok());
    assert_eq!(handler.responses.len(), 1);
}

#[tokio::test]
async fn test_frame_split_across_chunks_is_reassembled() {
    let mut handler = RecordingHandler::default();
    let chunks = [
        "data: {\"event\":\"mes",
        "sage\",\"answer\":\"joined\"}\ndata: {\"event\":\"message_end\"}\n",
    ];

    let result = process_sse_stream(chunked(&chunks), &mut handler).await;

    assert!(result.is_ok());
    assert_eq!(handler.responses.len(), 2);
    assert_eq!(handler.responses[0].answer.as_deref(), Some("joined"));
}

#[tokio::test]
async fn test_trailing_partial_line_is_dropped() {
    let mut handler = RecordingHandler::default();
    let body = "data: {\"event\":\"message\",\"answer\":\"a\"}\n\
                data: {\"event\":\"message\",\"ans";

    let result = process_sse_stream(chunked(&[body]), &mut handler).await;

    assert!(result.is_ok());
    assert_eq!(handler.responses.len(), 1);
}

#[tokio::test]
async fn test_read_error_is_fatal_and_surfaced() {
    let mut handler = RecordingHandler::default();
    let items: Vec<Result<Bytes, std::io::Error>> = vec![
        Ok(Bytes::from_static(
            b"data: {\"event\":\"message\",\"answer\":\"before\"}\n",
        )),
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset",
        )),
    ];

    let result = process_sse_stream(stream::iter(items), &mut handler).await;

    match result {
        Err(DifyError::StreamRead(_)) => {}
        other => panic!("expected StreamRead error, got {:?}", other),
    }
    // Frames dispatched before the failure stand.
    assert_eq!(handler.responses.len(), 1);
}

#[tokio::test]
async fn test_crlf_lines_are_handled() {
    let mut handler = RecordingHandler::default();
    let body = "data: {\"event\":\"message\",\"answer\":\"crlf\"}\r\n\
                data: {\"event\":\"message_end\"}\r\n";

    let result = process_sse_stream(chunked(&[body]), &mut handler).await;

    assert!(result.is_ok());
    assert_eq!(handler.responses.len(), 2);
    assert_eq!(handler.responses[0].answer.as_deref(), Some("crlf"));
}

#[tokio::test]
async fn test_tts_decode_failure_is_skipped() {
    let mut handler = RecordingHandler::default();
    // Envelope decodes but the full TtsMessage does not (audio is not a
    // string), so the frame is skipped and the stream continues.
    let body = "data: {\"event\":\"tts_message\",\"audio\":42}\n\
                data: {\"event\":\"message\",\"answer\":\"next\"}\n";

    let result = process_sse_stream(chunked(&[body]), &mut handler).await;

    assert!(result.is_ok());
    assert!(handler.tts.is_empty());
    assert_eq!(handler.responses.len(), 1);
}
