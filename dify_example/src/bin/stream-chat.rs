use anyhow::Result;
use async_trait::async_trait;
use dify_client::{
    ChatMessageRequest, DifyClient, DifyConfig, EventHandler, StreamingResponse, TtsMessage,
};
use std::io::Write;

/// Prints answer deltas as they arrive and summarizes TTS audio chunks.
struct PrintHandler {
    audio_bytes: usize,
}

#[async_trait]
impl EventHandler for PrintHandler {
    async fn handle_tts_message(&mut self, message: TtsMessage) {
        self.audio_bytes += message.audio.len();
    }

    async fn handle_streaming_response(&mut self, response: StreamingResponse) {
        match response.event.as_str() {
            "message" | "agent_message" => {
                if let Some(answer) = response.answer {
                    print!("{}", answer);
                    let _ = std::io::stdout().flush();
                }
            }
            "message_end" => {
                println!();
                if let Some(conversation_id) = response.conversation_id {
                    println!("conversation: {}", conversation_id);
                }
            }
            "error" => {
                println!(
                    "\nstream error event: {}",
                    response.message.unwrap_or_default()
                );
            }
            _ => {}
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let api_key = std::env::var("DIFY_API_KEY").expect("DIFY_API_KEY required");
    let mut config = DifyConfig::new(api_key);
    if let Ok(base_url) = std::env::var("DIFY_BASE_URL") {
        config = config.with_base_url(base_url);
    }

    let client = DifyClient::new(config)?;

    let query = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "Tell me a short joke about crabs.".to_string());
    let request = ChatMessageRequest::new(query, "example-user");

    let mut handler = PrintHandler { audio_bytes: 0 };
    client.chat_stream(request, &mut handler).await?;

    if handler.audio_bytes > 0 {
        println!("received {} bytes of base64 audio", handler.audio_bytes);
    }

    Ok(())
}
