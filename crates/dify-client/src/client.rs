use crate::config::{DifyConfig, DIFY_API_BASE};
use crate::error::DifyError;
use crate::streaming::process_sse_stream;
use crate::traits::EventHandler;
use crate::types::{ChatMessageRequest, ChatMessageResponse, ResponseMode};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Request, Response, StatusCode};
use serde::Serialize;

const CHAT_MESSAGES_PATH: &str = "/v1/chat-messages";

/// Dify API client (HTTP direct, no SDK)
pub struct DifyClient {
    http_client: reqwest::Client,
    base_url: String,
}

impl DifyClient {
    /// Create new client with API key
    pub fn new(config: DifyConfig) -> Result<Self, DifyError> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", config.api_key))
                .map_err(|e| DifyError::Construction(Box::new(e)))?,
        );

        let http_client = reqwest::Client::builder()
            .default_headers(headers)
            .build()
            .map_err(|e| DifyError::Construction(Box::new(e)))?;

        Ok(Self {
            http_client,
            base_url: config
                .base_url
                .unwrap_or_else(|| DIFY_API_BASE.to_string()),
        })
    }

    /// Build an outbound request with the serialized body attached.
    fn build_request<T>(&self, method: Method, path: &str, body: &T) -> Result<Request, DifyError>
    where
        T: Serialize + ?Sized,
    {
        self.http_client
            .request(method, format!("{}{}", self.base_url, path))
            .json(body)
            .build()
            .map_err(|e| DifyError::Construction(Box::new(e)))
    }

    /// Send a request and validate the status.
    ///
    /// On a non-OK status the body is drained into the error and is never
    /// interpreted as a stream.
    async fn send(&self, request: Request) -> Result<Response, DifyError> {
        let response = self
            .http_client
            .execute(request)
            .await
            .map_err(DifyError::Transport)?;

        if response.status() != StatusCode::OK {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(DifyError::Status { status, body });
        }

        Ok(response)
    }

    /// Blocking-mode chat completion.
    ///
    /// Forces `response_mode` to [`ResponseMode::Blocking`] and returns the
    /// whole completion at once.
    pub async fn chat(
        &self,
        request: ChatMessageRequest,
    ) -> Result<ChatMessageResponse, DifyError> {
        let mut request = request;
        request.response_mode = ResponseMode::Blocking;

        let req = self.build_request(Method::POST, CHAT_MESSAGES_PATH, &request)?;
        let response = self.send(req).await?;

        response
            .json()
            .await
            .map_err(|e| DifyError::StreamRead(Box::new(e)))
    }

    /// Streaming chat completion.
    ///
    /// Forces `response_mode` to [`ResponseMode::Streaming`], then reads the
    /// response body frame by frame, dispatching each decoded event to
    /// `handler` in arrival order. Returns `Ok(())` after a `message_end`
    /// frame or a clean end of stream. Cancellation is the transport's job:
    /// aborting the connection surfaces here as
    /// [`DifyError::StreamRead`](crate::DifyError::StreamRead).
    pub async fn chat_stream<H>(
        &self,
        request: ChatMessageRequest,
        handler: &mut H,
    ) -> Result<(), DifyError>
    where
        H: EventHandler + ?Sized,
    {
        let mut request = request;
        request.response_mode = ResponseMode::Streaming;

        let req = self.build_request(Method::POST, CHAT_MESSAGES_PATH, &request)?;
        let response = self.send(req).await?;

        // The response body is owned by this call and released when the
        // byte stream drops, on success, early termination, and failure
        // alike.
        process_sse_stream(response.bytes_stream(), handler).await
    }
}
