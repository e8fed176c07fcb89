use std::future::Future;
use std::time::Duration;

use reqwest::header::CONTENT_TYPE;

use crate::config::AppConfig;
use crate::error::{PipelineError, PipelineResult};

/// Status line and body of a completed HTTP exchange
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub status_text: String,
    pub body: Vec<u8>,
}

impl TransportResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Carries one JSON request to the inference service.
///
/// Implementations return `Ok` for any response that came back, whatever its
/// status, and `Err(PipelineError::NetworkError)` when no response did.
pub trait InferenceTransport: Send + Sync + 'static {
    fn post_json(
        &self,
        url: &str,
        body: Vec<u8>,
    ) -> impl Future<Output = PipelineResult<TransportResponse>> + Send;
}

/// `reqwest`-backed transport. Needs a tokio runtime.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new(config: &AppConfig) -> PipelineResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(config.connect_timeout_secs))
            .build()
            .map_err(|e| PipelineError::NetworkError(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

impl InferenceTransport for HttpTransport {
    async fn post_json(&self, url: &str, body: Vec<u8>) -> PipelineResult<TransportResponse> {
        let response = self
            .client
            .post(url)
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()
            .await
            .map_err(|e| PipelineError::NetworkError(e.to_string()))?;

        let status = response.status();
        let status_text = status
            .canonical_reason()
            .map(str::to_owned)
            .unwrap_or_else(|| status.as_u16().to_string());

        let body = response
            .bytes()
            .await
            .map_err(|e| PipelineError::NetworkError(format!("failed to read response body: {}", e)))?;

        Ok(TransportResponse {
            status: status.as_u16(),
            status_text,
            body: body.to_vec(),
        })
    }
}
