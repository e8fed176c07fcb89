//! Request lifecycle against the remote inference service.
//!
//! One call to [`GenerationOrchestrator::generate`] reads the current input
//! image, posts it, and on success stores the returned image in the result
//! slot. Failures never touch either slot. The in-flight flag is held by an
//! [`InFlightGuard`] for the duration of the call, so every exit path
//! releases it. Preventing a second concurrent call is up to the caller,
//! which should disable its trigger while [`GenerationOrchestrator::is_in_flight`]
//! is true.

mod transport;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::{AppConfig, StaleResponsePolicy};
use crate::error::{PipelineError, PipelineResult};
use crate::payload::ImagePayload;
use crate::session::SharedSession;

pub use transport::{HttpTransport, InferenceTransport, TransportResponse};

#[derive(Serialize)]
struct GenerateRequest<'a> {
    image: &'a str,
}

#[derive(Deserialize)]
struct GenerateResponse {
    generated_image: String,
}

/// What happened to a response the service produced
#[derive(Debug, Clone)]
pub enum GenerationOutcome {
    /// Stored in the result slot
    Stored(ImagePayload),
    /// Dropped because the session was cleared while the request ran
    Discarded(ImagePayload),
}

impl GenerationOutcome {
    pub fn payload(&self) -> &ImagePayload {
        match self {
            Self::Stored(payload) | Self::Discarded(payload) => payload,
        }
    }

    pub fn is_stored(&self) -> bool {
        matches!(self, Self::Stored(_))
    }
}

/// Marks a generation as in flight until dropped
#[derive(Debug)]
pub struct InFlightGuard {
    flag: Arc<AtomicBool>,
}

impl InFlightGuard {
    fn acquire(flag: &Arc<AtomicBool>) -> Self {
        flag.store(true, Ordering::SeqCst);
        Self { flag: flag.clone() }
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::SeqCst);
    }
}

pub struct GenerationOrchestrator<T> {
    transport: Arc<T>,
    endpoint: String,
    stale_policy: StaleResponsePolicy,
    in_flight: Arc<AtomicBool>,
}

// Clones share the transport and the in-flight flag
impl<T> Clone for GenerationOrchestrator<T> {
    fn clone(&self) -> Self {
        Self {
            transport: self.transport.clone(),
            endpoint: self.endpoint.clone(),
            stale_policy: self.stale_policy,
            in_flight: self.in_flight.clone(),
        }
    }
}

impl<T> std::fmt::Debug for GenerationOrchestrator<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GenerationOrchestrator")
            .field("endpoint", &self.endpoint)
            .field("stale_policy", &self.stale_policy)
            .field("in_flight", &self.is_in_flight())
            .finish()
    }
}

impl<T> GenerationOrchestrator<T> {
    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

impl<T: InferenceTransport> GenerationOrchestrator<T> {
    pub fn new(transport: T, config: &AppConfig) -> Self {
        Self {
            transport: Arc::new(transport),
            endpoint: config.endpoint.clone(),
            stale_policy: config.stale_response_policy,
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Send the current input image for generation and store the result.
    ///
    /// Under [`StaleResponsePolicy::Discard`] a response that arrives after
    /// a clear-all comes back as [`GenerationOutcome::Discarded`].
    pub async fn generate(&self, session: &SharedSession) -> PipelineResult<GenerationOutcome> {
        let _guard = InFlightGuard::acquire(&self.in_flight);

        let (input, epoch) = {
            let session = session.lock();
            (session.source.current().cloned(), session.epoch())
        };
        let Some(input) = input else {
            log::warn!("Generate requested without an input image");
            return Err(PipelineError::NoInputImage);
        };

        let request_id = Uuid::new_v4();
        let body = serde_json::to_vec(&GenerateRequest {
            image: input.data_uri(),
        })
        .map_err(|e| PipelineError::Encode(e.to_string()))?;

        log::info!(
            "[{}] Sending {} image to {} ({} byte body)",
            request_id,
            input.mime(),
            self.endpoint,
            body.len()
        );

        let response = self
            .transport
            .post_json(&self.endpoint, body)
            .await
            .inspect_err(|e| log::error!("[{}] Generation request failed: {}", request_id, e))?;

        if !response.is_success() {
            log::error!(
                "[{}] Inference service answered {} {}",
                request_id,
                response.status,
                response.status_text
            );
            return Err(PipelineError::ApiError {
                status: response.status,
                status_text: response.status_text,
            });
        }

        let parsed: GenerateResponse = serde_json::from_slice(&response.body).map_err(|e| {
            log::error!("[{}] Unreadable generation response: {}", request_id, e);
            PipelineError::InvalidResponse(e.to_string())
        })?;
        let generated = ImagePayload::from_data_uri(parsed.generated_image);

        let mut session = session.lock();
        if self.stale_policy == StaleResponsePolicy::Discard && session.epoch() != epoch {
            log::warn!("[{}] Session was cleared while generating, discarding result", request_id);
            return Ok(GenerationOutcome::Discarded(generated));
        }
        session.results.set(generated.clone());
        log::info!("[{}] Generated image received ({})", request_id, generated.mime());

        Ok(GenerationOutcome::Stored(generated))
    }
}
