use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::channel::oneshot;
use futures::executor::block_on;
use parking_lot::Mutex;
use sketch_vision::config::{AppConfig, StaleResponsePolicy};
use sketch_vision::error::{PipelineError, PipelineResult};
use sketch_vision::generation::{
    GenerationOrchestrator, GenerationOutcome, HttpTransport, InferenceTransport,
    TransportResponse,
};
use sketch_vision::payload::ImagePayload;
use sketch_vision::session::{Session, SharedSession};

const INPUT_URI: &str = "data:image/png;base64,iVBORw0KGgo=";
const GENERATED_URI: &str = "data:image/jpeg;base64,/9j/4AAQSkZJRg==";

/// Answers every request with the same canned response
struct MockTransport {
    response: PipelineResult<TransportResponse>,
    calls: Arc<AtomicUsize>,
    bodies: Arc<Mutex<Vec<Vec<u8>>>>,
    /// When set, the request waits for the sender side before answering
    gate: Mutex<Option<oneshot::Receiver<()>>>,
}

impl MockTransport {
    fn answering(status: u16, status_text: &str, body: &str) -> Self {
        Self {
            response: Ok(TransportResponse {
                status,
                status_text: status_text.to_owned(),
                body: body.as_bytes().to_vec(),
            }),
            calls: Arc::new(AtomicUsize::new(0)),
            bodies: Arc::new(Mutex::new(Vec::new())),
            gate: Mutex::new(None),
        }
    }

    fn success() -> Self {
        Self::answering(200, "OK", &format!(r#"{{"generated_image":"{}"}}"#, GENERATED_URI))
    }

    fn failing(error: PipelineError) -> Self {
        let mut transport = Self::success();
        transport.response = Err(error);
        transport
    }

    fn gated(self) -> (Self, oneshot::Sender<()>) {
        let (sender, receiver) = oneshot::channel();
        *self.gate.lock() = Some(receiver);
        (self, sender)
    }
}

impl InferenceTransport for MockTransport {
    async fn post_json(&self, _url: &str, body: Vec<u8>) -> PipelineResult<TransportResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.bodies.lock().push(body);

        let gate = self.gate.lock().take();
        if let Some(gate) = gate {
            let _ = gate.await;
        }

        match &self.response {
            Ok(response) => Ok(response.clone()),
            Err(PipelineError::NetworkError(message)) => {
                Err(PipelineError::NetworkError(message.clone()))
            }
            Err(other) => Err(PipelineError::NetworkError(other.to_string())),
        }
    }
}

fn session_with_input() -> SharedSession {
    let session = Session::shared();
    session
        .lock()
        .source
        .set_current(Some(ImagePayload::from_data_uri(INPUT_URI)));
    session
}

fn orchestrator(transport: MockTransport) -> (GenerationOrchestrator<MockTransport>, Arc<AtomicUsize>) {
    let calls = transport.calls.clone();
    (GenerationOrchestrator::new(transport, &AppConfig::default()), calls)
}

#[test]
fn test_no_input_image_makes_no_request() {
    let (orchestrator, calls) = orchestrator(MockTransport::success());
    let session = Session::shared();

    let result = block_on(orchestrator.generate(&session));

    assert!(matches!(result, Err(PipelineError::NoInputImage)));
    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(!orchestrator.is_in_flight());
}

#[test]
fn test_success_stores_response_verbatim() {
    let transport = MockTransport::success();
    let bodies = transport.bodies.clone();
    let (orchestrator, calls) = orchestrator(transport);
    let session = session_with_input();

    let outcome = block_on(orchestrator.generate(&session)).unwrap();
    assert!(outcome.is_stored());
    let generated = outcome.payload();

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(generated.data_uri(), GENERATED_URI);
    assert_eq!(generated.mime(), "image/jpeg");
    assert_eq!(session.lock().results.get().unwrap().data_uri(), GENERATED_URI);

    // The request body is exactly {"image": <input data uri>}
    let sent: serde_json::Value = serde_json::from_slice(&bodies.lock()[0]).unwrap();
    assert_eq!(sent, serde_json::json!({ "image": INPUT_URI }));
}

#[test]
fn test_http_error_surfaces_status_text() {
    let (orchestrator, _) = orchestrator(MockTransport::answering(
        500,
        "Internal Server Error",
        "boom",
    ));
    let session = session_with_input();
    session
        .lock()
        .results
        .set(ImagePayload::from_data_uri("data:image/png;base64,AQ=="));

    let result = block_on(orchestrator.generate(&session));

    match result {
        Err(e @ PipelineError::ApiError { status: 500, .. }) => {
            assert_eq!(e.to_string(), "API error: Internal Server Error");
        }
        other => panic!("expected an API error, got {:?}", other),
    }
    // A failure leaves the previous result alone
    assert_eq!(
        session.lock().results.get().unwrap().data_uri(),
        "data:image/png;base64,AQ=="
    );
    assert!(session.lock().source.has_image());
}

#[test]
fn test_unreadable_body_is_invalid_response() {
    for body in ["not json", r#"{"image":"x"}"#, r#"{"generated_image":42}"#] {
        let (orchestrator, _) = orchestrator(MockTransport::answering(200, "OK", body));
        let session = session_with_input();

        let result = block_on(orchestrator.generate(&session));

        assert!(matches!(result, Err(PipelineError::InvalidResponse(_))), "body {body}");
        assert!(session.lock().results.get().is_none());
    }
}

#[test]
fn test_network_failure_is_reported() {
    let (orchestrator, calls) = orchestrator(MockTransport::failing(PipelineError::NetworkError(
        "connection refused".into(),
    )));
    let session = session_with_input();

    let result = block_on(orchestrator.generate(&session));

    assert!(matches!(result, Err(PipelineError::NetworkError(_))));
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert!(!orchestrator.is_in_flight());
    assert!(session.lock().results.get().is_none());
}

#[test]
fn test_in_flight_while_request_pending() {
    let (transport, release) = MockTransport::success().gated();
    let (orchestrator, _) = orchestrator(transport);
    let session = session_with_input();

    let observed = block_on(async {
        let control = async {
            let in_flight = orchestrator.is_in_flight();
            let _ = release.send(());
            in_flight
        };
        let (result, in_flight) = futures::join!(orchestrator.generate(&session), control);
        result.unwrap();
        in_flight
    });

    assert!(observed);
    assert!(!orchestrator.is_in_flight());
}

fn clear_during_flight(
    policy: StaleResponsePolicy,
) -> (PipelineResult<GenerationOutcome>, SharedSession) {
    let (transport, release) = MockTransport::success().gated();
    let config = AppConfig {
        stale_response_policy: policy,
        ..AppConfig::default()
    };
    let orchestrator = GenerationOrchestrator::new(transport, &config);
    let session = session_with_input();

    let result = block_on(async {
        let control = async {
            session.lock().clear_all();
            let _ = release.send(());
        };
        let (result, ()) = futures::join!(orchestrator.generate(&session), control);
        result
    });

    (result, session)
}

#[test]
fn test_late_response_applied_after_clear_by_default() {
    let (result, session) = clear_during_flight(StaleResponsePolicy::Apply);

    assert!(matches!(result, Ok(GenerationOutcome::Stored(_))));
    let session = session.lock();
    assert!(!session.source.has_image());
    assert_eq!(session.results.get().unwrap().data_uri(), GENERATED_URI);
}

#[test]
fn test_late_response_discarded_when_configured() {
    let (result, session) = clear_during_flight(StaleResponsePolicy::Discard);

    match result {
        Ok(GenerationOutcome::Discarded(payload)) => assert_eq!(payload.data_uri(), GENERATED_URI),
        other => panic!("expected a discarded response, got {:?}", other),
    }
    let session = session.lock();
    assert!(session.results.get().is_none());
    assert!(!session.source.has_image());
}

#[tokio::test]
async fn test_http_transport_unreachable_host_is_network_error() {
    let config = AppConfig {
        endpoint: "http://127.0.0.1:1/predict".to_owned(),
        connect_timeout_secs: 2,
        request_timeout_secs: 5,
        ..AppConfig::default()
    };
    let transport = HttpTransport::new(&config).unwrap();
    let orchestrator = GenerationOrchestrator::new(transport, &config);
    let session = session_with_input();

    let result = orchestrator.generate(&session).await;

    assert!(matches!(result, Err(PipelineError::NetworkError(_))));
    assert!(session.lock().results.get().is_none());
}
