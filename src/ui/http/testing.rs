//! Test doubles for the gateway and everything built on it

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use super::{ApiRequest, ApiResponse, HttpGateway, HttpTransport, TransportError};
use crate::ui::auth_utils::TokenSource;
use crate::ui::config::ClientConfig;
use crate::ui::navigation::Navigator;
use crate::ui::notifications::{NotificationType, Notifier};

pub const TEST_BASE_URL: &str = "http://api.test";

struct Scripted {
    result: Result<ApiResponse, TransportError>,
    gate: Option<Arc<Notify>>,
}

#[derive(Default)]
struct MockState {
    script: VecDeque<Scripted>,
    requests: Vec<ApiRequest>,
}

/// Transport answering from a script, in call order
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new(responses: Vec<Result<ApiResponse, TransportError>>) -> Self {
        let transport = Self::default();
        for result in responses {
            transport.push(result);
        }
        transport
    }

    /// Queue a response delivered as soon as it is requested
    pub fn push(&self, result: Result<ApiResponse, TransportError>) {
        self.state.lock().unwrap().script.push_back(Scripted { result, gate: None });
    }

    /// Queue a response held back until `gate` is notified
    pub fn push_gated(&self, result: Result<ApiResponse, TransportError>, gate: Arc<Notify>) {
        self.state.lock().unwrap().script.push_back(Scripted {
            result,
            gate: Some(gate),
        });
    }

    /// Requests sent so far
    pub fn requests(&self) -> Vec<ApiRequest> {
        self.state.lock().unwrap().requests.clone()
    }
}

impl HttpTransport for MockTransport {
    async fn send(&self, request: ApiRequest) -> Result<ApiResponse, TransportError> {
        let scripted = {
            let mut state = self.state.lock().unwrap();
            state.requests.push(request);
            state.script.pop_front()
        };

        let Some(scripted) = scripted else {
            return Err(TransportError("no scripted response".to_string()));
        };

        if let Some(gate) = scripted.gate {
            gate.notified().await;
        }
        scripted.result
    }
}

/// Captures notifications and navigations
#[derive(Clone, Default)]
pub struct Recorder {
    notifications: Arc<Mutex<Vec<(NotificationType, String)>>>,
    visited: Arc<Mutex<Vec<String>>>,
}

impl Recorder {
    pub fn notifications(&self) -> Vec<(NotificationType, String)> {
        self.notifications.lock().unwrap().clone()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited.lock().unwrap().clone()
    }

    pub fn navigator(&self) -> Arc<dyn Navigator> {
        let visited = self.visited.clone();
        Arc::new(move |path: &str| visited.lock().unwrap().push(path.to_string()))
    }
}

impl Notifier for Recorder {
    fn notify(&self, kind: NotificationType, message: &str) {
        self.notifications
            .lock()
            .unwrap()
            .push((kind, message.to_string()));
    }
}

/// Gateway over a scripted transport, with a recorder for side effects
pub fn gateway_with(
    tokens: Arc<dyn TokenSource>,
    responses: Vec<Result<ApiResponse, TransportError>>,
) -> (HttpGateway<MockTransport>, MockTransport, Recorder) {
    let transport = MockTransport::new(responses);
    let recorder = Recorder::default();
    let gateway = HttpGateway::new(
        ClientConfig::new(TEST_BASE_URL),
        transport.clone(),
        tokens,
        Arc::new(recorder.clone()),
        recorder.navigator(),
    );
    (gateway, transport, recorder)
}
