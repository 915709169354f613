#![allow(dead_code)]

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;
use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

#[derive(Default)]
struct StubState {
    responses: HashMap<String, (StatusCode, String)>,
    requested: Vec<String>,
}

/// In-process name registry answering `GET /name/{name}`.
pub struct RegistryStub {
    addr: SocketAddr,
    state: Arc<Mutex<StubState>>,
    task: JoinHandle<()>,
}

impl RegistryStub {
    pub async fn start() -> Self {
        let state = Arc::new(Mutex::new(StubState::default()));
        let app = Router::new()
            .route("/name/{name}", get(lookup))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let task = tokio::spawn(async move {
            let _ = axum::serve(listener, app).await;
        });

        Self { addr, state, task }
    }

    pub fn endpoint(&self) -> String {
        self.addr.to_string()
    }

    pub fn register(&self, name: &str, npub: &str, relays: &[String]) {
        let body = serde_json::json!({ "npub": npub, "relays": relays }).to_string();
        self.respond(name, StatusCode::OK, &body);
    }

    pub fn respond(&self, name: &str, status: StatusCode, body: &str) {
        self.state
            .lock()
            .unwrap()
            .responses
            .insert(name.to_string(), (status, body.to_string()));
    }

    pub fn requested(&self) -> Vec<String> {
        self.state.lock().unwrap().requested.clone()
    }
}

impl Drop for RegistryStub {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn lookup(
    State(state): State<Arc<Mutex<StubState>>>,
    Path(name): Path<String>,
) -> (StatusCode, String) {
    let mut state = state.lock().unwrap();
    state.requested.push(name.clone());
    state
        .responses
        .get(&name)
        .cloned()
        .unwrap_or((StatusCode::NOT_FOUND, "not found".to_string()))
}
