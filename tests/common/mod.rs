// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use imagefeed_core::config::Config;
use imagefeed_core::error::NetworkError;
use imagefeed_core::services::{MemoryTokenStore, RawResponse, TokenStore, Transport};
use imagefeed_core::AppState;
use reqwest::header::AUTHORIZATION;
use reqwest::{Method, Request, StatusCode, Url};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::io;
use std::rc::Rc;
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

/// Token seeded into signed-in test stores.
#[allow(dead_code)]
pub const TEST_TOKEN: &str = "test-token";

/// A request as seen by the stub transport.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub method: Method,
    pub url: Url,
    pub authorization: Option<String>,
}

#[allow(dead_code)]
impl RecordedRequest {
    /// Value of the first query parameter called `name`.
    pub fn query(&self, name: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.into_owned())
    }
}

struct Scripted {
    reply: Result<RawResponse, NetworkError>,
    gate: Option<Rc<Notify>>,
}

/// Offline transport that replays scripted replies in order.
///
/// A gated reply is held until its `Notify` fires, which keeps the call
/// in flight for as long as the test needs.
#[derive(Default)]
pub struct StubTransport {
    script: RefCell<VecDeque<Scripted>>,
    requests: RefCell<Vec<RecordedRequest>>,
}

#[allow(dead_code)]
impl StubTransport {
    pub fn new() -> Rc<Self> {
        Rc::new(Self::default())
    }

    fn push(&self, reply: Result<RawResponse, NetworkError>, gate: Option<Rc<Notify>>) {
        self.script.borrow_mut().push_back(Scripted { reply, gate });
    }

    /// Queue a response with `status` and `body`.
    pub fn reply(&self, status: u16, body: impl Into<String>) {
        self.push(Ok(raw(status, body.into())), None);
    }

    pub fn reply_json(&self, body: impl Into<String>) {
        self.reply(200, body);
    }

    pub fn reply_status(&self, status: u16) {
        self.reply(status, "");
    }

    pub fn fail(&self, message: &str) {
        self.push(Err(NetworkError::Transport(message.to_string())), None);
    }

    /// Queue a response that is only delivered once the returned gate fires.
    pub fn reply_gated(&self, status: u16, body: impl Into<String>) -> Rc<Notify> {
        let gate = Rc::new(Notify::new());
        self.push(Ok(raw(status, body.into())), Some(gate.clone()));
        gate
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.borrow().clone()
    }

    pub fn last_request(&self) -> Option<RecordedRequest> {
        self.requests.borrow().last().cloned()
    }

    pub fn call_count(&self) -> usize {
        self.requests.borrow().len()
    }
}

fn raw(status: u16, body: String) -> RawResponse {
    RawResponse {
        status: StatusCode::from_u16(status).expect("valid status code"),
        body: body.into_bytes(),
    }
}

#[async_trait(?Send)]
impl Transport for StubTransport {
    async fn execute(&self, request: Request) -> Result<RawResponse, NetworkError> {
        self.requests.borrow_mut().push(RecordedRequest {
            method: request.method().clone(),
            url: request.url().clone(),
            authorization: request
                .headers()
                .get(AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string),
        });

        let next = self.script.borrow_mut().pop_front();
        let Some(Scripted { reply, gate }) = next else {
            return Err(NetworkError::Transport("no scripted reply".to_string()));
        };
        if let Some(gate) = gate {
            gate.notified().await;
        }
        reply
    }
}

/// JSON for one photo entry as the API returns it.
#[allow(dead_code)]
pub fn photo_json(id: &str) -> serde_json::Value {
    serde_json::json!({
        "id": id,
        "width": 4000,
        "height": 3000,
        "created_at": "2024-03-01T12:30:00Z",
        "description": format!("photo {}", id),
        "urls": {
            "raw": format!("https://images.test.local/{}?raw", id),
            "full": format!("https://images.test.local/{}?full", id),
            "regular": format!("https://images.test.local/{}?regular", id),
            "small": format!("https://images.test.local/{}?small", id),
            "thumb": format!("https://images.test.local/{}?thumb", id)
        },
        "liked_by_user": false
    })
}

/// JSON array body for a page with the given IDs.
#[allow(dead_code)]
pub fn page_json<I, S>(ids: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let entries: Vec<_> = ids.into_iter().map(|id| photo_json(id.as_ref())).collect();
    serde_json::Value::Array(entries).to_string()
}

/// IDs `p{start}` through `p{end}` inclusive.
#[allow(dead_code)]
pub fn ids(start: u32, end: u32) -> Vec<String> {
    (start..=end).map(|n| format!("p{}", n)).collect()
}

/// App state on a stub transport with the given token store.
#[allow(dead_code)]
pub fn create_test_app_with_store(store: Rc<dyn TokenStore>) -> (AppState, Rc<StubTransport>) {
    let transport = StubTransport::new();
    let state = AppState::new(Config::default(), transport.clone(), store);
    (state, transport)
}

/// App state with a stored credential.
#[allow(dead_code)]
pub fn create_test_app() -> (AppState, Rc<StubTransport>) {
    create_test_app_with_store(Rc::new(MemoryTokenStore::with_token(TEST_TOKEN)))
}

/// App state with an empty token store.
#[allow(dead_code)]
pub fn create_signed_out_app() -> (AppState, Rc<StubTransport>) {
    create_test_app_with_store(Rc::new(MemoryTokenStore::new()))
}

/// Log lines captured from the current thread.
#[derive(Clone, Default)]
pub struct LogCapture(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl LogCapture {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().expect("log buffer lock")).into_owned()
    }
}

impl io::Write for LogCapture {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .expect("log buffer lock")
            .extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Route every event on this thread into a buffer until the guard drops.
#[allow(dead_code)]
pub fn capture_logs() -> (LogCapture, tracing::subscriber::DefaultGuard) {
    let capture = LogCapture::default();
    let writer = capture.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_ansi(false)
        .with_writer(move || writer.clone())
        .finish();
    (capture, tracing::subscriber::set_default(subscriber))
}
