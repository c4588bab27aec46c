//! Test doubles: a scripted transport and client builders.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::api::{ApiClient, HttpCall, HttpMethod, HttpTransport, RawResponse, UnauthorizedGate};
use crate::session::{MemoryStorage, SessionScope, SessionStore};

pub const BASE_URL: &str = "http://api.test";

type Reply = Result<RawResponse, String>;

#[derive(Default)]
struct Script {
    queued: HashMap<(HttpMethod, String), VecDeque<Reply>>,
    sticky: HashMap<(HttpMethod, String), Reply>,
    calls: Vec<HttpCall>,
}

/// Replays queued responses per (method, path); unscripted calls get a 404.
#[derive(Clone, Default)]
pub struct FakeTransport {
    script: Arc<Mutex<Script>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Script> {
        self.script.lock().unwrap()
    }

    /// Queue a single response
    pub fn respond(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.lock()
            .queued
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Ok(RawResponse::new(status, body)));
    }

    /// Response used once the queue for this route is empty
    pub fn respond_always(&self, method: HttpMethod, path: &str, status: u16, body: &str) {
        self.lock()
            .sticky
            .insert((method, path.to_string()), Ok(RawResponse::new(status, body)));
    }

    pub fn fail(&self, method: HttpMethod, path: &str, message: &str) {
        self.lock()
            .queued
            .entry((method, path.to_string()))
            .or_default()
            .push_back(Err(message.to_string()));
    }

    pub fn calls(&self) -> Vec<HttpCall> {
        self.lock().calls.clone()
    }

    pub fn calls_to(&self, method: HttpMethod, path: &str) -> usize {
        let url = format!("{}{}", BASE_URL, path);
        self.lock()
            .calls
            .iter()
            .filter(|call| call.method == method && call.url == url)
            .count()
    }
}

#[async_trait(?Send)]
impl HttpTransport for FakeTransport {
    async fn send(&self, call: HttpCall) -> Result<RawResponse, String> {
        let mut script = self.lock();
        let path = call.url.trim_start_matches(BASE_URL).to_string();
        let key = (call.method, path);
        script.calls.push(call);
        if let Some(reply) = script.queued.get_mut(&key).and_then(VecDeque::pop_front) {
            return reply;
        }
        script
            .sticky
            .get(&key)
            .cloned()
            .unwrap_or_else(|| Ok(RawResponse::new(404, "no route")))
    }
}

pub fn vendor_client(
    transport: &FakeTransport,
    storage: &MemoryStorage,
    gate: UnauthorizedGate,
) -> ApiClient<FakeTransport, MemoryStorage> {
    ApiClient::new(
        BASE_URL,
        SessionStore::new(SessionScope::Vendor, storage.clone()),
        transport.clone(),
        gate,
    )
}

pub fn admin_client(
    transport: &FakeTransport,
    storage: &MemoryStorage,
) -> ApiClient<FakeTransport, MemoryStorage> {
    ApiClient::new(
        BASE_URL,
        SessionStore::new(SessionScope::Admin, storage.clone()),
        transport.clone(),
        UnauthorizedGate::silent(),
    )
}

/// Gate that counts how often it fired
pub fn counting_gate() -> (UnauthorizedGate, Arc<AtomicUsize>) {
    let count = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&count);
    let gate = UnauthorizedGate::new(move |_| {
        seen.fetch_add(1, Ordering::SeqCst);
    });
    (gate, count)
}

pub fn order_json(id: &str, status: &str) -> String {
    format!(
        r#"{{"id":"{}","createdAt":"2024-05-01T12:30:00Z","items":[{{"name":"Friet","qty":2}}],"status":"{}"}}"#,
        id, status
    )
}

pub fn orders_json(orders: &[(&str, &str)]) -> String {
    let body: Vec<String> = orders.iter().map(|(id, status)| order_json(id, status)).collect();
    format!("[{}]", body.join(","))
}
