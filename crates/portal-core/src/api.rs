//! API Client
//!
//! Authenticated JSON requests against the portal backend.
//!
//! The client resolves URLs against the configured base, attaches the bearer
//! token (and cookie credentials for the vendor scope), and maps every
//! response onto [`ApiError`]. A 401 on a session-guarded request clears the
//! session and trips the [`UnauthorizedGate`] once.

use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::session::{SessionError, SessionScope, SessionStorage, SessionStore};

/// Characters left alone when an id is placed into a URL path or query.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Percent-encode a value for use as a single path segment or query value
pub fn path_segment(raw: &str) -> String {
    utf8_percent_encode(raw, SEGMENT).to_string()
}

// ========================
// Errors
// ========================

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ApiError {
    #[error("not authenticated")]
    Unauthorized,
    #[error("status transition rejected")]
    TransitionRejected,
    #[error("HTTP {status}: {message}")]
    Http { status: u16, message: String },
    #[error("{0}")]
    Network(String),
    #[error("invalid response body: {0}")]
    Decode(String),
    #[error("request body could not be encoded: {0}")]
    Encode(String),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl ApiError {
    /// Message the server put in a failed response.
    ///
    /// JSON bodies contribute their `message` or `error` field, anything
    /// else is used verbatim.
    pub fn server_message(&self) -> Option<String> {
        let ApiError::Http { message, .. } = self else {
            return None;
        };
        let body = message.trim();
        if body.is_empty() {
            return None;
        }
        if let Ok(serde_json::Value::Object(map)) = serde_json::from_str::<serde_json::Value>(body) {
            return ["message", "error"]
                .iter()
                .filter_map(|key| map.get(*key).and_then(|v| v.as_str()))
                .map(str::trim)
                .find(|text| !text.is_empty())
                .map(str::to_string);
        }
        Some(body.to_string())
    }

    /// Banner text for this failure, using `fallback` when nothing better exists
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Http { .. } => self.server_message().unwrap_or_else(|| fallback.to_string()),
            ApiError::Network(message) if !message.trim().is_empty() => message.clone(),
            ApiError::Session(err) => err.to_string(),
            _ => fallback.to_string(),
        }
    }
}

// ========================
// Transport
// ========================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fully resolved request handed to the transport
#[derive(Debug, Clone, PartialEq)]
pub struct HttpCall {
    pub method: HttpMethod,
    pub url: String,
    pub body: Option<serde_json::Value>,
    pub bearer: Option<String>,
    pub with_credentials: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self { status, body: body.into() }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Sends one HTTP call. Errors are network-level failures only; HTTP error
/// statuses come back as a normal [`RawResponse`].
#[async_trait(?Send)]
pub trait HttpTransport {
    async fn send(&self, call: HttpCall) -> Result<RawResponse, String>;
}

// ========================
// Requests
// ========================

/// Relative request before base URL and credentials are applied
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    method: HttpMethod,
    path: String,
    body: Option<serde_json::Value>,
    transition: bool,
    public: bool,
}

impl ApiRequest {
    pub fn new(method: HttpMethod, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: None,
            transition: false,
            public: false,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, path)
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, path)
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Put, path)
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Patch, path)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(HttpMethod::Delete, path)
    }

    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body).map_err(|e| ApiError::Encode(e.to_string()))?;
        self.body = Some(value);
        Ok(self)
    }

    /// 400 and 409 mean the backend refused a status change
    pub fn transition(mut self) -> Self {
        self.transition = true;
        self
    }

    /// Sent without the bearer token; a 401 is the caller's to interpret
    /// (bad credentials) and leaves the session alone.
    pub fn public(mut self) -> Self {
        self.public = true;
        self
    }
}

// ========================
// Unauthorized handling
// ========================

/// Fires the sign-out callback once per lost session.
///
/// Several in-flight requests can all come back 401; only the first one
/// notifies. The gate re-arms when a new session is established.
#[derive(Clone)]
pub struct UnauthorizedGate {
    fired: Arc<AtomicBool>,
    notify: Arc<dyn Fn(SessionScope) + Send + Sync>,
}

impl UnauthorizedGate {
    pub fn new(notify: impl Fn(SessionScope) + Send + Sync + 'static) -> Self {
        Self {
            fired: Arc::new(AtomicBool::new(false)),
            notify: Arc::new(notify),
        }
    }

    pub fn silent() -> Self {
        Self::new(|_| {})
    }

    fn trip(&self, scope: SessionScope) {
        if !self.fired.swap(true, Ordering::SeqCst) {
            log::warn!("{:?} session rejected by backend, signing out", scope);
            (self.notify)(scope);
        }
    }

    fn rearm(&self) {
        self.fired.store(false, Ordering::SeqCst);
    }
}

impl fmt::Debug for UnauthorizedGate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnauthorizedGate")
            .field("fired", &self.fired.load(Ordering::SeqCst))
            .finish()
    }
}

// ========================
// Client
// ========================

#[derive(Debug, Clone)]
pub struct ApiClient<T, S> {
    base_url: String,
    session: SessionStore<S>,
    transport: T,
    gate: UnauthorizedGate,
}

impl<T: HttpTransport, S: SessionStorage> ApiClient<T, S> {
    pub fn new(
        base_url: impl Into<String>,
        session: SessionStore<S>,
        transport: T,
        gate: UnauthorizedGate,
    ) -> Self {
        Self {
            base_url: base_url.into(),
            session,
            transport,
            gate,
        }
    }

    pub fn session(&self) -> &SessionStore<S> {
        &self.session
    }

    pub fn scope(&self) -> SessionScope {
        self.session.scope()
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Persist a fresh login and re-arm the unauthorized gate
    pub fn establish_session(&self, token: Option<&str>) -> Result<(), ApiError> {
        self.session.set_authenticated(token)?;
        self.gate.rearm();
        Ok(())
    }

    pub fn end_session(&self) {
        self.session.clear();
    }

    /// Send a request and classify the response.
    ///
    /// A guarded request sent while the stored session looks valid re-arms
    /// the gate, so a session restored by another tab is still reported
    /// when it is rejected.
    pub async fn execute(&self, request: ApiRequest) -> Result<RawResponse, ApiError> {
        if !request.public && self.session.is_authenticated() {
            self.gate.rearm();
        }
        let call = HttpCall {
            method: request.method,
            url: self.url(&request.path),
            body: request.body.clone(),
            bearer: if request.public { None } else { self.session.token() },
            with_credentials: self.scope() == SessionScope::Vendor,
        };
        log::debug!("{} {}", call.method, call.url);
        let response = self.transport.send(call).await.map_err(ApiError::Network)?;
        self.classify(&request, response)
    }

    fn classify(&self, request: &ApiRequest, response: RawResponse) -> Result<RawResponse, ApiError> {
        match response.status {
            401 if request.public => Err(ApiError::Unauthorized),
            401 => {
                self.session.clear();
                self.gate.trip(self.scope());
                Err(ApiError::Unauthorized)
            }
            400 | 409 if request.transition => Err(ApiError::TransitionRejected),
            _ if response.is_success() => Ok(response),
            status => Err(ApiError::Http {
                status,
                message: response.body,
            }),
        }
    }

    pub async fn send_json<R: DeserializeOwned>(&self, request: ApiRequest) -> Result<R, ApiError> {
        let response = self.execute(request).await?;
        serde_json::from_str(&response.body).map_err(|e| ApiError::Decode(e.to_string()))
    }

    /// Like [`send_json`](Self::send_json) but an empty or unparseable body is `None`
    pub async fn send_optional<R: DeserializeOwned>(
        &self,
        request: ApiRequest,
    ) -> Result<Option<R>, ApiError> {
        let response = self.execute(request).await?;
        if response.body.trim().is_empty() {
            return Ok(None);
        }
        Ok(serde_json::from_str(&response.body).ok())
    }

    pub async fn send_unit(&self, request: ApiRequest) -> Result<(), ApiError> {
        self.execute(request).await.map(|_| ())
    }
}
