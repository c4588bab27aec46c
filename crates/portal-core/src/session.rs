//! Session Store
//!
//! Persisted login state for the vendor and admin namespaces.
//!
//! Each scope owns two storage keys. Both keys are only ever written together
//! through [`SessionStore::set_authenticated`] and [`SessionStore::clear`], so
//! a flag without its token (or the reverse) can only come from outside this
//! module. When that happens the scope's authoritative key wins:
//!
//! * Vendor: the `vendor_session` marker decides. Cookie-only logins have no
//!   token, so a token alone never counts as signed in.
//! * Admin: the `adminToken` decides. The admin namespace has no marker.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

/// Marker value written under the vendor session key.
pub const SESSION_SENTINEL: &str = "1";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("session storage unavailable: {0}")]
    Storage(String),
    #[error("session profile could not be encoded: {0}")]
    Encode(String),
}

/// Key/value persistence the session lives in (browser localStorage in the app).
pub trait SessionStorage: Clone {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str) -> Result<(), SessionError>;
    fn remove(&self, key: &str);
}

/// Which login namespace a store (and the API client using it) belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionScope {
    Vendor,
    Admin,
}

impl SessionScope {
    /// Key holding the sentinel marker, if this scope has one
    pub fn marker_key(self) -> Option<&'static str> {
        match self {
            SessionScope::Vendor => Some("vendor_session"),
            SessionScope::Admin => None,
        }
    }

    pub fn token_key(self) -> &'static str {
        match self {
            SessionScope::Vendor => "vendor_token",
            SessionScope::Admin => "adminToken",
        }
    }

    /// Secondary key (marker for vendors, cached user profile for admins)
    fn companion_key(self) -> &'static str {
        match self {
            SessionScope::Vendor => "vendor_session",
            SessionScope::Admin => "adminUser",
        }
    }

    /// Route a signed-out user of this scope is sent to
    pub fn login_route(self) -> &'static str {
        match self {
            SessionScope::Vendor => "/login",
            SessionScope::Admin => "/admin/login",
        }
    }
}

/// Scoped view over the persisted session keys.
#[derive(Debug, Clone)]
pub struct SessionStore<S> {
    scope: SessionScope,
    storage: S,
}

impl<S: SessionStorage> SessionStore<S> {
    pub fn new(scope: SessionScope, storage: S) -> Self {
        Self { scope, storage }
    }

    pub fn scope(&self) -> SessionScope {
        self.scope
    }

    pub fn is_authenticated(&self) -> bool {
        match self.scope.marker_key() {
            Some(marker) => self.storage.get(marker).as_deref() == Some(SESSION_SENTINEL),
            None => self.raw_token().is_some(),
        }
    }

    /// Bearer token, only while the session counts as authenticated
    pub fn token(&self) -> Option<String> {
        if !self.is_authenticated() {
            return None;
        }
        self.raw_token()
    }

    fn raw_token(&self) -> Option<String> {
        self.storage
            .get(self.scope.token_key())
            .filter(|token| !token.trim().is_empty())
    }

    /// Mark the session as signed in.
    ///
    /// A missing token removes any stale one so the pair stays consistent.
    pub fn set_authenticated(&self, token: Option<&str>) -> Result<(), SessionError> {
        let token = token.map(str::trim).filter(|t| !t.is_empty());
        match (self.scope, token) {
            (SessionScope::Admin, None) => {
                return Err(SessionError::Storage("admin session requires a token".into()));
            }
            (_, Some(token)) => self.storage.set(self.scope.token_key(), token)?,
            (_, None) => self.storage.remove(self.scope.token_key()),
        }
        if let Some(marker) = self.scope.marker_key() {
            if let Err(err) = self.storage.set(marker, SESSION_SENTINEL) {
                self.storage.remove(self.scope.token_key());
                return Err(err);
            }
        }
        Ok(())
    }

    /// Cache the signed-in admin's profile next to the token.
    pub fn set_profile(&self, profile: &serde_json::Value) -> Result<(), SessionError> {
        if self.scope != SessionScope::Admin {
            return Ok(());
        }
        let encoded =
            serde_json::to_string(profile).map_err(|e| SessionError::Encode(e.to_string()))?;
        self.storage.set(self.scope.companion_key(), &encoded)
    }

    /// Remove both keys of this scope.
    pub fn clear(&self) {
        self.storage.remove(self.scope.token_key());
        self.storage.remove(self.scope.companion_key());
    }
}

/// In-memory storage, shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.lock().contains_key(key)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStorage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        self.lock().insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) {
        self.lock().remove(key);
    }
}
