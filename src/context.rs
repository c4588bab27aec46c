//! Application Context
//!
//! API clients and shared signals provided via Leptos Context API.

use leptos::prelude::*;
use portal_core::{ApiClient, ClientConfig, SessionScope, SessionStore, UnauthorizedGate};

use crate::storage::BrowserStorage;
use crate::transport::GlooTransport;

pub type PortalClient = ApiClient<GlooTransport, BrowserStorage>;

/// Clients and signals shared by every page
#[derive(Clone)]
pub struct PortalContext {
    pub config: ClientConfig,
    /// Vendor API: bearer plus cookies
    pub vendor: PortalClient,
    /// Platform admin API: bearer only
    pub admin: PortalClient,
    /// Login route requested by an unauthorized gate
    redirect: RwSignal<Option<String>>,
}

impl PortalContext {
    pub fn new(config: ClientConfig) -> Self {
        let redirect = RwSignal::new(None::<String>);
        let client = |scope: SessionScope| {
            let gate = UnauthorizedGate::new(move |scope: SessionScope| {
                redirect.try_set(Some(scope.login_route().to_string()));
            });
            ApiClient::new(
                config.api_base.clone(),
                SessionStore::new(scope, BrowserStorage),
                GlooTransport,
                gate,
            )
        };
        Self {
            vendor: client(SessionScope::Vendor),
            admin: client(SessionScope::Admin),
            config,
            redirect,
        }
    }

    /// Ask the shell to send the user to the login page of `scope`
    pub fn request_login(&self, scope: SessionScope) {
        self.redirect.set(Some(scope.login_route().to_string()));
    }

    /// Pending login redirect, consumed on read
    pub fn take_redirect(&self) -> Option<String> {
        let route = self.redirect.get()?;
        self.redirect.set(None);
        Some(route)
    }
}

pub fn use_portal() -> PortalContext {
    expect_context::<PortalContext>()
}
