//! Portal Core
//!
//! Platform-agnostic logic behind the restaurant vendor portal: the persisted
//! session, the authenticated API client, typed backend endpoints and the
//! polling order dashboard. The web frontend plugs in a browser transport and
//! browser storage; tests plug in scripted fakes.

pub mod admin;
pub mod api;
pub mod config;
pub mod dashboard;
pub mod menu;
pub mod models;
pub mod polling;
pub mod session;
pub mod settings;
pub mod vendor;

#[cfg(test)]
pub(crate) mod testing;

pub use api::{ApiClient, ApiError, HttpCall, HttpMethod, HttpTransport, RawResponse, UnauthorizedGate};
pub use config::{ClientConfig, ConfigError};
pub use dashboard::{DashboardState, DashboardView, ItemActivity};
pub use polling::{OrdersController, PollFlow};
pub use session::{MemoryStorage, SessionError, SessionScope, SessionStorage, SessionStore};
