//! Browser Session Storage
//!
//! `localStorage` backing for the portal session keys. Values are stored as
//! plain strings, not JSON, so they stay readable by other tooling.

use gloo_storage::{LocalStorage, Storage};
use portal_core::{SessionError, SessionStorage};

#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserStorage;

impl SessionStorage for BrowserStorage {
    fn get(&self, key: &str) -> Option<String> {
        LocalStorage::raw().get_item(key).ok().flatten()
    }

    fn set(&self, key: &str, value: &str) -> Result<(), SessionError> {
        LocalStorage::raw()
            .set_item(key, value)
            .map_err(|err| SessionError::Storage(format!("{:?}", err)))
    }

    fn remove(&self, key: &str) {
        if LocalStorage::raw().remove_item(key).is_err() {
            log::warn!("Could not remove {} from localStorage", key);
        }
    }
}
