//! Build-time Configuration
//!
//! Portal settings baked in at compile time by `build.rs`.

use portal_core::config::{API_BASE_KEY, FLASH_TIMEOUT_KEY, POLL_INTERVAL_KEY};
use portal_core::ClientConfig;

fn compiled_value(key: &str) -> Option<String> {
    let value = match key {
        API_BASE_KEY => option_env!("PORTAL_API_BASE"),
        POLL_INTERVAL_KEY => option_env!("PORTAL_POLL_INTERVAL_MS"),
        FLASH_TIMEOUT_KEY => option_env!("PORTAL_FLASH_TIMEOUT_MS"),
        _ => None,
    };
    value.map(str::to_string)
}

/// Load the compiled configuration, falling back to defaults when it is invalid
pub fn load() -> ClientConfig {
    match ClientConfig::from_lookup(compiled_value) {
        Ok(config) => {
            log::info!("Portal backend: {}", config.api_base);
            config
        }
        Err(err) => {
            log::error!("Invalid portal configuration, using defaults: {}", err);
            ClientConfig::default()
        }
    }
}
