//! Application configuration.
//!
//! [`AppConfig`] is what the interactive page needs and is shared by the
//! server and the client. On the server it is loaded with
//! `Config::from_env()` after calling `dotenvy::dotenv()`.

use serde::{Deserialize, Serialize};

use crate::core::demo::DEFAULT_DEMO_STEP_MS;
use crate::core::diagnostics::DEFAULT_DIAGNOSTICS_CAPACITY;

/// Settings that shape the page behaviour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Pause between scripted demo drops, in milliseconds
    pub demo_step_ms: u32,
    /// How many diagnostics are kept in memory
    pub diagnostics_capacity: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            demo_step_ms: DEFAULT_DEMO_STEP_MS,
            diagnostics_capacity: DEFAULT_DIAGNOSTICS_CAPACITY,
        }
    }
}

/// Server configuration loaded from environment variables.
#[cfg(feature = "ssr")]
#[derive(Debug, Clone)]
pub struct Config {
    pub app: AppConfig,

    /// `tracing` filter directive
    /// Example: info,erdrop=debug
    pub log_filter: String,
}

#[cfg(feature = "ssr")]
impl Config {
    /// Load configuration from environment variables.
    ///
    /// Call `dotenvy::dotenv()` before this to load from `.env` file.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary key lookup.
    ///
    /// Unparsable numbers fall back to their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = AppConfig::default();

        let demo_step_ms = lookup("ERDROP_DEMO_STEP_MS")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.demo_step_ms);
        let diagnostics_capacity = lookup("ERDROP_DIAGNOSTICS_CAPACITY")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(defaults.diagnostics_capacity);

        Self {
            app: AppConfig {
                demo_step_ms,
                diagnostics_capacity,
            },
            log_filter: lookup("RUST_LOG").unwrap_or_else(|| "info".to_string()),
        }
    }
}

#[cfg(feature = "ssr")]
impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
