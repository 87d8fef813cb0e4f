//! Configuration schema definitions.
//!
//! All types derive Serde traits and carry defaults so a minimal
//! configuration (just a listen address) is enough to run the collector.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration for the collector.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct CollectorConfig {
    /// Listener configuration (bind host and port).
    pub listener: ListenerConfig,

    /// Directory for rotated log files. `None` writes records to the
    /// tracing stream instead.
    pub log_directory: Option<PathBuf>,

    /// How malformed report bodies are answered.
    pub report_mode: ReportMode,

    /// Unverified identity extraction from a token cookie.
    pub identity: IdentityConfig,

    /// Request body and timeout limits.
    pub limits: LimitsConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Host address on which to listen.
    pub host: String,

    /// Port on which to listen.
    pub port: u16,
}

impl ListenerConfig {
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 80,
        }
    }
}

/// Response policy for malformed report bodies.
///
/// Both are valid deployment modes: strict surfaces client errors as HTTP
/// statuses, lenient logs them and still acknowledges the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportMode {
    #[default]
    Strict,
    Lenient,
}

/// Unverified identity extraction settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct IdentityConfig {
    /// Enable reading a self-asserted username from the token cookie.
    pub enabled: bool,

    /// Name of the cookie holding the token.
    pub cookie_name: String,
}

impl IdentityConfig {
    /// The cookie to read, or `None` when the identity step is disabled.
    pub fn cookie(&self) -> Option<String> {
        self.enabled.then(|| self.cookie_name.clone())
    }
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            cookie_name: "refresh_token".to_string(),
        }
    }
}

/// Request limits applied by router middleware.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LimitsConfig {
    /// Maximum report body size in bytes.
    pub max_body_bytes: usize,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            max_body_bytes: 1024 * 1024, // 1 MiB
            request_timeout_secs: 30,
        }
    }
}
