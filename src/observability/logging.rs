//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the process-wide tracing subscriber once at startup
//! - Default filter keeps collector and tower_http output at info level
//!
//! # Design Decisions
//! - Uses the tracing crate for structured logging
//! - Filter overridable via `RUST_LOG`
//! - Report records themselves go through the injected sink, not here

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize the tracing subscriber. Call once, before serving.
pub fn init() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "web_log_collector=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
