//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! CLI arguments (clap)
//!     → schema.rs (CollectorConfig with defaults)
//!     → validation.rs (semantic checks: log directory exists, ...)
//!     → immutable CollectorConfig consumed at startup
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; there is no runtime reload
//! - All fields have defaults so only deviations need to be supplied
//! - Strict/lenient response mode and identity extraction are configuration,
//!   not separate router implementations

pub mod schema;
pub mod validation;

pub use schema::{CollectorConfig, IdentityConfig, LimitsConfig, ListenerConfig, ReportMode};
pub use validation::{validate_config, ValidationError};
