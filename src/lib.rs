//! Web Log Collector
//!
//! An HTTP server that collects reports from web sites — JavaScript error
//! reports and CSP violation reports — enriches each with structured
//! network/request context, and logs them.

pub mod config;
pub mod context;
pub mod http;
pub mod observability;

pub use config::CollectorConfig;
pub use context::{ContextBuilder, RequestContext};
pub use http::CollectorServer;
pub use observability::{ReportSink, TracingSink};
