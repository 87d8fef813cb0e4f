//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! report handlers produce:
//!     → sink.rs (LogEntry: context ∪ namespaced payload)
//!
//! Consumers (selected once at startup):
//!     → TracingSink  → process-wide tracing subscriber (stream)
//!     → FileSink     → file_writer.rs (daily-rotated JSON lines)
//! ```
//!
//! # Design Decisions
//! - The sink is the only cross-request shared state; it is append-only
//! - Sink selection is external configuration, not handler logic
//! - Per-request diagnostics (parse warnings) go straight to tracing

pub mod file_writer;
pub mod logging;
pub mod sink;

pub use file_writer::ReportFileWriter;
pub use sink::{FileSink, LogEntry, ReportKind, ReportLevel, ReportSink, TracingSink};
