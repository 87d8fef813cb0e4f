//! Report log entries and the sink they are emitted to.
//!
//! The sink is the only state shared across in-flight requests. It is
//! selected once at startup (stream or rotating file) and injected into the
//! handlers as `Arc<dyn ReportSink>`; nothing reconfigures it afterwards.

use chrono::Utc;
use serde_json::{json, Map, Value};

use crate::context::RequestContext;
use crate::observability::file_writer::ReportFileWriter;

/// Severity of an emitted entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportLevel {
    Info,
    Warning,
    Error,
}

impl ReportLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportLevel::Info => "info",
            ReportLevel::Warning => "warning",
            ReportLevel::Error => "error",
        }
    }
}

/// Which namespaced payload field an entry carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    Error,
    Csp,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportKind::Error => "error_report",
            ReportKind::Csp => "csp_report",
        }
    }
}

/// One structured log record: context plus an optional report payload.
///
/// Constructed per request, handed to the sink, and dropped.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: ReportLevel,
    pub message: &'static str,
    pub context: RequestContext,
    pub report: Option<(ReportKind, Value)>,
}

impl LogEntry {
    pub fn new(level: ReportLevel, message: &'static str, context: RequestContext) -> Self {
        Self {
            level,
            message,
            context,
            report: None,
        }
    }

    pub fn with_report(mut self, kind: ReportKind, payload: Value) -> Self {
        self.report = Some((kind, payload));
        self
    }

    /// Render the full record: timestamp, level and message, the context
    /// fields merged at the top level, and the payload under the
    /// `web_log_collector.<kind>` namespace.
    pub fn to_record(&self) -> Value {
        let mut record = Map::new();
        record.insert("@timestamp".to_string(), json!(Utc::now().to_rfc3339()));
        record.insert("log".to_string(), json!({ "level": self.level.as_str() }));
        record.insert("message".to_string(), json!(self.message));

        if let Value::Object(fields) = serde_json::to_value(&self.context).unwrap_or_default() {
            record.extend(fields);
        }

        if let Some((kind, payload)) = &self.report {
            record.insert(
                "web_log_collector".to_string(),
                json!({ kind.as_str(): payload }),
            );
        }

        Value::Object(record)
    }
}

/// Logging sink safe for concurrent append from in-flight requests.
pub trait ReportSink: Send + Sync {
    fn emit(&self, entry: LogEntry);
}

/// Sink forwarding records to the process-wide `tracing` subscriber.
///
/// Used when no log directory is configured: records end up on the stream
/// the subscriber writes to.
#[derive(Debug, Default)]
pub struct TracingSink;

impl ReportSink for TracingSink {
    fn emit(&self, entry: LogEntry) {
        let record = entry.to_record();
        match entry.level {
            ReportLevel::Info => {
                tracing::info!(target: "web_log_collector::report", record = %record, "{}", entry.message);
            }
            ReportLevel::Warning => {
                tracing::warn!(target: "web_log_collector::report", record = %record, "{}", entry.message);
            }
            ReportLevel::Error => {
                tracing::error!(target: "web_log_collector::report", record = %record, "{}", entry.message);
            }
        }
    }
}

/// Sink appending one JSON line per record to a daily-rotated file.
pub struct FileSink {
    writer: ReportFileWriter,
}

impl FileSink {
    pub fn new(writer: ReportFileWriter) -> Self {
        Self { writer }
    }
}

impl ReportSink for FileSink {
    fn emit(&self, entry: LogEntry) {
        let record = entry.to_record();
        if let Err(error) = self.writer.write_line(&record.to_string()) {
            tracing::error!(%error, "Failed to append a report record to the log file");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::types::{Http, HttpRequest};

    fn context() -> RequestContext {
        RequestContext {
            http: Http {
                request: HttpRequest {
                    method: "POST".to_string(),
                    referrer: None,
                },
            },
            ..Default::default()
        }
    }

    #[test]
    fn record_merges_context_and_namespaced_payload() {
        let entry = LogEntry::new(ReportLevel::Info, "A CSP report was received.", context())
            .with_report(
                ReportKind::Csp,
                json!({ "violated-directive": "script-src" }),
            );

        let record = entry.to_record();
        assert_eq!(record["log"]["level"], "info");
        assert_eq!(record["message"], "A CSP report was received.");
        assert_eq!(record["http"]["request"]["method"], "POST");
        assert_eq!(
            record["web_log_collector"]["csp_report"]["violated-directive"],
            "script-src"
        );
        assert!(record.get("@timestamp").is_some());
    }

    #[test]
    fn record_without_payload_has_no_namespace_field() {
        let entry = LogEntry::new(
            ReportLevel::Warning,
            "An error report could not be decoded.",
            context(),
        );

        let record = entry.to_record();
        assert_eq!(record["log"]["level"], "warning");
        assert!(record.get("web_log_collector").is_none());
    }
}
