//! Report endpoint handlers.
//!
//! # Responsibilities
//! - Accept error / CSP report bodies and parse them as JSON
//! - Attach the best-effort request context to every outcome
//! - Emit exactly one structured log entry per accepted report
//!
//! # Design Decisions
//! - Handlers never return `Err`: every outcome is an explicit response
//! - Strict mode surfaces client errors as HTTP statuses; lenient mode logs
//!   them and still acknowledges, so a broken reporter cannot tell
//! - The CSP wrapper object is discarded; only the `csp-report` value is
//!   forwarded, and a payload missing that key is never forwarded at all

use std::net::SocketAddr;
use std::sync::Arc;

use axum::body::Body;
use axum::extract::{ConnectInfo, State};
use axum::http::{Request, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::Value;

use crate::config::ReportMode;
use crate::context::ContextBuilder;
use crate::observability::{LogEntry, ReportKind, ReportLevel, ReportSink};

/// Application state injected into the report handlers.
#[derive(Clone)]
pub struct AppState {
    pub sink: Arc<dyn ReportSink>,
    pub builder: ContextBuilder,
    pub mode: ReportMode,
    pub max_body_bytes: usize,
}

/// `POST /error` — accept a JavaScript error report (any JSON value).
pub async fn handle_error(
    State(state): State<AppState>,
    request: Request<Body>,
) -> Response {
    handle_report(state, request, ReportKind::Error).await
}

/// `POST /csp` — accept a CSP violation report (`{"csp-report": ...}`).
pub async fn handle_csp(State(state): State<AppState>, request: Request<Body>) -> Response {
    handle_report(state, request, ReportKind::Csp).await
}

async fn handle_report(state: AppState, request: Request<Body>, kind: ReportKind) -> Response {
    // Absent on transports that have no peer address (e.g. in-process tests).
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|info| info.0);

    let (parts, body) = request.into_parts();
    let context = state.builder.build(&parts, peer);

    let bytes = match axum::body::to_bytes(body, state.max_body_bytes).await {
        Ok(bytes) => bytes,
        Err(error) => {
            tracing::error!(%error, kind = kind.as_str(), "Failed to read a report body");
            state.sink.emit(LogEntry::new(
                ReportLevel::Error,
                internal_error_message(kind),
                context,
            ));
            return match state.mode {
                ReportMode::Strict => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An error occurred while reading the data.",
                )
                    .into_response(),
                ReportMode::Lenient => StatusCode::NO_CONTENT.into_response(),
            };
        }
    };

    let payload: Value = match serde_json::from_slice(&bytes) {
        Ok(payload) => payload,
        Err(error) => {
            tracing::warn!(%error, kind = kind.as_str(), "Failed to decode a report body");
            state.sink.emit(LogEntry::new(
                ReportLevel::Warning,
                undecodable_message(kind),
                context,
            ));
            return reject(state.mode);
        }
    };

    let payload = match kind {
        ReportKind::Error => payload,
        ReportKind::Csp => match extract_csp_report(payload) {
            Some(inner) => inner,
            None => {
                state.sink.emit(LogEntry::new(
                    ReportLevel::Warning,
                    "A malformed CSP report was received.",
                    context,
                ));
                return reject(state.mode);
            }
        },
    };

    state.sink.emit(
        LogEntry::new(ReportLevel::Info, received_message(kind), context)
            .with_report(kind, payload),
    );

    StatusCode::NO_CONTENT.into_response()
}

/// Pull the value under the mandatory `csp-report` key, discarding the
/// wrapper. `None` marks the payload malformed.
fn extract_csp_report(payload: Value) -> Option<Value> {
    match payload {
        Value::Object(mut wrapper) => wrapper.remove("csp-report"),
        _ => None,
    }
}

fn reject(mode: ReportMode) -> Response {
    match mode {
        ReportMode::Strict => StatusCode::BAD_REQUEST.into_response(),
        ReportMode::Lenient => StatusCode::NO_CONTENT.into_response(),
    }
}

fn received_message(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Error => "An error report was received.",
        ReportKind::Csp => "A CSP report was received.",
    }
}

fn undecodable_message(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Error => "An error report could not be decoded.",
        ReportKind::Csp => "A CSP report could not be decoded.",
    }
}

fn internal_error_message(kind: ReportKind) -> &'static str {
    match kind {
        ReportKind::Error => "An unexpected error occurred when attempting to obtain an error report.",
        ReportKind::Csp => "An unexpected error occurred when attempting to obtain a CSP report.",
    }
}
