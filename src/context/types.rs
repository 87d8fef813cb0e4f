//! Structured context record types.
//!
//! Field names follow the Elastic Common Schema so that emitted records can
//! be shipped to any ECS-aware aggregation pipeline without a mapping layer.
//! Every field except the request method is optional: enrichment is
//! best-effort and each field is independently absent when its derivation
//! fails.

use serde::Serialize;

/// The canonical enrichment record attached to every emitted log entry.
///
/// Built once per request by [`ContextBuilder`](crate::context::ContextBuilder)
/// and never shared across requests.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RequestContext {
    /// Peer socket address, when the transport exposes one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<Source>,

    /// Virtual host, derived from the `Host` header.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub destination: Option<Destination>,

    /// Originating client as reported by the `Forwarded` header chain.
    /// Present if and only if `server` is present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client: Option<ClientEndpoint>,

    /// Destination host as seen by the forwarding proxy.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub server: Option<ServerEndpoint>,

    /// Decomposed request URL.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<UrlInfo>,

    /// Request-intrinsic HTTP fields.
    pub http: Http,

    /// Self-asserted user identity from an unverified token. Never treat
    /// this as authenticated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
}

/// Peer address of the connection (`source.*` in ECS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Source {
    pub address: String,
    pub port: u16,
}

/// Virtual host from the `Host` header (`destination.*` in ECS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Destination {
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// First-hop client identity from a `Forwarded` header (`client.*` in ECS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClientEndpoint {
    pub address: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

/// Proxy-reported destination from a `Forwarded` header (`server.*` in ECS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServerEndpoint {
    pub domain: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    /// Protocol the client used, from the `proto=` directive.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub protocol: Option<String>,
}

/// `http.*` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Http {
    pub request: HttpRequest,
}

/// `http.request.*` fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct HttpRequest {
    pub method: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub referrer: Option<String>,
}

/// Decomposed request URL (`url.*` in ECS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlInfo {
    pub original: String,
    pub scheme: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
    pub path: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub query: Option<String>,
}

/// Self-asserted user identity (`user.*` in ECS).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub name: String,
    /// Set equal to `name` when the name contains `@`. A labelling
    /// heuristic, not address validation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl User {
    /// Build a user record from a self-asserted name.
    pub fn from_name(name: String) -> Self {
        let email = name.contains('@').then(|| name.clone());
        Self { name, email }
    }
}
