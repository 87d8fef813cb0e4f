//! Best-effort request context assembly.
//!
//! # Responsibilities
//! - Compose the header parsers' outputs with request-intrinsic fields
//! - Isolate each enrichment step: one failed derivation never prevents
//!   the others from being populated
//! - Optionally surface a self-asserted username from an unverified token
//!
//! # Design Decisions
//! - `build` is infallible: every fallible step logs and leaves its field
//!   absent, including URL parsing, so callers always get a usable context
//! - Identity extraction is a configuration capability, not a second
//!   builder implementation

use std::net::SocketAddr;

use axum::http::header::{COOKIE, HOST, REFERER};
use axum::http::request::Parts;
use serde_json::Value;

use crate::context::headers::{parse_forwarded, parse_host, parse_url};
use crate::context::identity::{cookie_value, decode_unverified_claims};
use crate::context::types::{RequestContext, Source, User};

/// Name of the `Forwarded` header; not a well-known constant in `http`.
const FORWARDED: &str = "forwarded";

/// Assembles a [`RequestContext`] from one incoming request.
#[derive(Debug, Clone, Default)]
pub struct ContextBuilder {
    /// Cookie holding the unverified identity token. `None` disables the
    /// identity step entirely.
    identity_cookie: Option<String>,
}

impl ContextBuilder {
    pub fn new(identity_cookie: Option<String>) -> Self {
        Self { identity_cookie }
    }

    /// Build the enrichment record for one request.
    ///
    /// Never fails: each field is derived independently and a parse failure
    /// is logged and leaves only that field absent.
    pub fn build(&self, parts: &Parts, peer: Option<SocketAddr>) -> RequestContext {
        let mut ctx = RequestContext::default();

        ctx.source = peer.map(|addr| Source {
            address: addr.ip().to_string(),
            port: addr.port(),
        });

        ctx.http.request.method = parts.method.to_string();
        ctx.http.request.referrer = parts
            .headers
            .get(REFERER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        match parse_url(&request_url(parts)) {
            Ok(url) => ctx.url = Some(url),
            Err(error) => {
                tracing::warn!(%error, uri = %parts.uri, "Failed to parse the request URL");
            }
        }

        if let Some(value) = header_str(parts, HOST.as_str()) {
            match parse_host(value) {
                Ok(destination) => ctx.destination = Some(destination),
                Err(error) => {
                    tracing::warn!(%error, "Failed to parse the Host header value");
                }
            }
        }

        if let Some(value) = header_str(parts, FORWARDED) {
            match parse_forwarded(value) {
                // Both or neither: a half-parsed chain is never recorded.
                Ok((client, server)) => {
                    ctx.client = Some(client);
                    ctx.server = Some(server);
                }
                Err(error) => {
                    tracing::warn!(%error, "Failed to parse the Forwarded header value");
                }
            }
        }

        if let Some(cookie_name) = &self.identity_cookie {
            ctx.user = self.extract_user(parts, cookie_name);
        }

        ctx
    }

    /// Read the self-asserted username from the identity cookie.
    ///
    /// The claims are decoded without verification; the result is for log
    /// attribution only. A missing cookie is silent; a missing `sub` claim
    /// is a warning; a structurally invalid token is an error. None of
    /// these abort the context build.
    fn extract_user(&self, parts: &Parts, cookie_name: &str) -> Option<User> {
        let header = header_str(parts, COOKIE.as_str())?;
        let token = cookie_value(header, cookie_name)?;

        match decode_unverified_claims(token) {
            Ok(claims) => match claims.get("sub") {
                Some(Value::String(name)) => Some(User::from_name(name.clone())),
                _ => {
                    tracing::warn!(cookie = cookie_name, "Token claims carry no sub claim");
                    None
                }
            },
            Err(error) => {
                tracing::error!(%error, cookie = cookie_name, "Failed to decode the identity token");
                None
            }
        }
    }
}

/// Reconstruct the absolute request URL from the target and `Host` header.
///
/// Browsers send origin-form targets, so the authority is taken from the
/// `Host` header when the target carries none; `localhost` stands in when
/// both are missing so the path and query still make it into the record.
fn request_url(parts: &Parts) -> String {
    if parts.uri.scheme().is_some() {
        return parts.uri.to_string();
    }

    let authority = parts
        .uri
        .authority()
        .map(|authority| authority.as_str())
        .or_else(|| header_str(parts, HOST.as_str()))
        .unwrap_or("localhost");
    let path_and_query = parts
        .uri
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or("/");

    format!("http://{authority}{path_and_query}")
}

fn header_str<'a>(parts: &'a Parts, name: &str) -> Option<&'a str> {
    parts.headers.get(name).and_then(|value| value.to_str().ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use base64::engine::general_purpose::URL_SAFE_NO_PAD;
    use base64::Engine;

    fn parts(request: Request<Body>) -> Parts {
        request.into_parts().0
    }

    fn token_with_sub(sub: &str) -> String {
        format!(
            "{}.{}.{}",
            URL_SAFE_NO_PAD.encode(r#"{"alg":"none"}"#),
            URL_SAFE_NO_PAD.encode(format!(r#"{{"sub":"{sub}"}}"#)),
            URL_SAFE_NO_PAD.encode("sig")
        )
    }

    #[test]
    fn bare_request_populates_only_url_and_method() {
        let parts = parts(
            Request::builder()
                .method("POST")
                .uri("/error")
                .body(Body::empty())
                .unwrap(),
        );

        let ctx = ContextBuilder::default().build(&parts, None);

        assert_eq!(ctx.http.request.method, "POST");
        assert_eq!(ctx.url.as_ref().unwrap().path, "/error");
        assert!(ctx.source.is_none());
        assert!(ctx.destination.is_none());
        assert!(ctx.client.is_none());
        assert!(ctx.server.is_none());
        assert!(ctx.user.is_none());
        assert!(ctx.http.request.referrer.is_none());
    }

    #[test]
    fn fully_populated_request() {
        let parts = parts(
            Request::builder()
                .method("POST")
                .uri("/csp?src=report-uri")
                .header("Host", "collector.example.com:8443")
                .header("Referer", "https://app.example.com/page")
                .header("Forwarded", "for=192.0.2.60;proto=https;host=example.com")
                .body(Body::empty())
                .unwrap(),
        );
        let peer: SocketAddr = "198.51.100.7:52100".parse().unwrap();

        let ctx = ContextBuilder::default().build(&parts, Some(peer));

        let source = ctx.source.unwrap();
        assert_eq!(source.address, "198.51.100.7");
        assert_eq!(source.port, 52100);

        let destination = ctx.destination.unwrap();
        assert_eq!(destination.domain, "collector.example.com");
        assert_eq!(destination.port, Some(8443));

        assert_eq!(ctx.client.unwrap().address, "192.0.2.60");
        let server = ctx.server.unwrap();
        assert_eq!(server.domain, "example.com");
        assert_eq!(server.protocol.as_deref(), Some("https"));

        let url = ctx.url.unwrap();
        assert_eq!(url.domain.as_deref(), Some("collector.example.com"));
        assert_eq!(url.path, "/csp");
        assert_eq!(url.query.as_deref(), Some("src=report-uri"));

        assert_eq!(
            ctx.http.request.referrer.as_deref(),
            Some("https://app.example.com/page")
        );
    }

    #[test]
    fn bad_host_header_leaves_only_destination_absent() {
        let parts = parts(
            Request::builder()
                .method("POST")
                .uri("/error")
                .header("Host", "example.com:not-a-port")
                .header("Referer", "https://app.example.com/")
                .body(Body::empty())
                .unwrap(),
        );

        let ctx = ContextBuilder::default().build(&parts, None);

        assert!(ctx.destination.is_none());
        assert!(ctx.http.request.referrer.is_some());
        assert!(ctx.url.is_some());
    }

    #[test]
    fn bad_forwarded_header_leaves_both_halves_absent() {
        let parts = parts(
            Request::builder()
                .method("POST")
                .uri("/error")
                .header("Forwarded", "for=192.0.2.60")
                .body(Body::empty())
                .unwrap(),
        );

        let ctx = ContextBuilder::default().build(&parts, None);

        assert!(ctx.client.is_none());
        assert!(ctx.server.is_none());
    }

    #[test]
    fn identity_cookie_with_email_like_sub() {
        let parts = parts(
            Request::builder()
                .method("POST")
                .uri("/error")
                .header(
                    "Cookie",
                    format!("refresh_token={}", token_with_sub("alice@example.com")),
                )
                .body(Body::empty())
                .unwrap(),
        );

        let builder = ContextBuilder::new(Some("refresh_token".to_string()));
        let user = builder.build(&parts, None).user.unwrap();

        assert_eq!(user.name, "alice@example.com");
        assert_eq!(user.email.as_deref(), Some("alice@example.com"));
    }

    #[test]
    fn identity_cookie_with_plain_sub() {
        let parts = parts(
            Request::builder()
                .method("POST")
                .uri("/error")
                .header(
                    "Cookie",
                    format!("refresh_token={}", token_with_sub("alice")),
                )
                .body(Body::empty())
                .unwrap(),
        );

        let builder = ContextBuilder::new(Some("refresh_token".to_string()));
        let user = builder.build(&parts, None).user.unwrap();

        assert_eq!(user.name, "alice");
        assert!(user.email.is_none());
    }

    #[test]
    fn identity_disabled_ignores_cookie() {
        let parts = parts(
            Request::builder()
                .method("POST")
                .uri("/error")
                .header(
                    "Cookie",
                    format!("refresh_token={}", token_with_sub("alice")),
                )
                .body(Body::empty())
                .unwrap(),
        );

        let ctx = ContextBuilder::default().build(&parts, None);
        assert!(ctx.user.is_none());
    }

    #[test]
    fn malformed_token_leaves_user_absent() {
        let parts = parts(
            Request::builder()
                .method("POST")
                .uri("/error")
                .header("Cookie", "refresh_token=not-a-token")
                .body(Body::empty())
                .unwrap(),
        );

        let builder = ContextBuilder::new(Some("refresh_token".to_string()));
        let ctx = builder.build(&parts, None);

        assert!(ctx.user.is_none());
        assert!(ctx.url.is_some());
    }

    #[test]
    fn build_is_idempotent() {
        let parts = parts(
            Request::builder()
                .method("POST")
                .uri("/csp")
                .header("Host", "collector.example.com")
                .header("Forwarded", "for=192.0.2.60;host=example.com")
                .body(Body::empty())
                .unwrap(),
        );
        let peer: SocketAddr = "198.51.100.7:52100".parse().unwrap();
        let builder = ContextBuilder::default();

        assert_eq!(
            builder.build(&parts, Some(peer)),
            builder.build(&parts, Some(peer))
        );
    }
}
