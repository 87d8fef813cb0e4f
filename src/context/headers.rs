//! Pure header parsers.
//!
//! # Responsibilities
//! - Decode `Host` header values into hostname + optional port
//! - Decode RFC-7239 `Forwarded` header chains into client/server records
//! - Decompose full URL strings for the log schema
//!
//! All parsers are pure functions returning `Result`; the context builder
//! decides what a failure means (always: log and leave the field absent).

use thiserror::Error;
use url::Url;

use crate::context::types::{ClientEndpoint, Destination, ServerEndpoint, UrlInfo};

/// Error produced by the `Host`/`Forwarded` parsers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HeaderParseError {
    #[error("host value is empty")]
    EmptyHost,

    #[error("invalid port number {0:?}")]
    InvalidPort(String),

    #[error("malformed address literal {0:?}")]
    MalformedAddress(String),

    #[error("forwarded element has no {0:?} directive")]
    MissingDirective(&'static str),

    #[error("malformed forwarded directive {0:?}")]
    MalformedDirective(String),
}

/// Split an HTTP `Host` header value into hostname and optional port.
///
/// Accepts `example.com`, `example.com:8443` and bracketed IPv6 literals
/// such as `[::1]:8080`. An empty hostname or a non-numeric port is an
/// error; the caller treats it as "destination unknown".
pub fn parse_host(value: &str) -> Result<Destination, HeaderParseError> {
    let value = value.trim();
    if value.is_empty() {
        return Err(HeaderParseError::EmptyHost);
    }

    let (domain, port) = split_node(value)?;
    if domain.is_empty() {
        return Err(HeaderParseError::EmptyHost);
    }

    Ok(Destination {
        domain: domain.to_string(),
        port,
    })
}

/// Parse an RFC-7239 `Forwarded` header value.
///
/// The header may describe several comma-separated proxy hops; the first
/// hop's `for=` directive names the originating client, while the `host=`
/// and `proto=` directives name the destination and protocol as the proxy
/// saw them. Both records are returned together: any failure yields `Err`,
/// so the caller leaves both absent, never exactly one.
pub fn parse_forwarded(
    value: &str,
) -> Result<(ClientEndpoint, ServerEndpoint), HeaderParseError> {
    let mut client: Option<ClientEndpoint> = None;
    let mut server: Option<ServerEndpoint> = None;
    let mut protocol: Option<String> = None;

    for (index, element) in value.split(',').enumerate() {
        for directive in element.split(';') {
            let directive = directive.trim();
            if directive.is_empty() {
                continue;
            }

            let (key, raw) = directive
                .split_once('=')
                .ok_or_else(|| HeaderParseError::MalformedDirective(directive.to_string()))?;
            let raw = unquote(raw.trim());

            match key.trim().to_ascii_lowercase().as_str() {
                // Only the first hop identifies the originating client.
                "for" if index == 0 => {
                    let (address, port) = split_node(raw)?;
                    if address.is_empty() {
                        return Err(HeaderParseError::MalformedAddress(raw.to_string()));
                    }
                    client = Some(ClientEndpoint {
                        address: address.to_string(),
                        port,
                    });
                }
                "host" if server.is_none() => {
                    let (domain, port) = split_node(raw)?;
                    if domain.is_empty() {
                        return Err(HeaderParseError::EmptyHost);
                    }
                    server = Some(ServerEndpoint {
                        domain: domain.to_string(),
                        port,
                        protocol: None,
                    });
                }
                "proto" if protocol.is_none() => {
                    if raw.is_empty() {
                        return Err(HeaderParseError::MalformedDirective(directive.to_string()));
                    }
                    protocol = Some(raw.to_ascii_lowercase());
                }
                // `by` and later hops' directives are accepted but not recorded.
                _ => {}
            }
        }
    }

    match (client, server) {
        (Some(client), Some(mut server)) => {
            server.protocol = protocol;
            Ok((client, server))
        }
        (None, _) => Err(HeaderParseError::MissingDirective("for")),
        (_, None) => Err(HeaderParseError::MissingDirective("host")),
    }
}

/// Decompose a full URL string into the components of the log schema.
pub fn parse_url(value: &str) -> Result<UrlInfo, url::ParseError> {
    let parsed = Url::parse(value)?;
    Ok(UrlInfo {
        original: value.to_string(),
        scheme: parsed.scheme().to_string(),
        domain: parsed.host_str().map(str::to_string),
        port: parsed.port(),
        path: parsed.path().to_string(),
        query: parsed.query().map(str::to_string),
    })
}

/// Split `host[:port]` / `[v6]:port` / `unknown` into address and port.
fn split_node(value: &str) -> Result<(&str, Option<u16>), HeaderParseError> {
    if let Some(rest) = value.strip_prefix('[') {
        let (address, tail) = rest
            .split_once(']')
            .ok_or_else(|| HeaderParseError::MalformedAddress(value.to_string()))?;
        let port = match tail {
            "" => None,
            tail => {
                let raw = tail
                    .strip_prefix(':')
                    .ok_or_else(|| HeaderParseError::MalformedAddress(value.to_string()))?;
                Some(parse_port(raw)?)
            }
        };
        return Ok((address, port));
    }

    match value.split_once(':') {
        Some((address, port)) => {
            // A second colon means an unbracketed IPv6 literal.
            if port.contains(':') {
                return Err(HeaderParseError::MalformedAddress(value.to_string()));
            }
            Ok((address, Some(parse_port(port)?)))
        }
        None => Ok((value, None)),
    }
}

fn parse_port(raw: &str) -> Result<u16, HeaderParseError> {
    raw.parse::<u16>()
        .map_err(|_| HeaderParseError::InvalidPort(raw.to_string()))
}

fn unquote(value: &str) -> &str {
    value
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(value)
}
