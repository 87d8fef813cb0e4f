//! Request context enrichment subsystem.
//!
//! # Data Flow
//! ```text
//! incoming request (parts + peer address)
//!     → headers.rs (Host / Forwarded / URL parsers)
//!     → identity.rs (unverified token claims, optional)
//!     → builder.rs (per-step assembly, failures logged & swallowed)
//!     → RequestContext (types.rs, ECS-style field names)
//!     → attached to every emitted log entry
//! ```
//!
//! # Design Decisions
//! - Parsers are pure and fallible; only the builder decides failure policy
//! - Every enrichment step is isolated: one failure never suppresses the rest
//! - Token claims are decoded, never verified (attribution, not auth)

pub mod builder;
pub mod headers;
pub mod identity;
pub mod types;

pub use builder::ContextBuilder;
pub use types::RequestContext;
