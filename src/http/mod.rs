//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, peer address propagation)
//!     → handlers.rs (context build, body parse, sink emission)
//!     → 204 / 400 / 500 response (per report mode)
//! ```

pub mod handlers;
pub mod server;

pub use handlers::AppState;
pub use server::CollectorServer;
