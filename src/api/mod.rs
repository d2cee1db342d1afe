//! HTTP surface.
//!
//! Routes are nested under `/api/`:
//! - `POST /api/reports/simplify` runs the simplification pipeline
//! - `GET /api/health` reports liveness and version

pub mod endpoints;
pub mod error;
pub mod router;
pub mod server;
pub mod types;

pub use router::api_router;
pub use server::{start_server_on, ApiServer, ApiSession};
pub use types::ApiContext;
