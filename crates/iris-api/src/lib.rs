//! IRIS API Library
//!
//! HTTP handlers, middleware and application setup shared by the server and
//! Lambda binaries.

mod api_doc;
pub mod constants;
mod handlers;
pub mod middleware;
pub mod setup;
pub mod telemetry;

pub mod error;
pub mod state;

pub use error::{ErrorResponse, HttpAppError};
pub use state::AppState;
