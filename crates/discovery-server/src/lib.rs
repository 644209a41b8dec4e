//! Discovery Server
//!
//! HTTP front end for [`discovery_core`]: fuzzy user search and friend
//! recommendations over an in-memory store seeded from a JSON dataset.
//!
//! ## Module Structure
//!
//! - `config` - Command line arguments and dataset loading
//! - `error` - Server errors and their HTTP status mapping
//! - `handlers` - HTTP endpoint handlers
//! - `logging` - tracing-subscriber setup
//! - `server` - Router and serve loop
//! - `state` - Shared application state

pub mod config;
pub mod error;
pub mod handlers;
pub mod logging;
pub mod server;
pub mod state;

pub use config::{Args, ServerConfig};
pub use error::{ApiError, ServerError};
pub use server::{router, serve};
pub use state::AppState;
