//! Shared types for the rental client
//!
//! Wire models, the booking status state machine, the price calculator,
//! error codes and query/response types used by `rental-client` and
//! `rental-cli`.

pub mod client;
pub mod error;
pub mod models;
pub mod pricing;
pub mod request;
pub mod util;

// Re-exports
pub use error::{AppError, AppResult, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
