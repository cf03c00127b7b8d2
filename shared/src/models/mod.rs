//! Data models
//!
//! Wire types exchanged with the rental API. Ids are opaque strings sent as
//! `_id`; field names are camelCase.

pub mod add_on;
pub mod booking;
pub mod profile;
pub mod review;
pub mod vehicle;

// Re-exports
pub use add_on::*;
pub use booking::*;
pub use profile::*;
pub use review::*;
pub use vehicle::*;
