//! Rental price calculation
//!
//! Pure functions; money is carried as `f64` on the wire and computed with
//! `rust_decimal` internally.

mod calculator;

pub use calculator::*;
