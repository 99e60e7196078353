//! Fundamental types for the gauge controller.
//!
//! This crate defines the core types shared across every other crate in the workspace:
//! account addresses, second-resolution timestamps, and fixed-point amount helpers.

pub mod address;
pub mod amount;
pub mod error;
pub mod time;

pub use address::Address;
pub use amount::{checked_mul_fixed, Amount, FIXED_POINT_ONE};
pub use error::TypesError;
pub use time::Timestamp;

pub use primitive_types::U256;
