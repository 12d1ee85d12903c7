//! Types library for the treasury rebalance system
//!
//! This library provides the core type definitions shared across the
//! rebalance crates, ensuring type safety and deterministic behavior.
//!
//! # Modules
//! - `address`: 20-byte account/contract identifiers
//! - `numeric`: Unsigned 256-bit amounts and block heights

// Public modules
pub mod address;
pub mod numeric;

// Library version constant
pub const LIB_VERSION: &str = "1.0.0";

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::address::*;
    pub use crate::numeric::*;
}
