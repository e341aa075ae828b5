//! Common types shared across the crate.
//!
//! This module provides the building blocks used by every other component:
//! 1. **Address Types:** A strong type for instruction addresses.
//! 2. **Error Handling:** The crate-wide error enum and result alias.

/// Instruction address type.
pub mod addr;

/// Error types.
pub mod error;

pub use addr::InstAddr;
pub use error::{CaptureError, Result};
