//! Common types and constants shared by the IO-PMP components.
//!
//! 1. **Constants:** Register offsets and the config-lane bit layout.
//! 2. **Error Handling:** The `IopmpError` type and `Result` alias.

/// Register layout and bit-layout constants.
pub mod constants;

/// Error types.
pub mod error;

pub use constants::{MAX_SLOTS, PMP_RWX, PMP_SHIFT};
pub use error::{IopmpError, Result};
