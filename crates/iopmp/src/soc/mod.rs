//! Register backends for the IO-PMP block.
//!
//! 1. **Traits:** `RegisterAccess`, the word-level interface the driver uses.
//! 2. **MMIO:** Volatile access to the physical register block.
//! 3. **Simulation:** A register-file model of the unit with granule WARL
//!    behaviour and access checking.

/// Volatile memory-mapped backend.
pub mod mmio;

/// Simulated IO-PMP device.
pub mod sim;

/// Register access trait.
pub mod traits;

pub use mmio::MmioRegisters;
pub use sim::{AccessKind, AccessResult, SimIopmp};
pub use traits::RegisterAccess;
