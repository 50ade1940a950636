//! # Unit Components
//!
//! Per-module unit tests, mirroring the crate layout.




/// Register backend tests: simulated unit and MMIO access.
pub mod soc;
