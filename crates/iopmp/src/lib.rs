//! IO-PMP configuration library.
//!
//! Drives the IO Physical Memory Protection unit of a RISC-V platform from
//! firmware context:
//! 1. **Granule:** Detects the minimum matchable alignment of the hardware.
//! 2. **Self-test:** Verifies every address and config register reads back as documented.
//! 3. **Regions:** Programs individual slots with NAPOT/NA4 encodings without
//!    disturbing neighbouring config lanes.
//! 4. **Backends:** Volatile MMIO access on the target and a simulated unit for hosts.
//!
//! ```
//! use iopmp_core::pmp::{Granule, Iopmp};
//! use iopmp_core::soc::SimIopmp;
//! use iopmp_core::IopmpConfig;
//!
//! let config = IopmpConfig::default();
//! let mut unit = Iopmp::new(SimIopmp::new(&config, Granule::from_shift(12)), config)?;
//! assert!(unit.init().passed());
//! let region = unit.region_from_napot(0x8000_0000, 0x10_0000, 0)?;
//! assert_eq!(region.slot, 0);
//! # Ok::<(), iopmp_core::IopmpError>(())
//! ```

/// Common constants and error types.
pub mod common;
/// Unit configuration (base address, slot count, address width).
pub mod config;
/// IO-PMP driver (granule detection, self-test, region programming).
pub mod pmp;
/// Register backends (trait, MMIO, simulation).
pub mod soc;

/// Error type returned by all fallible operations.
pub use crate::common::{IopmpError, Result};
/// Unit configuration; use `IopmpConfig::default()` or deserialize from JSON.
pub use crate::config::IopmpConfig;
/// Driver context; construct with `Iopmp::new`.
pub use crate::pmp::Iopmp;
