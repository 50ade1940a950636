//! Error definitions for IO-PMP operations.
//!
//! Register mismatches found by the self-test are not errors; they are
//! recorded in [`SelfTestReport`](crate::pmp::selftest::SelfTestReport).
//! Everything here is a request the unit refuses before touching a register.

use thiserror::Error;

/// Errors returned by the IO-PMP programming interface.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Error)]
pub enum IopmpError {
    /// Region request named a slot outside `[0, count)`; no register was written.
    #[error("IO-PMP slot {slot} out of range (unit has {count} slots)")]
    InvalidSlot {
        /// The rejected slot index.
        slot: usize,
        /// Number of slots the unit implements.
        count: usize,
    },

    /// NAPOT/NA4 classification was requested before the granule was detected.
    #[error("IO-PMP granule not detected; call detect_granule or init first")]
    GranuleNotDetected,

    /// Configuration asked for no slots or more slots than the config words hold.
    #[error("unsupported IO-PMP slot count {0} (expected 1..=16)")]
    UnsupportedSlotCount(usize),

    /// Configured address width is zero or wider than a register.
    #[error("unsupported IO-PMP address width {0} bits (expected 1..=64)")]
    InvalidAddressWidth(u32),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, IopmpError>;
