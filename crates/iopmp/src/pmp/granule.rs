//! Granule detection.
//!
//! With the config lane of slot 0 cleared, writing all-ones to address
//! register 0 and reading it back reveals the granule: the hardware clears the
//! `G` low bits it cannot match, and the granule is `2^(G + 2)` bytes.

use std::fmt;

use tracing::{info, warn};

use crate::common::constants::{ADDR_BASE, ALL_ONES, CFG_BASE, PMP_SHIFT};
use crate::soc::traits::RegisterAccess;

/// Minimum matchable alignment of an IO-PMP unit, as a power of two.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Granule {
    /// log2 of the granule size in bytes.
    shift: u32,
}

impl Granule {
    /// Smallest possible granule, four bytes.
    pub const MIN: Self = Self { shift: PMP_SHIFT };

    /// Shift reported when the probe read back no set bit at all.
    pub const DEGENERATE_SHIFT: u32 = PMP_SHIFT + u64::BITS;

    /// Creates a granule of `2^shift` bytes.
    pub const fn from_shift(shift: u32) -> Self {
        Self { shift }
    }

    /// Derives the granule from the address-register probe read-back.
    ///
    /// Counts the trailing zero bits, starting at 2 for the fixed address
    /// shift. The count is bounded by the register width, so a read-back of 0
    /// gives [`Granule::DEGENERATE_SHIFT`].
    pub const fn from_readback(value: u64) -> Self {
        Self {
            shift: PMP_SHIFT + value.trailing_zeros(),
        }
    }

    /// log2 of the granule size in bytes.
    pub const fn shift(&self) -> u32 {
        self.shift
    }

    /// Number of low address-register bits the hardware cannot hold (`G`).
    pub const fn addr_zero_bits(&self) -> u32 {
        self.shift.saturating_sub(PMP_SHIFT)
    }

    /// Mask of the address-register bits cleared by the hardware.
    pub const fn addr_low_mask(&self) -> u64 {
        let bits = self.addr_zero_bits();
        if bits >= u64::BITS {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        }
    }

    /// Granule size in bytes, saturating at `u64::MAX` for a degenerate probe.
    pub const fn size(&self) -> u64 {
        match 1u64.checked_shl(self.shift) {
            Some(size) => size,
            None => u64::MAX,
        }
    }

    /// Returns true if `range` bytes exceed the granule, i.e. need NAPOT.
    pub const fn is_smaller_than(&self, range: u64) -> bool {
        match 1u64.checked_shl(self.shift) {
            Some(size) => range > size,
            None => false,
        }
    }

    /// Returns true when the probe read back no implemented bit.
    pub const fn is_degenerate(&self) -> bool {
        self.shift >= Self::DEGENERATE_SHIFT
    }
}

impl Default for Granule {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for Granule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.shift >= u64::BITS {
            write!(f, "2^{}", self.shift)
        } else {
            write!(f, "{}", self.size())
        }
    }
}

/// Probes register 0 and returns the detected granule.
///
/// Leaves config word 0 cleared and address register 0 holding the probe
/// pattern.
pub fn probe<R: RegisterAccess>(regs: &mut R) -> Granule {
    regs.write_u64(CFG_BASE, 0);
    regs.write_u64(ADDR_BASE, ALL_ONES);

    let readback = regs.read_u64(ADDR_BASE);
    let granule = Granule::from_readback(readback);

    if granule.is_degenerate() {
        warn!(readback, "IO-PMP granularity probe read back no implemented bits");
    }
    info!("IO-PMP granularity: {}", granule);
    granule
}
