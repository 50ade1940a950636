//! Configuration for an IO-PMP unit instance.
//!
//! Describes where the unit lives and how much of it is implemented:
//! 1. **Defaults:** The deployed platform's base address, slot count and address width.
//! 2. **Validation:** Rejects slot counts and widths the register layout cannot express.
//!
//! Firmware uses `IopmpConfig::default()`; host tooling deserializes it from JSON.

use serde::Deserialize;

use crate::common::constants::MAX_SLOTS;
use crate::common::error::{IopmpError, Result};

/// Default configuration constants.
mod defaults {
    /// Physical base address of the IO-PMP register block.
    pub const BASE_ADDR: u64 = 0x5001_0000;

    /// Number of protection slots implemented by the unit.
    pub const NUM_SLOTS: usize = 16;

    /// Implemented bits of an address register.
    ///
    /// 56-bit physical addresses stored right-shifted by two.
    pub const ADDR_BITS: u32 = 54;
}

/// Static description of one IO-PMP unit.
///
/// # Examples
///
/// ```
/// use iopmp_core::config::IopmpConfig;
///
/// let config = IopmpConfig::default();
/// assert_eq!(config.num_slots, 16);
/// assert_eq!(config.addr_mask(), 0x3F_FFFF_FFFF_FFFF);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct IopmpConfig {
    /// Physical base address of the register block.
    #[serde(default = "IopmpConfig::default_base_addr")]
    pub base_addr: u64,
    /// Number of slots, `1..=16`.
    #[serde(default = "IopmpConfig::default_num_slots")]
    pub num_slots: usize,
    /// Number of implemented address-register bits, `1..=64`.
    #[serde(default = "IopmpConfig::default_addr_bits")]
    pub addr_bits: u32,
}

impl IopmpConfig {
    const fn default_base_addr() -> u64 {
        defaults::BASE_ADDR
    }

    const fn default_num_slots() -> usize {
        defaults::NUM_SLOTS
    }

    const fn default_addr_bits() -> u32 {
        defaults::ADDR_BITS
    }

    /// Checks that the layout can be expressed by the register block.
    ///
    /// # Errors
    ///
    /// `UnsupportedSlotCount` for 0 or more than 16 slots,
    /// `InvalidAddressWidth` for a width of 0 or above 64 bits.
    pub const fn validate(&self) -> Result<()> {
        if self.num_slots == 0 || self.num_slots > MAX_SLOTS {
            return Err(IopmpError::UnsupportedSlotCount(self.num_slots));
        }
        if self.addr_bits == 0 || self.addr_bits > u64::BITS {
            return Err(IopmpError::InvalidAddressWidth(self.addr_bits));
        }
        Ok(())
    }

    /// Mask of the implemented address-register bits.
    pub const fn addr_mask(&self) -> u64 {
        if self.addr_bits >= u64::BITS {
            u64::MAX
        } else {
            (1u64 << self.addr_bits) - 1
        }
    }

    /// Returns true when a second config word is present.
    pub const fn has_second_cfg(&self) -> bool {
        self.num_slots > MAX_SLOTS / 2
    }
}

impl Default for IopmpConfig {
    fn default() -> Self {
        Self {
            base_addr: defaults::BASE_ADDR,
            num_slots: defaults::NUM_SLOTS,
            addr_bits: defaults::ADDR_BITS,
        }
    }
}
