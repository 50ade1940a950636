//! Region descriptors and address encodings.
//!
//! A region is described by one config lane and one pre-shifted address
//! register. Three address-matching modes are decoded here:
//! - **TOR** (Top of Range): region is `[addr[i-1] << 2, addr[i] << 2)`.
//! - **NA4**: naturally aligned 4-byte region at `addr << 2`.
//! - **NAPOT**: naturally aligned power-of-two region; the trailing one-bits of
//!   the address field give the size.

use crate::common::constants::{
    ALL_ONES, PMP_A_MASK, PMP_A_NA4, PMP_A_NAPOT, PMP_A_SHIFT, PMP_L, PMP_R, PMP_RWX, PMP_SHIFT,
    PMP_W, PMP_X,
};
use crate::pmp::granule::Granule;

/// Address matching mode held in a config lane.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AddrMatch {
    /// Disabled, the entry matches nothing.
    Off = 0,
    /// Top of Range.
    Tor = 1,
    /// Naturally aligned 4-byte region.
    Na4 = 2,
    /// Naturally aligned power-of-two region.
    Napot = 3,
}

impl AddrMatch {
    /// Decodes the 2-bit mode field.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & PMP_A_MASK {
            0 => Self::Off,
            1 => Self::Tor,
            2 => Self::Na4,
            _ => Self::Napot,
        }
    }

    /// Extracts the mode from a full config lane.
    pub const fn from_cfg(cfg: u8) -> Self {
        Self::from_bits(cfg >> PMP_A_SHIFT)
    }

    /// Returns the mode already shifted into config-lane position.
    pub const fn cfg_bits(self) -> u8 {
        (self as u8) << PMP_A_SHIFT
    }
}

/// One configuration request for a single protection slot.
///
/// `addr` is in address-register format (byte address >> 2 with the NAPOT
/// size encoded in its trailing ones), not a byte address.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionDescriptor {
    /// Permission and address-matching bits for the slot's config lane.
    pub cfg: u8,
    /// Value written to the slot's address register.
    pub addr: u64,
    /// Slot index.
    pub slot: usize,
}

impl RegionDescriptor {
    /// Creates a descriptor from raw register values.
    pub const fn new(slot: usize, cfg: u8, addr: u64) -> Self {
        Self { cfg, addr, slot }
    }

    /// Builds a NAPOT/NA4 descriptor for `range` bytes at `base`.
    ///
    /// Ranges larger than the granule use NAPOT, everything else NA4. The
    /// address field is `(base + range / 2 - 1) >> 2`, computed with the
    /// wrapping arithmetic of the address registers.
    pub const fn napot(base: u64, range: u64, access: u8, slot: usize, granule: Granule) -> Self {
        let mode = if granule.is_smaller_than(range) {
            PMP_A_NAPOT
        } else {
            PMP_A_NA4
        };
        Self {
            cfg: access | mode,
            addr: napot_addr(base, range),
            slot,
        }
    }

    /// Builds a descriptor that matches the whole address space with R, W and X.
    pub const fn allow_all(slot: usize) -> Self {
        Self {
            cfg: PMP_RWX | PMP_A_NAPOT,
            addr: ALL_ONES,
            slot,
        }
    }

    /// Builds a descriptor that disables the slot.
    pub const fn disabled(slot: usize) -> Self {
        Self {
            cfg: 0,
            addr: 0,
            slot,
        }
    }

    /// Returns the address-matching mode.
    pub const fn match_mode(&self) -> AddrMatch {
        AddrMatch::from_cfg(self.cfg)
    }

    /// Returns true if the R (read) permission bit is set.
    pub const fn is_readable(&self) -> bool {
        self.cfg & PMP_R != 0
    }

    /// Returns true if the W (write) permission bit is set.
    pub const fn is_writable(&self) -> bool {
        self.cfg & PMP_W != 0
    }

    /// Returns true if the X (execute) permission bit is set.
    pub const fn is_executable(&self) -> bool {
        self.cfg & PMP_X != 0
    }

    /// Returns true if the L (lock) bit is set.
    pub const fn is_locked(&self) -> bool {
        self.cfg & PMP_L != 0
    }

    /// Permission bits only (R, W, X).
    pub const fn access(&self) -> u8 {
        self.cfg & PMP_RWX
    }
}

/// Inclusive byte range matched by a region.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RegionBounds {
    /// First matched byte address.
    pub start: u64,
    /// Last matched byte address.
    pub last: u64,
}

impl RegionBounds {
    /// Number of matched bytes; `None` when the region spans the whole 64-bit space.
    pub const fn size(&self) -> Option<u64> {
        (self.last - self.start).checked_add(1)
    }

    /// Returns true if `[addr, addr + size)` lies entirely inside the region.
    pub const fn contains(&self, addr: u64, size: u64) -> bool {
        if size == 0 || addr < self.start {
            return false;
        }
        match addr.checked_add(size - 1) {
            Some(end) => end <= self.last,
            None => false,
        }
    }
}

/// Address-register value for a NAPOT region of `range` bytes at `base`.
pub const fn napot_addr(base: u64, range: u64) -> u64 {
    base.wrapping_add((range / 2).wrapping_sub(1)) >> PMP_SHIFT
}

/// Decodes the byte range matched by a slot.
///
/// `prev_addr` is the address register of the preceding slot (0 for slot 0)
/// and is only consulted for TOR. Returns `None` for OFF and for an empty TOR
/// range.
pub const fn decode_bounds(mode: AddrMatch, addr: u64, prev_addr: u64) -> Option<RegionBounds> {
    match mode {
        AddrMatch::Off => None,
        AddrMatch::Tor => {
            let lo = prev_addr << PMP_SHIFT;
            let hi = addr << PMP_SHIFT;
            if hi <= lo {
                None
            } else {
                Some(RegionBounds {
                    start: lo,
                    last: hi - 1,
                })
            }
        }
        AddrMatch::Na4 => {
            let start = addr << PMP_SHIFT;
            Some(RegionBounds {
                start,
                last: start | 0x3,
            })
        }
        AddrMatch::Napot => Some(napot_bounds(addr)),
    }
}

/// Region size is `2^(trailing_ones + 3)` bytes; the base is the address with
/// those bits (and the zero bit above them) cleared.
const fn napot_bounds(addr: u64) -> RegionBounds {
    let trailing = (!addr).trailing_zeros() + 3;
    if trailing >= u64::BITS {
        return RegionBounds {
            start: 0,
            last: u64::MAX,
        };
    }
    let mask = (1u64 << trailing) - 1;
    let start = (addr << PMP_SHIFT) & !mask;
    RegionBounds {
        start,
        last: start | mask,
    }
}

/// Config-lane value for a given mode and permission set.
pub const fn cfg_byte(access: u8, mode: AddrMatch) -> u8 {
    (access & PMP_RWX) | mode.cfg_bits()
}

