//! Simulated IO-PMP register block.
//!
//! Models the register file of an IO-PMP with a fixed granule so the driver can
//! run without hardware.
//!
//! # Registers
//!
//! * `0x00 + 8*i`: Address register of slot `i` (WARL)
//!   * Bits `G-2..0` are not implemented; writes drop them.
//!   * In NAPOT mode with `G >= 2`, bits `G-2..0` read as ones.
//!   * In the other modes, bits `G-1..0` read as zeros.
//! * `0x80`: Config word 0 (slots 0-7)
//! * `0x88`: Config word 1 (slots 8-15), only when more than 8 slots exist
//!
//! Unmapped offsets read as zero and ignore writes. The device also evaluates
//! accesses against the programmed slots (`check`), the way the hardware filters
//! bus-master transactions.

use crate::common::constants::{
    ADDR_STRIDE, CFG_BASE, CFG1_OFFSET, PMP_R, PMP_W, PMP_X, SLOTS_PER_CFG,
};
use crate::config::IopmpConfig;
use crate::pmp::granule::Granule;
use crate::pmp::region::{self, AddrMatch, RegionDescriptor};
use crate::pmp::CfgLane;
use crate::soc::traits::RegisterAccess;

/// Kind of bus access being checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessKind {
    /// Data read.
    Read,
    /// Data write.
    Write,
    /// Instruction fetch.
    Execute,
}

impl AccessKind {
    const fn required_bit(self) -> u8 {
        match self {
            Self::Read => PMP_R,
            Self::Write => PMP_W,
            Self::Execute => PMP_X,
        }
    }
}

/// Result of an access check.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessResult {
    /// Access is permitted.
    Allow,
    /// Access is denied.
    Deny,
    /// No slot matched.
    NoMatch,
}

/// Simulated IO-PMP device.
#[derive(Clone, Debug)]
pub struct SimIopmp {
    num_slots: usize,
    addr_mask: u64,
    granule: Granule,
    /// Stored address registers (unimplemented low bits already dropped).
    addr: Vec<u64>,
    cfg: [u64; 2],
}

impl SimIopmp {
    /// Creates a device with all registers cleared.
    pub fn new(config: &IopmpConfig, granule: Granule) -> Self {
        Self {
            num_slots: config.num_slots,
            addr_mask: config.addr_mask(),
            granule,
            addr: vec![0; config.num_slots],
            cfg: [0; 2],
        }
    }

    /// Granule the device implements.
    pub const fn granule(&self) -> Granule {
        self.granule
    }

    /// Number of slots.
    pub const fn num_slots(&self) -> usize {
        self.num_slots
    }

    /// Raw config word `idx` (0 or 1).
    pub fn cfg_word(&self, idx: usize) -> u64 {
        self.cfg.get(idx).copied().unwrap_or(0)
    }

    /// Stored value of an address register, before NAPOT read-as-ones.
    pub fn stored_addr(&self, slot: usize) -> u64 {
        self.addr.get(slot).copied().unwrap_or(0)
    }

    fn cfg_lane(&self, slot: usize) -> u8 {
        CfgLane::of(slot).extract(self.cfg_word(slot / SLOTS_PER_CFG))
    }

    /// Mask of the `G - 1` low address bits the device does not implement.
    const fn unimplemented_mask(&self) -> u64 {
        self.granule.addr_low_mask() >> 1
    }

    /// Address register value as software reads it.
    pub fn read_addr(&self, slot: usize) -> u64 {
        let stored = self.stored_addr(slot);
        let g = self.granule.addr_zero_bits();
        if g >= 2 && AddrMatch::from_cfg(self.cfg_lane(slot)) == AddrMatch::Napot {
            (stored | self.unimplemented_mask()) & self.addr_mask
        } else {
            stored & !self.granule.addr_low_mask()
        }
    }

    /// Decoded view of a slot.
    pub fn entry(&self, slot: usize) -> RegionDescriptor {
        RegionDescriptor::new(slot, self.cfg_lane(slot), self.read_addr(slot))
    }

    /// Checks whether an access of `size` bytes at `addr` is permitted.
    ///
    /// Slots are evaluated in index order and the first one whose range fully
    /// contains the access decides.
    pub fn check(&self, addr: u64, size: u64, kind: AccessKind) -> AccessResult {
        for slot in 0..self.num_slots {
            let entry = self.entry(slot);
            let prev_addr = if slot == 0 { 0 } else { self.read_addr(slot - 1) };

            let Some(bounds) = region::decode_bounds(entry.match_mode(), entry.addr, prev_addr)
            else {
                continue;
            };

            if bounds.contains(addr, size) {
                return if entry.cfg & kind.required_bit() != 0 {
                    AccessResult::Allow
                } else {
                    AccessResult::Deny
                };
            }
        }
        AccessResult::NoMatch
    }

    fn addr_slot(&self, offset: u64) -> Option<usize> {
        if offset >= CFG_BASE || offset % ADDR_STRIDE != 0 {
            return None;
        }
        let slot = (offset / ADDR_STRIDE) as usize;
        (slot < self.num_slots).then_some(slot)
    }

    fn cfg_index(&self, offset: u64) -> Option<usize> {
        match offset {
            CFG_BASE => Some(0),
            CFG1_OFFSET if self.num_slots > SLOTS_PER_CFG => Some(1),
            _ => None,
        }
    }
}

impl RegisterAccess for SimIopmp {
    fn read_u64(&mut self, offset: u64) -> u64 {
        if let Some(slot) = self.addr_slot(offset) {
            self.read_addr(slot)
        } else if let Some(idx) = self.cfg_index(offset) {
            self.cfg[idx]
        } else {
            0
        }
    }

    fn write_u64(&mut self, offset: u64, val: u64) {
        if let Some(slot) = self.addr_slot(offset) {
            self.addr[slot] = val & self.addr_mask & !self.unimplemented_mask();
        } else if let Some(idx) = self.cfg_index(offset) {
            self.cfg[idx] = val;
        }
    }
}
