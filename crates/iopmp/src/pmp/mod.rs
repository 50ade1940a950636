//! IO-PMP unit driver.
//!
//! `Iopmp` owns a register backend and the detected granule. It provides:
//! 1. **Granule detection:** `detect_granule` / `ensure_granule`.
//! 2. **Self-test:** `init` and `run_self_test`.
//! 3. **Region programming:** `program_region` plus the NAPOT and allow-all
//!    constructors, and read-back/decode of programmed slots.
//!
//! Every register-touching method takes `&mut self`, so programming of one
//! unit is serialised by ownership. The config-lane read-modify-write is not
//! atomic with respect to other writers of the same register block.

/// Granule detection.
pub mod granule;

/// Region descriptors, address encodings and range decoding.
pub mod region;

/// Register read/write self-test.
pub mod selftest;

use tracing::{debug, warn};

use crate::common::constants::{
    ADDR_BASE, ADDR_STRIDE, CFG_BASE, CFG_LANE_BITS, PMP_RWX, SLOTS_PER_CFG,
};
use crate::common::error::{IopmpError, Result};
use crate::config::IopmpConfig;
use crate::soc::traits::RegisterAccess;

pub use granule::Granule;
pub use region::{AddrMatch, RegionBounds, RegionDescriptor};
pub use selftest::{SelfTestRecord, SelfTestReport, SelfTestTarget};

/// Byte-lane position of a slot inside the config words.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CfgLane {
    /// Offset of the config word holding the lane.
    pub offset: u64,
    /// Bit position of the lane within the word.
    pub shift: u32,
}

impl CfgLane {
    /// Locates the lane of `slot`. The caller has validated the slot.
    pub const fn of(slot: usize) -> Self {
        let word = (slot / SLOTS_PER_CFG) as u64;
        let lane = (slot % SLOTS_PER_CFG) as u32;
        Self {
            offset: CFG_BASE + word * 8,
            shift: lane * CFG_LANE_BITS,
        }
    }

    /// Mask selecting the lane within its word.
    pub const fn mask(&self) -> u64 {
        0xff << self.shift
    }

    /// Extracts the lane from a config word.
    pub const fn extract(&self, word: u64) -> u8 {
        (word >> self.shift) as u8
    }
}

/// Offset of a slot's address register.
pub const fn addr_offset(slot: usize) -> u64 {
    ADDR_BASE + slot as u64 * ADDR_STRIDE
}

/// IO-PMP unit context.
#[derive(Debug)]
pub struct Iopmp<R> {
    regs: R,
    config: IopmpConfig,
    granule: Option<Granule>,
}

impl<R: RegisterAccess> Iopmp<R> {
    /// Creates a context over `regs`. No register is accessed.
    ///
    /// # Errors
    ///
    /// Returns the configuration error if `config` fails validation.
    pub fn new(regs: R, config: IopmpConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            regs,
            config,
            granule: None,
        })
    }

    /// Unit configuration.
    pub const fn config(&self) -> &IopmpConfig {
        &self.config
    }

    /// Number of slots.
    pub const fn num_slots(&self) -> usize {
        self.config.num_slots
    }

    /// Cached granule, if detection has run.
    pub const fn granule(&self) -> Option<Granule> {
        self.granule
    }

    /// Shared access to the register backend.
    pub const fn regs(&self) -> &R {
        &self.regs
    }

    /// Mutable access to the register backend.
    pub const fn regs_mut(&mut self) -> &mut R {
        &mut self.regs
    }

    /// Consumes the context and returns the register backend.
    pub fn into_inner(self) -> R {
        self.regs
    }

    /// Probes the hardware granule and caches it.
    ///
    /// Clobbers config word 0 and address register 0.
    pub fn detect_granule(&mut self) -> Granule {
        let granule = granule::probe(&mut self.regs);
        self.granule = Some(granule);
        granule
    }

    /// Returns the cached granule, detecting it first if needed.
    pub fn ensure_granule(&mut self) -> Granule {
        match self.granule {
            Some(granule) => granule,
            None => self.detect_granule(),
        }
    }

    /// Detects the granule if needed, runs the self-test and logs the result.
    ///
    /// Must run before any region is programmed: every register is cleared.
    pub fn init(&mut self) -> SelfTestReport {
        let report = self.run_self_test();
        selftest::log_report(&report);
        report
    }

    /// Runs the register self-test without logging the per-register lines.
    ///
    /// Must run before any region is programmed: every register is cleared.
    pub fn run_self_test(&mut self) -> SelfTestReport {
        let granule = self.ensure_granule();
        selftest::run(&mut self.regs, &self.config, granule)
    }

    fn check_slot(&self, slot: usize) -> Result<()> {
        if slot >= self.config.num_slots {
            warn!(slot, count = self.config.num_slots, "IO-PMP invalid slot");
            return Err(IopmpError::InvalidSlot {
                slot,
                count: self.config.num_slots,
            });
        }
        Ok(())
    }

    /// Writes `region` into its slot.
    ///
    /// Only the slot's config lane and address register change. The lane is
    /// cleared before the address register is written, so the slot never
    /// matches with a half-written configuration.
    ///
    /// # Errors
    ///
    /// `InvalidSlot` if the slot is out of range; no register is written.
    pub fn program_region(&mut self, region: RegionDescriptor) -> Result<RegionDescriptor> {
        self.check_slot(region.slot)?;

        let lane = CfgLane::of(region.slot);
        let mask = lane.mask();

        let word = self.regs.read_u64(lane.offset);
        self.regs.write_u64(lane.offset, word & !mask);

        self.regs.write_u64(addr_offset(region.slot), region.addr);

        let word = self.regs.read_u64(lane.offset);
        let cfg = ((region.cfg as u64) << lane.shift) & mask;
        self.regs.write_u64(lane.offset, cfg | (word & !mask));

        debug!(
            slot = region.slot,
            addr = region.addr,
            cfg = region.cfg,
            "Set IO-PMP"
        );
        Ok(region)
    }

    /// Programs `range` bytes at `base` with the given permissions.
    ///
    /// # Errors
    ///
    /// `GranuleNotDetected` before detection, `InvalidSlot` for a bad slot.
    pub fn region_from_napot_access(
        &mut self,
        base: u64,
        range: u64,
        access: u8,
        slot: usize,
    ) -> Result<RegionDescriptor> {
        let granule = self.granule.ok_or(IopmpError::GranuleNotDetected)?;
        self.program_region(RegionDescriptor::napot(base, range, access, slot, granule))
    }

    /// Programs `range` bytes at `base` with read, write and execute.
    ///
    /// # Errors
    ///
    /// `GranuleNotDetected` before detection, `InvalidSlot` for a bad slot.
    pub fn region_from_napot(&mut self, base: u64, range: u64, slot: usize) -> Result<RegionDescriptor> {
        self.region_from_napot_access(base, range, PMP_RWX, slot)
    }

    /// Opens the whole address space through `slot`.
    ///
    /// # Errors
    ///
    /// `InvalidSlot` for a bad slot.
    pub fn region_allow_all(&mut self, slot: usize) -> Result<RegionDescriptor> {
        self.program_region(RegionDescriptor::allow_all(slot))
    }

    /// Turns `slot` off and clears its address register.
    ///
    /// # Errors
    ///
    /// `InvalidSlot` for a bad slot.
    pub fn disable_region(&mut self, slot: usize) -> Result<RegionDescriptor> {
        self.program_region(RegionDescriptor::disabled(slot))
    }

    /// Reads back the config lane and address register of `slot`.
    ///
    /// # Errors
    ///
    /// `InvalidSlot` for a bad slot.
    pub fn read_region(&mut self, slot: usize) -> Result<RegionDescriptor> {
        self.check_slot(slot)?;
        let lane = CfgLane::of(slot);
        let cfg = lane.extract(self.regs.read_u64(lane.offset));
        let addr = self.regs.read_u64(addr_offset(slot));
        Ok(RegionDescriptor::new(slot, cfg, addr))
    }

    /// Decodes the byte range `slot` currently matches.
    ///
    /// Returns `None` for a disabled slot or an empty TOR range.
    ///
    /// # Errors
    ///
    /// `InvalidSlot` for a bad slot.
    pub fn region_bounds(&mut self, slot: usize) -> Result<Option<RegionBounds>> {
        let region = self.read_region(slot)?;
        let prev_addr = if slot == 0 {
            0
        } else {
            self.regs.read_u64(addr_offset(slot - 1))
        };
        Ok(region::decode_bounds(region.match_mode(), region.addr, prev_addr))
    }
}
