//! Register read/write self-test.
//!
//! Writes all-ones to every address register and config word, compares the
//! read-back against what the hardware is documented to retain, and clears the
//! register to zero. Previous contents are not restored, so the test must run
//! before any region is programmed.

use std::fmt;

use tracing::{info, warn};

use crate::common::constants::{ADDR_BASE, ADDR_STRIDE, ALL_ONES, CFG_BASE, CFG1_OFFSET};
use crate::config::IopmpConfig;
use crate::pmp::granule::Granule;
use crate::soc::traits::RegisterAccess;

/// Register exercised by one self-test step.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SelfTestTarget {
    /// Address register of the given slot.
    Address(usize),
    /// Config word 0 or 1.
    Config(usize),
}

/// Outcome of writing and reading back one register.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SelfTestRecord {
    /// Register under test.
    pub target: SelfTestTarget,
    /// Value the register should hold after the all-ones write.
    pub expected: u64,
    /// Value actually read back.
    pub observed: u64,
}

impl SelfTestRecord {
    /// Returns true if the read-back matched.
    pub const fn passed(&self) -> bool {
        self.expected == self.observed
    }
}

/// Structured result of a self-test run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SelfTestReport {
    /// Granule the expectations were derived from.
    pub granule: Granule,
    /// One record per address register, then one per config word.
    pub records: Vec<SelfTestRecord>,
}

impl SelfTestReport {
    /// Returns true if every register behaved as expected.
    pub fn passed(&self) -> bool {
        self.records.iter().all(SelfTestRecord::passed)
    }

    /// Records for the address registers.
    pub fn address_records(&self) -> impl Iterator<Item = &SelfTestRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.target, SelfTestTarget::Address(_)))
    }

    /// Records for the config words.
    pub fn config_records(&self) -> impl Iterator<Item = &SelfTestRecord> {
        self.records
            .iter()
            .filter(|r| matches!(r.target, SelfTestTarget::Config(_)))
    }

    /// Returns true if every config word read back as written.
    pub fn config_passed(&self) -> bool {
        self.config_records().all(SelfTestRecord::passed)
    }

    /// Slots whose address register failed.
    pub fn failed_slots(&self) -> Vec<usize> {
        self.address_records()
            .filter(|r| !r.passed())
            .filter_map(|r| match r.target {
                SelfTestTarget::Address(slot) => Some(slot),
                SelfTestTarget::Config(_) => None,
            })
            .collect()
    }

    /// Human-readable diagnostic lines, one per address register plus one
    /// covering all config words.
    pub fn lines(&self) -> Vec<String> {
        let mut lines: Vec<String> = self
            .address_records()
            .map(|r| {
                let slot = match r.target {
                    SelfTestTarget::Address(slot) | SelfTestTarget::Config(slot) => slot,
                };
                if r.passed() {
                    format!("IO-PMP{slot}: address read/write succeeded")
                } else {
                    format!("IO-PMP{slot}: address read/write failed: {:x}", r.observed)
                }
            })
            .collect();
        lines.push(if self.config_passed() {
            "IO-PMP: cfg read/write succeeded".to_string()
        } else {
            "IO-PMP: cfg read/write failed".to_string()
        });
        lines
    }
}

impl fmt::Display for SelfTestReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for line in self.lines() {
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}

/// Runs the self-test against `regs`.
///
/// Every address register and present config word ends up cleared.
pub fn run<R: RegisterAccess>(regs: &mut R, config: &IopmpConfig, granule: Granule) -> SelfTestReport {
    let addr_expected = config.addr_mask() & !granule.addr_low_mask();
    let mut records = Vec::with_capacity(config.num_slots + 2);

    for slot in 0..config.num_slots {
        let offset = ADDR_BASE + slot as u64 * ADDR_STRIDE;
        regs.write_u64(offset, ALL_ONES);
        let observed = regs.read_u64(offset);
        records.push(SelfTestRecord {
            target: SelfTestTarget::Address(slot),
            expected: addr_expected,
            observed,
        });
        regs.write_u64(offset, 0);
    }

    let mut cfg_words = vec![CFG_BASE];
    if config.has_second_cfg() {
        cfg_words.push(CFG1_OFFSET);
    }

    for &offset in &cfg_words {
        regs.write_u64(offset, ALL_ONES);
    }
    for (idx, &offset) in cfg_words.iter().enumerate() {
        let observed = regs.read_u64(offset);
        records.push(SelfTestRecord {
            target: SelfTestTarget::Config(idx),
            expected: ALL_ONES,
            observed,
        });
    }
    for &offset in &cfg_words {
        regs.write_u64(offset, 0);
    }

    SelfTestReport { granule, records }
}

/// Emits the report's diagnostic lines to the log.
pub fn log_report(report: &SelfTestReport) {
    let failed = !report.config_passed();
    for (line, record) in report.lines().iter().zip(report.address_records()) {
        if record.passed() {
            info!("{line}");
        } else {
            warn!(expected = record.expected, observed = record.observed, "{line}");
        }
    }
    if failed {
        warn!("IO-PMP: cfg read/write failed");
    } else {
        info!("IO-PMP: cfg read/write succeeded");
    }
}
