use iopmp_core::soc::traits::RegisterAccess;
use std::collections::BTreeMap;

/// A register file that stores every word written and records the access log.
///
/// Unwritten registers read as zero. Offsets pinned with `pin` always read
/// back the pinned value, which models hardware that drops written bits.
#[derive(Debug, Default, Clone)]
pub struct RegisterFile {
    regs: BTreeMap<u64, u64>,
    pinned: BTreeMap<u64, u64>,
    writes: Vec<(u64, u64)>,
    reads: Vec<u64>,
}

impl RegisterFile {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes `offset` read back `value` regardless of what is written.
    pub fn pin(mut self, offset: u64, value: u64) -> Self {
        let _ = self.pinned.insert(offset, value);
        self
    }

    /// Presets a register without recording a write.
    pub fn preset(&mut self, offset: u64, value: u64) {
        let _ = self.regs.insert(offset, value);
    }

    /// Current stored value of a register.
    pub fn get(&self, offset: u64) -> u64 {
        self.regs.get(&offset).copied().unwrap_or(0)
    }

    /// Every write in order as `(offset, value)`.
    pub fn writes(&self) -> &[(u64, u64)] {
        &self.writes
    }

    /// Every read offset in order.
    pub fn reads(&self) -> &[u64] {
        &self.reads
    }

    /// Snapshot of all stored registers.
    pub fn snapshot(&self) -> BTreeMap<u64, u64> {
        self.regs.clone()
    }

    pub fn clear_log(&mut self) {
        self.writes.clear();
        self.reads.clear();
    }
}

impl RegisterAccess for RegisterFile {
    fn read_u64(&mut self, offset: u64) -> u64 {
        self.reads.push(offset);
        if let Some(&value) = self.pinned.get(&offset) {
            return value;
        }
        self.get(offset)
    }

    fn write_u64(&mut self, offset: u64, val: u64) {
        self.writes.push((offset, val));
        let _ = self.regs.insert(offset, val);
    }
}
