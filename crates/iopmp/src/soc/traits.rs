//! Register access trait for the IO-PMP register block.
//!
//! All IO-PMP logic reaches the hardware through `RegisterAccess`, so the same
//! code drives real memory-mapped registers (`MmioRegisters`) and the simulated
//! register file (`SimIopmp`).

/// Word-sized access to a block of device registers.
///
/// Offsets are byte offsets from the start of the block. Every call must reach
/// the device: implementations may not cache, merge or elide accesses.
pub trait RegisterAccess {
    /// Reads the 64-bit register at `offset`.
    fn read_u64(&mut self, offset: u64) -> u64;
    /// Writes `val` to the 64-bit register at `offset`.
    fn write_u64(&mut self, offset: u64, val: u64);
}

impl<T: RegisterAccess + ?Sized> RegisterAccess for &mut T {
    fn read_u64(&mut self, offset: u64) -> u64 {
        (**self).read_u64(offset)
    }

    fn write_u64(&mut self, offset: u64, val: u64) {
        (**self).write_u64(offset, val);
    }
}
