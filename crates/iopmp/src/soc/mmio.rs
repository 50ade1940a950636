//! Memory-mapped register backend.
//!
//! Performs volatile 64-bit loads and stores relative to a fixed base address.
//! This is the backend used on the target, where the IO-PMP register block is
//! mapped at a physical address.

use core::ptr;

use crate::soc::traits::RegisterAccess;

/// Volatile access to a register block at a fixed address.
#[derive(Debug)]
pub struct MmioRegisters {
    /// Address of the first register.
    base: usize,
}

impl MmioRegisters {
    /// Creates a backend for the register block at `base`.
    ///
    /// # Safety
    ///
    /// `base` must point to a mapped register block covering every offset the
    /// caller will access (`0x0..0x90` for a 16-slot IO-PMP), aligned to 8
    /// bytes, and no other code may access the block while this value is alive.
    pub const unsafe fn new(base: usize) -> Self {
        Self { base }
    }

    /// Returns the base address of the block.
    pub const fn base(&self) -> usize {
        self.base
    }

    #[inline]
    fn reg(&self, offset: u64) -> *mut u64 {
        (self.base + offset as usize) as *mut u64
    }
}

impl RegisterAccess for MmioRegisters {
    #[inline]
    fn read_u64(&mut self, offset: u64) -> u64 {
        // SAFETY: `new` requires `base + offset` to be a mapped, aligned register.
        unsafe { ptr::read_volatile(self.reg(offset)) }
    }

    #[inline]
    fn write_u64(&mut self, offset: u64, val: u64) {
        // SAFETY: `new` requires `base + offset` to be a mapped, aligned register.
        unsafe { ptr::write_volatile(self.reg(offset), val) }
    }
}
