//! Register layout and bit-layout constants for the IO-PMP unit.
//!
//! Offsets are relative to the device base address. The config-byte layout
//! follows the RISC-V PMP encoding: permission bits in 2:0, address-matching
//! mode in 4:3 and the lock bit in 7.

/// Offset of address register 0; register `i` lives at `ADDR_BASE + 8 * i`.
pub const ADDR_BASE: u64 = 0x0;

/// Stride between consecutive address registers (one 64-bit word).
pub const ADDR_STRIDE: u64 = 0x8;

/// Offset of the first config word (slots 0-7).
pub const CFG_BASE: u64 = 0x80;

/// Offset of the second config word (slots 8-15), present only when N > 8.
pub const CFG1_OFFSET: u64 = CFG_BASE + 0x8;

/// Number of slots packed into one 64-bit config word.
pub const SLOTS_PER_CFG: usize = 8;

/// Largest slot count the two config words can describe.
pub const MAX_SLOTS: usize = 2 * SLOTS_PER_CFG;

/// Width of one config lane in bits.
pub const CFG_LANE_BITS: u32 = 8;

/// Fixed right shift applied to byte addresses in the address registers.
pub const PMP_SHIFT: u32 = 2;

/// All-ones register pattern used by the probes.
pub const ALL_ONES: u64 = u64::MAX;

/// Read permission bit.
pub const PMP_R: u8 = 1 << 0;
/// Write permission bit.
pub const PMP_W: u8 = 1 << 1;
/// Execute permission bit.
pub const PMP_X: u8 = 1 << 2;
/// Read, write and execute.
pub const PMP_RWX: u8 = PMP_R | PMP_W | PMP_X;

/// Address-matching mode field (bits 4:3 of a config lane).
pub const PMP_A_SHIFT: u8 = 3;
/// Mask of the mode field after shifting.
pub const PMP_A_MASK: u8 = 0x3;

/// Mode field: entry disabled.
pub const PMP_A_OFF: u8 = 0;
/// Mode field: top of range.
pub const PMP_A_TOR: u8 = 1 << PMP_A_SHIFT;
/// Mode field: naturally aligned four-byte region.
pub const PMP_A_NA4: u8 = 2 << PMP_A_SHIFT;
/// Mode field: naturally aligned power-of-two region.
pub const PMP_A_NAPOT: u8 = 3 << PMP_A_SHIFT;

/// Lock bit.
pub const PMP_L: u8 = 1 << 7;
