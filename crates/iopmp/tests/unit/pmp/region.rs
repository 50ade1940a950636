//! # Region Encoding Tests
//!
//! Verifies descriptor constructors (NAPOT/NA4 classification, allow-all),
//! mode decoding, permission accessors and range decoding for TOR, NA4 and
//! NAPOT entries.

use iopmp_core::common::constants::{PMP_A_NA4, PMP_A_NAPOT, PMP_L, PMP_R, PMP_RWX, PMP_W, PMP_X};
use iopmp_core::pmp::region::{cfg_byte, decode_bounds, napot_addr};
use iopmp_core::pmp::{AddrMatch, Granule, RegionBounds, RegionDescriptor};
use pretty_assertions::assert_eq;
use rstest::rstest;

// ══════════════════════════════════════════════════════════
// 1. Address match mode decoding
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(0, AddrMatch::Off)]
#[case(1, AddrMatch::Tor)]
#[case(2, AddrMatch::Na4)]
#[case(3, AddrMatch::Napot)]
fn mode_from_bits(#[case] bits: u8, #[case] mode: AddrMatch) {
    assert_eq!(AddrMatch::from_bits(bits), mode);
    assert_eq!(AddrMatch::from_cfg(mode.cfg_bits() | PMP_RWX), mode);
}

#[test]
fn cfg_byte_masks_permissions() {
    assert_eq!(cfg_byte(PMP_R | PMP_W, AddrMatch::Napot), 0x1B);
    assert_eq!(cfg_byte(0xFF, AddrMatch::Na4), PMP_RWX | PMP_A_NA4);
}

// ══════════════════════════════════════════════════════════
// 2. Constructors
// ══════════════════════════════════════════════════════════

#[test]
fn napot_one_mib_region() {
    let g = Granule::from_shift(12);
    let r = RegionDescriptor::napot(0x8000_0000, 0x10_0000, PMP_R | PMP_W, 3, g);
    assert_eq!(r.slot, 3);
    assert_eq!(r.cfg, PMP_R | PMP_W | PMP_A_NAPOT);
    assert_eq!(r.addr, 0x2001_FFFF);
    assert_eq!(r.match_mode(), AddrMatch::Napot);
}

#[test]
fn range_equal_to_granule_is_na4() {
    let g = Granule::from_shift(12);
    let r = RegionDescriptor::napot(0x8000_0000, 0x1000, PMP_RWX, 0, g);
    assert_eq!(r.match_mode(), AddrMatch::Na4);
}

#[test]
fn range_above_granule_is_napot() {
    let g = Granule::from_shift(12);
    let r = RegionDescriptor::napot(0x8000_0000, 0x2000, PMP_RWX, 0, g);
    assert_eq!(r.match_mode(), AddrMatch::Napot);
}

#[test]
fn four_byte_region_at_minimum_granule() {
    let r = RegionDescriptor::napot(0x1000, 4, PMP_R, 0, Granule::MIN);
    assert_eq!(r.match_mode(), AddrMatch::Na4);
    assert_eq!(r.addr, 0x400);
}

#[test]
fn degenerate_granule_always_na4() {
    let r = RegionDescriptor::napot(0, 1 << 40, PMP_RWX, 0, Granule::from_readback(0));
    assert_eq!(r.match_mode(), AddrMatch::Na4);
}

#[test]
fn napot_addr_wraps_for_empty_range() {
    // (0x1000 + (0 / 2 - 1)) wraps to 0xFFF.
    assert_eq!(napot_addr(0x1000, 0), 0xFFF >> 2);
}

#[test]
fn allow_all_opens_everything() {
    let r = RegionDescriptor::allow_all(7);
    assert_eq!(r.slot, 7);
    assert_eq!(r.addr, u64::MAX);
    assert_eq!(r.match_mode(), AddrMatch::Napot);
    assert!(r.is_readable() && r.is_writable() && r.is_executable());
    assert!(!r.is_locked());
}

#[test]
fn disabled_clears_everything() {
    let r = RegionDescriptor::disabled(2);
    assert_eq!(r, RegionDescriptor::new(2, 0, 0));
    assert_eq!(r.match_mode(), AddrMatch::Off);
}

#[test]
fn permission_accessors() {
    let r = RegionDescriptor::new(0, PMP_X | PMP_L | PMP_A_NA4, 0);
    assert!(!r.is_readable());
    assert!(!r.is_writable());
    assert!(r.is_executable());
    assert!(r.is_locked());
    assert_eq!(r.access(), PMP_X);
}

// ══════════════════════════════════════════════════════════
// 3. Range decoding
// ══════════════════════════════════════════════════════════

#[test]
fn off_matches_nothing() {
    assert_eq!(decode_bounds(AddrMatch::Off, 0x1234, 0), None);
}

#[test]
fn na4_is_four_bytes() {
    let b = decode_bounds(AddrMatch::Na4, 0x400, 0).unwrap();
    assert_eq!(b, RegionBounds { start: 0x1000, last: 0x1003 });
    assert_eq!(b.size(), Some(4));
}

#[test]
fn napot_eight_bytes() {
    // No trailing ones: 2^3 bytes.
    let b = decode_bounds(AddrMatch::Napot, 0x400, 0).unwrap();
    assert_eq!(b, RegionBounds { start: 0x1000, last: 0x1007 });
}

#[test]
fn napot_round_trips_constructor() {
    let g = Granule::from_shift(12);
    let r = RegionDescriptor::napot(0x8000_0000, 0x10_0000, PMP_RWX, 0, g);
    let b = decode_bounds(r.match_mode(), r.addr, 0).unwrap();
    assert_eq!(b.start, 0x8000_0000);
    assert_eq!(b.last, 0x800F_FFFF);
    assert_eq!(b.size(), Some(0x10_0000));
}

#[test]
fn napot_all_ones_spans_everything() {
    let b = decode_bounds(AddrMatch::Napot, u64::MAX, 0).unwrap();
    assert_eq!(b, RegionBounds { start: 0, last: u64::MAX });
    assert_eq!(b.size(), None);
}

#[test]
fn tor_uses_previous_address() {
    let b = decode_bounds(AddrMatch::Tor, 0x2000, 0x1000).unwrap();
    assert_eq!(b, RegionBounds { start: 0x4000, last: 0x7FFF });
}

#[test]
fn tor_empty_when_top_not_above_bottom() {
    assert_eq!(decode_bounds(AddrMatch::Tor, 0x1000, 0x1000), None);
    assert_eq!(decode_bounds(AddrMatch::Tor, 0x800, 0x1000), None);
}

#[rstest]
#[case(0x1000, 4, true)]
#[case(0x1004, 4, true)]
#[case(0x1007, 1, true)]
#[case(0x1006, 4, false)]
#[case(0x0FFF, 1, false)]
#[case(0x1000, 0, false)]
fn bounds_contains(#[case] addr: u64, #[case] size: u64, #[case] inside: bool) {
    let b = RegionBounds { start: 0x1000, last: 0x1007 };
    assert_eq!(b.contains(addr, size), inside);
}

#[test]
fn contains_handles_top_of_address_space() {
    let b = RegionBounds { start: 0, last: u64::MAX };
    assert!(b.contains(u64::MAX, 1));
    assert!(!b.contains(u64::MAX, 2));
}
