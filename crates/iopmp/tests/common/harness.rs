use super::mocks::registers::RegisterFile;
use iopmp_core::pmp::{Granule, Iopmp};
use iopmp_core::soc::SimIopmp;
use iopmp_core::IopmpConfig;
use tracing_subscriber::EnvFilter;

/// Granule of 4 KiB (`G = 10`), the most common hardware configuration.
pub const GRANULE_4K: u32 = 12;

/// Routes `tracing` output through the test writer so `--nocapture` shows it.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Driver over a fresh simulated unit with the default 16-slot layout.
pub fn sim_unit(granule_shift: u32) -> Iopmp<SimIopmp> {
    sim_unit_with(IopmpConfig::default(), granule_shift)
}

/// Driver over a fresh simulated unit with a custom layout.
pub fn sim_unit_with(config: IopmpConfig, granule_shift: u32) -> Iopmp<SimIopmp> {
    init_tracing();
    let sim = SimIopmp::new(&config, Granule::from_shift(granule_shift));
    match Iopmp::new(sim, config) {
        Ok(unit) => unit,
        Err(e) => panic!("valid config rejected: {e}"),
    }
}

/// Driver over a recording register file whose granule is already cached.
///
/// Detection runs against a probe file; the driver is then handed a fresh,
/// empty register file so tests observe only their own accesses.
pub fn file_unit(granule: Granule) -> Iopmp<RegisterFile> {
    init_tracing();
    let probe = RegisterFile::new().pin(0x0, !granule.addr_low_mask());
    let mut unit = match Iopmp::new(probe, IopmpConfig::default()) {
        Ok(unit) => unit,
        Err(e) => panic!("valid config rejected: {e}"),
    };
    assert_eq!(unit.detect_granule(), granule);
    let _ = std::mem::replace(unit.regs_mut(), RegisterFile::new());
    unit
}
