//! IO-PMP bring-up tool.
//!
//! Drives the IO-PMP driver against a simulated unit. It provides:
//! 1. **Self-test:** Detect the granule and check every register reads back as expected.
//! 2. **Region programming:** Program one NAPOT/NA4 region, or open the whole address space.
//! 3. **Profile setup:** Apply a JSON profile of regions after a passing self-test.
//!
//! Results go to stdout; `tracing` diagnostics go to stderr (`RUST_LOG`, default `info`).

mod error;
mod number;
mod profile;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use iopmp_core::pmp::{AddrMatch, Granule, Iopmp, RegionBounds, RegionDescriptor};
use iopmp_core::soc::SimIopmp;

use crate::error::CliError;
use crate::number::{format_access, parse_access, parse_u64};
use crate::profile::{Profile, RegionRequest};

#[derive(Parser, Debug)]
#[command(
    name = "iopmp",
    author,
    version,
    about = "IO-PMP granule detection, self-test and region programming",
    long_about = "Detect the granule of a simulated IO-PMP, run the register self-test and program protection regions.\n\nNumbers accept decimal or 0x hex.\n\nExamples:\n  iopmp selftest --granule-shift 12\n  iopmp program --slot 3 --base 0x80000000 --range 0x100000 --access r-x\n  iopmp allow-all --slot 15\n  iopmp setup --config board.json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Options selecting the simulated unit.
#[derive(Args, Debug, Clone, Default)]
struct DeviceArgs {
    /// JSON profile supplying the unit layout and granule.
    #[arg(long)]
    config: Option<PathBuf>,

    /// log2 of the simulated granule in bytes (overrides the profile).
    #[arg(long, value_parser = clap::value_parser!(u32).range(2..=66))]
    granule_shift: Option<u32>,
}

impl DeviceArgs {
    fn profile(&self) -> Result<Profile, CliError> {
        let mut profile = match &self.config {
            Some(path) => Profile::load(path)?,
            None => Profile::default(),
        };
        if let Some(shift) = self.granule_shift {
            profile.granule_shift = shift;
        }
        Ok(profile)
    }
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Detect the granule and run the register read/write self-test.
    Selftest {
        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Program a NAPOT (or NA4) region into one slot.
    Program {
        /// Slot to program.
        #[arg(long)]
        slot: usize,

        /// Region base address.
        #[arg(long, value_parser = parse_u64)]
        base: u64,

        /// Region size in bytes.
        #[arg(long, value_parser = parse_u64)]
        range: u64,

        /// Permissions, any of r, w, x ('-' for none).
        #[arg(long, default_value = "rwx", value_parser = parse_access)]
        access: u8,

        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Open the whole address space through one slot.
    AllowAll {
        /// Slot to program.
        #[arg(long)]
        slot: usize,

        #[command(flatten)]
        device: DeviceArgs,
    },

    /// Run the self-test, then program every region of a profile.
    Setup {
        /// JSON profile.
        #[arg(long)]
        config: PathBuf,

        /// log2 of the simulated granule in bytes (overrides the profile).
        #[arg(long, value_parser = clap::value_parser!(u32).range(2..=66))]
        granule_shift: Option<u32>,
    },
}

fn main() -> ExitCode {
    init_tracing();
    let cli = Cli::parse();

    match run(cli.command) {
        Ok(code) => code,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn run(command: Commands) -> Result<ExitCode, CliError> {
    match command {
        Commands::Selftest { device } => cmd_selftest(&device.profile()?),
        Commands::Program {
            slot,
            base,
            range,
            access,
            device,
        } => cmd_program(
            &device.profile()?,
            &[RegionRequest::Napot {
                slot,
                base,
                range,
                access,
            }],
        ),
        Commands::AllowAll { slot, device } => {
            cmd_program(&device.profile()?, &[RegionRequest::AllowAll { slot }])
        }
        Commands::Setup {
            config,
            granule_shift,
        } => {
            let profile = DeviceArgs {
                config: Some(config),
                granule_shift,
            }
            .profile()?;
            cmd_program(&profile, &profile.requests()?)
        }
    }
}

/// Creates the simulated unit a profile describes. No register is touched.
fn open_unit(profile: &Profile) -> Result<Iopmp<SimIopmp>, CliError> {
    let sim = SimIopmp::new(&profile.iopmp, Granule::from_shift(profile.granule_shift));
    Ok(Iopmp::new(sim, profile.iopmp)?)
}

fn cmd_selftest(profile: &Profile) -> Result<ExitCode, CliError> {
    let mut unit = open_unit(profile)?;
    let report = unit.run_self_test();

    println!("IO-PMP granularity: {}", report.granule);
    print!("{report}");

    Ok(if report.passed() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

fn cmd_program(profile: &Profile, requests: &[RegionRequest]) -> Result<ExitCode, CliError> {
    let (mut unit, programmed) = bring_up(profile, requests)?;

    for region in &programmed {
        let bounds = unit.region_bounds(region.slot)?;
        println!("{}", describe(region, bounds));
    }
    Ok(ExitCode::SUCCESS)
}

/// Runs the self-test, then programs `requests` in order.
fn bring_up(
    profile: &Profile,
    requests: &[RegionRequest],
) -> Result<(Iopmp<SimIopmp>, Vec<RegionDescriptor>), CliError> {
    let mut unit = open_unit(profile)?;
    if !unit.init().passed() {
        return Err(CliError::SelfTestFailed);
    }

    let programmed = requests
        .iter()
        .map(|request| request.apply(&mut unit))
        .collect::<iopmp_core::Result<Vec<_>>>()?;
    Ok((unit, programmed))
}

const fn mode_name(mode: AddrMatch) -> &'static str {
    match mode {
        AddrMatch::Off => "OFF",
        AddrMatch::Tor => "TOR",
        AddrMatch::Na4 => "NA4",
        AddrMatch::Napot => "NAPOT",
    }
}

/// One-line summary of a programmed slot.
fn describe(region: &RegionDescriptor, bounds: Option<RegionBounds>) -> String {
    let span = match bounds {
        Some(b) => format!("{:#x}..={:#x}", b.start, b.last),
        None => "none".to_string(),
    };
    format!(
        "IO-PMP{}: {} {} addr={:#x} cfg={:#04x} range={span}",
        region.slot,
        mode_name(region.match_mode()),
        format_access(region.access()),
        region.addr,
        region.cfg,
    )
}
