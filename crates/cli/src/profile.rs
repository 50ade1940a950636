//! JSON bring-up profile.
//!
//! A profile names the unit layout, the granule the simulated unit implements
//! and the regions to program after the self-test:
//!
//! ```json
//! {
//!   "iopmp": { "num_slots": 16 },
//!   "granule_shift": 12,
//!   "regions": [
//!     { "slot": 0, "base": "0x80000000", "range": "0x100000", "access": "r-x" },
//!     { "slot": 15, "allow_all": true }
//!   ]
//! }
//! ```

use std::fs;
use std::path::Path;

use iopmp_core::pmp::{Iopmp, RegionDescriptor};
use iopmp_core::soc::RegisterAccess;
use iopmp_core::IopmpConfig;
use serde::Deserialize;

use crate::error::CliError;
use crate::number;

/// Granule of the simulated unit when none is given (4 KiB).
pub const DEFAULT_GRANULE_SHIFT: u32 = 12;

/// Complete bring-up description.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Profile {
    /// Unit layout.
    #[serde(default)]
    pub iopmp: IopmpConfig,
    /// log2 of the simulated granule in bytes.
    #[serde(default = "Profile::default_granule_shift")]
    pub granule_shift: u32,
    /// Regions programmed in order after the self-test.
    #[serde(default)]
    pub regions: Vec<RegionSpec>,
}

impl Profile {
    const fn default_granule_shift() -> u32 {
        DEFAULT_GRANULE_SHIFT
    }

    /// Reads and validates a profile from `path`.
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path).map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let profile: Self = serde_json::from_str(&text).map_err(|source| CliError::Profile {
            path: path.to_path_buf(),
            source,
        })?;
        profile.iopmp.validate()?;
        Ok(profile)
    }

    /// Converts every region entry, failing on the first malformed one.
    pub fn requests(&self) -> Result<Vec<RegionRequest>, CliError> {
        self.regions.iter().map(RegionSpec::request).collect()
    }
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            iopmp: IopmpConfig::default(),
            granule_shift: DEFAULT_GRANULE_SHIFT,
            regions: Vec::new(),
        }
    }
}

/// One `regions` entry as written in the profile.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RegionSpec {
    /// Target slot.
    pub slot: usize,
    /// Region base address.
    #[serde(default, deserialize_with = "number::de_opt_u64")]
    pub base: Option<u64>,
    /// Region size in bytes.
    #[serde(default, deserialize_with = "number::de_opt_u64")]
    pub range: Option<u64>,
    /// Permission string, `rwx` when absent.
    #[serde(default)]
    pub access: Option<String>,
    /// Open the whole address space instead of a NAPOT region.
    #[serde(default)]
    pub allow_all: bool,
}

impl RegionSpec {
    fn invalid(&self, reason: &'static str) -> CliError {
        CliError::InvalidRegion {
            slot: self.slot,
            reason,
        }
    }

    /// Checks the entry's shape and resolves its permissions.
    pub fn request(&self) -> Result<RegionRequest, CliError> {
        if self.allow_all {
            if self.base.is_some() || self.range.is_some() || self.access.is_some() {
                return Err(self.invalid("allow_all takes no base, range or access"));
            }
            return Ok(RegionRequest::AllowAll { slot: self.slot });
        }

        let (Some(base), Some(range)) = (self.base, self.range) else {
            return Err(self.invalid("needs base and range, or allow_all"));
        };
        let access = match &self.access {
            Some(s) => number::parse_access(s)?,
            None => iopmp_core::common::PMP_RWX,
        };
        Ok(RegionRequest::Napot {
            slot: self.slot,
            base,
            range,
            access,
        })
    }
}

/// Region to program, already validated for shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionRequest {
    /// NAPOT or NA4 region, depending on the granule.
    Napot {
        /// Target slot.
        slot: usize,
        /// Base address.
        base: u64,
        /// Size in bytes.
        range: u64,
        /// Permission bits.
        access: u8,
    },
    /// Whole address space with read, write and execute.
    AllowAll {
        /// Target slot.
        slot: usize,
    },
}

impl RegionRequest {
    /// Programs the request into `unit`.
    pub fn apply<R: RegisterAccess>(
        self,
        unit: &mut Iopmp<R>,
    ) -> iopmp_core::Result<RegionDescriptor> {
        match self {
            Self::Napot {
                slot,
                base,
                range,
                access,
            } => unit.region_from_napot_access(base, range, access, slot),
            Self::AllowAll { slot } => unit.region_allow_all(slot),
        }
    }
}
