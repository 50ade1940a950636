//! Errors surfaced by the `iopmp` front end.

use std::io;
use std::path::PathBuf;

use iopmp_core::IopmpError;
use thiserror::Error;

/// Anything that stops a command before it reports.
#[derive(Debug, Error)]
pub enum CliError {
    /// Profile file could not be read.
    #[error("failed to read {}: {source}", .path.display())]
    Io {
        /// File that failed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// Profile file is not valid JSON or has the wrong shape.
    #[error("invalid profile {}: {source}", .path.display())]
    Profile {
        /// File that failed.
        path: PathBuf,
        /// Underlying parse error.
        #[source]
        source: serde_json::Error,
    },

    /// Number was neither decimal nor `0x` hex.
    #[error("invalid number '{0}' (expected decimal or 0x-prefixed hex)")]
    InvalidNumber(String),

    /// Permission string contained something other than `r`, `w` and `x`.
    #[error("invalid access '{0}' (expected a combination of r, w, x or '-')")]
    InvalidAccess(String),

    /// Profile region has neither `allow_all` nor a `base`/`range` pair.
    #[error("region for slot {slot}: {reason}")]
    InvalidRegion {
        /// Slot the region targets.
        slot: usize,
        /// What is missing.
        reason: &'static str,
    },

    /// Registers did not read back as expected, so no region was programmed.
    #[error("IO-PMP self-test failed; refusing to program regions")]
    SelfTestFailed,

    /// The driver refused a request.
    #[error(transparent)]
    Iopmp(#[from] IopmpError),
}
