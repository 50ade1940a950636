//! Shared test infrastructure.

/// Driver construction helpers and tracing setup.
pub mod harness;

/// Register backend mocks.
pub mod mocks;
