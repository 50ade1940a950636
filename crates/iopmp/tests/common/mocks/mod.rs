//! Register backend mocks.

/// `mockall` mock of `RegisterAccess`.
pub mod access;

/// Plain recording register file.
pub mod registers;
