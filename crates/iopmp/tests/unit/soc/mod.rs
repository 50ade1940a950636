//! Register backend tests.
