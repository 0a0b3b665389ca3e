//! Test utilities for Skillshare crates.
//!
//! Provides `MockAuth` for signing bearer headers in router tests.
//! Import in `#[cfg(test)]` blocks and `tests/` only; never in production code.

pub mod auth;
