//! Auth types shared across Skillshare crates.
//!
//! Provides JWT claims and validation, the bearer-token `Identity` extractor,
//! and the OAuth state cookie builders.

pub mod cookie;
pub mod identity;
pub mod token;
