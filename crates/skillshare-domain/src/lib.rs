//! Domain types shared across the Skillshare crates.
//!
//! This crate contains only pure types with no framework dependencies.
//! Import in `usecase/` and `domain/` layers; never in `infra/` or `handlers/`.

pub mod id;
pub mod notification;
pub mod pagination;
pub mod user;
