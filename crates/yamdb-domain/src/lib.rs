//! Domain types shared across all YAMDB services.
//!
//! This crate contains only pure types with no framework dependencies.

pub mod clock;
pub mod pagination;
pub mod user;
pub mod validate;
