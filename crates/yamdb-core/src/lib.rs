//! Ambient plumbing shared by YAMDB binaries: configuration loading and tracing setup.

pub mod config;
pub mod tracing;
