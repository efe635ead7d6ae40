//! CLI command implementations.

pub mod common;
pub mod estimate;
pub mod qft;
pub mod version;
