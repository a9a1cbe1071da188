//! CLI command implementations for Gatehouse.

pub mod keys;
pub mod token;
