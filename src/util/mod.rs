// ScopeTrace - util/mod.rs
//
// Shared utilities: error hierarchy, named constants, logging setup.

pub mod constants;
pub mod error;
pub mod logging;
