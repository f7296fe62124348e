//! Environment setup builders for the scenario suite.
//!
//! This module provides builder patterns for setting up test environments,
//! such as the in-memory auth API server the scenarios run against.

mod test_server;

// Re-export all builders for easy access
pub use test_server::*;
