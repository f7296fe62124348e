//! Testing utilities for the Gauntlet harness.
//!
//! This crate provides everything the scenario suite needs around the engine:
//! the in-memory auth API test double the scenarios run against, environment
//! configuration, test-data generators, a router-level test client, and small
//! shared helpers.

pub mod builders;
pub mod client;
pub mod config;
pub mod data_generators;
pub mod error;
pub mod store;
pub mod util;

pub use client::TestClient;
pub use config::{TestConfig, TestEnv};
pub use error::TestError;
pub use store::UserStore;
