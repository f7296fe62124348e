//! Invocation layer for Gherkin scenario runs.
//!
//! This crate does not parse, match or assert anything itself: it hands a
//! scenario-definition resource to the [`cucumber`] engine and passes the
//! engine's verdict back to the caller. What it owns is the run request:
//! resolving the resource relative to the invoking test unit, asking the
//! engine for a Cucumber-JSON report artifact, and surfacing a resource that
//! cannot be located before the engine is ever started.
//!
//! ```no_run
//! # use cucumber::World;
//! # #[derive(Debug, Default, World)]
//! # struct MyWorld;
//! # async fn doc() -> Result<(), gauntlet_runner::RunnerError> {
//! use gauntlet_runner::ScenarioRun;
//!
//! let outcome = ScenarioRun::from_resource("features/auth.feature")
//!     .relative_to(env!("CARGO_MANIFEST_DIR"))
//!     .output_cucumber_json(true)
//!     .execute::<MyWorld>()
//!     .await?;
//! assert!(!outcome.has_failures());
//! # Ok(())
//! # }
//! ```

mod error;
mod outcome;
mod run;

pub use error::RunnerError;
pub use outcome::RunOutcome;
pub use run::ScenarioRun;

// The engine is part of this crate's public API: callers hand `execute` a
// `cucumber::World` type.
pub use cucumber;
