use std::path::PathBuf;

use thiserror::Error;

/// Local failures of the run-invocation layer.
///
/// Scenario failures are not errors at this level; they come back through
/// [`RunOutcome`](crate::RunOutcome) exactly as the engine reported them.
#[derive(Debug, Error)]
pub enum RunnerError {
    /// The scenario resource could not be located at its resolved path.
    #[error("scenario resource not found: {}", .0.display())]
    ResourceNotFound(PathBuf),

    /// The report artifact could not be created or its directory prepared.
    #[error("failed to prepare report artifact at {}: {source}", .path.display())]
    Report {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
