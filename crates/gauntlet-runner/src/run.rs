use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use cucumber::{writer, World, WriterExt as _};

use crate::{RunOutcome, RunnerError};

/// Extension of Cucumber-JSON report artifacts.
const REPORT_SUFFIX: &str = ".cucumber.json";

/// A run request against the scenario engine.
///
/// Mirrors the shape of the invocation it wraps: name a resource, resolve it
/// relative to the calling test unit, optionally request a machine-readable
/// report, execute. The engine owns everything past that point.
#[derive(Debug, Clone)]
pub struct ScenarioRun {
    resource: PathBuf,
    base: Option<PathBuf>,
    cucumber_json: bool,
    report_dir: Option<PathBuf>,
    max_concurrent_scenarios: Option<usize>,
}

impl ScenarioRun {
    /// Start a run request for the given scenario-definition resource.
    ///
    /// The resource may be a single `.feature` file or a directory of them.
    pub fn from_resource(resource: impl Into<PathBuf>) -> Self {
        Self {
            resource: resource.into(),
            base: None,
            cucumber_json: false,
            report_dir: None,
            max_concurrent_scenarios: None,
        }
    }

    /// Resolve the resource against the given directory instead of the
    /// process working directory.
    ///
    /// Test units pass their own `env!("CARGO_MANIFEST_DIR")` so the resource
    /// is found no matter where the harness was started from. An absolute
    /// resource path ignores the base.
    pub fn relative_to(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = Some(base.into());
        self
    }

    /// Request a Cucumber-JSON report artifact in addition to the terminal
    /// output.
    ///
    /// The artifact lands in the report directory under the resource's file
    /// stem, e.g. `reports/auth.cucumber.json`.
    pub fn output_cucumber_json(mut self, enabled: bool) -> Self {
        self.cucumber_json = enabled;
        self
    }

    /// Override the report directory. Defaults to `reports/` under the base
    /// directory.
    pub fn report_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.report_dir = Some(dir.into());
        self
    }

    /// Cap the number of scenarios the engine executes concurrently.
    pub fn max_concurrent_scenarios(mut self, limit: impl Into<Option<usize>>) -> Self {
        self.max_concurrent_scenarios = limit.into();
        self
    }

    /// Execute the run and hand back the engine's summary untouched.
    ///
    /// Scenario failures are not an `Err`: they surface through
    /// [`RunOutcome::has_failures`]. The only local errors are a resource
    /// that cannot be located and report I/O.
    pub async fn execute<W>(self) -> Result<RunOutcome, RunnerError>
    where
        W: World + Debug + cucumber::codegen::WorldInventory,
    {
        let features = self.resolved_resource()?;

        if !self.cucumber_json {
            tracing::debug!(resource = %features.display(), "executing scenario run");
            let writer = W::cucumber()
                .max_concurrent_scenarios(self.max_concurrent_scenarios)
                .run(features)
                .await;
            return Ok(RunOutcome::from_stats(&writer, None));
        }

        let report_path = self.report_path();
        if let Some(dir) = report_path.parent() {
            fs::create_dir_all(dir).map_err(|source| RunnerError::Report {
                path: report_path.clone(),
                source,
            })?;
        }
        let report_file = fs::File::create(&report_path).map_err(|source| RunnerError::Report {
            path: report_path.clone(),
            source,
        })?;

        tracing::debug!(
            resource = %features.display(),
            report = %report_path.display(),
            "executing scenario run",
        );

        let writer = W::cucumber()
            .max_concurrent_scenarios(self.max_concurrent_scenarios)
            .with_writer(
                // Writer pipeline is constructed in reverse: normalize event
                // order first, then fan out to the JSON artifact and the
                // summarized terminal output.
                writer::Basic::stdout()
                    .summarized()
                    .tee::<W, _>(writer::Json::for_tee(report_file))
                    .normalized(),
            )
            .run(features)
            .await;

        Ok(RunOutcome::from_stats(&writer, Some(report_path)))
    }

    /// The resource path the engine will be handed, verified to exist.
    fn resolved_resource(&self) -> Result<PathBuf, RunnerError> {
        let path = match &self.base {
            Some(base) if self.resource.is_relative() => base.join(&self.resource),
            _ => self.resource.clone(),
        };
        if path.exists() {
            Ok(path)
        } else {
            Err(RunnerError::ResourceNotFound(path))
        }
    }

    fn report_path(&self) -> PathBuf {
        let stem = self
            .resource
            .file_stem()
            .map(|s| s.to_os_string())
            .unwrap_or_else(|| "scenarios".into());
        let mut file_name = stem;
        file_name.push(REPORT_SUFFIX);

        let dir = self.report_dir.clone().unwrap_or_else(|| {
            self.base
                .as_deref()
                .unwrap_or_else(|| Path::new("."))
                .join("reports")
        });
        dir.join(file_name)
    }
}
