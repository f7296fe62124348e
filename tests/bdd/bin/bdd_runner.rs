//! Scenario runner CLI.
//!
//! Runs Gherkin feature files against the auth API test double.
//!
//! Usage:
//!   cargo run --bin bdd-runner              # the auth suite
//!   cargo run --bin bdd-runner -- file path/to/some.feature
//!   cargo run --bin bdd-runner -- features  # every file in features/

#[path = "../steps/mod.rs"]
mod steps;

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use gauntlet_runner::{RunOutcome, RunnerError, ScenarioRun};
use steps::world::AuthWorld;

#[derive(Parser)]
#[command(author, version, about = "Run Gherkin scenario files against the auth API test double")]
struct Cli {
    /// Directory to write Cucumber-JSON reports into
    #[arg(long)]
    report_dir: Option<PathBuf>,

    /// Skip the Cucumber-JSON report artifact
    #[arg(long)]
    no_report: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the auth feature (the default)
    Auth,

    /// Run a specific feature file
    File {
        /// Path to the feature file
        path: PathBuf,
    },

    /// Run every feature file in a directory
    Features {
        /// Directory to scan; defaults to this crate's features/
        dir: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Initialize logging
    std::env::set_var("RUST_LOG", "info,cucumber=warn");
    env_logger::init();

    let cli = Cli::parse();
    let manifest_dir = Path::new(env!("CARGO_MANIFEST_DIR"));

    let result = match cli.command.as_ref() {
        None | Some(Commands::Auth) => {
            run_one(manifest_dir.join("features/auth.feature"), &cli).await
        }
        Some(Commands::File { path }) => run_one(path.clone(), &cli).await,
        Some(Commands::Features { dir }) => {
            let dir = dir
                .clone()
                .unwrap_or_else(|| manifest_dir.join("features"));
            run_all(dir, &cli).await
        }
    };

    match result {
        Ok(failed) if failed => std::process::exit(1),
        Ok(_) => {}
        Err(err) => {
            eprintln!("scenario run failed to start: {err}");
            std::process::exit(1);
        }
    }
}

/// Run a single resource; returns whether anything failed.
async fn run_one(resource: PathBuf, cli: &Cli) -> Result<bool, RunnerError> {
    let outcome = configure(ScenarioRun::from_resource(resource), cli)
        .execute::<AuthWorld>()
        .await?;
    announce(&outcome);
    Ok(outcome.has_failures())
}

/// Run every feature file in a directory, in name order.
async fn run_all(dir: PathBuf, cli: &Cli) -> Result<bool, RunnerError> {
    let entries = std::fs::read_dir(&dir)
        .map_err(|_| RunnerError::ResourceNotFound(dir.clone()))?;

    let mut feature_files: Vec<PathBuf> = entries
        .filter_map(|entry| {
            let path = entry.ok()?.path();
            (path.is_file() && path.extension()? == "feature").then_some(path)
        })
        .collect();
    feature_files.sort();

    if feature_files.is_empty() {
        eprintln!("No feature files found in {}", dir.display());
        return Ok(false);
    }

    let mut failed = false;
    for feature_file in feature_files {
        println!("--- Running feature file: {} ---", feature_file.display());
        failed |= run_one(feature_file, cli).await?;
    }
    Ok(failed)
}

fn configure(run: ScenarioRun, cli: &Cli) -> ScenarioRun {
    let mut run = run
        .output_cucumber_json(!cli.no_report)
        .max_concurrent_scenarios(1);
    if let Some(dir) = &cli.report_dir {
        run = run.report_dir(dir.clone());
    }
    run
}

fn announce(outcome: &RunOutcome) {
    if let Some(report) = &outcome.report {
        println!("Cucumber-JSON report: {}", report.display());
    }
}
