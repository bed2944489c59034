//! Main entry point for the wgtpack CLI application.
//!
//! Packs `dist/` and `config.xml` into `app.wgt`, all relative to the
//! project root. Exits 0 on success and 1 on any failure.

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;
use clap::error::ErrorKind;
use tracing::debug;

use wgtpack::{Cli, PackageSummary, package};

mod logs;

/// Application entry point.
///
/// Parses command-line arguments, initialises logging and runs the
/// packager, mapping the outcome to the process exit status.
fn main() -> ExitCode {
    // Argument errors (including a bad SOURCE_DATE_EPOCH) are failures like
    // any other, so they exit 1 rather than clap's usual 2.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => return parse_failure(&e),
    };
    logs::init(&cli);
    debug!(?cli, "got arguments");

    match run(&cli) {
        Ok(summary) => {
            if !cli.is_quiet() {
                // Show the output relative to the project root when possible
                let shown = summary
                    .output
                    .strip_prefix(&cli.root)
                    .unwrap_or(summary.output.as_path());
                println!("Created {} with {} entries", shown.display(), summary.entries);
            }
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Packaging failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

/// Report an argument parsing outcome.
///
/// # Arguments
///
/// * `error` - The error returned by clap
///
/// # Returns
///
/// Success for `--help` and `--version`, failure for everything else.
fn parse_failure(error: &clap::Error) -> ExitCode {
    let _ = error.print();
    match error.kind() {
        ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
        _ => ExitCode::FAILURE,
    }
}

/// Resolve the configuration and package the project.
///
/// # Arguments
///
/// * `cli` - Parsed command-line arguments
///
/// # Returns
///
/// The summary of the written archive, or the first error encountered.
fn run(cli: &Cli) -> Result<PackageSummary> {
    let config = cli.package_config()?;
    package(&config)
}
