//! Query command - resolve a batch once and print the report.

use std::path::PathBuf;
use std::time::Duration;

use elevate::coord::Coordinate;

use super::common::parse_lat_lon;
use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the query command.
pub struct QueryArgs {
    pub config: Option<PathBuf>,
    pub points: Vec<String>,
    pub deadline_ms: Option<u64>,
    pub zoom: Option<u8>,
    pub verbose: bool,
}

/// Run the query command.
///
/// The JSON report is printed to stdout. A report-level error is returned
/// after printing so the process exits non-zero.
pub fn run(args: QueryArgs) -> Result<(), CliError> {
    let coords = args
        .points
        .iter()
        .map(|point| parse_lat_lon(point))
        .collect::<Result<Vec<Coordinate>, CliError>>()?;

    let mut runner = CliRunner::new(args.config.as_deref())?;
    if let Some(ms) = args.deadline_ms {
        runner.config_mut().elevation.deadline = Duration::from_millis(ms.max(1));
    }
    if let Some(zoom) = args.zoom {
        runner.config_mut().elevation.zoom = zoom;
    }

    let level = if args.verbose { "debug" } else { "warn" };
    let _guard = runner.init_quiet_logging(level)?;

    let aggregator = runner.config().build_aggregator()?;
    let runtime = runner.runtime()?;
    let report = runtime.block_on(aggregator.resolve(&coords));

    println!("{}", serde_json::to_string_pretty(&report)?);

    match report.error {
        Some(error) => Err(CliError::QueryFailed(error.to_string())),
        None => Ok(()),
    }
}
