//! Serve command - run the elevation HTTP API.

use std::path::PathBuf;
use std::sync::Arc;

use elevate::api;
use elevate::config::ConfigKey;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::CliError;
use crate::runner::CliRunner;

/// Arguments for the serve command.
pub struct ServeArgs {
    pub config: Option<PathBuf>,
    pub address: Option<String>,
}

/// Run the serve command until Ctrl+C.
pub fn run(args: ServeArgs) -> Result<(), CliError> {
    let mut runner = CliRunner::new(args.config.as_deref())?;
    if let Some(address) = args.address {
        ConfigKey::ServerAddress.set(runner.config_mut(), &address)?;
    }

    let _guard = runner.init_logging()?;
    runner.log_startup("serve");

    let config = runner.config();
    let aggregator = Arc::new(config.build_aggregator()?);

    let shutdown = CancellationToken::new();
    let signal = shutdown.clone();
    ctrlc::set_handler(move || {
        info!("Received shutdown signal");
        signal.cancel();
    })?;

    let runtime = runner.runtime()?;
    runtime.block_on(api::serve(&config.server, aggregator, shutdown))?;
    Ok(())
}
