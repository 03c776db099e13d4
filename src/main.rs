//! Entry point for token-launcher.
use std::process::ExitCode;

use token_launcher::{
    cli::LauncherArgs,
    launcher::{
        config::{LauncherConfig, DEFAULT_PAUSE_ON_EXIT},
        runtime::{self, RuntimeExit},
    },
    lib::telemetry,
};

#[tokio::main]
async fn main() -> ExitCode {
    match bootstrap().await {
        Ok(code) => code,
        Err(exit) => exit.report().await,
    }
}

async fn bootstrap() -> Result<ExitCode, RuntimeExit> {
    telemetry::init_tracing().map_err(RuntimeExit::from_error)?;
    let profile = LauncherArgs::parse_forwarding_env()
        .build()
        .map_err(RuntimeExit::from_error)?;
    let config = LauncherConfig::load_for_profile(&profile)
        .map_err(|err| RuntimeExit::from_error(err).pausing(DEFAULT_PAUSE_ON_EXIT))?;
    runtime::run_launcher(profile, config).await
}
