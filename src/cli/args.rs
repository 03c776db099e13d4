//! CLI argument definitions and `LaunchProfile` construction.
use std::ffi::OsString;

use anyhow::Result;
use clap::Parser;

use super::{resolve_config_path, LaunchProfile};

/// Command-line arguments.
///
/// The launcher has no flags of its own: everything after the program name is
/// handed to the application untouched, `--help` and `--` included.
#[derive(Debug, Clone, Parser)]
#[command(
    author,
    about = "Refresh the API token in .env and start the application",
    long_about = None,
    disable_help_flag = true,
    disable_version_flag = true
)]
pub struct LauncherArgs {
    /// Arguments forwarded verbatim to the application.
    #[arg(trailing_var_arg = true, allow_hyphen_values = true, value_name = "APP_ARGS")]
    pub app_args: Vec<OsString>,
}

impl LauncherArgs {
    /// Parse the process arguments.
    pub fn parse_forwarding_env() -> Self {
        Self::parse_forwarding(std::env::args_os())
    }

    /// Parse `argv` so that every token after the program name becomes an application argument.
    ///
    /// A synthetic `--` is inserted after the program name; past that marker clap
    /// treats every token (a caller-supplied `--` too) as a raw value.
    pub fn parse_forwarding<I, T>(argv: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString>,
    {
        let mut argv = argv.into_iter().map(Into::into);
        let program = argv
            .next()
            .unwrap_or_else(|| OsString::from(env!("CARGO_PKG_NAME")));
        let forwarded = std::iter::once(program)
            .chain(std::iter::once(OsString::from("--")))
            .chain(argv);
        Self::parse_from(forwarded)
    }

    /// Build a `LaunchProfile` from CLI args and environment variables.
    pub fn build(self) -> Result<LaunchProfile> {
        let (config_path, config_source) = resolve_config_path()?;
        Ok(LaunchProfile {
            config_path,
            config_source,
            app_args: self.app_args,
        })
    }
}
