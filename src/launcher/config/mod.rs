//! Load and validate launcher configuration.
use std::path::{Path, PathBuf};

use config::FileFormat;
use serde::Deserialize;
use tracing::error;

use crate::{
    cli::{ConfigSource, LaunchProfile},
    lib::{errors::ConfigError, process::CommandSpec},
};

pub mod app;
pub mod dependencies;
pub mod env_file;
pub mod telemetry;
pub mod token;

pub use app::{
    parse_app_section, AppSection, RawAppSection, DEFAULT_APP_COMMAND, DEFAULT_PAUSE_ON_EXIT,
};
pub use dependencies::{
    parse_dependencies_section, DependenciesSection, RawDependenciesSection, DEFAULT_CHECKER,
    DEFAULT_INSTALLER, DEFAULT_MANIFEST,
};
pub use env_file::{
    parse_env_file_section, EnvFileSection, RawEnvFileSection, DEFAULT_ENV_FILE, DEFAULT_ENV_KEY,
};
pub use token::{
    parse_token_section, RawTokenSection, TokenSection, DEFAULT_TOKEN_COMMAND,
    DEFAULT_TOKEN_FIELD, DEFAULT_TOKEN_RESOURCE,
};

pub const CONFIG_ENV_KEY: &str = "LAUNCHER_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "launcher.toml";

/// Top-level configuration container.
#[derive(Debug, Clone)]
pub struct LauncherConfig {
    pub dependencies: DependenciesSection,
    pub token: TokenSection,
    pub env_file: EnvFileSection,
    pub app: AppSection,
    pub source_path: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawLauncherConfig {
    dependencies: Option<RawDependenciesSection>,
    token: Option<RawTokenSection>,
    env_file: Option<RawEnvFileSection>,
    app: Option<RawAppSection>,
}

impl LauncherConfig {
    /// Load the configuration selected by the launch profile.
    ///
    /// A path given through `LAUNCHER_CONFIG_PATH` must exist; the default
    /// `launcher.toml` is optional and falls back to built-in defaults.
    pub fn load_for_profile(profile: &LaunchProfile) -> Result<Self, ConfigError> {
        let from_env = profile.config_source == ConfigSource::Env;
        telemetry::log_source(&profile.config_path, from_env, profile.config_path.exists());
        Self::load_from_path(profile.config_path.clone(), from_env)
    }

    /// Load configuration from a specific path.
    pub fn load_from_path(path: PathBuf, required: bool) -> Result<Self, ConfigError> {
        let source = config::File::from(path.clone())
            .format(FileFormat::Toml)
            .required(required);
        let document = config::Config::builder()
            .add_source(source)
            .build()
            .map_err(|err| {
                let error = ConfigError::from_read_error(path.clone(), err);
                error!(
                    target: "token_launcher::config",
                    path = %path.display(),
                    reason = %error,
                    "Failed to read configuration file"
                );
                error
            })?;

        let raw: RawLauncherConfig = document.try_deserialize().map_err(|err| {
            let error = ConfigError::from_parse_error(path.clone(), err);
            error!(
                target: "token_launcher::config",
                path = %path.display(),
                reason = %error,
                "Failed to parse configuration file"
            );
            error
        })?;

        let config = Self::from_raw(raw, path.clone()).map_err(|err| {
            error!(
                target: "token_launcher::config",
                path = %path.display(),
                reason = %err,
                "Failed to validate configuration file"
            );
            err
        })?;

        telemetry::log_loaded(&config);
        Ok(config)
    }

    /// Built-in defaults, identical to loading an empty file.
    pub fn defaults(source_path: PathBuf) -> Result<Self, ConfigError> {
        Self::from_raw(RawLauncherConfig::default(), source_path)
    }

    fn from_raw(raw: RawLauncherConfig, path: PathBuf) -> Result<Self, ConfigError> {
        let dependencies = parse_dependencies_section(raw.dependencies, &path)?;
        let token = parse_token_section(raw.token, &path)?;
        let env_file = parse_env_file_section(raw.env_file, &path)?;
        let app = parse_app_section(raw.app, &path)?;

        Ok(Self {
            dependencies,
            token,
            env_file,
            app,
            source_path: path,
        })
    }
}

/// Validate an argv-style command, falling back to `default` when absent.
pub(crate) fn parse_command(
    raw: Option<Vec<String>>,
    default: &[&str],
    path: &Path,
    field: &'static str,
) -> Result<CommandSpec, ConfigError> {
    let argv = raw.unwrap_or_else(|| default.iter().map(|part| part.to_string()).collect());
    CommandSpec::from_argv(&argv)
        .filter(|command| !command.program().trim().is_empty())
        .ok_or_else(|| ConfigError::InvalidField {
            path: path.to_path_buf(),
            field,
            message: "Command must start with a non-empty program name".into(),
        })
}
