//! LaunchProfile and config path resolution.
use std::{
    env,
    ffi::OsString,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};

use crate::launcher::config::{CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

/// Where the config path came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigSource {
    Env,
    Default,
}

impl ConfigSource {
    pub const fn as_str(&self) -> &'static str {
        match self {
            ConfigSource::Env => "env",
            ConfigSource::Default => "default",
        }
    }
}

/// Resolved launch profile.
#[derive(Debug, Clone)]
pub struct LaunchProfile {
    pub config_path: PathBuf,
    pub config_source: ConfigSource,
    pub app_args: Vec<OsString>,
}

/// Resolve config path in the order: env var → default, relative to the working directory.
pub fn resolve_config_path() -> Result<(PathBuf, ConfigSource)> {
    let cwd = env::current_dir().context("failed to obtain current directory")?;
    Ok(resolve_config_path_from(env::var_os(CONFIG_ENV_KEY), &cwd))
}

fn resolve_config_path_from(env_value: Option<OsString>, cwd: &Path) -> (PathBuf, ConfigSource) {
    let (path, source) = match env_value {
        Some(value) if !value.to_string_lossy().trim().is_empty() => {
            (PathBuf::from(value), ConfigSource::Env)
        }
        _ => (PathBuf::from(DEFAULT_CONFIG_PATH), ConfigSource::Default),
    };

    if path.is_absolute() {
        (path, source)
    } else {
        (cwd.join(path), source)
    }
}
