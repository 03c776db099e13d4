use std::{io, path::PathBuf};

use config::ConfigError as ConfigLoaderError;
use thiserror::Error;

/// Errors that can occur while loading or validating the launcher configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to build (read) the configuration file.
    #[error("Failed to read configuration file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Failed to deserialize TOML into a struct.
    #[error("Failed to parse configuration file {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: ConfigLoaderError,
    },
    /// Field failed validation.
    #[error("Configuration file {path} has invalid `{field}`: {message}")]
    InvalidField {
        path: PathBuf,
        field: &'static str,
        message: String,
    },
}

impl ConfigError {
    /// Helper to wrap `config::ConfigError` as a read failure.
    pub fn from_read_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::FileRead { path, source }
    }

    /// Helper to wrap `config::ConfigError` as a parse failure.
    pub fn from_parse_error(path: PathBuf, source: ConfigLoaderError) -> Self {
        Self::Parse { path, source }
    }
}

/// Exit code a POSIX shell reports when a command cannot be found.
pub const EXIT_COMMAND_NOT_FOUND: i32 = 127;
/// Exit code a POSIX shell reports when a command exists but cannot run.
pub const EXIT_COMMAND_NOT_EXECUTABLE: i32 = 126;

/// Failures raised by individual launcher steps.
#[derive(Debug, Error)]
pub enum StepError {
    #[error("Failed to start `{program}`: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },
    #[error("Failed to read environment file {path}: {source}")]
    EnvFileRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Failed to write environment file {path}: {source}")]
    EnvFileWrite {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("Token provider returned no value for `{field}`")]
    EmptyToken { field: String },
    #[error("Failed to wait for keypress: {source}")]
    Pause {
        #[source]
        source: io::Error,
    },
}

impl StepError {
    /// Exit code a shell would report for this failure when it ends the run.
    pub fn shell_exit_code(&self) -> i32 {
        match self {
            StepError::Spawn { source, .. } if source.kind() == io::ErrorKind::NotFound => {
                EXIT_COMMAND_NOT_FOUND
            }
            StepError::Spawn { .. } => EXIT_COMMAND_NOT_EXECUTABLE,
            _ => 1,
        }
    }
}
