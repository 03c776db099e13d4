use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::errors::ConfigError;

pub const DEFAULT_ENV_FILE: &str = ".env";
pub const DEFAULT_ENV_KEY: &str = "OPENAI_API_KEY";

/// Location of the environment file and the key that receives the token.
#[derive(Debug, Clone)]
pub struct EnvFileSection {
    pub path: PathBuf,
    pub key: String,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawEnvFileSection {
    pub path: Option<PathBuf>,
    pub key: Option<String>,
}

pub fn parse_env_file_section(
    raw: Option<RawEnvFileSection>,
    path: &Path,
) -> Result<EnvFileSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let env_path = raw.path.unwrap_or_else(|| PathBuf::from(DEFAULT_ENV_FILE));
    if env_path.as_os_str().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "env_file.path",
            message: "Specify the path of the environment file".into(),
        });
    }

    let key = raw.key.unwrap_or_else(|| DEFAULT_ENV_KEY.to_string());
    validate_key(&key, path)?;

    Ok(EnvFileSection {
        path: env_path,
        key,
    })
}

fn validate_key(key: &str, path: &Path) -> Result<(), ConfigError> {
    let message = if key.is_empty() {
        "Key must not be empty"
    } else if key.contains('=') {
        "Key must not contain `=`"
    } else if key.chars().any(char::is_whitespace) {
        "Key must not contain whitespace"
    } else {
        return Ok(());
    };

    Err(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: "env_file.key",
        message: message.into(),
    })
}
