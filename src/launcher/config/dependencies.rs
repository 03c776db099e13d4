use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::lib::{errors::ConfigError, process::CommandSpec};

use super::parse_command;

pub const DEFAULT_CHECKER: &[&str] = &["python", "scripts/check_requirements.py"];
pub const DEFAULT_INSTALLER: &[&str] = &["pip", "install", "-r"];
pub const DEFAULT_MANIFEST: &str = "requirements.txt";

/// Dependency check settings. The manifest is appended to both commands.
#[derive(Debug, Clone)]
pub struct DependenciesSection {
    pub checker: CommandSpec,
    pub installer: CommandSpec,
    pub manifest: PathBuf,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawDependenciesSection {
    pub checker: Option<Vec<String>>,
    pub installer: Option<Vec<String>>,
    pub manifest: Option<PathBuf>,
}

pub fn parse_dependencies_section(
    raw: Option<RawDependenciesSection>,
    path: &Path,
) -> Result<DependenciesSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let checker = parse_command(
        raw.checker,
        DEFAULT_CHECKER,
        path,
        "dependencies.checker",
    )?;
    let installer = parse_command(
        raw.installer,
        DEFAULT_INSTALLER,
        path,
        "dependencies.installer",
    )?;
    let manifest = raw
        .manifest
        .unwrap_or_else(|| PathBuf::from(DEFAULT_MANIFEST));
    if manifest.as_os_str().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "dependencies.manifest",
            message: "Specify the path of the requirements manifest".into(),
        });
    }

    Ok(DependenciesSection {
        checker,
        installer,
        manifest,
    })
}
