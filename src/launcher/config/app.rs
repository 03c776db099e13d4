use std::path::Path;

use serde::Deserialize;

use crate::lib::{errors::ConfigError, process::CommandSpec};

use super::parse_command;

pub const DEFAULT_APP_COMMAND: &[&str] = &["python", "-m", "autogpt"];
pub const DEFAULT_PAUSE_ON_EXIT: bool = true;

/// Target application settings.
#[derive(Debug, Clone)]
pub struct AppSection {
    pub command: CommandSpec,
    pub pause_on_exit: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawAppSection {
    pub command: Option<Vec<String>>,
    pub pause_on_exit: Option<bool>,
}

pub fn parse_app_section(raw: Option<RawAppSection>, path: &Path) -> Result<AppSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let command = parse_command(raw.command, DEFAULT_APP_COMMAND, path, "app.command")?;
    Ok(AppSection {
        command,
        pause_on_exit: raw.pause_on_exit.unwrap_or(DEFAULT_PAUSE_ON_EXIT),
    })
}
