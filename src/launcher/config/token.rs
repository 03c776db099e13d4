use std::path::Path;

use serde::Deserialize;

use crate::lib::{errors::ConfigError, process::CommandSpec};

use super::parse_command;

pub const DEFAULT_TOKEN_COMMAND: &[&str] = &["az", "account", "get-access-token", "--resource"];
pub const DEFAULT_TOKEN_RESOURCE: &str = "https://cognitiveservices.azure.com";
pub const DEFAULT_TOKEN_FIELD: &str = "accessToken";

/// Identity-provider settings used to fetch the access token.
#[derive(Debug, Clone)]
pub struct TokenSection {
    pub command: CommandSpec,
    pub resource: String,
    /// Dotted JSON path of the token in the provider's output.
    pub field: String,
    /// Abort instead of writing an empty value when the token is missing.
    pub require_non_empty: bool,
}

#[derive(Debug, Deserialize, Default)]
pub struct RawTokenSection {
    pub command: Option<Vec<String>>,
    pub resource: Option<String>,
    pub field: Option<String>,
    pub require_non_empty: Option<bool>,
}

pub fn parse_token_section(
    raw: Option<RawTokenSection>,
    path: &Path,
) -> Result<TokenSection, ConfigError> {
    let raw = raw.unwrap_or_default();
    let command = parse_command(raw.command, DEFAULT_TOKEN_COMMAND, path, "token.command")?;
    let resource = raw
        .resource
        .unwrap_or_else(|| DEFAULT_TOKEN_RESOURCE.to_string());
    if resource.trim().is_empty() {
        return Err(ConfigError::InvalidField {
            path: path.to_path_buf(),
            field: "token.resource",
            message: "Specify the resource URI the token is scoped to".into(),
        });
    }

    let field = raw
        .field
        .unwrap_or_else(|| DEFAULT_TOKEN_FIELD.to_string());
    validate_field_path(&field, path)?;

    Ok(TokenSection {
        command,
        resource,
        field,
        require_non_empty: raw.require_non_empty.unwrap_or(false),
    })
}

fn validate_field_path(field: &str, path: &Path) -> Result<(), ConfigError> {
    let trimmed = field.strip_prefix('.').unwrap_or(field);
    if !trimmed.is_empty() && trimmed.split('.').all(|segment| !segment.is_empty()) {
        return Ok(());
    }

    Err(ConfigError::InvalidField {
        path: path.to_path_buf(),
        field: "token.field",
        message: "Use a dotted path such as `accessToken` or `.credentials.token`".into(),
    })
}
