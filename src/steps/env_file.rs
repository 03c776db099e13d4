//! In-place rewrite of the token key in the environment file.

use std::fs;

use tracing::{info, warn};

use crate::{
    launcher::config::EnvFileSection,
    lib::{envfile, errors::StepError},
};

use super::token::AccessToken;

/// Write `token` into every `KEY=` line of the environment file.
///
/// Takes the token by value so it is dropped once written. Returns the number
/// of lines replaced; a file without the key is left untouched.
pub fn patch_env_file(section: &EnvFileSection, token: AccessToken) -> Result<usize, StepError> {
    let path = &section.path;
    let contents = fs::read(path).map_err(|source| StepError::EnvFileRead {
        path: path.clone(),
        source,
    })?;

    let substitution = envfile::replace_key_lines(&contents, &section.key, token.expose());
    drop(token);

    if substitution.replaced_lines == 0 {
        return Ok(0);
    }

    envfile::write_in_place(path, &substitution.contents).map_err(|source| {
        StepError::EnvFileWrite {
            path: path.clone(),
            source,
        }
    })?;
    Ok(substitution.replaced_lines)
}

/// Patch the environment file, logging and tolerating failures.
pub fn refresh_env_file(section: &EnvFileSection, token: AccessToken) {
    match patch_env_file(section, token) {
        Ok(0) => warn!(
            target: "token_launcher::env_file",
            path = %section.path.display(),
            key = %section.key,
            "Environment file has no line for the key; left unchanged"
        ),
        Ok(replaced_lines) => info!(
            target: "token_launcher::env_file",
            path = %section.path.display(),
            key = %section.key,
            replaced_lines = replaced_lines,
            "Environment file updated"
        ),
        Err(err) => warn!(
            target: "token_launcher::env_file",
            reason = %err,
            "Failed to update environment file; continuing"
        ),
    }
}
