//! Access token acquisition from the identity-provider CLI.

use std::fmt;

use serde_json::Value;
use tracing::{info, warn};

use crate::{
    launcher::config::TokenSection,
    lib::{
        errors::StepError,
        process::{CommandSpec, ProcessRunner},
    },
};

/// Opaque bearer credential. Consumed by the env-file patch; `Debug` never prints it.
#[derive(Clone, PartialEq, Eq, Default)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccessToken(<redacted>, len={})", self.0.len())
    }
}

pub fn token_command(section: &TokenSection) -> CommandSpec {
    section.command.clone().arg(&section.resource)
}

/// Extract a dotted field (`accessToken`, `.a.b`, `items.0.token`) from JSON output.
///
/// Strings are returned raw and other values as compact JSON, like `jq -r`.
/// Missing fields, `null` and unparsable output yield `None`.
pub fn extract_field(output: &[u8], field: &str) -> Option<String> {
    let document: Value = serde_json::from_slice(output).ok()?;
    let path = field.strip_prefix('.').unwrap_or(field);

    let mut current = &document;
    for segment in path.split('.') {
        current = match current {
            Value::Object(map) => map.get(segment)?,
            Value::Array(items) => items.get(segment.parse::<usize>().ok()?)?,
            _ => return None,
        };
    }

    match current {
        Value::Null => None,
        Value::String(text) => Some(text.trim_end_matches('\n').to_string()),
        other => Some(other.to_string()),
    }
}

/// Fetch the token. Every provider failure degrades to an empty token unless
/// `require_non_empty` is set, in which case an empty result is an error.
pub async fn acquire_token<R: ProcessRunner>(
    runner: &R,
    section: &TokenSection,
) -> Result<AccessToken, StepError> {
    let command = token_command(section);
    info!(
        target: "token_launcher::token",
        program = %command.program(),
        resource = %section.resource,
        "Requesting access token"
    );

    let token = match runner.capture(&command).await {
        Ok(output) => {
            if output.exit_code != 0 {
                warn!(
                    target: "token_launcher::token",
                    exit_code = output.exit_code,
                    "Token provider exited with a non-zero status"
                );
            }
            extract_field(&output.stdout, &section.field)
                .map(AccessToken::new)
                .unwrap_or_default()
        }
        Err(source) => {
            let err = StepError::Spawn {
                program: command.program().to_string(),
                source,
            };
            warn!(
                target: "token_launcher::token",
                reason = %err,
                "Token provider could not be run"
            );
            AccessToken::default()
        }
    };

    if token.is_empty() {
        if section.require_non_empty {
            return Err(StepError::EmptyToken {
                field: section.field.clone(),
            });
        }
        warn!(
            target: "token_launcher::token",
            field = %section.field,
            "Token provider returned no value; the key will be written empty"
        );
    }

    Ok(token)
}
