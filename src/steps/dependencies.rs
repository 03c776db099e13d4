//! Dependency check against the requirements manifest and conditional install.

use tracing::{info, warn};

use crate::{
    launcher::config::DependenciesSection,
    lib::{
        errors::StepError,
        process::{CommandSpec, ProcessRunner},
    },
};

/// Checker exit code meaning "packages are missing".
pub const MISSING_PACKAGES_EXIT_CODE: i32 = 1;

/// Interpretation of the checker's exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DependencyStatus {
    Satisfied,
    Missing,
    /// Any other exit code; not acted upon.
    Inconclusive(i32),
}

impl DependencyStatus {
    pub fn from_exit_code(code: i32) -> Self {
        match code {
            0 => DependencyStatus::Satisfied,
            MISSING_PACKAGES_EXIT_CODE => DependencyStatus::Missing,
            other => DependencyStatus::Inconclusive(other),
        }
    }
}

/// What the dependency step did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DependencyOutcome {
    pub status: DependencyStatus,
    /// Installer exit code, when the installer ran.
    pub installer_exit_code: Option<i32>,
}

pub fn checker_command(section: &DependenciesSection) -> CommandSpec {
    section.checker.clone().arg(&section.manifest)
}

pub fn installer_command(section: &DependenciesSection) -> CommandSpec {
    section.installer.clone().arg(&section.manifest)
}

/// Run the checker with the manifest path as its last argument.
pub async fn check_dependencies<R: ProcessRunner>(
    runner: &R,
    section: &DependenciesSection,
) -> Result<DependencyStatus, StepError> {
    let command = checker_command(section);
    info!(
        target: "token_launcher::dependencies",
        command = %command.display(),
        "Checking dependencies"
    );
    let code = runner
        .run(&command)
        .await
        .map_err(|source| StepError::Spawn {
            program: command.program().to_string(),
            source,
        })?;
    Ok(DependencyStatus::from_exit_code(code))
}

/// Run the installer against the manifest and return its exit code.
pub async fn install_dependencies<R: ProcessRunner>(
    runner: &R,
    section: &DependenciesSection,
) -> Result<i32, StepError> {
    let command = installer_command(section);
    info!(
        target: "token_launcher::dependencies",
        command = %command.display(),
        "Installing missing packages"
    );
    runner
        .run(&command)
        .await
        .map_err(|source| StepError::Spawn {
            program: command.program().to_string(),
            source,
        })
}

/// Check the manifest and install it when the checker reports missing packages.
///
/// Failures are logged and tolerated; the launcher always proceeds.
pub async fn ensure_dependencies<R: ProcessRunner>(
    runner: &R,
    section: &DependenciesSection,
) -> DependencyOutcome {
    let status = match check_dependencies(runner, section).await {
        Ok(status) => status,
        Err(err) => {
            warn!(
                target: "token_launcher::dependencies",
                reason = %err,
                "Dependency checker could not be run; continuing"
            );
            DependencyStatus::Inconclusive(err.shell_exit_code())
        }
    };

    if status != DependencyStatus::Missing {
        if let DependencyStatus::Inconclusive(code) = status {
            warn!(
                target: "token_launcher::dependencies",
                exit_code = code,
                "Dependency checker exited with an unexpected status; skipping install"
            );
        }
        return DependencyOutcome {
            status,
            installer_exit_code: None,
        };
    }

    println!("Installing missing packages...");
    let installer_exit_code = match install_dependencies(runner, section).await {
        Ok(code) => {
            if code != 0 {
                warn!(
                    target: "token_launcher::dependencies",
                    exit_code = code,
                    "Installer exited with a non-zero status; continuing"
                );
            }
            code
        }
        Err(err) => {
            warn!(
                target: "token_launcher::dependencies",
                reason = %err,
                "Installer could not be run; continuing"
            );
            err.shell_exit_code()
        }
    };

    DependencyOutcome {
        status,
        installer_exit_code: Some(installer_exit_code),
    }
}
