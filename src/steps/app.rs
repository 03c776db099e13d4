//! Launch of the target application with forwarded arguments.

use std::ffi::OsString;

use tracing::{error, info};

use crate::{
    launcher::config::AppSection,
    lib::{
        errors::StepError,
        process::{CommandSpec, ProcessRunner},
    },
};

/// Application command with the caller's arguments appended in order.
pub fn app_command(section: &AppSection, app_args: &[OsString]) -> CommandSpec {
    section.command.clone().args(app_args)
}

/// Run the application and return the exit code the launcher should report.
///
/// A spawn failure becomes `127` (not found) or `126` (cannot execute).
pub async fn launch_app<R: ProcessRunner>(
    runner: &R,
    section: &AppSection,
    app_args: &[OsString],
) -> i32 {
    let command = app_command(section, app_args);
    info!(
        target: "token_launcher::app",
        program = %command.program(),
        forwarded_args = app_args.len(),
        "Launching application"
    );

    match runner.run(&command).await {
        Ok(code) => code,
        Err(source) => {
            let err = StepError::Spawn {
                program: command.program().to_string(),
                source,
            };
            error!(
                target: "token_launcher::app",
                reason = %err,
                "Application could not be started"
            );
            err.shell_exit_code()
        }
    }
}
