use std::{ffi::OsString, process::ExitCode};

use anyhow::Error;
use tracing::{error, warn, Instrument};

use crate::{
    cli::LaunchProfile,
    launcher::config::LauncherConfig,
    lib::{
        errors::StepError,
        process::{ProcessRunner, SystemRunner},
        telemetry::{emit_launch_plan, LaunchPlanTelemetry, RunSpan},
    },
    steps,
};

/// Bundles a runtime error message with an exit code.
#[derive(Debug)]
pub struct RuntimeExit {
    message: String,
    exit_code: ExitCode,
    pause_on_exit: bool,
}

impl RuntimeExit {
    pub fn from_error(err: impl Into<Error>) -> Self {
        let err = err.into();
        Self {
            message: format!("{err:?}"),
            exit_code: ExitCode::FAILURE,
            pause_on_exit: false,
        }
    }

    pub fn from_step_error(err: StepError) -> Self {
        Self {
            message: err.to_string(),
            exit_code: shell_exit_code(err.shell_exit_code()),
            pause_on_exit: false,
        }
    }

    /// Wait for a keypress after the message is printed.
    pub fn pausing(mut self, pause_on_exit: bool) -> Self {
        self.pause_on_exit = pause_on_exit;
        self
    }

    /// Print the message to stderr, pause if requested, and hand back the exit code.
    pub async fn report(self) -> ExitCode {
        eprintln!("{}", self.message);
        if self.pause_on_exit {
            pause().await;
        }
        self.exit_code
    }

    pub fn exit_code(&self) -> ExitCode {
        self.exit_code
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn pauses_on_exit(&self) -> bool {
        self.pause_on_exit
    }
}

/// Sequences the launcher steps against a process runner.
pub struct Launcher<R> {
    config: LauncherConfig,
    runner: R,
}

impl<R: ProcessRunner> Launcher<R> {
    pub fn new(config: LauncherConfig, runner: R) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    /// Check dependencies, refresh the token, then run the application.
    ///
    /// Returns the application's exit code. The only error is an empty token
    /// with `token.require_non_empty` set, in which case the environment file
    /// is untouched and the application is not started.
    pub async fn run(&self, app_args: &[OsString]) -> Result<i32, StepError> {
        steps::ensure_dependencies(&self.runner, &self.config.dependencies).await;

        let token = steps::acquire_token(&self.runner, &self.config.token).await?;
        steps::refresh_env_file(&self.config.env_file, token);

        Ok(steps::launch_app(&self.runner, &self.config.app, app_args).await)
    }
}

/// Run the launcher with the real process runner and map the result to an exit code.
pub async fn run_launcher(
    profile: LaunchProfile,
    config: LauncherConfig,
) -> Result<ExitCode, RuntimeExit> {
    let config_path = config.source_path.to_string_lossy().into_owned();
    let manifest = config.dependencies.manifest.to_string_lossy().into_owned();
    let env_file = config.env_file.path.to_string_lossy().into_owned();
    emit_launch_plan(&LaunchPlanTelemetry {
        config_path: &config_path,
        config_source: profile.config_source.as_str(),
        manifest: &manifest,
        env_file: &env_file,
        env_key: &config.env_file.key,
        app_program: config.app.command.program(),
        forwarded_args: profile.app_args.len(),
    });

    let pause_on_exit = config.app.pause_on_exit;
    let launcher = Launcher::new(config, SystemRunner);
    let run_span = RunSpan::start();
    let result = launcher
        .run(&profile.app_args)
        .instrument(run_span.span().clone())
        .await;

    match result {
        Ok(code) => {
            run_span.finish(code);
            if pause_on_exit {
                pause().await;
            }
            Ok(shell_exit_code(code))
        }
        Err(err) => {
            error!(
                target: "token_launcher::runtime",
                run_id = %run_span.run_id(),
                reason = %err,
                "Launcher aborted before starting the application"
            );
            run_span.finish(err.shell_exit_code());
            Err(RuntimeExit::from_step_error(err).pausing(pause_on_exit))
        }
    }
}

async fn pause() {
    let result = tokio::task::spawn_blocking(steps::wait_for_keypress).await;
    match result {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(
            target: "token_launcher::runtime",
            reason = %err,
            "Pause failed"
        ),
        Err(err) => warn!(
            target: "token_launcher::runtime",
            reason = %err,
            "Pause task failed"
        ),
    }
}

/// Truncate to the low byte, as a POSIX shell reports `$?`.
pub fn shell_exit_byte(code: i32) -> u8 {
    (code & 0xff) as u8
}

pub fn shell_exit_code(code: i32) -> ExitCode {
    ExitCode::from(shell_exit_byte(code))
}
