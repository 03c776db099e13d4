//! Telemetry initialization and launcher run span helpers.

use std::time::Instant;

use anyhow::Result;
use serde::Serialize;
use tracing::{info, info_span, Span};
use tracing_subscriber::{fmt, EnvFilter};
use uuid::Uuid;

/// Initialize `tracing` and format developer logs on stderr.
pub fn init_tracing() -> Result<()> {
    if tracing::dispatcher::has_been_set() {
        return Ok(());
    }

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt()
        .with_env_filter(env_filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|err| anyhow::anyhow!("failed to initialize tracing: {err}"))
}

/// Span helper recording the start and finish of one launcher run.
pub struct RunSpan {
    span: Span,
    started_at: Instant,
    run_id: Uuid,
}

impl RunSpan {
    /// Start a run span.
    pub fn start() -> Self {
        let run_id = Uuid::new_v4();
        let span = info_span!(target: "token_launcher::runtime", "launcher_run", %run_id);
        Self {
            span,
            started_at: Instant::now(),
            run_id,
        }
    }

    /// Span to enter while the run is in progress.
    pub fn span(&self) -> &Span {
        &self.span
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    /// Close the span while recording the exit code of the run.
    pub fn finish(self, exit_code: i32) {
        let elapsed_ms = self.started_at.elapsed().as_millis();
        let _entered = self.span.enter();
        info!(
            target: "token_launcher::runtime",
            run_id = %self.run_id,
            exit_code = exit_code,
            elapsed_ms = elapsed_ms,
            "Completed launcher run"
        );
    }
}

/// Payload describing what a run is about to do.
#[derive(Debug, Serialize)]
pub struct LaunchPlanTelemetry<'a> {
    pub config_path: &'a str,
    pub config_source: &'a str,
    pub manifest: &'a str,
    pub env_file: &'a str,
    pub env_key: &'a str,
    pub app_program: &'a str,
    pub forwarded_args: usize,
}

/// Emit the launch plan to `tracing`.
pub fn emit_launch_plan(telemetry: &LaunchPlanTelemetry<'_>) {
    info!(
        target: "token_launcher::runtime",
        config_path = telemetry.config_path,
        config_source = telemetry.config_source,
        manifest = telemetry.manifest,
        env_file = telemetry.env_file,
        env_key = telemetry.env_key,
        app_program = telemetry.app_program,
        forwarded_args = telemetry.forwarded_args,
        "Starting launcher"
    );
}
