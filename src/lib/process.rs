//! Shared helpers for building and running external commands.

use std::{
    ffi::{OsStr, OsString},
    future::Future,
    io,
    process::{ExitStatus, Stdio},
};

use tokio::process::Command;
use tracing::debug;

/// Program plus arguments for one external invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: String,
    args: Vec<OsString>,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Build from an argv-style list (`[program, arg...]`). Returns `None` when empty.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, rest) = argv.split_first()?;
        Some(Self::new(program.clone()).args(rest))
    }

    pub fn arg(mut self, arg: impl AsRef<OsStr>) -> Self {
        self.args.push(arg.as_ref().to_os_string());
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.args
            .extend(args.into_iter().map(|arg| arg.as_ref().to_os_string()));
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn arguments(&self) -> &[OsString] {
        &self.args
    }

    /// Human-readable command line for logs.
    pub fn display(&self) -> String {
        let mut line = self.program.clone();
        for arg in &self.args {
            line.push(' ');
            line.push_str(&arg.to_string_lossy());
        }
        line
    }

    fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args);
        command
    }
}

/// Exit code and captured stdout of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapturedOutput {
    pub exit_code: i32,
    pub stdout: Vec<u8>,
}

/// Abstraction over process execution so launcher steps can be driven by a fake.
pub trait ProcessRunner {
    /// Run with inherited stdio and return the exit code.
    fn run(&self, command: &CommandSpec) -> impl Future<Output = io::Result<i32>> + Send;

    /// Run with stdout captured (stdin and stderr inherited).
    fn capture(
        &self,
        command: &CommandSpec,
    ) -> impl Future<Output = io::Result<CapturedOutput>> + Send;
}

/// Runner that spawns real child processes through `tokio::process`.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

impl ProcessRunner for SystemRunner {
    async fn run(&self, command: &CommandSpec) -> io::Result<i32> {
        let shield = SignalShield::install()?;
        let mut process = command.to_command();
        let status = shield.wait_for(command, process.status()).await?;
        Ok(exit_code_of(status))
    }

    async fn capture(&self, command: &CommandSpec) -> io::Result<CapturedOutput> {
        let shield = SignalShield::install()?;
        let mut process = command.to_command();
        process
            .stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        let output = shield.wait_for(command, process.output()).await?;
        Ok(CapturedOutput {
            exit_code: exit_code_of(output.status),
            stdout: output.stdout,
        })
    }
}

/// Terminal interrupt listeners held while a foreground child runs.
///
/// Ctrl+C reaches the whole foreground process group. The child handles it
/// however it likes; the launcher only drains the notifications and keeps
/// waiting, so its exit status is still the child's. The disposition is never
/// set to ignored: children must inherit the default one.
struct SignalShield {
    #[cfg(unix)]
    interrupt: tokio::signal::unix::Signal,
    #[cfg(unix)]
    quit: tokio::signal::unix::Signal,
}

impl SignalShield {
    #[cfg(unix)]
    fn install() -> io::Result<Self> {
        use tokio::signal::unix::{signal, SignalKind};

        Ok(Self {
            interrupt: signal(SignalKind::interrupt())?,
            quit: signal(SignalKind::quit())?,
        })
    }

    #[cfg(not(unix))]
    fn install() -> io::Result<Self> {
        Ok(Self {})
    }

    #[cfg(unix)]
    async fn recv(&mut self) -> Option<&'static str> {
        tokio::select! {
            received = self.interrupt.recv() => received.map(|_| "SIGINT"),
            received = self.quit.recv() => received.map(|_| "SIGQUIT"),
        }
    }

    #[cfg(not(unix))]
    async fn recv(&mut self) -> Option<&'static str> {
        tokio::signal::ctrl_c().await.ok().map(|_| "ctrl-c")
    }

    /// Drive `child` to completion, swallowing interrupts that arrive meanwhile.
    async fn wait_for<T>(
        mut self,
        command: &CommandSpec,
        child: impl Future<Output = io::Result<T>>,
    ) -> io::Result<T> {
        tokio::pin!(child);
        loop {
            tokio::select! {
                result = &mut child => return result,
                received = self.recv() => match received {
                    Some(signal) => debug!(
                        target: "token_launcher::process",
                        program = %command.program(),
                        signal,
                        "Interrupt left to the running child"
                    ),
                    None => return (&mut child).await,
                },
            }
        }
    }
}

/// Convert an exit status into the code a shell would report.
///
/// Signal-terminated children map to `128 + signal` on Unix.
pub fn exit_code_of(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    1
}
