//! Recording process runner for step and launcher tests.

use std::{
    collections::VecDeque,
    io,
    sync::Mutex,
};

use crate::lib::process::{CapturedOutput, CommandSpec, ProcessRunner};

/// Scripted result for one invocation.
#[derive(Debug, Clone)]
pub enum Reply {
    Exit(i32),
    Stdout(i32, &'static str),
    NotFound,
    PermissionDenied,
}

/// Returns scripted replies in order and records every command it is asked to run.
/// Once the script is exhausted every command exits `0` with empty stdout.
#[derive(Debug, Default)]
pub struct FakeRunner {
    replies: Mutex<VecDeque<Reply>>,
    calls: Mutex<Vec<CommandSpec>>,
}

impl FakeRunner {
    pub fn new(replies: impl IntoIterator<Item = Reply>) -> Self {
        Self {
            replies: Mutex::new(replies.into_iter().collect()),
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<CommandSpec> {
        self.calls.lock().expect("calls lock").clone()
    }

    fn respond(&self, command: &CommandSpec) -> io::Result<CapturedOutput> {
        self.calls.lock().expect("calls lock").push(command.clone());
        let reply = self
            .replies
            .lock()
            .expect("replies lock")
            .pop_front()
            .unwrap_or(Reply::Exit(0));
        match reply {
            Reply::Exit(exit_code) => Ok(CapturedOutput {
                exit_code,
                stdout: Vec::new(),
            }),
            Reply::Stdout(exit_code, stdout) => Ok(CapturedOutput {
                exit_code,
                stdout: stdout.as_bytes().to_vec(),
            }),
            Reply::NotFound => Err(io::Error::new(io::ErrorKind::NotFound, "not found")),
            Reply::PermissionDenied => Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            )),
        }
    }
}

impl ProcessRunner for FakeRunner {
    async fn run(&self, command: &CommandSpec) -> io::Result<i32> {
        self.respond(command).map(|output| output.exit_code)
    }

    async fn capture(&self, command: &CommandSpec) -> io::Result<CapturedOutput> {
        self.respond(command)
    }
}
