use std::{
    io::{Read, Write},
    os::unix::io::RawFd,
    path::Path,
    sync::mpsc,
    thread,
    time::{Duration, Instant},
};

use portable_pty::{Child, CommandBuilder, ExitStatus, NativePtySystem, PtyPair, PtySize, PtySystem};
use token_launcher::steps::PAUSE_PROMPT;

use crate::common::{Sandbox, Scenario, BINARY_PATH};

fn wait_until(what: &str, mut done: impl FnMut() -> bool) {
    let deadline = Instant::now() + Duration::from_secs(10);
    while !done() {
        assert!(Instant::now() < deadline, "timed out waiting for {what}");
        thread::sleep(Duration::from_millis(20));
    }
}

/// The launcher running on the slave side of a pseudo-terminal.
struct PtySession {
    pair: PtyPair,
    launcher: Box<dyn Child + Send + Sync>,
    writer: Box<dyn Write + Send>,
    output: mpsc::Receiver<Vec<u8>>,
    screen: Vec<u8>,
}

impl PtySession {
    fn spawn(sandbox: &Sandbox, config_path: &Path) -> Self {
        let pair = NativePtySystem::default()
            .openpty(PtySize {
                rows: 24,
                cols: 80,
                pixel_width: 0,
                pixel_height: 0,
            })
            .expect("can open a pty");

        let mut command = CommandBuilder::new(BINARY_PATH);
        command.cwd(sandbox.path());
        command.env("LAUNCHER_CONFIG_PATH", config_path);
        command.env("RUST_LOG", "warn");
        let launcher = pair
            .slave
            .spawn_command(command)
            .expect("launcher should start");

        let mut reader = pair.master.try_clone_reader().expect("can read from pty");
        let (tx, output) = mpsc::channel();
        thread::spawn(move || {
            let mut buffer = [0u8; 1024];
            while let Ok(read) = reader.read(&mut buffer) {
                if read == 0 || tx.send(buffer[..read].to_vec()).is_err() {
                    break;
                }
            }
        });
        let writer = pair.master.take_writer().expect("can write to pty");

        Self {
            pair,
            launcher,
            writer,
            output,
            screen: Vec::new(),
        }
    }

    fn screen(&self) -> String {
        String::from_utf8_lossy(&self.screen).into_owned()
    }

    fn local_flags(&self) -> libc::tcflag_t {
        let fd: RawFd = self
            .pair
            .master
            .as_raw_fd()
            .expect("pty master has a descriptor");
        // SAFETY: termios is plain data; tcgetattr fills it on success.
        let mut termios: libc::termios = unsafe { std::mem::zeroed() };
        let status = unsafe { libc::tcgetattr(fd, &mut termios) };
        assert_eq!(status, 0, "can read pty attributes");
        termios.c_lflag
    }

    /// Wait for the pause prompt, then for the launcher to switch the terminal to raw mode.
    fn wait_for_pause(&mut self) {
        wait_until("the pause prompt", || {
            self.screen.extend(self.output.try_iter().flatten());
            String::from_utf8_lossy(&self.screen).contains(PAUSE_PROMPT)
        });
        wait_until("raw mode", || self.local_flags() & libc::ICANON == 0);
    }

    fn press(&mut self, bytes: &[u8]) {
        self.writer.write_all(bytes).expect("can type into pty");
        self.writer.flush().expect("can flush pty");
    }

    fn wait_for_exit(&mut self) -> ExitStatus {
        let mut status = None;
        wait_until("the launcher to exit", || {
            status = self.launcher.try_wait().expect("can poll launcher");
            status.is_some()
        });
        status.expect("launcher exited")
    }
}

#[test]
fn ctrl_c_at_pause_prompt_ends_pause_and_restores_terminal() {
    let sandbox = Sandbox::new(&Scenario {
        app_exit: 4,
        pause_on_exit: true,
        ..Scenario::default()
    });
    let mut session = PtySession::spawn(&sandbox, &sandbox.config_path());

    session.wait_for_pause();
    session.press(b"\x03");
    let status = session.wait_for_exit();

    assert_eq!(status.exit_code(), 4, "launcher status: {status:?}");
    let flags = session.local_flags();
    assert_ne!(flags & libc::ECHO, 0, "echo must be restored");
    assert_ne!(flags & libc::ICANON, 0, "canonical mode must be restored");
}

#[test]
fn config_error_is_shown_before_the_pause() {
    let sandbox = Sandbox::new(&Scenario::default());
    let missing = sandbox.path().join("missing.toml");
    let mut session = PtySession::spawn(&sandbox, &missing);

    session.wait_for_pause();
    session.press(b"x");
    let status = session.wait_for_exit();

    assert_eq!(status.exit_code(), 1, "launcher status: {status:?}");
    let screen = session.screen();
    let error_at = screen
        .find("missing.toml")
        .unwrap_or_else(|| panic!("error should name the config file: {screen}"));
    let prompt_at = screen.find(PAUSE_PROMPT).expect("prompt was shown");
    assert!(error_at < prompt_at, "error must precede the prompt: {screen}");
    assert!(sandbox.calls().is_empty(), "no step may run: {:?}", sandbox.calls());
}
