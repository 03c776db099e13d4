//! Final "press any key" pause for launches outside a terminal session.

use std::io::{self, IsTerminal, Write};

use crossterm::{
    event::{self, Event, KeyEventKind},
    terminal,
};

use crate::lib::errors::StepError;

pub const PAUSE_PROMPT: &str = "Press any key to continue...";

/// Wait for one keypress when stdin is a terminal; return immediately otherwise.
pub fn wait_for_keypress() -> Result<(), StepError> {
    wait_for_keypress_if(io::stdin().is_terminal())
}

pub fn wait_for_keypress_if(interactive: bool) -> Result<(), StepError> {
    if !interactive {
        return Ok(());
    }

    let mut stdout = io::stdout();
    write!(stdout, "{PAUSE_PROMPT}")
        .and_then(|_| stdout.flush())
        .map_err(|source| StepError::Pause { source })?;
    read_single_key().map_err(|source| StepError::Pause { source })?;
    writeln!(stdout).map_err(|source| StepError::Pause { source })
}

/// Raw mode for the lifetime of the guard; the previous mode comes back on drop.
struct RawModeGuard;

impl RawModeGuard {
    fn enable() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        Ok(Self)
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Block until a key is pressed. Ctrl+C counts as a key: raw mode turns off
/// signal generation, so the terminal is always restored by the guard.
fn read_single_key() -> io::Result<()> {
    let _raw = RawModeGuard::enable()?;
    loop {
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Release {
                return Ok(());
            }
        }
    }
}
