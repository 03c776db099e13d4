//! Launcher step sequencing and process exit handling.
mod startup;

pub use startup::{run_launcher, shell_exit_byte, shell_exit_code, Launcher, RuntimeExit};
