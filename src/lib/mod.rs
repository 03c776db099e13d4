//! Shared library modules providing error types, process and env-file helpers, and telemetry initialization.

pub mod envfile;
pub mod errors;
pub mod process;
pub mod telemetry;
