//! Launcher steps, run in order by the runtime.

pub mod app;
pub mod dependencies;
pub mod env_file;
pub mod pause;
pub mod token;

#[cfg(test)]
pub(crate) mod testing;

pub use app::{app_command, launch_app};
pub use dependencies::{
    check_dependencies, ensure_dependencies, install_dependencies, DependencyOutcome,
    DependencyStatus, MISSING_PACKAGES_EXIT_CODE,
};
pub use env_file::{patch_env_file, refresh_env_file};
pub use pause::{wait_for_keypress, PAUSE_PROMPT};
pub use token::{acquire_token, extract_field, AccessToken};
