use std::path::Path;

use tracing::{debug, info};

use super::{LauncherConfig, CONFIG_ENV_KEY, DEFAULT_CONFIG_PATH};

pub fn log_source(path: &Path, from_env: bool, exists: bool) {
    if from_env {
        info!(
            target: "token_launcher::config",
            path = %path.display(),
            "Loading configuration using LAUNCHER_CONFIG_PATH environment variable"
        );
    } else if exists {
        debug!(
            target: "token_launcher::config",
            path = %path.display(),
            env = CONFIG_ENV_KEY,
            "LAUNCHER_CONFIG_PATH not set; using launcher.toml in the working directory"
        );
    } else {
        debug!(
            target: "token_launcher::config",
            env = CONFIG_ENV_KEY,
            default = DEFAULT_CONFIG_PATH,
            "No configuration file found; using built-in defaults"
        );
    }
}

pub fn log_loaded(config: &LauncherConfig) {
    info!(
        target: "token_launcher::config",
        path = %config.source_path.display(),
        manifest = %config.dependencies.manifest.display(),
        env_file = %config.env_file.path.display(),
        env_key = %config.env_file.key,
        token_resource = %config.token.resource,
        require_non_empty = config.token.require_non_empty,
        app = ?config.app.command,
        "Configuration loaded"
    );
}
