//! Location of the configuration file

use directories::ProjectDirs;
use std::path::PathBuf;

const APP_NAME: &str = "ownergraph";

/// Directory holding `config.yaml`
///
/// `OWNERGRAPH_CONFIG_DIR` wins, then `$XDG_CONFIG_HOME/ownergraph`, then the
/// platform config directory.
pub fn config_dir() -> PathBuf {
    if let Some(dir) = std::env::var_os("OWNERGRAPH_CONFIG_DIR") {
        return PathBuf::from(dir);
    }
    if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join(APP_NAME);
    }
    ProjectDirs::from("", "", APP_NAME)
        .map(|dirs| dirs.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(".").join(APP_NAME))
}

/// Default config file, used when `--config` is not given
pub fn root_config_path() -> PathBuf {
    config_dir().join("config.yaml")
}
