//! XDG-compliant path resolution for configuration files.
//!
//! This module provides functions to locate the config file and `.env` files
//! following the XDG Base Directory Specification, with fallback to the current directory.

use std::env;
use std::path::PathBuf;

use crate::constants::{defaults, env as env_vars};

/// Directory holding the app's config under the XDG config home.
///
/// `XDG_CONFIG_HOME/gh-setup` when set, otherwise `~/.config/gh-setup`.
pub fn config_dir() -> Option<PathBuf> {
    if let Ok(xdg_config_home) = env::var("XDG_CONFIG_HOME")
        && !xdg_config_home.is_empty()
    {
        return Some(PathBuf::from(xdg_config_home).join(defaults::APP_DIR));
    }
    dirs::home_dir().map(|home| home.join(".config").join(defaults::APP_DIR))
}

/// Find the config file.
/// Priority:
/// 1. GH_SETUP_CONFIG from environment (if set and the file exists)
/// 2. Current directory/gh-setup.toml
/// 3. XDG_CONFIG_HOME/gh-setup/config.toml, else ~/.config/gh-setup/config.toml
///
/// Returns `None` when no file exists; the config file is optional.
pub fn find_config_file() -> Option<PathBuf> {
    if let Ok(config_path) = env::var(env_vars::CONFIG_PATH) {
        let path = PathBuf::from(&config_path);
        if path.exists() {
            return Some(path);
        }
        tracing::warn!(path = %config_path, "config path from environment does not exist");
    }

    if let Ok(current_dir) = env::current_dir() {
        let local = current_dir.join(defaults::LOCAL_CONFIG_FILE);
        if local.exists() {
            return Some(local);
        }
    }

    config_dir()
        .map(|dir| dir.join(defaults::CONFIG_FILE))
        .filter(|path| path.exists())
}

/// Load `.env` files.
/// Priority:
/// 1. Current directory/.env
/// 2. The app config directory's .env
///
/// Variables already present in the environment are never overwritten.
pub fn load_env_file() {
    let current_dir_env = PathBuf::from(".env");
    if current_dir_env.exists() {
        let _ = dotenv::from_path(&current_dir_env);
    }

    if let Some(dir) = config_dir() {
        let xdg_env = dir.join(".env");
        if xdg_env.exists() {
            let _ = dotenv::from_path(&xdg_env);
        }
    }
}
