//! Configuration file parsing and credential resolution.
//!
//! This module handles loading the optional TOML configuration file and
//! resolving the GitHub token and git protocol preference from the
//! environment, the config file, and the `gh` CLI.

use std::env;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;

use crate::constants::{defaults, env as env_vars};
use crate::errors::ConfigError;
use crate::github::{Protocol, Visibility};

/// Optional settings, all of which have defaults.
#[derive(Debug, Default, Deserialize, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Name of the remote to create or verify.
    #[serde(default)]
    pub remote: Option<String>,
    /// Hosting service host name, used to recognise existing remotes.
    #[serde(default)]
    pub host: Option<String>,
    /// REST API base URL, for GitHub Enterprise Server.
    #[serde(default)]
    pub api_url: Option<String>,
    /// One of `https`, `ssh`, `git`.
    #[serde(default)]
    pub git_protocol: Option<String>,
    /// Default answer to the visibility prompt.
    #[serde(default)]
    pub visibility: Option<String>,
    /// Default answer to the commit message prompt.
    #[serde(default)]
    pub commit_message: Option<String>,
}

impl Config {
    /// Load configuration from a TOML file and validate it.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(format!("{}: {}", path.display(), e)))?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| ConfigError::ParseError(e.to_string()))
            .with_context(|| format!("Invalid config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Load the config file if one exists, otherwise return defaults.
    pub fn load() -> Result<Self> {
        match crate::paths::find_config_file() {
            Some(path) => {
                tracing::debug!(path = %path.display(), "loading config file");
                Self::from_file(&path)
            }
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if let Some(remote) = &self.remote
            && remote.trim().is_empty()
        {
            return Err(ConfigError::InvalidValue {
                key: "remote",
                message: "cannot be empty".to_string(),
            });
        }
        if let Some(protocol) = &self.git_protocol
            && Protocol::parse(protocol) == Protocol::Unknown
        {
            return Err(ConfigError::InvalidValue {
                key: "git_protocol",
                message: format!("expected https, ssh or git, got '{}'", protocol),
            });
        }
        if let Some(visibility) = &self.visibility {
            visibility
                .parse::<Visibility>()
                .map_err(|e| ConfigError::InvalidValue {
                    key: "visibility",
                    message: e.to_string(),
                })?;
        }
        Ok(())
    }

    pub fn remote_name(&self) -> &str {
        self.remote.as_deref().unwrap_or(defaults::REMOTE)
    }

    pub fn host(&self) -> &str {
        self.host.as_deref().unwrap_or(defaults::HOST)
    }

    pub fn default_visibility(&self) -> Visibility {
        self.visibility
            .as_deref()
            .and_then(|v| v.parse().ok())
            .unwrap_or(Visibility::Public)
    }

    pub fn commit_message(&self) -> &str {
        self.commit_message
            .as_deref()
            .unwrap_or(defaults::COMMIT_MESSAGE)
    }

    /// Protocol preference: config file, then `gh config`, then HTTPS.
    pub fn git_protocol(&self) -> Protocol {
        if let Some(protocol) = self.git_protocol.as_deref().map(Protocol::parse)
            && protocol != Protocol::Unknown
        {
            return protocol;
        }
        crate::gh_cli::git_protocol(self.host()).unwrap_or(Protocol::Https)
    }

    /// Token: `GH_TOKEN`, then `GITHUB_TOKEN`, then `gh auth token`.
    pub fn resolve_token(&self) -> Result<String> {
        let token = env_vars::TOKEN_VARS
            .iter()
            .filter_map(|name| env::var(name).ok())
            .map(|value| value.trim().to_string())
            .find(|value| !value.is_empty())
            .or_else(|| crate::gh_cli::auth_token(self.host()))
            .ok_or(ConfigError::MissingToken)?;

        crate::validation::validate_token(&token).context("Invalid GitHub token format")?;
        Ok(token)
    }
}

/// True when `APP_ENV=test`.
pub fn is_test_env() -> bool {
    env::var(env_vars::APP_ENV).is_ok_and(|v| v == env_vars::APP_ENV_TEST)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_config(content: &str) -> (TempDir, std::path::PathBuf) {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("config.toml");
        fs::write(&path, content).unwrap();
        (temp_dir, path)
    }

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.remote_name(), "origin");
        assert_eq!(config.host(), "github.com");
        assert_eq!(config.default_visibility(), Visibility::Public);
        assert_eq!(config.commit_message(), "Initial commit");
    }

    #[test]
    fn test_from_file_reads_all_keys() {
        let (_dir, path) = write_config(
            r#"
remote = "github"
host = "ghe.example.com"
api_url = "https://ghe.example.com/api/v3"
git_protocol = "ssh"
visibility = "private"
commit_message = "chore: bootstrap"
"#,
        );

        let config = Config::from_file(&path).unwrap();
        assert_eq!(config.remote_name(), "github");
        assert_eq!(config.host(), "ghe.example.com");
        assert_eq!(config.api_url.as_deref(), Some("https://ghe.example.com/api/v3"));
        assert_eq!(config.git_protocol(), Protocol::Ssh);
        assert_eq!(config.default_visibility(), Visibility::Private);
        assert_eq!(config.commit_message(), "chore: bootstrap");
    }

    #[test]
    fn test_from_file_rejects_bad_visibility() {
        let (_dir, path) = write_config("visibility = \"secret\"\n");
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("visibility"));
    }

    #[test]
    fn test_from_file_rejects_bad_protocol() {
        let (_dir, path) = write_config("git_protocol = \"ftp\"\n");
        assert!(Config::from_file(&path).is_err());
    }

    #[test]
    fn test_from_file_rejects_unknown_keys() {
        let (_dir, path) = write_config("colour = \"blue\"\n");
        let err = Config::from_file(&path).unwrap_err();
        assert!(err.to_string().contains("Invalid config file"));
    }

    #[test]
    fn test_from_file_missing() {
        let err = Config::from_file(Path::new("/nonexistent/gh-setup.toml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
