use std::process::ExitStatus;

use thiserror::Error;

/// Outcome of a failed setup run.
///
/// A declined confirmation is reported as [`SetupError::Aborted`] so callers can tell it
/// apart from a failing command or API call.
#[derive(Error, Debug)]
pub enum SetupError {
    #[error("aborted")]
    Aborted,
    #[error(transparent)]
    Operational(#[from] anyhow::Error),
}

impl SetupError {
    pub fn is_aborted(&self) -> bool {
        matches!(self, SetupError::Aborted)
    }
}

/// Errors that can occur when running the `git` binary.
#[derive(Error, Debug)]
pub enum GitError {
    #[error("could not find git executable in PATH: {0}")]
    NotInstalled(#[source] which::Error),
    #[error("failed to run git {args}: {stderr} ({status})")]
    CommandFailed {
        args: String,
        stderr: String,
        status: ExitStatus,
    },
    #[error("failed to spawn git: {0}")]
    Spawn(#[from] std::io::Error),
}

/// Errors that can occur when working with GitHub API.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error("GitHub API error (status {status_code}): {message}")]
    ApiError {
        status_code: u16,
        message: String,
        documentation_url: Option<String>,
    },
    #[error("HTTP error: {0}")]
    HttpError(String),
    #[error("URI error: {0}")]
    UriError(String),
    #[error("invalid visibility: {0}")]
    InvalidVisibility(String),
    #[error("account not found: {0}")]
    AccountNotFound(String),
    #[error("unsupported account type for {login}: {kind}")]
    UnsupportedAccount { login: String, kind: String },
}

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    ReadError(String),
    #[error("Failed to parse config file: {0}")]
    ParseError(String),
    #[error("Invalid config value for `{key}`: {message}")]
    InvalidValue { key: &'static str, message: String },
    #[error("GitHub token not found; set GH_TOKEN or run `gh auth login`")]
    MissingToken,
}

impl From<octocrab::Error> for GitHubError {
    fn from(err: octocrab::Error) -> Self {
        match err {
            octocrab::Error::GitHub { source, .. } => GitHubError::ApiError {
                status_code: source.status_code.as_u16(),
                message: source.message,
                documentation_url: source.documentation_url,
            },
            octocrab::Error::Http { source, .. } => GitHubError::HttpError(source.to_string()),
            octocrab::Error::Uri { source, .. } => GitHubError::UriError(source.to_string()),
            _ => GitHubError::HttpError(err.to_string()),
        }
    }
}
