//! Application constants for environment variables, defaults, API endpoints and validation.
//!
//! This module contains all constant values used throughout the application,
//! including GitHub API endpoints, prompt defaults, and validation constraints.

/// Environment variable names read by the application.
pub mod env {
    /// Set to [`APP_ENV_TEST`] to disable commit signing and network side effects.
    pub const APP_ENV: &str = "APP_ENV";

    /// Value of [`APP_ENV`] that enables test mode.
    pub const APP_ENV_TEST: &str = "test";

    /// Explicit path to the config file (highest priority).
    pub const CONFIG_PATH: &str = "GH_SETUP_CONFIG";

    /// Tracing filter directive, e.g. `gh_setup=debug`.
    pub const LOG_FILTER: &str = "GH_SETUP_LOG";

    /// Token variables, checked in order.
    pub const TOKEN_VARS: [&str; 2] = ["GH_TOKEN", "GITHUB_TOKEN"];

    /// Disables colored output when set.
    pub const NO_COLOR: &str = "NO_COLOR";

    /// Forces colored output when set to anything but `0`.
    pub const CLICOLOR_FORCE: &str = "CLICOLOR_FORCE";
}

/// Defaults used when neither the user nor the config file supplies a value.
pub mod defaults {
    /// Name of the remote the wizard manages.
    pub const REMOTE: &str = "origin";

    /// Hosting service host name.
    pub const HOST: &str = "github.com";

    /// Message offered for the initial commit.
    pub const COMMIT_MESSAGE: &str = "Initial commit";

    /// Config directory name under the XDG config home.
    pub const APP_DIR: &str = "gh-setup";

    /// Config file name.
    pub const CONFIG_FILE: &str = "config.toml";

    /// Config file name looked up in the current directory.
    pub const LOCAL_CONFIG_FILE: &str = "gh-setup.toml";

    /// Default log filter when [`super::env::LOG_FILTER`] is unset.
    pub const LOG_FILTER: &str = "warn";

    /// Spinner frame interval.
    pub const SPINNER_INTERVAL_MS: u64 = 120;
}

/// GitHub API endpoint constants.
pub mod api {
    /// Authenticated user.
    pub const USER_PATH: &str = "/user";

    /// Organizations the authenticated user belongs to.
    pub const USER_ORGS_PATH: &str = "/user/orgs";

    /// Repository creation for the authenticated user.
    pub const USER_REPOS_PATH: &str = "/user/repos";

    /// Page size for list endpoints (the API maximum).
    pub const PER_PAGE: usize = 100;
}

/// Remote names checked when detecting an existing GitHub remote, in priority order.
pub const REMOTE_PREFERENCE: [&str; 3] = ["upstream", "github", "origin"];

/// Repository validation constants.
pub mod repo {
    /// Maximum length for repository owner name.
    pub const MAX_OWNER_LENGTH: usize = 39; // GitHub username limit

    /// Maximum length for repository name.
    pub const MAX_REPO_NAME_LENGTH: usize = 100;

    /// Owners: alphanumerics and single hyphens, no leading hyphen.
    pub const VALID_OWNER_PATTERN: &str = r"^[A-Za-z0-9][A-Za-z0-9-]*$";

    /// Repository names: alphanumerics, `.`, `_` and `-`.
    pub const VALID_REPO_NAME_PATTERN: &str = r"^[A-Za-z0-9._-]+$";

    /// Runs of characters GitHub replaces with `-` in repository names.
    pub const INVALID_REPO_NAME_CHARS: &str = r"[^A-Za-z0-9._-]+";
}

/// Token validation constants.
pub mod token {
    pub const MIN_LENGTH: usize = 20;
    pub const MAX_LENGTH: usize = 255;
}
