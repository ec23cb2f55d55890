//! # gh-setup
//!
//! An interactive command-line wizard that turns a local directory into a
//! GitHub-hosted repository.
//!
//! Running the wizard:
//! - Verifies `git` is installed and initializes the directory if needed
//! - Finds an existing GitHub remote, attaches a same-named repo, or creates one
//! - Commits uncommitted files and pushes the initial commit
//!
//! Every step checks before it acts, so re-running on a finished repository is a no-op.
//!
//! ## Modules
//!
//! - [`app`] - The ordered setup steps and remote resolution
//! - [`app_deps`] - Capability traits for git, GitHub and prompts
//! - [`git`] - Runner for the system `git` binary
//! - [`github`] - GitHub API client and data model
//! - [`gh_cli`] - Optional reads from the `gh` CLI
//! - [`prompt`] - Interactive terminal prompts
//! - [`session`] - Terminal session, status messages and spinner
//! - [`config`] - Configuration file and credential resolution
//! - [`paths`] - XDG-compliant path resolution
//! - [`validation`] - Input validation utilities
//! - [`error`] - Error formatting utilities
//! - [`errors`] - Structured error types
//! - [`logging`] - `tracing` subscriber setup
//! - [`constants`] - Application constants

pub mod app;
pub mod app_deps;
pub mod cli;
pub mod config;
pub mod constants;
pub mod error;
pub mod errors;
pub mod gh_cli;
pub mod git;
pub mod github;
pub mod logging;
pub mod paths;
pub mod prompt;
pub mod session;
pub mod validation;
