//! Optional reads from a locally installed `gh` CLI.
//!
//! Nothing here is required: a missing `gh` binary or a failing command just
//! yields `None` and the caller falls back to its own default.

use std::process::Command;

use crate::github::Protocol;

/// Run `gh` with `args` and return trimmed stdout on success.
fn gh_output(args: &[&str]) -> Option<String> {
    let path = which::which("gh").ok()?;
    tracing::debug!(args = ?args, "running gh");

    let output = Command::new(path).args(args).output().ok()?;
    if !output.status.success() {
        tracing::debug!(status = %output.status, "gh failed");
        return None;
    }
    let text = String::from_utf8_lossy(&output.stdout).trim().to_string();
    if text.is_empty() { None } else { Some(text) }
}

/// Token stored by `gh auth login` for `host`.
pub fn auth_token(host: &str) -> Option<String> {
    gh_output(&["auth", "token", "--hostname", host])
}

/// The `git_protocol` preference from gh's config for `host`.
pub fn git_protocol(host: &str) -> Option<Protocol> {
    gh_output(&["config", "get", "git_protocol", "--host", host])
        .map(|value| Protocol::parse(&value))
        .filter(|protocol| *protocol != Protocol::Unknown)
}
