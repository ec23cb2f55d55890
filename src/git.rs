//! Runner for the system `git` binary.
//!
//! Every call resolves `git` on `PATH`, runs it inside the configured working
//! directory and captures stdout and stderr. Failures carry the stderr text so
//! the user sees what git complained about.

use std::path::PathBuf;
use std::process::Command;

use crate::errors::GitError;

/// Captured output of a git invocation.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GitOutput {
    pub stdout: String,
    pub stderr: String,
}

/// A configured remote and its fetch URL.
#[derive(Debug, Clone, PartialEq)]
pub struct Remote {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone)]
pub struct SystemGit {
    working_dir: PathBuf,
}

impl SystemGit {
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }

    /// Path to the git executable.
    pub fn path() -> Result<PathBuf, GitError> {
        which::which("git").map_err(GitError::NotInstalled)
    }

    pub fn is_installed(&self) -> bool {
        Self::path().is_ok()
    }

    pub fn is_initialized(&self) -> bool {
        self.exec(&["rev-parse", "--is-inside-work-tree"]).is_ok()
    }

    /// True if there are new, modified or staged files.
    pub fn is_dirty(&self) -> bool {
        self.status_lines()
            .map(|lines| !lines.is_empty())
            .unwrap_or(false)
    }

    /// Non-blank lines of `git status --porcelain`.
    pub fn status_lines(&self) -> Result<Vec<String>, GitError> {
        let output = self.exec(&["status", "--porcelain"])?;
        Ok(output
            .stdout
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect())
    }

    pub fn has_commits(&self) -> bool {
        self.exec(&["rev-parse", "--verify", "--quiet", "HEAD"]).is_ok()
    }

    pub fn has_remote(&self, name: &str) -> bool {
        self.remotes()
            .map(|remotes| remotes.iter().any(|r| r.name == name))
            .unwrap_or(false)
    }

    /// True if HEAD has commits its upstream lacks. A branch without an
    /// upstream counts as unpushed once it has any commit.
    pub fn has_unpushed_commits(&self) -> bool {
        if !self.has_commits() {
            return false;
        }
        let upstream = self.exec(&["rev-parse", "--abbrev-ref", "--symbolic-full-name", "@{u}"]);
        if upstream.is_err() {
            return true;
        }
        match self.exec(&["rev-list", "--count", "@{u}..HEAD"]) {
            Ok(output) => output.stdout.trim().parse::<u64>().map(|n| n > 0).unwrap_or(true),
            Err(_) => true,
        }
    }

    /// Configured remotes with their fetch URLs.
    pub fn remotes(&self) -> Result<Vec<Remote>, GitError> {
        let output = self.exec(&["remote", "-v"])?;
        Ok(parse_remote_lines(&output.stdout))
    }

    /// Run git with `args`. The returned error includes stderr text.
    pub fn exec(&self, args: &[&str]) -> Result<GitOutput, GitError> {
        let path = Self::path()?;
        tracing::debug!(args = ?args, dir = %self.working_dir.display(), "running git");

        let output = Command::new(path)
            .args(args)
            .current_dir(&self.working_dir)
            .output()?;

        let stdout = String::from_utf8_lossy(&output.stdout).into_owned();
        let stderr = String::from_utf8_lossy(&output.stderr).into_owned();

        if !output.status.success() {
            tracing::debug!(status = %output.status, stderr = %stderr.trim(), "git failed");
            return Err(GitError::CommandFailed {
                args: args.join(" "),
                stderr: stderr.trim().to_string(),
                status: output.status,
            });
        }

        Ok(GitOutput { stdout, stderr })
    }
}

/// Parse `git remote -v` output, keeping the fetch URL of each remote.
pub fn parse_remote_lines(text: &str) -> Vec<Remote> {
    let mut remotes: Vec<Remote> = Vec::new();
    for line in text.lines() {
        let mut parts = line.split_whitespace();
        let (Some(name), Some(url)) = (parts.next(), parts.next()) else {
            continue;
        };
        if parts.next() == Some("(push)") {
            continue;
        }
        if remotes.iter().any(|r| r.name == name) {
            continue;
        }
        remotes.push(Remote {
            name: name.to_string(),
            url: url.to_string(),
        });
    }
    remotes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_remote_lines_keeps_fetch_urls() {
        let text = "origin\tgit@github.com:cli/cli.git (fetch)\n\
                    origin\tgit@github.com:cli/cli.git (push)\n\
                    upstream\thttps://github.com/up/cli.git (fetch)\n\
                    upstream\thttps://github.com/up/cli.git (push)\n";
        let remotes = parse_remote_lines(text);
        assert_eq!(remotes.len(), 2);
        assert_eq!(remotes[0].name, "origin");
        assert_eq!(remotes[0].url, "git@github.com:cli/cli.git");
        assert_eq!(remotes[1].name, "upstream");
    }

    #[test]
    fn test_parse_remote_lines_ignores_blank_lines() {
        assert!(parse_remote_lines("\n\n").is_empty());
    }

    #[test]
    fn test_command_failed_message_includes_stderr() {
        let status = Command::new("sh")
            .args(["-c", "exit 3"])
            .status()
            .unwrap();
        let err = GitError::CommandFailed {
            args: "push -u origin HEAD".to_string(),
            stderr: "rejected".to_string(),
            status,
        };
        let msg = err.to_string();
        assert!(msg.contains("push -u origin HEAD"));
        assert!(msg.contains("rejected"));
    }
}
