use anyhow::{Context, Result};
use async_trait::async_trait;

use crate::git::{GitOutput, SystemGit};
use crate::github::{self, Account, Repository, User, Visibility};
use crate::prompt;

/// Local version-control operations the setup flow relies on.
pub trait GitRunner: Send + Sync {
    fn is_installed(&self) -> bool;
    fn is_initialized(&self) -> bool;
    fn is_dirty(&self) -> bool;
    fn status_lines(&self) -> Result<Vec<String>>;
    fn has_commits(&self) -> bool;
    fn has_remote(&self, name: &str) -> bool;
    fn has_unpushed_commits(&self) -> bool;
    fn exec(&self, args: &[&str]) -> Result<GitOutput>;
}

impl GitRunner for SystemGit {
    fn is_installed(&self) -> bool {
        SystemGit::is_installed(self)
    }

    fn is_initialized(&self) -> bool {
        SystemGit::is_initialized(self)
    }

    fn is_dirty(&self) -> bool {
        SystemGit::is_dirty(self)
    }

    fn status_lines(&self) -> Result<Vec<String>> {
        Ok(SystemGit::status_lines(self)?)
    }

    fn has_commits(&self) -> bool {
        SystemGit::has_commits(self)
    }

    fn has_remote(&self, name: &str) -> bool {
        SystemGit::has_remote(self, name)
    }

    fn has_unpushed_commits(&self) -> bool {
        SystemGit::has_unpushed_commits(self)
    }

    fn exec(&self, args: &[&str]) -> Result<GitOutput> {
        Ok(SystemGit::exec(self, args)?)
    }
}

#[async_trait]
pub trait GitHubApi: Send + Sync {
    async fn current_user(&self) -> Result<User>;
    /// The hosted repository the working directory already points at, if any.
    async fn current_remote(&self) -> Result<Option<Repository>>;
    async fn get_account(&self, name: &str) -> Result<Option<Account>>;
    async fn get_repo(&self, full_name: &str) -> Result<Option<Repository>>;
    async fn create_repo(&self, owner: &str, name: &str, visibility: Visibility) -> Result<Repository>;
}

pub struct RealGitHubApi {
    inner: github::GitHubClient,
    git: SystemGit,
    host: String,
}

impl RealGitHubApi {
    pub fn new(inner: github::GitHubClient, git: SystemGit, host: impl Into<String>) -> Self {
        Self {
            inner,
            git,
            host: host.into(),
        }
    }
}

#[async_trait]
impl GitHubApi for RealGitHubApi {
    async fn current_user(&self) -> Result<User> {
        self.inner.current_user().await
    }

    async fn current_remote(&self) -> Result<Option<Repository>> {
        let remotes = self.git.remotes().context("Failed to list git remotes")?;
        Ok(github::find_hosted_remote(&remotes, &self.host))
    }

    async fn get_account(&self, name: &str) -> Result<Option<Account>> {
        self.inner.get_account(name).await
    }

    async fn get_repo(&self, full_name: &str) -> Result<Option<Repository>> {
        self.inner.get_repo(full_name).await
    }

    async fn create_repo(&self, owner: &str, name: &str, visibility: Visibility) -> Result<Repository> {
        self.inner.create_repo(owner, name, visibility).await
    }
}

/// Yes/no, text, single and multiple choice questions.
///
/// Every method takes the value to use when nobody is there to answer.
pub trait PromptInterface: Send + Sync {
    fn confirm(&self, message: &str, default: bool, help: &str) -> Result<bool>;
    fn input(&self, message: &str, default: &str, help: &str) -> Result<String>;
    fn select(&self, message: &str, options: &[String], default: &str, help: &str) -> Result<String>;
    fn multi_select(
        &self,
        message: &str,
        options: &[String],
        defaults: &[String],
        help: &str,
    ) -> Result<Vec<String>>;
}

/// Terminal prompts that return the default without blocking when the
/// session is not interactive.
pub struct RealPrompt {
    interactive: bool,
}

impl RealPrompt {
    pub fn new(interactive: bool) -> Self {
        Self { interactive }
    }
}

impl PromptInterface for RealPrompt {
    fn confirm(&self, message: &str, default: bool, help: &str) -> Result<bool> {
        if !self.interactive {
            return Ok(default);
        }
        prompt::confirm(message, default, help).context("could not prompt")
    }

    fn input(&self, message: &str, default: &str, help: &str) -> Result<String> {
        if !self.interactive {
            return Ok(default.to_string());
        }
        prompt::input(message, default, help).context("could not prompt")
    }

    fn select(&self, message: &str, options: &[String], default: &str, help: &str) -> Result<String> {
        if !self.interactive {
            return Ok(default.to_string());
        }
        prompt::select(message, options, default, help).context("could not prompt")
    }

    fn multi_select(
        &self,
        message: &str,
        options: &[String],
        defaults: &[String],
        help: &str,
    ) -> Result<Vec<String>> {
        if !self.interactive {
            return Ok(defaults.to_vec());
        }
        prompt::multi_select(message, options, defaults, help).context("could not prompt")
    }
}
