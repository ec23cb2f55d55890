//! The setup wizard: ordered precondition checks and remote resolution.
//!
//! Each `ensure_*` step checks first and only acts when something is missing,
//! so running the wizard on a repository that is already set up changes nothing.

use std::env;
use std::path::PathBuf;

use anyhow::{Context, anyhow};

use crate::app_deps::{GitHubApi, GitRunner, PromptInterface, RealGitHubApi, RealPrompt};
use crate::cli::Cli;
use crate::config::{self, Config};
use crate::errors::SetupError;
use crate::git::SystemGit;
use crate::github::{GitHubClient, Repository, User, Visibility};
use crate::paths;
use crate::session::IoSession;
use crate::validation;

/// Per-run settings resolved from the config file and environment.
#[derive(Debug, Clone, PartialEq)]
pub struct SetupOptions {
    /// Remote to verify or create.
    pub remote: String,
    /// Directory being set up; its base name is the default repo name.
    pub working_dir: PathBuf,
    /// Disables commit signing and hooks, and skips fetch / set-head / push.
    pub test_mode: bool,
    pub default_visibility: Visibility,
    pub commit_message: String,
}

impl SetupOptions {
    pub fn from_config(config: &Config, working_dir: PathBuf, test_mode: bool) -> Self {
        Self {
            remote: config.remote_name().to_string(),
            working_dir,
            test_mode,
            default_visibility: config.default_visibility(),
            commit_message: config.commit_message().to_string(),
        }
    }

    /// Directory base name, normalized into a valid repository name.
    fn default_repo_name(&self) -> anyhow::Result<String> {
        let dir = self
            .working_dir
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                anyhow!(
                    "Could not determine a repository name from {}",
                    self.working_dir.display()
                )
            })?;
        validation::normalize_repo_name(dir)
    }
}

pub struct App;

impl App {
    /// Run the wizard in the current directory against the real git, GitHub and terminal.
    pub async fn run(cli: Cli, session: &mut IoSession) -> Result<(), SetupError> {
        if cli.no_prompt {
            session.set_interactive(false);
        }

        paths::load_env_file();
        let config = Config::load()?;
        let working_dir = env::current_dir().context("Failed to read current directory")?;
        let git = SystemGit::new(&working_dir);

        let token = config.resolve_token()?;
        let client = GitHubClient::new(token, config.api_url.as_deref(), config.git_protocol())?;
        let github = RealGitHubApi::new(client, git.clone(), config.host());
        let prompt = RealPrompt::new(session.is_interactive());
        let options = SetupOptions::from_config(&config, working_dir, config::is_test_env());

        Self::run_with_deps(&git, &github, &prompt, session, &options).await
    }

    /// Run the wizard against injected collaborators.
    pub async fn run_with_deps(
        git: &dyn GitRunner,
        github: &dyn GitHubApi,
        prompt: &dyn PromptInterface,
        session: &IoSession,
        options: &SetupOptions,
    ) -> Result<(), SetupError> {
        let setup = Setup {
            git,
            github,
            prompt,
            session,
            options,
        };
        setup.run().await
    }
}

struct Setup<'a> {
    git: &'a dyn GitRunner,
    github: &'a dyn GitHubApi,
    prompt: &'a dyn PromptInterface,
    session: &'a IoSession,
    options: &'a SetupOptions,
}

impl Setup<'_> {
    async fn run(&self) -> Result<(), SetupError> {
        self.ensure_git_installed()?;
        self.ensure_working_dir_init()?;
        self.ensure_remote().await?;
        self.ensure_working_dir_clean()?;
        self.ensure_push()?;

        self.session.success("Setup complete.");
        Ok(())
    }

    fn ensure_git_installed(&self) -> Result<(), SetupError> {
        if self.git.is_installed() {
            return Ok(());
        }
        Err(anyhow!("could not find git executable in PATH").into())
    }

    fn ensure_working_dir_init(&self) -> Result<(), SetupError> {
        if self.git.is_initialized() {
            return Ok(());
        }
        if !self.prompt.confirm("Initialize the repo?", true, "")? {
            self.session
                .failure("Unable to continue until the working directory is initialized.");
            return Err(SetupError::Aborted);
        }
        self.git.exec(&["init"]).context("Failed to initialize repository")?;
        tracing::info!(dir = %self.options.working_dir.display(), "initialized repository");
        Ok(())
    }

    async fn ensure_remote(&self) -> Result<(), SetupError> {
        let remote = self.options.remote.as_str();
        if self.git.has_remote(remote) {
            tracing::debug!(remote, "remote already configured");
            return Ok(());
        }
        match self.github.current_remote().await {
            Ok(Some(repo)) => {
                tracing::debug!(repo = %repo.full_name, "found existing GitHub remote");
                return Ok(());
            }
            Ok(None) => {}
            Err(err) => tracing::debug!(error = %err, "could not detect an existing remote"),
        }

        // Default guess: <login>/<directory name>.
        let user = self.github.current_user().await?;
        let dir = self.options.default_repo_name()?;
        let guess = format!("{}/{}", user.login, dir);

        if let Some(repo) = self.github.get_repo(&guess).await? {
            self.session
                .info(&format!("A repo named '{}' already exists on GitHub.", guess));
            if self.prompt.confirm("Add it as a remote?", true, "")? {
                return self.set_remote(&repo, &user);
            }
        }

        if !self.prompt.confirm("Create a new repo on GitHub?", true, "")? {
            self.session
                .failure("Unable to continue until a remote has been configured.");
            return Err(SetupError::Aborted);
        }

        let owner = self
            .prompt
            .select("GitHub repo owner", &user.owner_choices(), &user.login, "")?;
        let name = self.prompt.input("GitHub repo name", &dir, "")?;
        let visibility_options: Vec<String> = Visibility::ALL
            .iter()
            .map(|v| v.label().to_string())
            .collect();
        let visibility = self.prompt.select(
            "GitHub repo visibility",
            &visibility_options,
            self.options.default_visibility.label(),
            "",
        )?;

        // Reject bad answers before anything goes over the network.
        let visibility: Visibility = visibility.parse().map_err(anyhow::Error::from)?;
        validation::validate_repo_owner(&owner)?;
        validation::validate_repo_name(&name)?;

        self.session.start_progress("Creating repo");
        let created = self.github.create_repo(&owner, &name, visibility).await;
        self.session.stop_progress();
        let repo = created?;
        self.session.success(&format!("Repo created: {}", repo.url));

        self.set_remote(&repo, &user)
    }

    fn ensure_working_dir_clean(&self) -> Result<(), SetupError> {
        if !self.git.is_dirty() {
            return Ok(());
        }

        let lines = self.git.status_lines()?;
        self.session
            .info("There are uncommitted files in the working directory:");
        self.session.write_line("");
        for line in &lines {
            self.session.write_line(line);
        }
        self.session.write_line("");

        if !self.prompt.confirm("Add and commit?", true, "")? {
            self.session
                .failure("Unable to continue until the working directory is clean.");
            return Err(SetupError::Aborted);
        }
        self.commit()
    }

    fn ensure_push(&self) -> Result<(), SetupError> {
        if !self.git.has_unpushed_commits() {
            return Ok(());
        }
        if !self
            .prompt
            .confirm("Push local commits to the remote?", true, "")?
        {
            return Ok(());
        }
        if self.options.test_mode {
            tracing::debug!("test mode, skipping push");
            return Ok(());
        }

        let remote = self.options.remote.as_str();
        self.session.start_progress("Pushing");
        if let Err(err) = self.git.exec(&["push", "-u", remote, "HEAD"]) {
            self.session.stop_progress();
            // Usually the branch is behind the remote and git suggests `git pull`;
            // point the branch at the remote head so that pull works.
            let remote_head = format!("{}/HEAD", remote);
            if let Err(fallback) = self.git.exec(&["branch", "-u", &remote_head, "HEAD"]) {
                tracing::debug!(error = %fallback, "could not set upstream after failed push");
            }
            return Err(err.context(format!("Failed to push to {}", remote)).into());
        }
        self.session.stop_progress();
        self.set_remote_head();
        Ok(())
    }

    fn set_remote(&self, repo: &Repository, user: &User) -> Result<(), SetupError> {
        let remote = self.options.remote.as_str();
        let url = repo.remote_url(user.git_protocol);

        self.session.start_progress("Adding remote");
        let added = self.git.exec(&["remote", "add", remote, url]);
        self.session.stop_progress();
        added.with_context(|| format!("Failed to add remote {}", remote))?;

        if !self.options.test_mode {
            self.session.start_progress("Fetching");
            let fetched = self.git.exec(&["fetch", remote]);
            self.session.stop_progress();
            match fetched {
                Ok(_) => self.set_remote_head(),
                Err(err) => self
                    .session
                    .warning(&format!("Could not fetch {}: {}", remote, err)),
            }
        }

        self.session
            .success(&format!("Remote added: {} {}", remote, url));
        Ok(())
    }

    /// Point `<remote>/HEAD` at the remote default branch and track it.
    /// Failures are logged and otherwise ignored.
    fn set_remote_head(&self) {
        if self.options.test_mode {
            return;
        }
        let remote = self.options.remote.as_str();

        self.session.start_progress("Setting remote HEAD");
        // Fails when the remote has no commits yet.
        if let Err(err) = self.git.exec(&["remote", "set-head", remote, "-a"]) {
            self.session.stop_progress();
            tracing::debug!(error = %err, "could not set remote HEAD");
            return;
        }
        if self.git.has_commits() {
            let remote_head = format!("{}/HEAD", remote);
            self.session.start_progress("Setting upstream");
            if let Err(err) = self.git.exec(&["branch", "-u", &remote_head, "HEAD"]) {
                tracing::debug!(error = %err, "could not set upstream");
            }
        }
        self.session.stop_progress();
    }

    fn commit(&self) -> Result<(), SetupError> {
        self.git.exec(&["add", "."]).context("Failed to stage files")?;
        let message = self
            .prompt
            .input("Commit message", &self.options.commit_message, "")?;

        let mut args = vec!["commit", "-m", message.as_str()];
        if self.options.test_mode {
            args.extend(["--no-gpg-sign", "--no-verify"]);
        }

        // Signing may wait on a hardware key; the spinner shows we're busy.
        self.session.start_progress("Committing");
        let res = self.git.exec(&args);
        self.session.stop_progress();
        res.context("Failed to commit")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_options_from_config_defaults() {
        let options = SetupOptions::from_config(&Config::default(), PathBuf::from("/tmp/my-project"), true);
        assert_eq!(options.remote, "origin");
        assert_eq!(options.default_visibility, Visibility::Public);
        assert_eq!(options.commit_message, "Initial commit");
        assert!(options.test_mode);
        assert_eq!(options.default_repo_name().unwrap(), "my-project");
    }

    #[test]
    fn test_default_repo_name_fails_on_root() {
        let options = SetupOptions::from_config(&Config::default(), PathBuf::from("/"), false);
        assert!(options.default_repo_name().is_err());
    }

    #[test]
    fn test_default_repo_name_replaces_spaces() {
        let options =
            SetupOptions::from_config(&Config::default(), PathBuf::from("/tmp/My Project"), false);
        assert_eq!(options.default_repo_name().unwrap(), "My-Project");
    }
}
