//! GitHub REST client and the account / repository data model.

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use octocrab::Octocrab;
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

use crate::constants::{self, api};
use crate::errors::GitHubError;
use crate::git::Remote;

/// Preferred git URL protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Protocol {
    Https,
    Ssh,
    Git,
    #[default]
    Unknown,
}

impl Protocol {
    /// Lenient parse: unrecognized text maps to [`Protocol::Unknown`].
    pub fn parse(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "https" => Protocol::Https,
            "ssh" => Protocol::Ssh,
            "git" => Protocol::Git,
            _ => Protocol::Unknown,
        }
    }
}

/// Access level of a hosted repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Public,
    Private,
    Internal,
}

impl Visibility {
    pub const ALL: [Visibility; 3] = [Visibility::Public, Visibility::Private, Visibility::Internal];

    /// Label shown in the visibility prompt.
    pub fn label(&self) -> &'static str {
        match self {
            Visibility::Public => "Public",
            Visibility::Private => "Private",
            Visibility::Internal => "Internal",
        }
    }
}

impl FromStr for Visibility {
    type Err = GitHubError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "public" => Ok(Visibility::Public),
            "private" => Ok(Visibility::Private),
            "internal" => Ok(Visibility::Internal),
            _ => Err(GitHubError::InvalidVisibility(s.to_string())),
        }
    }
}

impl fmt::Display for Visibility {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Deserialize)]
pub enum AccountKind {
    #[default]
    User,
    Organization,
    #[serde(other)]
    Other,
}

/// A GitHub account (user or organization).
#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Account {
    #[serde(default)]
    pub id: u64,
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(rename = "type", default)]
    pub kind: AccountKind,
}

/// The authenticated user, with org memberships and protocol preference.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct User {
    pub id: u64,
    pub login: String,
    pub name: Option<String>,
    pub orgs: Vec<Account>,
    pub git_protocol: Protocol,
}

impl User {
    /// Logins that may own a new repository: the user first, then each org.
    pub fn owner_choices(&self) -> Vec<String> {
        std::iter::once(self.login.clone())
            .chain(self.orgs.iter().map(|org| org.login.clone()))
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Default, Deserialize)]
pub struct Repository {
    pub name: String,
    pub full_name: String,
    #[serde(default)]
    pub owner: Account,
    #[serde(default)]
    pub visibility: Option<Visibility>,
    #[serde(rename = "html_url", default)]
    pub url: String,
    #[serde(default)]
    pub clone_url: String,
    #[serde(default)]
    pub ssh_url: String,
    #[serde(default)]
    pub git_url: String,
}

impl Repository {
    /// URL for the given protocol, falling back to the HTTPS clone URL.
    pub fn remote_url(&self, protocol: Protocol) -> &str {
        let preferred = match protocol {
            Protocol::Git => &self.git_url,
            Protocol::Ssh => &self.ssh_url,
            Protocol::Https | Protocol::Unknown => &self.clone_url,
        };
        if preferred.is_empty() {
            &self.clone_url
        } else {
            preferred
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RepositoryRequest {
    pub name: String,
    pub private: bool,
    pub visibility: Visibility,
}

impl RepositoryRequest {
    pub fn new(name: impl Into<String>, visibility: Visibility) -> Self {
        Self {
            name: name.into(),
            private: visibility == Visibility::Private,
            visibility,
        }
    }
}

/// Split a remote URL into `(host, owner, name)`.
///
/// Understands `https://host/o/r(.git)`, `ssh://git@host/o/r.git`,
/// `git://host/o/r.git` and the scp-like `git@host:o/r.git`.
pub fn parse_remote_url(url: &str) -> Option<(String, String, String)> {
    let url = url.trim();
    let rest = if let Some((scheme, rest)) = url.split_once("://") {
        match scheme {
            "https" | "http" | "ssh" | "git" | "git+ssh" => rest,
            _ => return None,
        }
    } else {
        let (user_host, path) = url.split_once(':')?;
        return split_path(host_of(user_host), path);
    };
    let (authority, path) = rest.split_once('/')?;
    // Drop userinfo and port.
    let host = host_of(authority);
    let host = host.split(':').next().unwrap_or(host);
    split_path(host, path)
}

fn host_of(authority: &str) -> &str {
    authority.rsplit_once('@').map_or(authority, |(_, host)| host)
}

fn split_path(host: &str, path: &str) -> Option<(String, String, String)> {
    let path = path.trim_matches('/');
    let path = path.strip_suffix(".git").unwrap_or(path);
    let (owner, name) = path.split_once('/')?;
    if host.is_empty() || owner.is_empty() || name.is_empty() || name.contains('/') {
        return None;
    }
    Some((host.to_string(), owner.to_string(), name.to_string()))
}

/// Pick the first remote that points at `host`, preferring the names in
/// [`constants::REMOTE_PREFERENCE`].
pub fn find_hosted_remote(remotes: &[Remote], host: &str) -> Option<Repository> {
    let rank = |remote: &Remote| {
        constants::REMOTE_PREFERENCE
            .iter()
            .position(|name| *name == remote.name)
            .unwrap_or(constants::REMOTE_PREFERENCE.len())
    };
    let mut sorted: Vec<&Remote> = remotes.iter().collect();
    sorted.sort_by_key(|remote| rank(remote));

    sorted.into_iter().find_map(|remote| {
        let (remote_host, owner, name) = parse_remote_url(&remote.url)?;
        if !remote_host.eq_ignore_ascii_case(host) {
            return None;
        }
        Some(Repository {
            full_name: format!("{}/{}", owner, name),
            url: format!("https://{}/{}/{}", remote_host, owner, name),
            clone_url: format!("https://{}/{}/{}.git", remote_host, owner, name),
            name,
            owner: Account {
                login: owner,
                ..Account::default()
            },
            ..Repository::default()
        })
    })
}

/// Everything but RFC 3986 unreserved characters.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode each `/`-separated segment of `path` for use in a route.
fn encode_path(path: &str) -> String {
    path.split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect::<Vec<_>>()
        .join("/")
}

#[derive(Serialize)]
struct PageQuery {
    per_page: usize,
    page: u32,
}

pub struct GitHubClient {
    octocrab: Octocrab,
    git_protocol: Protocol,
}

impl GitHubClient {
    pub fn new(token: String, api_url: Option<&str>, git_protocol: Protocol) -> Result<Self> {
        let mut builder = Octocrab::builder().personal_token(token);
        if let Some(url) = api_url {
            builder = builder
                .base_uri(url)
                .with_context(|| format!("Invalid GitHub API URL: {}", url))?;
        }
        let octocrab = builder.build().context("Failed to create Octocrab client")?;

        Ok(Self::with_octocrab(octocrab, git_protocol))
    }

    pub fn with_octocrab(octocrab: Octocrab, git_protocol: Protocol) -> Self {
        Self {
            octocrab,
            git_protocol,
        }
    }

    /// The authenticated user, their organizations and protocol preference.
    pub async fn current_user(&self) -> Result<User> {
        tracing::debug!("fetching current user");
        let account: Account = self
            .octocrab
            .get(api::USER_PATH, None::<&()>)
            .await
            .map_err(GitHubError::from)
            .context("Failed to get current user")?;

        let mut orgs: Vec<Account> = Vec::new();
        for page in 1u32.. {
            let query = PageQuery {
                per_page: api::PER_PAGE,
                page,
            };
            let batch: Vec<Account> = self
                .octocrab
                .get(api::USER_ORGS_PATH, Some(&query))
                .await
                .map_err(GitHubError::from)
                .context("Failed to list organizations")?;
            let last = batch.len() < api::PER_PAGE;
            orgs.extend(batch);
            if last {
                break;
            }
        }
        for org in &mut orgs {
            org.kind = AccountKind::Organization;
        }

        Ok(User {
            id: account.id,
            login: account.login,
            name: account.name,
            orgs,
            git_protocol: self.git_protocol,
        })
    }

    /// Look up a user or organization. Returns `None` on 404.
    pub async fn get_account(&self, name: &str) -> Result<Option<Account>> {
        let path = format!("/users/{}", encode_path(name));
        tracing::debug!(%path, "looking up account");

        match self.octocrab.get::<Account, _, _>(path, None::<&()>).await {
            Ok(account) => Ok(Some(account)),
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code == 404 => Ok(None),
            Err(e) => Err(GitHubError::from(e)).context("Failed to get account"),
        }
    }

    /// Look up a repository by `owner/name`. Returns `None` on 404.
    pub async fn get_repo(&self, full_name: &str) -> Result<Option<Repository>> {
        let path = format!("/repos/{}", encode_path(full_name));
        tracing::debug!(%path, "looking up repository");

        match self.octocrab.get::<Repository, _, _>(path, None::<&()>).await {
            Ok(repo) => Ok(Some(repo)),
            Err(octocrab::Error::GitHub { source, .. }) if source.status_code == 404 => Ok(None),
            Err(e) => Err(GitHubError::from(e)).context("Failed to get repository"),
        }
    }

    /// Create a repository under `owner`, which may be the user or one of their orgs.
    pub async fn create_repo(
        &self,
        owner: &str,
        name: &str,
        visibility: Visibility,
    ) -> Result<Repository> {
        crate::validation::validate_repo_owner(owner)?;
        crate::validation::validate_repo_name(name)?;

        let account = self
            .get_account(owner)
            .await?
            .ok_or_else(|| GitHubError::AccountNotFound(owner.to_string()))?;

        let path = match account.kind {
            AccountKind::Organization => format!("/orgs/{}/repos", encode_path(owner)),
            AccountKind::User => api::USER_REPOS_PATH.to_string(),
            AccountKind::Other => {
                return Err(GitHubError::UnsupportedAccount {
                    login: owner.to_string(),
                    kind: "unknown".to_string(),
                }
                .into());
            }
        };
        let body = RepositoryRequest::new(name, visibility);
        tracing::debug!(%path, ?body, "creating repository");

        let repo: Repository = self
            .octocrab
            .post(path, Some(&body))
            .await
            .map_err(GitHubError::from)
            .context("Failed to create repository")?;

        Ok(repo)
    }
}
