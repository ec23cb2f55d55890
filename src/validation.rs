//! Input validation utilities.
//!
//! This module provides validation functions for repository owners, repository
//! names and GitHub tokens so bad input is rejected before any API call.

use anyhow::{Context, Result};
use regex::Regex;

use crate::constants;

/// Validate a repository owner name.
///
/// # Arguments
///
/// * `owner` - The repository owner name to validate
///
/// # Returns
///
/// Returns `Ok(())` if the owner is valid, or an error with a descriptive message.
pub fn validate_repo_owner(owner: &str) -> Result<()> {
    let trimmed = owner.trim();

    if trimmed.is_empty() {
        anyhow::bail!("Repository owner cannot be empty");
    }

    if trimmed.len() > constants::repo::MAX_OWNER_LENGTH {
        anyhow::bail!(
            "Repository owner cannot exceed {} characters (got {})",
            constants::repo::MAX_OWNER_LENGTH,
            trimmed.len()
        );
    }

    let re = Regex::new(constants::repo::VALID_OWNER_PATTERN)
        .context("Failed to compile validation regex")?;

    if !re.is_match(trimmed) {
        anyhow::bail!(
            "Repository owner can only contain letters, numbers, and hyphens. Got: '{}'",
            trimmed
        );
    }

    Ok(())
}

/// Validate a repository name.
///
/// # Arguments
///
/// * `name` - The repository name to validate
///
/// # Returns
///
/// Returns `Ok(())` if the name is valid, or an error with a descriptive message.
pub fn validate_repo_name(name: &str) -> Result<()> {
    let trimmed = name.trim();

    if trimmed.is_empty() {
        anyhow::bail!("Repository name cannot be empty");
    }

    if trimmed.len() > constants::repo::MAX_REPO_NAME_LENGTH {
        anyhow::bail!(
            "Repository name cannot exceed {} characters (got {})",
            constants::repo::MAX_REPO_NAME_LENGTH,
            trimmed.len()
        );
    }

    if trimmed == "." || trimmed == ".." {
        anyhow::bail!("Repository name cannot be '{}'", trimmed);
    }

    let re = Regex::new(constants::repo::VALID_REPO_NAME_PATTERN)
        .context("Failed to compile validation regex")?;

    if !re.is_match(trimmed) {
        anyhow::bail!(
            "Repository name can only contain letters, numbers, '.', '_' and '-'. Got: '{}'",
            trimmed
        );
    }

    Ok(())
}

/// Turn a directory name into a repository name GitHub would accept.
///
/// Runs of characters outside `[A-Za-z0-9._-]` become a single `-`, the way
/// GitHub rewrites names on creation: `My Project` becomes `My-Project`.
pub fn normalize_repo_name(name: &str) -> Result<String> {
    let re = Regex::new(constants::repo::INVALID_REPO_NAME_CHARS)
        .context("Failed to compile validation regex")?;
    Ok(re.replace_all(name.trim(), "-").into_owned())
}

/// Validate a GitHub token format (basic checks).
///
/// Classic (`ghp_`), OAuth (`gho_`) and fine-grained (`github_pat_`) tokens all
/// pass; only the length is checked.
pub fn validate_token(token: &str) -> Result<()> {
    let trimmed = token.trim();

    if trimmed.is_empty() {
        anyhow::bail!("GitHub token cannot be empty");
    }

    if trimmed.len() < constants::token::MIN_LENGTH {
        anyhow::bail!(
            "GitHub token appears too short (minimum {} characters)",
            constants::token::MIN_LENGTH
        );
    }

    if trimmed.len() > constants::token::MAX_LENGTH {
        anyhow::bail!(
            "GitHub token appears too long (maximum {} characters)",
            constants::token::MAX_LENGTH
        );
    }

    Ok(())
}
