//! Error formatting utilities.
//!
//! This module provides helper functions for turning error chains and setup
//! failures into the single line shown to the user.

use anyhow::Error;

use crate::errors::SetupError;

/// Format an error and its source chain into a detailed error message.
///
/// This function extracts the full error chain from an `anyhow::Error`,
/// joining all error messages with " → " so the stderr text of a failed
/// `git` call survives next to the step that ran it.
///
/// # Example
///
/// ```
/// use gh_setup::error::format_error_chain;
///
/// let err = anyhow::anyhow!("exit status: 128")
///     .context("failed to run git push")
///     .context("Failed to push to origin");
/// let formatted = format_error_chain(&err);
/// assert_eq!(formatted, "Failed to push to origin → failed to run git push → exit status: 128");
/// ```
pub fn format_error_chain(error: &Error) -> String {
    let mut error_chain = vec![format!("{}", error)];
    let mut current = error.source();
    while let Some(err) = current {
        error_chain.push(format!("{}", err));
        current = err.source();
    }
    error_chain.join(" → ")
}

/// Render a setup failure for the final failure line.
pub fn describe_setup_error(error: &SetupError) -> String {
    match error {
        SetupError::Aborted => "Aborted.".to_string(),
        SetupError::Operational(err) => format_error_chain(err),
    }
}
