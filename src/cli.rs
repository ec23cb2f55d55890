use clap::Parser;

/// Set up a new GitHub repository for the current directory.
///
/// Initializes git if needed, creates or links the GitHub repo, commits
/// uncommitted files and pushes the result.
#[derive(Parser, Debug, Default)]
#[command(name = "gh-setup", version, about, long_about = None)]
pub struct Cli {
    /// Do not prompt for input; every question takes its default answer
    #[arg(long)]
    pub no_prompt: bool,
}
