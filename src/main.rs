use std::process::ExitCode;

use clap::Parser;

use gh_setup::app::App;
use gh_setup::cli::Cli;
use gh_setup::error::describe_setup_error;
use gh_setup::logging;
use gh_setup::session::IoSession;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init();

    let mut session = IoSession::system();
    match App::run(cli, &mut session).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::debug!(error = ?err, "setup failed");
            session.failure(&describe_setup_error(&err));
            ExitCode::FAILURE
        }
    }
}
