use std::process::ExitCode;

use clap::Parser;

use wallet_cli::cli::Cli;
use wallet_cli::error::EXIT_SUCCESS;
use wallet_cli::logging::init_logging;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match wallet_cli::run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::from(EXIT_SUCCESS)
        }
        Err(e) => {
            tracing::debug!(error = ?e, "command failed");
            eprintln!("error: {e}");
            ExitCode::from(e.exit_code())
        }
    }
}
