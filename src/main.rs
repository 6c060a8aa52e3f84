mod cli;
mod runner;

use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    let cli = cli::parse_cli();
    runner::run_from_cli(cli).await
}
