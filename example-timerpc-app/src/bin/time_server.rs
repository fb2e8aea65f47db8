use clap::Parser;
use example_timerpc_app::{ServerArgs, init_tracing, run_server};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = ServerArgs::parse();

    match run_server(&args).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("Server error: {}", err);
            ExitCode::FAILURE
        }
    }
}
