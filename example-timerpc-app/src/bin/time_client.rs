use clap::Parser;
use example_timerpc_app::{ClientArgs, fetch_server_time, init_tracing};
use std::process::ExitCode;

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();
    let args = ClientArgs::parse();

    match fetch_server_time(&args.host, args.port).await {
        Ok(unix_secs) => {
            println!("{unix_secs}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            tracing::error!("Client error: {}", err);
            ExitCode::FAILURE
        }
    }
}
