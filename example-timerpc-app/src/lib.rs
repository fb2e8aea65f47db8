use clap::Parser;
use example_timerpc_service_definition::prebuffered::{
    GiveServerTime, GiveServerTimeArgs, register_time_server,
};
use timerpc::rpc::RpcRegistryError;
use timerpc_rpc_service::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};
use timerpc_tokio_rpc_client::{RpcCallPrebuffered, RpcCallerError, RpcClient};
use timerpc_tokio_rpc_server::RpcServer;
use tracing_subscriber::EnvFilter;

pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Host the client dials by default. The server's wildcard default is not a
/// portable destination address, so the client uses loopback.
pub const DEFAULT_CLIENT_HOST: &str = "127.0.0.1";

#[derive(Parser, Debug, Clone)]
#[command(name = "time-server")]
#[command(about = "Serves TimeServer.GiveServerTime over timerpc", long_about = None)]
pub struct ServerArgs {
    /// Address to bind
    #[arg(long, default_value = DEFAULT_SERVER_HOST)]
    pub host: String,

    /// Port to bind
    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT)]
    pub port: u16,
}

#[derive(Parser, Debug, Clone)]
#[command(name = "time-client")]
#[command(about = "Asks a timerpc server for its current Unix time", long_about = None)]
pub struct ClientArgs {
    /// Server host
    #[arg(long, default_value = DEFAULT_CLIENT_HOST)]
    pub host: String,

    /// Server port
    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT)]
    pub port: u16,
}

/// Installs the global `tracing` subscriber. Honors `RUST_LOG`, defaulting to
/// `info`. Logs go to stderr so stdout only carries program output.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// A server with the time procedure registered.
pub fn build_time_server() -> Result<RpcServer, RpcRegistryError> {
    let mut server = RpcServer::new();
    register_time_server(&mut server)?;
    Ok(server)
}

/// Binds, then serves until Ctrl-C or a fatal listener error.
pub async fn run_server(args: &ServerArgs) -> Result<(), BoxError> {
    let listener = build_time_server()?
        .listen_on(&args.host, args.port)
        .await?;

    listener.serve_with_shutdown(shutdown_signal()).await?;

    Ok(())
}

/// Connects, performs exactly one `GiveServerTime` call and returns the result.
pub async fn fetch_server_time(host: &str, port: u16) -> Result<i64, RpcCallerError> {
    let mut client = RpcClient::new(host, port).await?;

    GiveServerTime::call(&mut client, GiveServerTimeArgs {}).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        // Without a signal handler the server simply runs until killed.
        tracing::warn!("Could not listen for Ctrl-C: {}", err);
        std::future::pending::<()>().await;
    }
}
