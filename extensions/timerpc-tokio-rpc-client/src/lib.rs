mod rpc_client;
pub use rpc_client::RpcClient;

pub use timerpc_rpc_service::{RpcCallPrebuffered, RpcCallerError, RpcTransportState};
