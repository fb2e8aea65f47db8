mod accept_backoff;

mod error;
pub use error::RpcServerError;

mod rpc_server;
pub use rpc_server::{RpcListener, RpcServer};

pub use timerpc_rpc_service::RpcServiceEndpointInterface;

pub mod utils;
