pub mod constants;
pub use constants::*;

mod client_interface;
pub use client_interface::*;

pub mod error;
pub use error::{RpcCallerError, RpcInvocationError};

mod prebuffered;
pub use prebuffered::*;

mod response;
pub use response::decode_rpc_response;

mod transport_state;
pub use transport_state::RpcTransportState;
