use crate::{RpcCallerError, RpcInvocationError};
use std::io;
use timerpc::rpc::{RpcResponse, RpcResultStatus};

/// Converts a response envelope into the raw result payload or the error the
/// server reported.
///
/// An unrecognized status byte means the peer speaks a different protocol and
/// is reported as a transport error.
pub fn decode_rpc_response(response: RpcResponse) -> Result<Vec<u8>, RpcCallerError> {
    match response.result_status() {
        Some(RpcResultStatus::Success) => Ok(response.rpc_payload_bytes),
        Some(RpcResultStatus::MethodNotFound) => Err(RpcInvocationError::UnknownProcedure {
            method_name: String::from_utf8_lossy(&response.rpc_payload_bytes).into_owned(),
        }
        .into()),
        Some(RpcResultStatus::Fail) => Err(RpcInvocationError::Handler {
            message: String::from_utf8_lossy(&response.rpc_payload_bytes).into_owned(),
        }
        .into()),
        None => Err(RpcCallerError::Transport(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("unknown result status {}", response.rpc_result_status),
        ))),
    }
}
