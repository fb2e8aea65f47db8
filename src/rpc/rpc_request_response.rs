use crate::frame::{FrameCodec, FrameDecodeError};
use crate::rpc::{RpcDispatchError, RpcResultStatus};
use bitcode::{Decode, Encode};

/// Request envelope: the procedure to invoke and its serialized arguments.
#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct RpcRequest {
    /// Correlates the response with this request. Assigned by the caller.
    pub rpc_request_id: u32,
    pub rpc_method_name: String,
    /// The serialized args. Empty-args methods still carry their (possibly
    /// zero-length) encoding here.
    pub rpc_param_bytes: Vec<u8>,
}

/// Response envelope: the outcome of exactly one `RpcRequest`.
#[derive(Encode, Decode, PartialEq, Debug, Clone)]
pub struct RpcResponse {
    pub rpc_request_id: u32,
    /// Raw `RpcResultStatus` byte. Kept raw so an unknown tag surfaces as a
    /// caller-side error instead of an envelope decode failure.
    pub rpc_result_status: u8,
    pub rpc_payload_bytes: Vec<u8>,
}

impl RpcRequest {
    /// Serializes the envelope and wraps it in a length-delimited frame.
    ///
    /// Fails with `FrameTooLarge` when the encoded envelope does not fit in a
    /// single frame.
    pub fn to_frame(&self) -> Result<Vec<u8>, FrameDecodeError> {
        FrameCodec::encode(&bitcode::encode(self))
    }

    /// Decodes a frame payload (without the length prefix) into a request.
    pub fn decode(payload: &[u8]) -> Result<Self, FrameDecodeError> {
        bitcode::decode(payload).map_err(|e| FrameDecodeError::CorruptFrame(e.to_string()))
    }
}

impl RpcResponse {
    /// Builds the response for `rpc_request_id` out of a dispatch outcome.
    pub fn from_dispatch_result(
        rpc_request_id: u32,
        result: Result<Vec<u8>, RpcDispatchError>,
    ) -> Self {
        let (status, payload) = match result {
            Ok(encoded) => (RpcResultStatus::Success, encoded),
            Err(RpcDispatchError::UnknownProcedure { method_name }) => {
                (RpcResultStatus::MethodNotFound, method_name.into_bytes())
            }
            Err(RpcDispatchError::HandlerError { message, .. }) => {
                (RpcResultStatus::Fail, message.into_bytes())
            }
        };

        RpcResponse {
            rpc_request_id,
            rpc_result_status: status.into(),
            rpc_payload_bytes: payload,
        }
    }

    /// Interprets the raw status byte.
    pub fn result_status(&self) -> Option<RpcResultStatus> {
        RpcResultStatus::try_from(self.rpc_result_status).ok()
    }

    pub fn to_frame(&self) -> Result<Vec<u8>, FrameDecodeError> {
        FrameCodec::encode(&bitcode::encode(self))
    }

    pub fn decode(payload: &[u8]) -> Result<Self, FrameDecodeError> {
        bitcode::decode(payload).map_err(|e| FrameDecodeError::CorruptFrame(e.to_string()))
    }
}
