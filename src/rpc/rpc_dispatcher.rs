use crate::frame::{FrameDecodeError, FrameStreamDecoder};
use crate::rpc::{RpcDispatchError, RpcMethodRegistry, RpcRequest, RpcResponse};
use std::sync::Arc;

/// Per-connection request dispatcher.
///
/// Owns the frame reassembly state for one connection and a shared handle to
/// the frozen method registry. Bytes read off the socket go in through
/// `read_bytes`; every complete request is dispatched and its encoded response
/// frame is handed to `on_emit` in request order.
pub struct RpcDispatcher {
    registry: Arc<RpcMethodRegistry>,
    decoder: FrameStreamDecoder,
}

impl RpcDispatcher {
    pub fn new(registry: Arc<RpcMethodRegistry>) -> Self {
        Self {
            registry,
            decoder: FrameStreamDecoder::new(),
        }
    }

    /// Feeds raw transport bytes into the dispatcher.
    ///
    /// Returns the number of requests answered. A frame that cannot be decoded
    /// into a request is returned as an error; the caller is expected to drop
    /// the connection since there is no request id to answer against.
    ///
    /// A result too large for one frame is answered with a `Fail` response
    /// instead, so the caller sees a handler error and the connection stays up.
    pub fn read_bytes<E>(&mut self, bytes: &[u8], mut on_emit: E) -> Result<usize, FrameDecodeError>
    where
        E: FnMut(&[u8]),
    {
        let mut answered = 0;

        for frame in self.decoder.read_bytes(bytes) {
            let request = RpcRequest::decode(&frame?)?;

            tracing::debug!(
                "Dispatching request {} to `{}`",
                request.rpc_request_id,
                request.rpc_method_name
            );

            let result = self
                .registry
                .dispatch(&request.rpc_method_name, &request.rpc_param_bytes);

            if let Err(err) = &result {
                tracing::debug!("Request {} failed: {}", request.rpc_request_id, err);
            }

            let response = RpcResponse::from_dispatch_result(request.rpc_request_id, result);
            let frame = match response.to_frame() {
                Ok(frame) => frame,
                Err(err) => {
                    tracing::warn!(
                        "Response to request {} cannot be sent: {}",
                        request.rpc_request_id,
                        err
                    );
                    RpcResponse::from_dispatch_result(
                        request.rpc_request_id,
                        Err(RpcDispatchError::HandlerError {
                            method_name: request.rpc_method_name,
                            message: err.to_string(),
                        }),
                    )
                    .to_frame()?
                }
            };
            on_emit(&frame);
            answered += 1;
        }

        Ok(answered)
    }

    /// True while a partially received request is buffered.
    pub fn has_pending_bytes(&self) -> bool {
        self.decoder.pending_len() > 0
    }
}
