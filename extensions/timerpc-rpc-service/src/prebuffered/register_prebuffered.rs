use crate::RpcMethodPrebuffered;
use timerpc::rpc::{RpcHandlerError, RpcMethodRegistry, RpcRegistryError};

/// Server-side counterpart of `RpcCallPrebuffered`: registers a typed handler
/// under the method's name.
///
/// The generated raw handler decodes the args, runs `handler` and encodes its
/// output. A decode or encode failure is reported to the caller as a handler
/// error.
pub trait RpcServiceEndpointInterface {
    fn register_prebuffered<M, F>(&mut self, handler: F) -> Result<(), RpcRegistryError>
    where
        M: RpcMethodPrebuffered + 'static,
        F: Fn(M::Input) -> Result<M::Output, RpcHandlerError> + Send + Sync + 'static;
}

impl RpcServiceEndpointInterface for RpcMethodRegistry {
    fn register_prebuffered<M, F>(&mut self, handler: F) -> Result<(), RpcRegistryError>
    where
        M: RpcMethodPrebuffered + 'static,
        F: Fn(M::Input) -> Result<M::Output, RpcHandlerError> + Send + Sync + 'static,
    {
        self.register(M::METHOD_NAME, move |bytes: &[u8]| {
            let input = M::decode_request(bytes)?;
            let output = handler(input)?;
            Ok(M::encode_response(output)?)
        })
    }
}
