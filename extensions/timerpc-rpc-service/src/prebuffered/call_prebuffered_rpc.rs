use crate::{RpcCallPrebuffered, RpcCallerError, RpcClientInterface, RpcMethodPrebuffered};

/// Performs a one-shot (pre-buffered) RPC call using a method that conforms to
/// the `RpcMethodPrebuffered` interface.
///
/// Handles the full lifecycle of:
/// - Encoding the input
/// - Sending the request via the generic transport
/// - Decoding the response
pub async fn call_prebuffered_rpc<T, C>(
    rpc_client: &mut C,
    input: T::Input,
) -> Result<T::Output, RpcCallerError>
where
    T: RpcMethodPrebuffered + Send + Sync + 'static,
    T::Input: Send + 'static,
    T::Output: Send + 'static,
    C: RpcClientInterface,
{
    let param_bytes = T::encode_request(input).map_err(RpcCallerError::InvalidRequest)?;

    let result_bytes = rpc_client.call_rpc(T::METHOD_NAME, param_bytes).await?;

    T::decode_response(&result_bytes).map_err(RpcCallerError::InvalidResponse)
}

/// Blanket implementation of `RpcCallPrebuffered` for every
/// `RpcMethodPrebuffered`, so `.call()` works on any method definition.
#[async_trait::async_trait]
impl<T> RpcCallPrebuffered for T
where
    T: RpcMethodPrebuffered + Send + Sync + 'static,
    T::Input: Send + 'static,
    T::Output: Send + 'static,
{
    async fn call<C>(rpc_client: &mut C, input: Self::Input) -> Result<Self::Output, RpcCallerError>
    where
        C: RpcClientInterface,
    {
        call_prebuffered_rpc::<T, C>(rpc_client, input).await
    }
}
