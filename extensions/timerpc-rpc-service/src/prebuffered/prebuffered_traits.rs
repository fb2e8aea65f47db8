use crate::{RpcCallerError, RpcClientInterface};
use std::io;

// Helper traits that couple a procedure name with the encoding of its
// arguments and result, so that the server registration and the client call
// site share one definition. Payloads are fully materialized before they are
// encoded or decoded.

/// Trait for types that represent callable prebuffered RPC methods.
///
/// Allows call sites to write `T::call(&mut client, input)` without touching
/// the transport or the encoding directly.
#[async_trait::async_trait]
pub trait RpcCallPrebuffered: RpcMethodPrebuffered + Sized + Send + Sync {
    async fn call<C: RpcClientInterface>(
        rpc_client: &mut C,
        input: Self::Input,
    ) -> Result<Self::Output, RpcCallerError>;
}

pub trait RpcMethodPrebuffered {
    /// The procedure name the method is registered and invoked under.
    const METHOD_NAME: &'static str;

    /// The high-level input type expected by the request encoder.
    type Input;

    /// The high-level output type returned from the response decoder.
    type Output;

    /// Encodes the request into a byte array.
    fn encode_request(input: Self::Input) -> Result<Vec<u8>, io::Error>;

    /// Decodes raw request bytes into a typed request struct.
    ///
    /// # Arguments
    /// * `bytes` - Serialized request payload.
    fn decode_request(bytes: &[u8]) -> Result<Self::Input, io::Error>;

    /// Encodes the response value into a byte array.
    fn encode_response(output: Self::Output) -> Result<Vec<u8>, io::Error>;

    /// Decodes raw response bytes into a typed response struct or value.
    ///
    /// # Arguments
    /// * `bytes` - Serialized response payload.
    fn decode_response(bytes: &[u8]) -> Result<Self::Output, io::Error>;
}
