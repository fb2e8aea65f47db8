use bitcode::{Decode, Encode};
use std::io;
use timerpc::rpc::RpcRegistryError;
use timerpc::utils::now_unix_secs;
use timerpc_rpc_service::{RpcMethodPrebuffered, RpcServiceEndpointInterface};

/// Arguments of `TimeServer.GiveServerTime`. The method takes none, but every
/// call still carries an (empty) argument payload.
#[derive(Encode, Decode, PartialEq, Debug, Clone, Copy, Default)]
pub struct GiveServerTimeArgs {}

#[derive(Encode, Decode, PartialEq, Debug)]
struct GiveServerTimeResponseParams {
    unix_secs: i64,
}

/// Returns the server's wall-clock time as seconds since the Unix epoch.
pub struct GiveServerTime;

impl RpcMethodPrebuffered for GiveServerTime {
    const METHOD_NAME: &'static str = "TimeServer.GiveServerTime";

    type Input = GiveServerTimeArgs;
    type Output = i64;

    fn encode_request(args: Self::Input) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&args))
    }

    fn decode_request(bytes: &[u8]) -> Result<Self::Input, io::Error> {
        bitcode::decode::<GiveServerTimeArgs>(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    fn encode_response(unix_secs: Self::Output) -> Result<Vec<u8>, io::Error> {
        Ok(bitcode::encode(&GiveServerTimeResponseParams { unix_secs }))
    }

    fn decode_response(bytes: &[u8]) -> Result<Self::Output, io::Error> {
        let resp = bitcode::decode::<GiveServerTimeResponseParams>(bytes)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;

        Ok(resp.unix_secs)
    }
}

/// Registers the `GiveServerTime` handler on `endpoint`.
///
/// The handler ignores its args and reads the wall clock on every call.
pub fn register_time_server<E>(endpoint: &mut E) -> Result<(), RpcRegistryError>
where
    E: RpcServiceEndpointInterface,
{
    endpoint.register_prebuffered::<GiveServerTime, _>(|_args| Ok(now_unix_secs()))
}
