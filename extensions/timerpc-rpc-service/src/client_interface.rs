use crate::{RpcCallerError, RpcTransportState};

/// A transport-agnostic RPC client.
///
/// Implementors send one request tagged with `method_name`, wait for the
/// matching response and hand back the raw result payload. Calls take
/// `&mut self`: a connection carries at most one outstanding request, and
/// concurrent calls need separate clients.
#[async_trait::async_trait]
pub trait RpcClientInterface: Send {
    async fn call_rpc(
        &mut self,
        method_name: &str,
        param_bytes: Vec<u8>,
    ) -> Result<Vec<u8>, RpcCallerError>;

    /// Current lifecycle state of the underlying connection.
    fn transport_state(&self) -> RpcTransportState;
}
