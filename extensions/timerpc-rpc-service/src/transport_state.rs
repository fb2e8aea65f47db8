/// Lifecycle of a client connection.
///
/// `Connected -> AwaitingResponse -> Connected` for every successful call.
/// Any transport failure moves the client to `Failed`, which is terminal: a
/// failed client must be dropped and a new one connected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcTransportState {
    Connected,
    AwaitingResponse,
    Failed,
}
