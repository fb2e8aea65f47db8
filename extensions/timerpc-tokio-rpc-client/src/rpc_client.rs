use std::io;
use std::net::SocketAddr;
use timerpc::constants::{DEFAULT_READ_BUFFER_SIZE, HANDSHAKE_PREAMBLE, HANDSHAKE_PREAMBLE_SIZE};
use timerpc::frame::FrameStreamDecoder;
use timerpc::rpc::{RpcRequest, RpcResponse};
use timerpc_rpc_service::{
    RpcCallerError, RpcClientInterface, RpcTransportState, decode_rpc_response,
};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};

/// A TCP RPC client that owns a single connection.
///
/// Calls are strictly sequential: each `call` writes one request and waits for
/// its response before returning, and the connection may be reused for the
/// next call.
///
/// There is no built-in timeout. A call to a server that never answers waits
/// forever; wrap it in `tokio::time::timeout` to bound it. A call abandoned
/// that way leaves the client in `AwaitingResponse`, and the next call fails
/// the client instead of reading a stale response.
pub struct RpcClient {
    stream: TcpStream,
    peer_addr: SocketAddr,
    decoder: FrameStreamDecoder,
    read_buf: Vec<u8>,
    next_request_id: u32,
    state: RpcTransportState,
}

impl RpcClient {
    /// Connects to `host:port` and performs the protocol handshake.
    pub async fn new(host: &str, port: u16) -> Result<RpcClient, RpcCallerError> {
        Self::connect(format!("{host}:{port}")).await
    }

    /// Connects to `addr` and performs the protocol handshake.
    ///
    /// Fails with `RpcCallerError::Connection` if the server is unreachable or
    /// answers the handshake with anything but the expected preamble.
    pub async fn connect<A: ToSocketAddrs>(addr: A) -> Result<RpcClient, RpcCallerError> {
        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(RpcCallerError::Connection)?;
        let peer_addr = stream.peer_addr().map_err(RpcCallerError::Connection)?;

        if let Err(err) = stream.set_nodelay(true) {
            tracing::warn!("Could not set TCP_NODELAY for {}: {}", peer_addr, err);
        }

        Self::handshake(&mut stream)
            .await
            .map_err(RpcCallerError::Connection)?;

        tracing::info!("Connected to {}", peer_addr);

        Ok(RpcClient {
            stream,
            peer_addr,
            decoder: FrameStreamDecoder::new(),
            read_buf: vec![0u8; DEFAULT_READ_BUFFER_SIZE],
            next_request_id: 1,
            state: RpcTransportState::Connected,
        })
    }

    pub fn state(&self) -> RpcTransportState {
        self.state
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Invokes `method_name` with already encoded arguments and returns the
    /// encoded result.
    pub async fn call(
        &mut self,
        method_name: &str,
        param_bytes: Vec<u8>,
    ) -> Result<Vec<u8>, RpcCallerError> {
        match self.state {
            RpcTransportState::Connected => {}
            RpcTransportState::AwaitingResponse => {
                self.state = RpcTransportState::Failed;
                return Err(RpcCallerError::Transport(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "previous call was abandoned before its response arrived",
                )));
            }
            RpcTransportState::Failed => {
                return Err(RpcCallerError::Transport(io::Error::new(
                    io::ErrorKind::NotConnected,
                    "client has failed and must be replaced",
                )));
            }
        }

        let request = RpcRequest {
            rpc_request_id: self.next_request_id,
            rpc_method_name: method_name.to_string(),
            rpc_param_bytes: param_bytes,
        };

        // Nothing is written for a request that cannot be framed, so the
        // connection stays usable.
        let frame = request.to_frame().map_err(|err| {
            RpcCallerError::InvalidRequest(io::Error::new(io::ErrorKind::InvalidInput, err))
        })?;
        self.next_request_id = self.next_request_id.wrapping_add(1);

        tracing::debug!(
            "Calling `{}` on {} (request {})",
            method_name,
            self.peer_addr,
            request.rpc_request_id
        );

        self.state = RpcTransportState::AwaitingResponse;

        let result = match self.exchange(&frame, request.rpc_request_id).await {
            Ok(response) => decode_rpc_response(response),
            Err(err) => Err(RpcCallerError::Transport(err)),
        };

        match &result {
            Err(err) if err.is_fatal_to_client() => {
                tracing::warn!("Call to `{}` on {} failed: {}", method_name, self.peer_addr, err);
                self.state = RpcTransportState::Failed;
            }
            _ => self.state = RpcTransportState::Connected,
        }

        result
    }

    async fn exchange(&mut self, frame: &[u8], rpc_request_id: u32) -> io::Result<RpcResponse> {
        self.stream.write_all(frame).await?;

        loop {
            let n = self.stream.read(&mut self.read_buf).await?;
            if n == 0 {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "server closed the connection before responding",
                ));
            }

            let mut frames = self.decoder.read_bytes(&self.read_buf[..n]);
            let Some(frame) = frames.next() else {
                continue;
            };

            let frame = frame.map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
            if frames.next().is_some() || self.decoder.pending_len() > 0 {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    "server sent data beyond the response",
                ));
            }

            let response = RpcResponse::decode(&frame)
                .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;

            if response.rpc_request_id != rpc_request_id {
                return Err(io::Error::new(
                    io::ErrorKind::InvalidData,
                    format!(
                        "response id {} does not match request id {}",
                        response.rpc_request_id, rpc_request_id
                    ),
                ));
            }

            return Ok(response);
        }
    }

    async fn handshake(stream: &mut TcpStream) -> io::Result<()> {
        stream.write_all(HANDSHAKE_PREAMBLE).await?;

        let mut preamble = [0u8; HANDSHAKE_PREAMBLE_SIZE];
        stream.read_exact(&mut preamble).await?;

        if &preamble != HANDSHAKE_PREAMBLE {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "server answered with an unexpected handshake preamble",
            ));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl RpcClientInterface for RpcClient {
    async fn call_rpc(
        &mut self,
        method_name: &str,
        param_bytes: Vec<u8>,
    ) -> Result<Vec<u8>, RpcCallerError> {
        self.call(method_name, param_bytes).await
    }

    fn transport_state(&self) -> RpcTransportState {
        self.state
    }
}
