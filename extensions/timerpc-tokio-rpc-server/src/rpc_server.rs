//! Note: This `RpcServer` is a reference implementation and does not include
//! authentication or authorization mechanisms. It is best suited for trusted,
//! internal network communication or as a foundational example.

use crate::RpcServerError;
use crate::accept_backoff::{AcceptBackoff, is_transient_accept_error};
use std::fmt::Display;
use std::future::Future;
use std::io;
use std::net::SocketAddr;
use std::sync::Arc;
use timerpc::constants::{DEFAULT_READ_BUFFER_SIZE, HANDSHAKE_PREAMBLE, HANDSHAKE_PREAMBLE_SIZE};
use timerpc::rpc::{RpcDispatcher, RpcHandlerError, RpcMethodRegistry, RpcRegistryError};
use timerpc_rpc_service::{RpcMethodPrebuffered, RpcServiceEndpointInterface};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpListener, TcpStream, ToSocketAddrs};

/// An RPC server that accepts TCP connections and dispatches framed requests
/// to registered procedures.
///
/// Procedures are registered on the server before it starts listening. Once
/// `listen` (or `with_listener`) is called the registry is frozen and shared
/// read-only by every connection.
#[derive(Default)]
pub struct RpcServer {
    registry: RpcMethodRegistry,
}

/// A bound server, ready to accept connections.
pub struct RpcListener {
    listener: TcpListener,
    registry: Arc<RpcMethodRegistry>,
}

impl RpcServer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `method_name` to a raw handler.
    pub fn register<F>(
        &mut self,
        method_name: impl Into<String>,
        handler: F,
    ) -> Result<(), RpcRegistryError>
    where
        F: Fn(&[u8]) -> Result<Vec<u8>, RpcHandlerError> + Send + Sync + 'static,
    {
        self.registry.register(method_name, handler)
    }

    /// Binds to `addr` and freezes the registry.
    ///
    /// The address can be any type that implements `ToSocketAddrs`, such as
    /// `"127.0.0.1:1234"` or a `SocketAddr`.
    pub async fn listen<A>(self, addr: A) -> Result<RpcListener, RpcServerError>
    where
        A: ToSocketAddrs + Display,
    {
        let addr_label = addr.to_string();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| RpcServerError::Bind {
                addr: addr_label,
                source,
            })?;

        Ok(self.with_listener(listener))
    }

    /// Binds to `host:port`. The host can be an IP address or a hostname.
    pub async fn listen_on(self, host: &str, port: u16) -> Result<RpcListener, RpcServerError> {
        self.listen(format!("{host}:{port}")).await
    }

    /// Wraps a pre-bound `TcpListener`, e.g. one bound to port 0.
    pub fn with_listener(self, listener: TcpListener) -> RpcListener {
        RpcListener {
            listener,
            registry: Arc::new(self.registry),
        }
    }
}

impl RpcServiceEndpointInterface for RpcServer {
    fn register_prebuffered<M, F>(&mut self, handler: F) -> Result<(), RpcRegistryError>
    where
        M: RpcMethodPrebuffered + 'static,
        F: Fn(M::Input) -> Result<M::Output, RpcHandlerError> + Send + Sync + 'static,
    {
        self.registry.register_prebuffered::<M, F>(handler)
    }
}

impl RpcListener {
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.listener.local_addr()
    }

    /// Accepts connections until the accept loop fails.
    ///
    /// Only ever returns with `RpcServerError::ListenerFatal`.
    pub async fn serve(self) -> Result<(), RpcServerError> {
        self.serve_with_shutdown(std::future::pending::<()>()).await
    }

    /// Accepts connections until `shutdown` resolves or the accept loop fails.
    ///
    /// Accept errors that leave the socket usable (an aborted peer, running
    /// out of descriptors) are logged and retried with backoff. Any other
    /// accept error ends the loop with `RpcServerError::ListenerFatal`.
    ///
    /// Shutting down stops accepting new connections. Connections that are
    /// already being serviced run until their client disconnects.
    pub async fn serve_with_shutdown<F>(self, shutdown: F) -> Result<(), RpcServerError>
    where
        F: Future<Output = ()>,
    {
        let address = self.local_addr().map_err(RpcServerError::ListenerFatal)?;
        tracing::info!(
            "Server running on {:?} with methods {:?}",
            address,
            self.registry.method_names()
        );

        let mut shutdown = std::pin::pin!(shutdown);
        let mut backoff = AcceptBackoff::default();

        loop {
            tokio::select! {
                _ = &mut shutdown => {
                    tracing::info!("Server on {:?} shutting down.", address);
                    return Ok(());
                }

                accepted = self.listener.accept() => {
                    match accepted {
                        Ok((socket, addr)) => {
                            backoff.reset();
                            tracing::info!("Client connected: {}", addr);
                            tokio::spawn(handle_connection(self.registry.clone(), socket, addr));
                        }
                        Err(err) if is_transient_accept_error(&err) => {
                            let delay = backoff.next_delay();
                            tracing::warn!(
                                "Accept failed on {:?}: {}; retrying in {:?}",
                                address,
                                err,
                                delay
                            );
                            tokio::time::sleep(delay).await;
                        }
                        Err(err) => {
                            tracing::error!("Accept failed on {:?}: {}", address, err);
                            return Err(RpcServerError::ListenerFatal(err));
                        }
                    }
                }
            }
        }
    }
}

/// Services one client connection until it closes or misbehaves.
async fn handle_connection(
    registry: Arc<RpcMethodRegistry>,
    mut socket: TcpStream,
    addr: SocketAddr,
) {
    if let Err(err) = socket.set_nodelay(true) {
        tracing::warn!("Could not set TCP_NODELAY for {}: {}", addr, err);
    }

    match serve_connection(registry, &mut socket).await {
        Ok(()) => tracing::info!("Client {} disconnected.", addr),
        Err(err) => tracing::warn!("Terminated connection for {}: {}", addr, err),
    }
}

async fn serve_connection(
    registry: Arc<RpcMethodRegistry>,
    socket: &mut TcpStream,
) -> io::Result<()> {
    accept_handshake(socket).await?;

    let mut dispatcher = RpcDispatcher::new(registry);
    let mut buf = vec![0u8; DEFAULT_READ_BUFFER_SIZE];

    loop {
        let n = socket.read(&mut buf).await?;
        if n == 0 {
            if dispatcher.has_pending_bytes() {
                return Err(io::Error::new(
                    io::ErrorKind::UnexpectedEof,
                    "connection closed mid-request",
                ));
            }
            return Ok(());
        }

        let mut outgoing = Vec::new();
        let dispatched =
            dispatcher.read_bytes(&buf[..n], |frame| outgoing.extend_from_slice(frame));

        // Answer whatever was dispatched before a corrupt frame, then drop.
        if !outgoing.is_empty() {
            socket.write_all(&outgoing).await?;
        }
        dispatched.map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
    }
}

async fn accept_handshake(socket: &mut TcpStream) -> io::Result<()> {
    let mut preamble = [0u8; HANDSHAKE_PREAMBLE_SIZE];
    socket.read_exact(&mut preamble).await?;

    if &preamble != HANDSHAKE_PREAMBLE {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            "unexpected handshake preamble",
        ));
    }

    socket.write_all(HANDSHAKE_PREAMBLE).await
}
