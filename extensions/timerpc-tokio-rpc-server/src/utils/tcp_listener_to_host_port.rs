use std::io::Result;
use std::net::{IpAddr, SocketAddr};
use tokio::net::TcpListener;

/// Extracts the IP address and port from a bound `TcpListener`.
///
/// Mostly useful after binding to port 0, to learn which port the OS picked.
pub fn tcp_listener_to_host_port(listener: &TcpListener) -> Result<(IpAddr, u16)> {
    let local_addr: SocketAddr = listener.local_addr()?;

    Ok((local_addr.ip(), local_addr.port()))
}
