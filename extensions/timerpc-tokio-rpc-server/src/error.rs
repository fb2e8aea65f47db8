use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RpcServerError {
    /// The listening socket could not be created: address in use, not
    /// assignable, or unresolvable.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        addr: String,
        #[source]
        source: io::Error,
    },

    /// The accept loop broke. The server does not restart it.
    #[error("listener failed: {0}")]
    ListenerFatal(#[source] io::Error),
}
