use std::io;
use thiserror::Error;

/// Errors a caller can observe when invoking a remote procedure.
#[derive(Debug, Error)]
pub enum RpcCallerError {
    /// The server could not be reached, or the connection handshake failed.
    #[error("connection error: {0}")]
    Connection(#[source] io::Error),

    /// The server processed the request and reported a failure.
    #[error("invocation error: {0}")]
    Invocation(#[from] RpcInvocationError),

    /// The connection dropped, or produced unreadable data, before a response
    /// arrived. The client is no longer usable.
    #[error("transport error: {0}")]
    Transport(#[source] io::Error),

    /// The call arguments could not be encoded. Nothing was sent.
    #[error("invalid request: {0}")]
    InvalidRequest(#[source] io::Error),

    /// A success response arrived but its payload did not decode into the
    /// expected result type.
    #[error("invalid response: {0}")]
    InvalidResponse(#[source] io::Error),
}

/// A failure reported by the server for a well-formed request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcInvocationError {
    #[error("unknown procedure `{method_name}`")]
    UnknownProcedure { method_name: String },

    #[error("handler error: {message}")]
    Handler { message: String },
}

impl RpcCallerError {
    /// True for errors after which the client must be discarded.
    pub fn is_fatal_to_client(&self) -> bool {
        matches!(
            self,
            RpcCallerError::Connection(_) | RpcCallerError::Transport(_)
        )
    }
}
