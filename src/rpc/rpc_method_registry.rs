use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::sync::Arc;
use thiserror::Error;

/// Error type handlers return. Anything implementing `std::error::Error`
/// converts into it with `?`.
pub type RpcHandlerError = Box<dyn std::error::Error + Send + Sync>;

/// A registered procedure body.
///
/// Receives the serialized args and returns the serialized result. Handlers run
/// synchronously on the connection that received the request, so they must
/// complete promptly.
pub type RpcMethodHandler = Arc<dyn Fn(&[u8]) -> Result<Vec<u8>, RpcHandlerError> + Send + Sync>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcRegistryError {
    #[error("a handler for method `{method_name}` is already registered")]
    DuplicateRegistration { method_name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RpcDispatchError {
    #[error("unknown procedure `{method_name}`")]
    UnknownProcedure { method_name: String },

    #[error("handler for `{method_name}` failed: {message}")]
    HandlerError {
        method_name: String,
        message: String,
    },
}

/// Maps procedure names to their handlers.
///
/// The registry is populated during startup and then handed to the server,
/// which freezes it behind an `Arc`. From then on it is only read, so
/// connections share it without locking.
#[derive(Default, Clone)]
pub struct RpcMethodRegistry {
    handlers: HashMap<String, RpcMethodHandler>,
}

impl RpcMethodRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `method_name` to `handler`.
    ///
    /// Fails with `DuplicateRegistration` if the name is already bound. The
    /// existing binding is left untouched in that case.
    pub fn register<F>(
        &mut self,
        method_name: impl Into<String>,
        handler: F,
    ) -> Result<(), RpcRegistryError>
    where
        F: Fn(&[u8]) -> Result<Vec<u8>, RpcHandlerError> + Send + Sync + 'static,
    {
        match self.handlers.entry(method_name.into()) {
            Entry::Occupied(entry) => Err(RpcRegistryError::DuplicateRegistration {
                method_name: entry.key().clone(),
            }),
            Entry::Vacant(entry) => {
                tracing::debug!("Registered RPC method `{}`", entry.key());
                entry.insert(Arc::new(handler));
                Ok(())
            }
        }
    }

    /// Looks up `method_name` and invokes its handler with `param_bytes`.
    pub fn dispatch(
        &self,
        method_name: &str,
        param_bytes: &[u8],
    ) -> Result<Vec<u8>, RpcDispatchError> {
        let handler =
            self.handlers
                .get(method_name)
                .ok_or_else(|| RpcDispatchError::UnknownProcedure {
                    method_name: method_name.to_string(),
                })?;

        handler(param_bytes).map_err(|e| RpcDispatchError::HandlerError {
            method_name: method_name.to_string(),
            message: e.to_string(),
        })
    }

    pub fn contains(&self, method_name: &str) -> bool {
        self.handlers.contains_key(method_name)
    }

    /// Registered names, sorted.
    pub fn method_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.handlers.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}
