mod rpc_dispatcher;
mod rpc_method_registry;
mod rpc_request_response;
mod rpc_result_status;

pub use rpc_dispatcher::RpcDispatcher;
pub use rpc_method_registry::{
    RpcDispatchError, RpcHandlerError, RpcMethodHandler, RpcMethodRegistry, RpcRegistryError,
};
pub use rpc_request_response::{RpcRequest, RpcResponse};
pub use rpc_result_status::RpcResultStatus;
