mod call_prebuffered_rpc;
mod prebuffered_traits;
mod register_prebuffered;

pub use call_prebuffered_rpc::*;
pub use prebuffered_traits::*;
pub use register_prebuffered::*;
