use num_enum::{IntoPrimitive, TryFromPrimitive};

/// Outcome tag carried in every `RpcResponse`.
///
/// The tag decides how the response payload is interpreted:
/// - `Success`: the encoded method result.
/// - `Fail`: the UTF-8 message of the error the handler returned.
/// - `MethodNotFound`: the UTF-8 name of the procedure that was requested.
#[repr(u8)]
#[derive(Debug, Copy, Clone, Eq, PartialEq, TryFromPrimitive, IntoPrimitive)]
pub enum RpcResultStatus {
    Success = 0,
    Fail = 1,
    MethodNotFound = 2,
}
