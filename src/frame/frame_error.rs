use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FrameDecodeError {
    /// A payload above `MAX_FRAME_PAYLOAD_SIZE`, either announced by an
    /// incoming length prefix or handed to the encoder.
    #[error("frame payload of {len} bytes exceeds the {max} byte limit")]
    FrameTooLarge { len: usize, max: usize },

    /// The buffer does not yet hold a complete frame.
    #[error("incomplete frame")]
    IncompleteFrame,

    /// The frame payload could not be decoded into an RPC envelope.
    #[error("corrupt frame: {0}")]
    CorruptFrame(String),
}
