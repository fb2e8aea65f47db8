// Frame related constants
pub const FRAME_LENGTH_FIELD_SIZE: usize = 4;
pub const FRAME_HEADER_SIZE: usize = FRAME_LENGTH_FIELD_SIZE;

/// Upper bound on a single frame payload.
///
/// A length prefix above this value is treated as a corrupt stream rather than
/// an instruction to buffer an arbitrarily large allocation.
pub const MAX_FRAME_PAYLOAD_SIZE: usize = 16 * 1024 * 1024;

/// Preamble exchanged once per connection before any frame is sent.
///
/// The client writes it immediately after connecting and the server echoes it
/// back. Either side closes the connection on a mismatch.
pub const HANDSHAKE_PREAMBLE: &[u8; HANDSHAKE_PREAMBLE_SIZE] = b"TIMERPC1";
pub const HANDSHAKE_PREAMBLE_SIZE: usize = 8;

/// Size of the read buffer used by transports when pulling bytes off a socket.
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;
