use crate::{
    constants::{FRAME_HEADER_SIZE, FRAME_LENGTH_FIELD_SIZE, MAX_FRAME_PAYLOAD_SIZE},
    frame::FrameDecodeError,
};

/// Provides encoding and decoding functionality for length-delimited frames.
///
/// A frame is a little-endian `u32` payload length followed by the payload
/// itself. The codec knows nothing about what the payload contains; RPC
/// envelopes are layered on top of it by the `rpc` module.
pub struct FrameCodec;

impl FrameCodec {
    /// Encodes a payload into a single frame.
    ///
    /// # Returns
    ///
    /// - `Ok(frame)`: the length prefix followed by the payload bytes.
    /// - `Err(FrameDecodeError::FrameTooLarge)` if the payload is over
    ///   `MAX_FRAME_PAYLOAD_SIZE`, which the receiving side would reject.
    pub fn encode(payload: &[u8]) -> Result<Vec<u8>, FrameDecodeError> {
        if payload.len() > MAX_FRAME_PAYLOAD_SIZE {
            return Err(FrameDecodeError::FrameTooLarge {
                len: payload.len(),
                max: MAX_FRAME_PAYLOAD_SIZE,
            });
        }

        let mut buf = Vec::with_capacity(FRAME_HEADER_SIZE + payload.len());

        buf.extend(&(payload.len() as u32).to_le_bytes());
        buf.extend(payload);

        Ok(buf)
    }

    /// Decodes the first frame in `buf`.
    ///
    /// # Returns
    ///
    /// - `Ok((payload, consumed))` where `consumed` is the number of bytes of
    ///   `buf` the frame occupied (header included).
    /// - `Err(FrameDecodeError::IncompleteFrame)` if more bytes are needed.
    /// - `Err(FrameDecodeError::FrameTooLarge)` if the length prefix is over
    ///   the limit. The stream cannot be resynchronized after this.
    pub fn decode(buf: &[u8]) -> Result<(Vec<u8>, usize), FrameDecodeError> {
        let len = Self::peek_payload_len(buf)?;

        let frame_end = FRAME_HEADER_SIZE + len;
        if buf.len() < frame_end {
            return Err(FrameDecodeError::IncompleteFrame);
        }

        Ok((buf[FRAME_HEADER_SIZE..frame_end].to_vec(), frame_end))
    }

    /// Reads the payload length from the frame header without consuming it.
    pub fn peek_payload_len(buf: &[u8]) -> Result<usize, FrameDecodeError> {
        let len = buf
            .get(..FRAME_LENGTH_FIELD_SIZE)
            .and_then(|bytes| bytes.try_into().ok())
            .map(u32::from_le_bytes)
            .ok_or(FrameDecodeError::IncompleteFrame)? as usize;

        if len > MAX_FRAME_PAYLOAD_SIZE {
            return Err(FrameDecodeError::FrameTooLarge {
                len,
                max: MAX_FRAME_PAYLOAD_SIZE,
            });
        }

        Ok(len)
    }
}
