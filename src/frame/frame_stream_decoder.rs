use crate::frame::{FrameCodec, FrameDecodeError};
use bytes::{Buf, BytesMut};
use std::collections::VecDeque;

/// A streaming decoder that turns an arbitrarily chunked byte stream into
/// complete frame payloads.
///
/// Socket reads do not line up with frame boundaries: one read may carry half
/// a frame, or several frames back to back. `FrameStreamDecoder` buffers the
/// partial tail between calls and yields each payload once all of its bytes
/// have arrived.
///
/// An oversized length prefix leaves the stream unrecoverable. The decoder
/// yields `FrameTooLarge` once and then keeps failing on every later read.
#[derive(Default)]
pub struct FrameStreamDecoder {
    buffer: BytesMut,
    fatal_error: Option<FrameDecodeError>,
}

pub struct FrameDecoderIterator {
    queue: VecDeque<Result<Vec<u8>, FrameDecodeError>>,
}

impl Iterator for FrameDecoderIterator {
    type Item = Result<Vec<u8>, FrameDecodeError>;

    fn next(&mut self) -> Option<Self::Item> {
        self.queue.pop_front()
    }
}

impl FrameStreamDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `data` to the internal buffer and drains every complete frame.
    pub fn read_bytes(&mut self, data: &[u8]) -> FrameDecoderIterator {
        let mut queue = VecDeque::new();

        if let Some(err) = &self.fatal_error {
            queue.push_back(Err(err.clone()));
            return FrameDecoderIterator { queue };
        }

        self.buffer.extend_from_slice(data);

        loop {
            match FrameCodec::decode(&self.buffer) {
                Ok((payload, consumed)) => {
                    self.buffer.advance(consumed);
                    queue.push_back(Ok(payload));
                }
                Err(FrameDecodeError::IncompleteFrame) => break,
                Err(err) => {
                    self.buffer.clear();
                    self.fatal_error = Some(err.clone());
                    queue.push_back(Err(err));
                    break;
                }
            }
        }

        FrameDecoderIterator { queue }
    }

    /// Number of buffered bytes that do not yet form a complete frame.
    pub fn pending_len(&self) -> usize {
        self.buffer.len()
    }
}
