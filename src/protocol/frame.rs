//! Frame encoding and decoding for the RFXtrx serial protocol.
//!
//! Every packet is prefixed by a single length byte counting the bytes
//! that follow it:
//! ```text
//! ┌──────────┬────────────┬──────────┬──────────┬─────────────┐
//! │  length  │ packetType │ subtype  │  seqnbr  │    data     │
//! │  1 byte  │   1 byte   │  1 byte  │  1 byte  │ length - 3  │
//! └──────────┴────────────┴──────────┴──────────┴─────────────┘
//! ```

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::FrameError;

/// Maximum frame payload size.
pub const MAX_FRAME_SIZE: usize = 255;

/// Encodes a packet into a length-prefixed frame.
///
/// # Panics
///
/// Panics if the packet exceeds `MAX_FRAME_SIZE`.
#[must_use]
pub fn encode(packet: &[u8]) -> Bytes {
    assert!(
        packet.len() <= MAX_FRAME_SIZE,
        "packet exceeds maximum frame size"
    );

    let mut buf = BytesMut::with_capacity(1 + packet.len());
    buf.put_u8(u8::try_from(packet.len()).expect("length checked above"));
    buf.put_slice(packet);
    buf.freeze()
}

/// Frame decoder that handles partial data.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
}

impl FrameDecoder {
    /// Creates a new frame decoder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            buffer: BytesMut::new(),
        }
    }

    /// Feeds data into the decoder.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Attempts to decode the next complete frame.
    ///
    /// Returns `Ok(Some(packet))` with the length byte stripped if a complete
    /// frame was decoded, or `Ok(None)` if more data is needed.
    ///
    /// # Errors
    ///
    /// Returns `FrameError::Empty` when a zero length byte is found. The
    /// offending byte is consumed so decoding can resume.
    pub fn decode(&mut self) -> Result<Option<Bytes>, FrameError> {
        let Some(&length) = self.buffer.first() else {
            return Ok(None);
        };

        if length == 0 {
            self.buffer.advance(1);
            return Err(FrameError::Empty);
        }

        let length = usize::from(length);
        if self.buffer.len() < 1 + length {
            return Ok(None);
        }

        self.buffer.advance(1);
        Ok(Some(self.buffer.split_to(length).freeze()))
    }

    /// Returns the number of bytes currently buffered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Clears the internal buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}
