use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Start-of-message marker.
pub const START_OF_MESSAGE: u8 = 0x3B;

/// Non-payload bytes per frame: SOM + NUM + SRC + DST + CMD + CHK.
pub const OVERHEAD: usize = 6;

/// Largest payload the count byte can describe.
pub const MAX_PAYLOAD: usize = u8::MAX as usize - 3;

/// A decoded frame with addressing and an uninterpreted payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// Sending device address.
    pub source: u8,
    /// Receiving device address.
    pub destination: u8,
    /// Command code.
    pub command: u8,
    /// Command payload.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(source: u8, destination: u8, command: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            source,
            destination,
            command,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame.
    pub fn wire_size(&self) -> usize {
        frame_len(self.payload.len())
    }

    /// Encode this frame into a fresh buffer.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.wire_size());
        encode_frame(
            self.source,
            self.destination,
            self.command,
            &self.payload,
            &mut buf,
        );
        buf.freeze()
    }
}

/// Wire length of a frame carrying `payload_len` bytes.
pub const fn frame_len(payload_len: usize) -> usize {
    OVERHEAD + payload_len
}

/// Two's-complement checksum: appending it makes the byte sum ≡ 0 (mod 256).
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes
        .iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte))
        .wrapping_neg()
}

/// Encode a frame into the wire format.
///
/// Wire format:
/// ```text
/// ┌──────┬──────┬──────┬──────┬──────┬───────────────┬──────┐
/// │ SOM  │ NUM  │ SRC  │ DST  │ CMD  │ Payload       │ CHK  │
/// │ 0x3B │ 3+N  │      │      │      │ (N bytes)     │      │
/// └──────┴──────┴──────┴──────┴──────┴───────────────┴──────┘
/// ```
///
/// CHK covers NUM through the last payload byte.
///
/// # Panics
///
/// Panics if `payload` is longer than [`MAX_PAYLOAD`]. Per-command payload
/// lengths are the caller's contract.
pub fn encode_frame(source: u8, destination: u8, command: u8, payload: &[u8], dst: &mut BytesMut) {
    assert!(
        payload.len() <= MAX_PAYLOAD,
        "payload of {} bytes exceeds frame capacity of {MAX_PAYLOAD}",
        payload.len()
    );

    let start = dst.len();
    dst.reserve(frame_len(payload.len()));
    dst.put_u8(START_OF_MESSAGE);
    dst.put_u8((payload.len() + 3) as u8);
    dst.put_u8(source);
    dst.put_u8(destination);
    dst.put_u8(command);
    dst.put_slice(payload);
    let sum = checksum(&dst[start + 1..]);
    dst.put_u8(sum);
}

/// Validate and decode a complete frame of exactly `expected_len` bytes.
///
/// Checks run in order: total length, start marker, checksum, count byte.
/// The checksum runs before the count byte so that any single corrupted bit
/// after the start marker is reported as [`FrameError::Checksum`].
pub fn decode_frame(bytes: &[u8], expected_len: usize) -> Result<Frame> {
    if bytes.len() != expected_len || bytes.len() < OVERHEAD {
        return Err(FrameError::FrameLength {
            expected: expected_len,
            actual: bytes.len(),
        });
    }

    if bytes[0] != START_OF_MESSAGE {
        return Err(FrameError::MalformedStart { found: bytes[0] });
    }

    let (body, trailer) = bytes[1..].split_at(bytes.len() - 2);
    let expected = checksum(body);
    let actual = trailer[0];
    if expected != actual {
        return Err(FrameError::Checksum { expected, actual });
    }

    let declared = body[0] as usize;
    if declared + 3 != bytes.len() {
        return Err(FrameError::FrameLength {
            expected: bytes.len(),
            actual: declared + 3,
        });
    }

    Ok(Frame {
        source: body[1],
        destination: body[2],
        command: body[3],
        payload: Bytes::copy_from_slice(&body[4..]),
    })
}

/// Space-separated uppercase hex, e.g. `3B 03 20 12 01 CA`.
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|byte| format!("{byte:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}
