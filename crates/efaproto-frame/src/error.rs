/// Errors that can occur while validating a received frame.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FrameError {
    /// The trailing checksum byte does not match the frame contents.
    #[error("checksum mismatch (expected 0x{expected:02X}, got 0x{actual:02X})")]
    Checksum { expected: u8, actual: u8 },

    /// The frame is not the length the command requires.
    #[error("frame length mismatch (expected {expected} bytes, got {actual})")]
    FrameLength { expected: usize, actual: usize },

    /// The first byte is not the start-of-message marker.
    #[error("malformed frame start (expected 0x3B, got 0x{found:02X})")]
    MalformedStart { found: u8 },
}

pub type Result<T> = std::result::Result<T, FrameError>;
