use efaproto_frame::FrameError;
use efaproto_transport::TransportError;

/// Errors that can abort a focuser operation.
///
/// Every variant leaves the cached [`FocuserState`](crate::FocuserState)
/// untouched.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error (I/O, timeout, closed link).
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// The reply failed frame validation.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A valid frame arrived, but not the one this request expects.
    #[error("unexpected reply to {command}: {reason}")]
    UnexpectedReply {
        command: &'static str,
        reason: String,
    },

    /// The requested target lies outside the allowed travel.
    #[error("target position {target} outside 0..={max}")]
    OutOfRange { target: i64, max: u32 },

    /// A relative move was requested before any position was read.
    #[error("current position unknown")]
    PositionUnknown,
}

impl SessionError {
    /// Returns true if the exchange failed because the reply did not arrive in time.
    pub fn is_timeout(&self) -> bool {
        matches!(self, SessionError::Transport(err) if err.is_timeout())
    }

    /// Returns true for integrity and framing failures on the wire.
    pub fn is_protocol(&self) -> bool {
        matches!(
            self,
            SessionError::Frame(_) | SessionError::UnexpectedReply { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, SessionError>;
