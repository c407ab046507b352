//! PlaneWave EFA focuser protocol.
//!
//! efaproto converts a small focuser command vocabulary into the EFA's
//! checksum-framed binary wire format and interprets the replies into typed
//! state: position, temperatures, fan and calibration switches, goto
//! completion.
//!
//! # Crate Structure
//!
//! - [`transport`]: Byte transport contract and adapters (serial behind `serial` feature)
//! - [`frame`]: Frame codec: addresses, command codes, checksum, field decoding
//! - [`session`]: Command session: operations, state cache, goto polling
//! - [`simulator`]: In-memory controller implementing the transport contract

pub mod simulator;

/// Re-export transport types.
pub mod transport {
    pub use efaproto_transport::*;
}

/// Re-export frame types.
pub mod frame {
    pub use efaproto_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use efaproto_session::*;
}

pub use efaproto_session::{CommandSession, Focuser, FocuserState, SessionConfig, SessionError};
pub use simulator::SimulatedFocuser;
