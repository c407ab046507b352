//! Stateful command session for the PlaneWave EFA focuser.
//!
//! [`CommandSession`] turns each focuser operation into one synchronous
//! request/response exchange over a borrowed [`Transport`], validates the
//! reply with the frame codec, and keeps a cache of the last known-good
//! device state. Hosts drive it with [`CommandSession::refresh_all`] once at
//! startup and [`CommandSession::tick`] from their timer.
//!
//! [`Transport`]: efaproto_transport::Transport

pub mod commands;
pub mod config;
pub mod error;
pub mod focuser;
pub mod format;
pub mod host;
pub mod session;
pub mod state;

#[cfg(test)]
pub(crate) mod mock;

pub use commands::CommandSpec;
pub use config::{LimitPolicy, SessionConfig, DEFAULT_TIMEOUT, TEMPERATURE_THRESHOLD};
pub use error::{Result, SessionError};
pub use focuser::{BoundSession, FocusDirection, Focuser};
pub use format::{format_fixed, format_version};
pub use host::{GotoEvent, TickReport};
pub use session::{CommandSession, SlewDirection, TemperatureReading};
pub use state::{ApproachDirection, FocuserState, GotoState, Temperatures};
