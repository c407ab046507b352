//! Byte transport contract for the EFA focuser protocol.
//!
//! The protocol layers above only need two primitives from a link:
//! write a whole request, and read exactly `n` reply bytes within a timeout.
//! This crate defines that contract ([`Transport`]) and ships adapters:
//! - [`StreamTransport`] over any blocking `Read + Write` stream implementing [`TimeoutControl`]
//! - `SerialTransport` over a serial port (behind the `serial` feature)
//!
//! Connection lifecycle belongs to the owner of the transport. Sessions only
//! borrow it for the duration of a single exchange.

pub mod error;
pub mod stream;
pub mod traits;

#[cfg(feature = "serial")]
pub mod serial;

pub use error::{Result, TransportError};
pub use stream::{StreamTransport, TimeoutControl};
pub use traits::Transport;

#[cfg(feature = "serial")]
pub use serial::{SerialConfig, SerialTransport, DEFAULT_BAUD_RATE};
