//! Checksum-framed binary codec for the PlaneWave EFA focuser protocol.
//!
//! Every message on the bus is framed with:
//! - A start-of-message byte (`0x3B`) for synchronization
//! - A count byte covering addresses, command and payload
//! - Source and destination device addresses
//! - A one-byte command code
//! - A two's-complement checksum over everything after the start byte
//!
//! The codec performs no payload interpretation beyond the field helpers in
//! [`fields`]; semantics belong to the session layer.

pub mod codec;
pub mod command;
pub mod device;
pub mod error;
pub mod fields;

pub use codec::{
    checksum, decode_frame, encode_frame, frame_len, hex_dump, Frame, MAX_PAYLOAD, OVERHEAD,
    START_OF_MESSAGE,
};
pub use device::{DEVICE_FAN, DEVICE_FOC, DEVICE_HC, DEVICE_PC, DEVICE_TEMP};
pub use error::{FrameError, Result};
pub use fields::{
    decode_position, decode_rate, decode_signed12, encode_position, encode_rate,
    temperature_celsius, MAX_POSITION, NO_SENSOR,
};
