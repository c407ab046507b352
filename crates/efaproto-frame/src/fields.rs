//! Payload field encodings shared by several commands.

/// Largest position representable in the 24-bit position field.
pub const MAX_POSITION: u32 = 0x00FF_FFFF;

/// Raw reading a temperature channel reports when no probe is attached.
pub const NO_SENSOR: [u8; 2] = [0x7F, 0x7F];

/// Encode a position as 24-bit little-endian.
///
/// # Panics
///
/// Panics if `ticks` exceeds [`MAX_POSITION`]; callers bound positions first.
pub fn encode_position(ticks: u32) -> [u8; 3] {
    assert!(
        ticks <= MAX_POSITION,
        "position {ticks} does not fit in 24 bits"
    );
    let [b0, b1, b2, _] = ticks.to_le_bytes();
    [b0, b1, b2]
}

/// Decode a 24-bit little-endian position.
pub fn decode_position(bytes: [u8; 3]) -> u32 {
    u32::from_le_bytes([bytes[0], bytes[1], bytes[2], 0])
}

/// Encode a slew rate as 16-bit little-endian.
pub fn encode_rate(rate: u16) -> [u8; 2] {
    rate.to_le_bytes()
}

/// Decode a 16-bit little-endian slew rate.
pub fn decode_rate(bytes: [u8; 2]) -> u16 {
    u16::from_le_bytes(bytes)
}

/// Decode a 12-bit two's-complement value.
///
/// `byte2` holds bits 0–7, the low nibble of `byte3` holds bits 8–11 with bit
/// 11 as the sign. The high nibble of `byte3` is ignored.
pub fn decode_signed12(byte2: u8, byte3: u8) -> i16 {
    let raw = (i16::from(byte3 & 0x0F) << 8) | i16::from(byte2);
    if raw & 0x0800 != 0 {
        raw - 0x1000
    } else {
        raw
    }
}

/// Degrees Celsius for a raw sensor reading, `None` when no probe is attached.
pub fn temperature_celsius(byte2: u8, byte3: u8) -> Option<f64> {
    if [byte2, byte3] == NO_SENSOR {
        return None;
    }
    Some(f64::from(decode_signed12(byte2, byte3)) / 16.0)
}
