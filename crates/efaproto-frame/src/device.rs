//! Device addresses on the focuser bus.
//!
//! The temperature sensor answers on the motor controller's address. The
//! command code tells the two roles apart.

/// Host computer.
pub const DEVICE_PC: u8 = 0x20;

/// Hand controller.
pub const DEVICE_HC: u8 = 0x0D;

/// Focuser motor controller.
pub const DEVICE_FOC: u8 = 0x12;

/// Fan controller.
pub const DEVICE_FAN: u8 = 0x13;

/// Temperature sensor (same address as the motor controller).
pub const DEVICE_TEMP: u8 = 0x12;

/// Returns a human-readable name for a device address.
pub fn device_name(address: u8) -> &'static str {
    match address {
        DEVICE_PC => "PC",
        DEVICE_HC => "HC",
        DEVICE_FOC => "FOC",
        DEVICE_FAN => "FAN",
        _ => "UNKNOWN",
    }
}
