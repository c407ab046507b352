//! Command codes understood by the focuser's controllers.

/// Read the current motor position.
pub const MTR_GET_POS: u8 = 0x01;
/// Redefine the current position without moving.
pub const MTR_OFFSET_CNT: u8 = 0x04;
/// Query whether the last goto has finished.
pub const MTR_GOTO_OVER: u8 = 0x13;
/// Start a goto to an absolute position.
pub const MTR_GOTO_POS2: u8 = 0x17;
/// Set the upper slew limit.
pub const MTR_SLEWLIMITMAX: u8 = 0x1B;
/// Read the upper slew limit.
pub const MTR_SLEWLIMITGETMAX: u8 = 0x1D;
/// Slew outward at a fixed rate (rate 0 stops the motor).
pub const MTR_PMSLEW_RATE: u8 = 0x24;
/// Slew inward at a fixed rate.
pub const MTR_NMSLEW_RATE: u8 = 0x25;
/// Read the temperature sensors.
pub const TEMP_GET: u8 = 0x26;
/// Switch the fans.
pub const FANS_SET: u8 = 0x27;
/// Read the fan state.
pub const FANS_GET: u8 = 0x28;
pub const MTR_GET_CALIBRATION_STATE: u8 = 0x30;
pub const MTR_SET_CALIBRATION_STATE: u8 = 0x31;
pub const MTR_GET_STOP_DETECT: u8 = 0xEE;
pub const MTR_STOP_DETECT: u8 = 0xEF;
pub const MTR_GET_APPROACH_DIRECTION: u8 = 0xFC;
pub const MTR_APPROACH_DIRECTION: u8 = 0xFD;
/// Read the firmware version.
pub const GET_VERSION: u8 = 0xFE;

/// Returns a human-readable name for a command code.
pub fn command_name(code: u8) -> &'static str {
    match code {
        MTR_GET_POS => "MTR_GET_POS",
        MTR_OFFSET_CNT => "MTR_OFFSET_CNT",
        MTR_GOTO_OVER => "MTR_GOTO_OVER",
        MTR_GOTO_POS2 => "MTR_GOTO_POS2",
        MTR_SLEWLIMITMAX => "MTR_SLEWLIMITMAX",
        MTR_SLEWLIMITGETMAX => "MTR_SLEWLIMITGETMAX",
        MTR_PMSLEW_RATE => "MTR_PMSLEW_RATE",
        MTR_NMSLEW_RATE => "MTR_NMSLEW_RATE",
        TEMP_GET => "TEMP_GET",
        FANS_SET => "FANS_SET",
        FANS_GET => "FANS_GET",
        MTR_GET_CALIBRATION_STATE => "MTR_GET_CALIBRATION_STATE",
        MTR_SET_CALIBRATION_STATE => "MTR_SET_CALIBRATION_STATE",
        MTR_GET_STOP_DETECT => "MTR_GET_STOP_DETECT",
        MTR_STOP_DETECT => "MTR_STOP_DETECT",
        MTR_GET_APPROACH_DIRECTION => "MTR_GET_APPROACH_DIRECTION",
        MTR_APPROACH_DIRECTION => "MTR_APPROACH_DIRECTION",
        GET_VERSION => "GET_VERSION",
        _ => "UNKNOWN",
    }
}
