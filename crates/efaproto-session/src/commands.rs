//! Static per-command metadata.
//!
//! The codec cannot tell a wrong device address from a right one, so each
//! operation takes its addressing and payload widths from this table.

use efaproto_frame::command::{
    FANS_GET, FANS_SET, GET_VERSION as VERSION, MTR_APPROACH_DIRECTION, MTR_GET_APPROACH_DIRECTION,
    MTR_GET_CALIBRATION_STATE, MTR_GET_POS, MTR_GET_STOP_DETECT, MTR_GOTO_OVER, MTR_GOTO_POS2,
    MTR_NMSLEW_RATE, MTR_OFFSET_CNT, MTR_PMSLEW_RATE, MTR_SET_CALIBRATION_STATE,
    MTR_SLEWLIMITGETMAX, MTR_SLEWLIMITMAX, MTR_STOP_DETECT, TEMP_GET,
};
use efaproto_frame::{frame_len, DEVICE_FAN, DEVICE_FOC, DEVICE_TEMP};

/// Wire shape of one request/response pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommandSpec {
    /// Name used in logs and errors.
    pub name: &'static str,
    /// Command code.
    pub code: u8,
    /// Device the request is addressed to.
    pub device: u8,
    /// Request payload length.
    pub request_len: usize,
    /// Reply payload length.
    pub reply_len: usize,
}

impl CommandSpec {
    const fn new(
        name: &'static str,
        code: u8,
        device: u8,
        request_len: usize,
        reply_len: usize,
    ) -> Self {
        Self {
            name,
            code,
            device,
            request_len,
            reply_len,
        }
    }

    /// Wire length of the request frame.
    pub const fn request_frame_len(&self) -> usize {
        frame_len(self.request_len)
    }

    /// Wire length of the reply frame.
    pub const fn reply_frame_len(&self) -> usize {
        frame_len(self.reply_len)
    }
}

pub const GET_POSITION: CommandSpec = CommandSpec::new("get_position", MTR_GET_POS, DEVICE_FOC, 0, 3);
pub const GOTO: CommandSpec = CommandSpec::new("goto", MTR_GOTO_POS2, DEVICE_FOC, 3, 0);
pub const SYNC: CommandSpec = CommandSpec::new("sync", MTR_OFFSET_CNT, DEVICE_FOC, 3, 0);
pub const GOTO_COMPLETE: CommandSpec =
    CommandSpec::new("goto_complete", MTR_GOTO_OVER, DEVICE_FOC, 0, 1);
pub const SLEW_OUT: CommandSpec = CommandSpec::new("slew_out", MTR_PMSLEW_RATE, DEVICE_FOC, 2, 0);
pub const SLEW_IN: CommandSpec = CommandSpec::new("slew_in", MTR_NMSLEW_RATE, DEVICE_FOC, 2, 0);
pub const SET_MAX_POSITION: CommandSpec =
    CommandSpec::new("set_max_position", MTR_SLEWLIMITMAX, DEVICE_FOC, 3, 0);
pub const GET_MAX_POSITION: CommandSpec =
    CommandSpec::new("get_max_position", MTR_SLEWLIMITGETMAX, DEVICE_FOC, 0, 3);
pub const GET_FAN: CommandSpec = CommandSpec::new("get_fan", FANS_GET, DEVICE_FAN, 0, 1);
pub const SET_FAN: CommandSpec = CommandSpec::new("set_fan", FANS_SET, DEVICE_FAN, 1, 0);
pub const GET_CALIBRATION: CommandSpec =
    CommandSpec::new("get_calibration", MTR_GET_CALIBRATION_STATE, DEVICE_FOC, 0, 1);
pub const SET_CALIBRATION: CommandSpec =
    CommandSpec::new("set_calibration", MTR_SET_CALIBRATION_STATE, DEVICE_FOC, 1, 0);
pub const GET_STOP_DETECT: CommandSpec =
    CommandSpec::new("get_stop_detect", MTR_GET_STOP_DETECT, DEVICE_FOC, 0, 1);
pub const SET_STOP_DETECT: CommandSpec =
    CommandSpec::new("set_stop_detect", MTR_STOP_DETECT, DEVICE_FOC, 1, 0);
pub const GET_APPROACH: CommandSpec =
    CommandSpec::new("get_approach", MTR_GET_APPROACH_DIRECTION, DEVICE_FOC, 0, 1);
pub const SET_APPROACH: CommandSpec =
    CommandSpec::new("set_approach", MTR_APPROACH_DIRECTION, DEVICE_FOC, 1, 0);
pub const GET_TEMPERATURE: CommandSpec =
    CommandSpec::new("get_temperature", TEMP_GET, DEVICE_TEMP, 0, 4);
pub const GET_VERSION: CommandSpec = CommandSpec::new("get_version", VERSION, DEVICE_FOC, 0, 2);
