//! In-memory EFA controller for demos and tests.
//!
//! [`SimulatedFocuser`] implements [`Transport`]: every frame written to it is
//! decoded and answered the way a controller on the serial bus would answer,
//! with the reply queued for the next reads. A goto advances the motor by
//! [`SimulatedFocuser::step`] ticks per completion poll.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use efaproto_frame::command::*;
use efaproto_frame::{decode_frame, decode_position, decode_rate, encode_position, Frame, NO_SENSOR};
use efaproto_transport::{Result, Transport, TransportError};

/// A focuser controller that lives in memory.
#[derive(Debug, Clone)]
pub struct SimulatedFocuser {
    pub position: u32,
    pub max_position: u32,
    /// Ticks travelled per completion poll.
    pub step: u32,
    pub fan: bool,
    pub calibration: bool,
    pub stop_detect: bool,
    pub approach: u8,
    /// Raw primary and ambient sensor words.
    pub temperature: [u8; 4],
    pub version: (u8, u8),
    /// Repeat each request back before the reply, like a half-duplex adapter.
    pub echo: bool,
    /// Every well-formed request received, oldest first.
    pub requests: Vec<Frame>,
    pub target: Option<u32>,
    pub slew_rate: u16,
    pub corrupt_next: bool,
    pub pending: VecDeque<u8>,
}

impl Default for SimulatedFocuser {
    fn default() -> Self {
        Self {
            position: 0,
            max_position: 100_000,
            step: 1_000,
            fan: false,
            calibration: false,
            stop_detect: false,
            approach: 0,
            temperature: [0x90, 0x01, 0x80, 0x01],
            version: (1, 0),
            echo: false,
            requests: Vec::new(),
            target: None,
            slew_rate: 0,
            corrupt_next: false,
            pending: VecDeque::new(),
        }
    }
}

impl SimulatedFocuser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set both probe readings in degrees; `None` detaches a probe.
    pub fn set_temperatures(&mut self, primary: Option<f64>, ambient: Option<f64>) {
        let [p0, p1] = sensor_word(primary);
        let [a0, a1] = sensor_word(ambient);
        self.temperature = [p0, p1, a0, a1];
    }

    /// Position the motor is travelling to, if a goto is running.
    pub fn target(&self) -> Option<u32> {
        self.target
    }

    /// Rate of the last slew command; 0 means stopped.
    pub fn slew_rate(&self) -> u16 {
        self.slew_rate
    }

    /// Flip the checksum of the next reply.
    pub fn corrupt_next_reply(&mut self) {
        self.corrupt_next = true;
    }

    /// Bytes queued for the host that have not been read yet.
    pub fn unread(&self) -> usize {
        self.pending.len()
    }

    fn respond(&mut self, request: &Frame) -> Option<Vec<u8>> {
        let payload = &request.payload[..];
        let reply = match request.command {
            MTR_GET_POS => encode_position(self.position).to_vec(),
            MTR_GOTO_POS2 => {
                let target = decode_position(position_field(payload)?);
                self.target = Some(target.min(self.max_position));
                Vec::new()
            }
            MTR_GOTO_OVER => vec![u8::from(self.advance())],
            MTR_OFFSET_CNT => {
                self.position = decode_position(position_field(payload)?);
                Vec::new()
            }
            MTR_PMSLEW_RATE | MTR_NMSLEW_RATE => {
                let rate = decode_rate([*payload.first()?, *payload.get(1)?]);
                self.slew_rate = rate;
                if rate == 0 {
                    self.target = None;
                }
                Vec::new()
            }
            MTR_SLEWLIMITMAX => {
                self.max_position = decode_position(position_field(payload)?);
                Vec::new()
            }
            MTR_SLEWLIMITGETMAX => encode_position(self.max_position).to_vec(),
            TEMP_GET => self.temperature.to_vec(),
            FANS_GET => vec![u8::from(self.fan)],
            FANS_SET => {
                self.fan = *payload.first()? != 0;
                Vec::new()
            }
            MTR_GET_CALIBRATION_STATE => vec![u8::from(self.calibration)],
            MTR_SET_CALIBRATION_STATE => {
                self.calibration = *payload.first()? != 0;
                Vec::new()
            }
            MTR_GET_STOP_DETECT => vec![u8::from(self.stop_detect)],
            MTR_STOP_DETECT => {
                self.stop_detect = *payload.first()? != 0;
                Vec::new()
            }
            MTR_GET_APPROACH_DIRECTION => vec![self.approach],
            MTR_APPROACH_DIRECTION => {
                self.approach = *payload.first()?;
                Vec::new()
            }
            GET_VERSION => vec![self.version.0, self.version.1],
            // Unknown commands go unanswered.
            _ => return None,
        };
        Some(reply)
    }

    /// Move one step toward the target; true once there is nothing left to do.
    fn advance(&mut self) -> bool {
        let Some(target) = self.target else {
            return true;
        };
        self.position = if self.position < target {
            self.position.saturating_add(self.step).min(target)
        } else {
            self.position.saturating_sub(self.step).max(target)
        };
        if self.position == target {
            self.target = None;
            return true;
        }
        false
    }
}

impl Transport for SimulatedFocuser {
    fn write_all(&mut self, bytes: &[u8]) -> Result<()> {
        let request = decode_frame(bytes, bytes.len())
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err))?;
        if self.echo {
            self.pending.extend(bytes);
        }

        if let Some(payload) = self.respond(&request) {
            let reply = Frame::new(request.destination, request.source, request.command, payload);
            let mut wire = reply.to_bytes().to_vec();
            if self.corrupt_next {
                self.corrupt_next = false;
                if let Some(last) = wire.last_mut() {
                    *last ^= 0xFF;
                }
            }
            self.pending.extend(wire);
        }
        self.requests.push(request);
        Ok(())
    }

    fn read_exact(&mut self, n: usize, timeout: Duration) -> Result<Vec<u8>> {
        if self.pending.len() < n {
            let received = self.pending.len();
            self.pending.clear();
            return Err(TransportError::Timeout {
                expected: n,
                received,
                timeout,
            });
        }
        Ok(self.pending.drain(..n).collect())
    }
}

fn position_field(payload: &[u8]) -> Option<[u8; 3]> {
    payload.get(..3)?.try_into().ok()
}

fn sensor_word(degrees: Option<f64>) -> [u8; 2] {
    match degrees {
        Some(degrees) => {
            let raw = ((degrees * 16.0).round() as i16) & 0x0FFF;
            [(raw & 0xFF) as u8, (raw >> 8) as u8]
        }
        None => NO_SENSOR,
    }
}
