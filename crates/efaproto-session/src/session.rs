use bytes::BytesMut;
use efaproto_frame::{
    decode_frame, decode_position, encode_frame, encode_position, encode_rate, hex_dump,
    temperature_celsius, Frame, DEVICE_PC, MAX_POSITION,
};
use efaproto_transport::Transport;
use tracing::{debug, trace, warn};

use crate::commands::{self, CommandSpec};
use crate::config::{LimitPolicy, SessionConfig};
use crate::error::{Result, SessionError};
use crate::format::format_version;
use crate::state::{ApproachDirection, FocuserState, GotoState, Temperatures};

/// Manual slew direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlewDirection {
    /// Increasing ticks.
    Outward,
    /// Decreasing ticks.
    Inward,
}

/// Result of a temperature query.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TemperatureReading {
    /// What the sensors reported on this query.
    pub reading: Temperatures,
    /// Whether the reading crossed the threshold and replaced the cache.
    pub changed: bool,
}

/// The single stateful layer between focuser operations and the wire.
///
/// Every operation is one exchange over a transport borrowed for the call:
/// build frame, send, read the fixed-length reply, validate, decode, update
/// the cache. A failed exchange returns an error and changes nothing.
#[derive(Debug, Default)]
pub struct CommandSession {
    config: SessionConfig,
    state: FocuserState,
}

impl CommandSession {
    /// Create a session with explicit configuration.
    pub fn new(config: SessionConfig) -> Self {
        Self {
            config,
            state: FocuserState::default(),
        }
    }

    /// Current session configuration.
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Last known-good device state.
    pub fn state(&self) -> &FocuserState {
        &self.state
    }

    /// Mirror relative moves. Host-side only; the device is not told.
    pub fn set_reversed(&mut self, reversed: bool) {
        self.state.reversed = reversed;
    }

    /// Read the absolute position.
    pub fn read_position<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<u32> {
        let frame = self.exchange(transport, &commands::GET_POSITION, &[])?;
        let position = decode_position(payload_array(&frame));
        self.state.position = Some(position);
        Ok(position)
    }

    /// Start a goto to `target` ticks and return the target actually issued.
    ///
    /// Completion is asynchronous: poll with [`CommandSession::tick`] or
    /// [`CommandSession::is_goto_complete`].
    pub fn move_absolute<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        target: u32,
    ) -> Result<u32> {
        let target = self.bound_target(i64::from(target))?;
        self.exchange(transport, &commands::GOTO, &encode_position(target))?;
        debug!(target, "goto issued");
        self.state.target = Some(target);
        self.state.goto = GotoState::MoveIssued;
        Ok(target)
    }

    /// Move by a signed tick delta from the last known position.
    pub fn move_relative<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        delta: i64,
    ) -> Result<u32> {
        let target = self.resolve_relative(delta)?;
        self.move_absolute(transport, target)
    }

    /// Absolute target for a relative move, after reversal and limits.
    pub fn resolve_relative(&self, delta: i64) -> Result<u32> {
        let current = self.state.position.ok_or(SessionError::PositionUnknown)?;
        // Saturated extremes stay far outside the 24-bit range for the limits to handle.
        let delta = if self.state.reversed {
            delta.saturating_neg()
        } else {
            delta
        };
        self.bound_target(i64::from(current).saturating_add(delta))
    }

    /// Declare the current mechanical position to be `ticks` without moving.
    pub fn sync<T: Transport + ?Sized>(&mut self, transport: &mut T, ticks: u32) -> Result<()> {
        let ticks = self.bound_target(i64::from(ticks))?;
        self.exchange(transport, &commands::SYNC, &encode_position(ticks))?;
        self.state.position = Some(ticks);
        Ok(())
    }

    /// Ask whether the motor has stopped after a goto.
    pub fn is_goto_complete<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<bool> {
        let frame = self.exchange(transport, &commands::GOTO_COMPLETE, &[])?;
        Ok(frame.payload[0] != 0)
    }

    /// Halt motion by commanding a zero slew rate.
    pub fn abort<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<()> {
        self.exchange(transport, &commands::SLEW_OUT, &encode_rate(0))?;
        debug!("motion aborted");
        self.state.goto = GotoState::Aborted;
        Ok(())
    }

    /// Slew continuously at `rate` until stopped (rate 0 or [`CommandSession::abort`]).
    pub fn slew<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        direction: SlewDirection,
        rate: u16,
    ) -> Result<()> {
        let spec = match direction {
            SlewDirection::Outward => &commands::SLEW_OUT,
            SlewDirection::Inward => &commands::SLEW_IN,
        };
        self.exchange(transport, spec, &encode_rate(rate))?;
        Ok(())
    }

    /// Set the upper slew limit.
    pub fn set_max_position<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        ticks: u32,
    ) -> Result<()> {
        if ticks > MAX_POSITION {
            return Err(SessionError::OutOfRange {
                target: i64::from(ticks),
                max: MAX_POSITION,
            });
        }
        self.exchange(transport, &commands::SET_MAX_POSITION, &encode_position(ticks))?;
        self.state.max_position = Some(ticks);
        Ok(())
    }

    /// Read the upper slew limit.
    pub fn read_max_position<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<u32> {
        let frame = self.exchange(transport, &commands::GET_MAX_POSITION, &[])?;
        let ticks = decode_position(payload_array(&frame));
        self.state.max_position = Some(ticks);
        Ok(ticks)
    }

    pub fn read_fan<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<bool> {
        let enabled = self.read_flag(transport, &commands::GET_FAN)?;
        self.state.fan = Some(enabled);
        Ok(enabled)
    }

    pub fn set_fan<T: Transport + ?Sized>(&mut self, transport: &mut T, enabled: bool) -> Result<()> {
        self.exchange(transport, &commands::SET_FAN, &[u8::from(enabled)])?;
        self.state.fan = Some(enabled);
        Ok(())
    }

    pub fn read_calibration<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<bool> {
        let enabled = self.read_flag(transport, &commands::GET_CALIBRATION)?;
        self.state.calibration = Some(enabled);
        Ok(enabled)
    }

    pub fn set_calibration<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        enabled: bool,
    ) -> Result<()> {
        self.exchange(transport, &commands::SET_CALIBRATION, &[u8::from(enabled)])?;
        self.state.calibration = Some(enabled);
        Ok(())
    }

    pub fn read_stop_detect<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<bool> {
        let enabled = self.read_flag(transport, &commands::GET_STOP_DETECT)?;
        self.state.stop_detect = Some(enabled);
        Ok(enabled)
    }

    pub fn set_stop_detect<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        enabled: bool,
    ) -> Result<()> {
        self.exchange(transport, &commands::SET_STOP_DETECT, &[u8::from(enabled)])?;
        self.state.stop_detect = Some(enabled);
        Ok(())
    }

    pub fn read_approach_direction<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<ApproachDirection> {
        let frame = self.exchange(transport, &commands::GET_APPROACH, &[])?;
        let direction = ApproachDirection::from_wire(frame.payload[0]);
        self.state.approach = Some(direction);
        Ok(direction)
    }

    pub fn set_approach_direction<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        direction: ApproachDirection,
    ) -> Result<()> {
        self.exchange(transport, &commands::SET_APPROACH, &[direction.to_wire()])?;
        self.state.approach = Some(direction);
        Ok(())
    }

    /// Read both temperature probes.
    ///
    /// The cache is replaced only when the reading differs from it by at
    /// least the configured threshold.
    pub fn read_temperature<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
    ) -> Result<TemperatureReading> {
        let frame = self.exchange(transport, &commands::GET_TEMPERATURE, &[])?;
        let raw: [u8; 4] = payload_array(&frame);
        let reading = Temperatures {
            primary: temperature_celsius(raw[0], raw[1]),
            ambient: temperature_celsius(raw[2], raw[3]),
        };

        let changed = match &self.state.temperature {
            Some(previous) => reading.differs_from(previous, self.config.temperature_threshold),
            None => true,
        };
        if changed {
            debug!(primary = ?reading.primary, ambient = ?reading.ambient, "temperature changed");
            self.state.temperature = Some(reading);
        }

        Ok(TemperatureReading { reading, changed })
    }

    /// Firmware version, queried once and served from the cache afterwards.
    pub fn read_version<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<String> {
        if let Some(version) = &self.state.version {
            return Ok(version.clone());
        }
        self.handshake(transport)
    }

    /// Query the firmware version unconditionally to prove the link works.
    pub fn handshake<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<String> {
        let frame = self.exchange(transport, &commands::GET_VERSION, &[])?;
        let version = format_version(frame.payload[0], frame.payload[1]);
        debug!(%version, "focuser identified");
        self.state.version = Some(version.clone());
        Ok(version)
    }

    pub(crate) fn set_goto_state(&mut self, goto: GotoState) {
        self.state.goto = goto;
    }

    fn read_flag<T: Transport + ?Sized>(
        &mut self,
        transport: &mut T,
        spec: &CommandSpec,
    ) -> Result<bool> {
        let frame = self.exchange(transport, spec, &[])?;
        Ok(frame.payload[0] != 0)
    }

    /// Upper travel bound: device limit if read, else configured, else the
    /// 24-bit field maximum.
    fn position_limit(&self) -> u32 {
        self.state
            .max_position
            .or(self.config.max_position)
            .unwrap_or(MAX_POSITION)
            .min(MAX_POSITION)
    }

    fn bound_target(&self, target: i64) -> Result<u32> {
        let max = self.position_limit();
        if (0..=i64::from(max)).contains(&target) {
            return Ok(target as u32);
        }
        match self.config.limit_policy {
            LimitPolicy::Reject => Err(SessionError::OutOfRange { target, max }),
            LimitPolicy::Clamp => {
                let clamped = target.clamp(0, i64::from(max)) as u32;
                debug!(target, clamped, "target clamped to travel limits");
                Ok(clamped)
            }
        }
    }

    fn exchange<T: Transport + ?Sized>(
        &self,
        transport: &mut T,
        spec: &CommandSpec,
        payload: &[u8],
    ) -> Result<Frame> {
        assert_eq!(
            payload.len(),
            spec.request_len,
            "{} takes a {}-byte payload",
            spec.name,
            spec.request_len
        );

        let mut request = BytesMut::with_capacity(spec.request_frame_len());
        encode_frame(DEVICE_PC, spec.device, spec.code, payload, &mut request);
        trace!(command = spec.name, tx = %hex_dump(&request), "sending request");
        transport.write_all(&request)?;

        if self.config.discard_echo {
            let echo = transport.read_exact(request.len(), self.config.timeout)?;
            if echo != request.as_ref() {
                warn!(command = spec.name, echo = %hex_dump(&echo), "bus echo mismatch");
                return Err(SessionError::UnexpectedReply {
                    command: spec.name,
                    reason: format!("echo {} does not match request", hex_dump(&echo)),
                });
            }
        }

        let reply_len = spec.reply_frame_len();
        let raw = transport.read_exact(reply_len, self.config.timeout)?;
        trace!(command = spec.name, rx = %hex_dump(&raw), "received reply");

        let frame = decode_frame(&raw, reply_len).inspect_err(|err| {
            warn!(command = spec.name, rx = %hex_dump(&raw), %err, "rejected reply");
        })?;

        if frame.command != spec.code
            || frame.source != spec.device
            || frame.destination != DEVICE_PC
        {
            warn!(
                command = spec.name,
                source = frame.source,
                destination = frame.destination,
                code = frame.command,
                "reply addressed to another exchange"
            );
            return Err(SessionError::UnexpectedReply {
                command: spec.name,
                reason: format!(
                    "got command 0x{:02X} from 0x{:02X} to 0x{:02X}",
                    frame.command, frame.source, frame.destination
                ),
            });
        }

        Ok(frame)
    }
}

/// Copy the first `N` payload bytes; reply length was validated by `exchange`.
fn payload_array<const N: usize>(frame: &Frame) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(&frame.payload[..N]);
    out
}
