//! Entry points the host framework calls on its own schedule.

use efaproto_transport::Transport;
use tracing::{debug, info, warn};

use crate::error::{Result, SessionError};
use crate::session::CommandSession;
use crate::state::{GotoState, Temperatures};

/// Goto progress observed during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GotoEvent {
    /// The motor is still running.
    StillMoving,
    /// The goto finished; carries the refreshed position.
    Completed { position: u32 },
}

/// What changed during one tick.
#[derive(Debug, Default)]
pub struct TickReport {
    /// Set whenever a goto was being polled.
    pub goto: Option<GotoEvent>,
    /// Set only when the temperature crossed the reporting threshold.
    pub temperature: Option<Temperatures>,
    /// The opportunistic temperature read failed; goto results still stand.
    pub temperature_error: Option<SessionError>,
}

impl CommandSession {
    /// Populate every cache once at startup.
    ///
    /// Stops at the first failing query; earlier successes stay cached.
    pub fn refresh_all<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<()> {
        let version = self.handshake(transport)?;
        let position = self.read_position(transport)?;
        let max_position = self.read_max_position(transport)?;
        let temperature = self.read_temperature(transport)?.reading;
        let fan = self.read_fan(transport)?;
        let calibration = self.read_calibration(transport)?;

        info!(
            %version,
            position,
            max_position,
            primary = ?temperature.primary,
            ambient = ?temperature.ambient,
            fan,
            calibration,
            "focuser state refreshed"
        );
        Ok(())
    }

    /// One timer tick: poll an outstanding goto, then refresh the temperature.
    ///
    /// Goto polling errors abort the tick with the goto state unchanged. A
    /// completed goto moves to [`GotoState::Complete`] only after the final
    /// position has been read, so a failed read is retried on the next tick.
    pub fn tick<T: Transport + ?Sized>(&mut self, transport: &mut T) -> Result<TickReport> {
        let mut report = TickReport::default();

        if self.state().goto.is_active() {
            if self.is_goto_complete(transport)? {
                let position = self.read_position(transport)?;
                self.set_goto_state(GotoState::Complete);
                debug!(position, "goto complete");
                report.goto = Some(GotoEvent::Completed { position });
            } else {
                self.set_goto_state(GotoState::Polling);
                report.goto = Some(GotoEvent::StillMoving);
            }
        }

        if self.config().tick_reads_temperature {
            match self.read_temperature(transport) {
                Ok(reading) if reading.changed => report.temperature = Some(reading.reading),
                Ok(_) => {}
                Err(err) => {
                    warn!(%err, "temperature refresh failed");
                    report.temperature_error = Some(err);
                }
            }
        }

        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use efaproto_frame::command::*;
    use efaproto_frame::{encode_position, DEVICE_FAN, DEVICE_FOC, DEVICE_TEMP};

    use super::*;
    use crate::config::SessionConfig;
    use crate::mock::ScriptedTransport;

    fn quiet_session() -> CommandSession {
        CommandSession::new(SessionConfig {
            tick_reads_temperature: false,
            ..SessionConfig::default()
        })
    }

    #[test]
    fn refresh_all_populates_every_cache() {
        let mut session = CommandSession::default();
        let mut port = ScriptedTransport::new();
        port.reply(DEVICE_FOC, GET_VERSION, &[2, 1])
            .reply(DEVICE_FOC, MTR_GET_POS, &encode_position(1234))
            .reply(DEVICE_FOC, MTR_SLEWLIMITGETMAX, &encode_position(60_000))
            .reply(DEVICE_TEMP, TEMP_GET, &[0x90, 0x01, 0x80, 0x01])
            .reply(DEVICE_FAN, FANS_GET, &[1])
            .reply(DEVICE_FOC, MTR_GET_CALIBRATION_STATE, &[0]);

        session.refresh_all(&mut port).unwrap();

        let state = session.state();
        assert_eq!(state.version.as_deref(), Some("2.1"));
        assert_eq!(state.position, Some(1234));
        assert_eq!(state.max_position, Some(60_000));
        assert_eq!(state.temperature.unwrap().ambient, Some(24.0));
        assert_eq!(state.fan, Some(true));
        assert_eq!(state.calibration, Some(false));
        assert_eq!(port.pending(), 0);
    }

    #[test]
    fn refresh_all_stops_at_first_failure() {
        let mut session = CommandSession::default();
        let mut port = ScriptedTransport::new();
        port.reply(DEVICE_FOC, GET_VERSION, &[2, 1]).timeout();

        assert!(session.refresh_all(&mut port).is_err());
        assert_eq!(session.state().version.as_deref(), Some("2.1"));
        assert_eq!(session.state().position, None);
        assert_eq!(port.writes.len(), 2);
    }

    #[test]
    fn idle_tick_sends_no_goto_traffic() {
        let mut session = quiet_session();
        let mut port = ScriptedTransport::new();

        let report = session.tick(&mut port).unwrap();
        assert!(report.goto.is_none());
        assert!(port.writes.is_empty());
    }

    #[test]
    fn goto_is_polled_until_complete_then_polling_stops() {
        let mut session = quiet_session();
        let mut port = ScriptedTransport::new();
        port.reply(DEVICE_FOC, MTR_GOTO_POS2, &[])
            .reply(DEVICE_FOC, MTR_GOTO_OVER, &[0])
            .reply(DEVICE_FOC, MTR_GOTO_OVER, &[0])
            .reply(DEVICE_FOC, MTR_GOTO_OVER, &[1])
            .reply(DEVICE_FOC, MTR_GET_POS, &encode_position(800));

        session.move_absolute(&mut port, 800).unwrap();
        assert_eq!(session.state().goto, GotoState::MoveIssued);

        assert_eq!(session.tick(&mut port).unwrap().goto, Some(GotoEvent::StillMoving));
        assert_eq!(session.state().goto, GotoState::Polling);
        assert_eq!(session.tick(&mut port).unwrap().goto, Some(GotoEvent::StillMoving));

        let report = session.tick(&mut port).unwrap();
        assert_eq!(report.goto, Some(GotoEvent::Completed { position: 800 }));
        assert_eq!(session.state().goto, GotoState::Complete);
        assert_eq!(session.state().position, Some(800));

        let sent = port.writes.len();
        let after = session.tick(&mut port).unwrap();
        assert!(after.goto.is_none());
        assert_eq!(port.writes.len(), sent);
    }

    #[test]
    fn failed_poll_keeps_goto_active() {
        let mut session = quiet_session();
        let mut port = ScriptedTransport::new();
        port.reply(DEVICE_FOC, MTR_GOTO_POS2, &[])
            .timeout()
            .reply(DEVICE_FOC, MTR_GOTO_OVER, &[1])
            .timeout()
            .reply(DEVICE_FOC, MTR_GOTO_OVER, &[1])
            .reply(DEVICE_FOC, MTR_GET_POS, &encode_position(50));

        session.move_absolute(&mut port, 50).unwrap();
        assert!(session.tick(&mut port).is_err());
        assert_eq!(session.state().goto, GotoState::MoveIssued);

        // Completion seen but the position read timed out.
        assert!(session.tick(&mut port).is_err());
        assert_eq!(session.state().goto, GotoState::MoveIssued);

        let report = session.tick(&mut port).unwrap();
        assert_eq!(report.goto, Some(GotoEvent::Completed { position: 50 }));
    }

    #[test]
    fn aborted_goto_is_not_polled() {
        let mut session = quiet_session();
        let mut port = ScriptedTransport::new();
        port.reply(DEVICE_FOC, MTR_GOTO_POS2, &[])
            .reply(DEVICE_FOC, MTR_PMSLEW_RATE, &[]);

        session.move_absolute(&mut port, 50).unwrap();
        session.abort(&mut port).unwrap();

        let report = session.tick(&mut port).unwrap();
        assert!(report.goto.is_none());
        assert_eq!(port.writes.len(), 2);
        assert_eq!(session.state().goto, GotoState::Aborted);
    }

    #[test]
    fn tick_reports_temperature_only_on_threshold_crossing() {
        let mut session = CommandSession::default();
        let mut port = ScriptedTransport::new();
        port.reply(DEVICE_TEMP, TEMP_GET, &[0x90, 0x01, 0x90, 0x01])
            .reply(DEVICE_TEMP, TEMP_GET, &[0x90, 0x01, 0x90, 0x01])
            .reply(DEVICE_TEMP, TEMP_GET, &[0xA0, 0x01, 0x90, 0x01]);

        let first = session.tick(&mut port).unwrap();
        assert_eq!(first.temperature.unwrap().primary, Some(25.0));
        assert!(session.tick(&mut port).unwrap().temperature.is_none());
        assert_eq!(
            session.tick(&mut port).unwrap().temperature.unwrap().primary,
            Some(26.0)
        );
    }

    #[test]
    fn temperature_failure_does_not_hide_goto_completion() {
        let mut session = CommandSession::default();
        let mut port = ScriptedTransport::new();
        port.reply(DEVICE_FOC, MTR_GOTO_POS2, &[])
            .reply(DEVICE_FOC, MTR_GOTO_OVER, &[1])
            .reply(DEVICE_FOC, MTR_GET_POS, &encode_position(70))
            .timeout();

        session.move_absolute(&mut port, 70).unwrap();
        let report = session.tick(&mut port).unwrap();

        assert_eq!(report.goto, Some(GotoEvent::Completed { position: 70 }));
        assert!(report.temperature.is_none());
        assert!(report.temperature_error.unwrap().is_timeout());
        assert_eq!(session.state().temperature, None);
    }
}
