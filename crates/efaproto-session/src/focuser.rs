use efaproto_transport::Transport;

use crate::error::Result;
use crate::session::CommandSession;

/// Direction of a relative focus move.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusDirection {
    /// Toward decreasing ticks.
    Inward,
    /// Toward increasing ticks.
    Outward,
}

impl FocusDirection {
    /// Signed tick delta for a move of `ticks` in this direction.
    pub fn delta(self, ticks: u32) -> i64 {
        match self {
            FocusDirection::Inward => -i64::from(ticks),
            FocusDirection::Outward => i64::from(ticks),
        }
    }
}

/// The motion operations a host framework needs from a focuser driver.
pub trait Focuser {
    /// Start a goto and return the target issued.
    fn move_absolute(&mut self, target: u32) -> Result<u32>;

    /// Start a goto relative to the last known position.
    fn move_relative(&mut self, direction: FocusDirection, ticks: u32) -> Result<u32>;

    /// Redefine the current position.
    fn sync(&mut self, ticks: u32) -> Result<()>;

    /// Halt motion.
    fn abort(&mut self) -> Result<()>;

    /// Mirror the direction of relative moves.
    fn reverse(&mut self, enabled: bool) -> Result<()>;

    /// Set the upper travel limit.
    fn set_max_position(&mut self, ticks: u32) -> Result<()>;
}

/// A session paired with the transport it may use for the current call.
pub struct BoundSession<'a, T: ?Sized> {
    session: &'a mut CommandSession,
    transport: &'a mut T,
}

impl CommandSession {
    /// Borrow `transport` to use the session through [`Focuser`].
    pub fn bind<'a, T: Transport + ?Sized>(
        &'a mut self,
        transport: &'a mut T,
    ) -> BoundSession<'a, T> {
        BoundSession {
            session: self,
            transport,
        }
    }
}

impl<T: Transport + ?Sized> BoundSession<'_, T> {
    /// The underlying session.
    pub fn session(&self) -> &CommandSession {
        self.session
    }
}

impl<T: Transport + ?Sized> Focuser for BoundSession<'_, T> {
    fn move_absolute(&mut self, target: u32) -> Result<u32> {
        self.session.move_absolute(&mut *self.transport, target)
    }

    fn move_relative(&mut self, direction: FocusDirection, ticks: u32) -> Result<u32> {
        self.session.move_relative(&mut *self.transport, direction.delta(ticks))
    }

    fn sync(&mut self, ticks: u32) -> Result<()> {
        self.session.sync(&mut *self.transport, ticks)
    }

    fn abort(&mut self) -> Result<()> {
        self.session.abort(&mut *self.transport)
    }

    fn reverse(&mut self, enabled: bool) -> Result<()> {
        self.session.set_reversed(enabled);
        Ok(())
    }

    fn set_max_position(&mut self, ticks: u32) -> Result<()> {
        self.session.set_max_position(&mut *self.transport, ticks)
    }
}

#[cfg(test)]
mod tests {
    use efaproto_frame::command::{MTR_GET_POS, MTR_GOTO_POS2, MTR_OFFSET_CNT};
    use efaproto_frame::{encode_position, DEVICE_FOC};

    use super::*;
    use crate::mock::ScriptedTransport;
    use crate::state::GotoState;

    fn drive(focuser: &mut dyn Focuser) -> Result<u32> {
        focuser.reverse(true)?;
        focuser.move_relative(FocusDirection::Outward, 100)
    }

    #[test]
    fn direction_deltas() {
        assert_eq!(FocusDirection::Inward.delta(25), -25);
        assert_eq!(FocusDirection::Outward.delta(25), 25);
        assert_eq!(FocusDirection::Outward.delta(0), 0);
    }

    #[test]
    fn bound_session_drives_through_trait_object() {
        let mut session = CommandSession::default();
        let mut port = ScriptedTransport::new();
        port.reply(DEVICE_FOC, MTR_GET_POS, &encode_position(1000))
            .reply(DEVICE_FOC, MTR_GOTO_POS2, &[]);
        session.read_position(&mut port).unwrap();

        let target = drive(&mut session.bind(&mut port)).unwrap();

        assert_eq!(target, 900);
        assert!(session.state().reversed);
        assert_eq!(session.state().goto, GotoState::MoveIssued);
    }

    #[test]
    fn bound_session_sync() {
        let mut session = CommandSession::default();
        let mut port = ScriptedTransport::new();
        port.reply(DEVICE_FOC, MTR_OFFSET_CNT, &[]);

        let mut bound = session.bind(&mut port);
        bound.sync(77).unwrap();
        assert_eq!(bound.session().state().position, Some(77));
    }
}
