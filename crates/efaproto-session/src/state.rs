use serde::Serialize;

/// Progress of the most recent goto, driven by the host's tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GotoState {
    /// No move issued since the session started.
    #[default]
    Idle,
    /// The device accepted a goto; no completion check yet.
    MoveIssued,
    /// At least one completion check reported the motor still running.
    Polling,
    /// The motor reported the goto finished.
    Complete,
    /// Motion was halted by an abort.
    Aborted,
}

impl GotoState {
    /// Returns true while the host should keep polling for completion.
    pub fn is_active(self) -> bool {
        matches!(self, GotoState::MoveIssued | GotoState::Polling)
    }
}

/// Direction the motor takes up backlash from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ApproachDirection {
    /// Final approach with increasing ticks (wire value 0).
    Outward,
    /// Final approach with decreasing ticks (any non-zero wire value).
    Inward,
}

impl ApproachDirection {
    pub(crate) fn from_wire(byte: u8) -> Self {
        if byte == 0 {
            ApproachDirection::Outward
        } else {
            ApproachDirection::Inward
        }
    }

    pub(crate) fn to_wire(self) -> u8 {
        match self {
            ApproachDirection::Outward => 0,
            ApproachDirection::Inward => 1,
        }
    }
}

/// One temperature query: primary (mirror) and ambient probes in °C.
///
/// `None` marks a probe that is not attached.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Temperatures {
    pub primary: Option<f64>,
    pub ambient: Option<f64>,
}

impl Temperatures {
    /// Returns true if any probe moved by at least `threshold` degrees, or a
    /// probe appeared or disappeared.
    pub fn differs_from(&self, previous: &Temperatures, threshold: f64) -> bool {
        probe_differs(self.primary, previous.primary, threshold)
            || probe_differs(self.ambient, previous.ambient, threshold)
    }
}

fn probe_differs(current: Option<f64>, previous: Option<f64>, threshold: f64) -> bool {
    // Tolerance so that a change of exactly `threshold` counts as crossing it.
    const EPSILON: f64 = 1e-9;
    match (current, previous) {
        (Some(current), Some(previous)) => (current - previous).abs() + EPSILON >= threshold,
        (None, None) => false,
        _ => true,
    }
}

/// Last known-good device state.
///
/// Fields are `None` until the matching query succeeds, and are only ever
/// overwritten by a successful exchange.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FocuserState {
    /// Absolute position in ticks.
    pub position: Option<u32>,
    /// Upper slew limit in ticks.
    pub max_position: Option<u32>,
    /// Target of the most recent accepted goto.
    pub target: Option<u32>,
    pub temperature: Option<Temperatures>,
    pub fan: Option<bool>,
    pub calibration: Option<bool>,
    pub stop_detect: Option<bool>,
    pub approach: Option<ApproachDirection>,
    /// Firmware version, `major.minor`.
    pub version: Option<String>,
    pub goto: GotoState,
    /// Relative moves are mirrored when set.
    pub reversed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temps(primary: Option<f64>, ambient: Option<f64>) -> Temperatures {
        Temperatures { primary, ambient }
    }

    #[test]
    fn small_changes_are_suppressed() {
        let previous = temps(Some(20.0), Some(10.0));
        assert!(!temps(Some(20.04), Some(10.0)).differs_from(&previous, 0.05));
        assert!(!temps(Some(19.96), Some(10.01)).differs_from(&previous, 0.05));
        assert!(!previous.differs_from(&previous, 0.05));
    }

    #[test]
    fn changes_at_or_above_threshold_are_reported() {
        let previous = temps(Some(20.0), Some(10.0));
        assert!(temps(Some(20.05), Some(10.0)).differs_from(&previous, 0.05));
        assert!(temps(Some(19.95), Some(10.0)).differs_from(&previous, 0.05));
        assert!(temps(Some(20.0), Some(10.0625)).differs_from(&previous, 0.05));
    }

    #[test]
    fn probe_presence_change_is_reported() {
        let previous = temps(Some(20.0), None);
        assert!(temps(Some(20.0), Some(10.0)).differs_from(&previous, 0.05));
        assert!(temps(None, None).differs_from(&previous, 0.05));
        assert!(!temps(Some(20.0), None).differs_from(&previous, 0.05));
    }

    #[test]
    fn goto_activity() {
        assert!(!GotoState::Idle.is_active());
        assert!(GotoState::MoveIssued.is_active());
        assert!(GotoState::Polling.is_active());
        assert!(!GotoState::Complete.is_active());
        assert!(!GotoState::Aborted.is_active());
    }

    #[test]
    fn approach_wire_values() {
        assert_eq!(ApproachDirection::from_wire(0), ApproachDirection::Outward);
        assert_eq!(ApproachDirection::from_wire(1), ApproachDirection::Inward);
        assert_eq!(ApproachDirection::from_wire(7), ApproachDirection::Inward);
        assert_eq!(ApproachDirection::Inward.to_wire(), 1);
    }

    #[test]
    fn state_serializes_for_reporting() {
        let state = FocuserState {
            position: Some(100),
            goto: GotoState::MoveIssued,
            ..FocuserState::default()
        };
        let json = serde_json::to_value(&state).unwrap();
        assert_eq!(json["position"], 100);
        assert_eq!(json["goto"], "move_issued");
        assert!(json["fan"].is_null());
    }
}
