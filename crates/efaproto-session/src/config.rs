use std::time::Duration;

/// Maximum wait for a complete reply.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(3);

/// Smallest temperature change, in degrees, reported to the host.
pub const TEMPERATURE_THRESHOLD: f64 = 0.05;

/// What to do with a move whose target falls outside the allowed travel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LimitPolicy {
    /// Fail the move with `SessionError::OutOfRange`.
    #[default]
    Reject,
    /// Clip the target to the nearest limit and move there.
    Clamp,
}

/// Configuration for a [`CommandSession`](crate::CommandSession).
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Reply timeout for every exchange. Default: 3 seconds.
    pub timeout: Duration,
    /// Read and discard the request echo that half-duplex bus adapters
    /// return before the reply. Default: false.
    pub discard_echo: bool,
    /// Out-of-range move handling. Default: reject.
    pub limit_policy: LimitPolicy,
    /// Upper travel limit used until the device's own limit has been read.
    pub max_position: Option<u32>,
    /// Temperature change threshold in degrees. Default: 0.05.
    pub temperature_threshold: f64,
    /// Read the temperature on every tick. Default: true.
    pub tick_reads_temperature: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            timeout: DEFAULT_TIMEOUT,
            discard_echo: false,
            limit_policy: LimitPolicy::default(),
            max_position: None,
            temperature_threshold: TEMPERATURE_THRESHOLD,
            tick_reads_temperature: true,
        }
    }
}
