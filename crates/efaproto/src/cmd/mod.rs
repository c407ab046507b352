use std::time::Duration;

use clap::{Args, Subcommand, ValueEnum};
use efaproto_frame::MAX_POSITION;
use efaproto_session::{CommandSession, LimitPolicy, SessionConfig};
use efaproto_transport::{SerialConfig, SerialTransport, DEFAULT_BAUD_RATE};

use crate::exit::{transport_error, CliError, CliResult, USAGE};
use crate::output::OutputFormat;

pub mod motion;
pub mod query;
pub mod switch;
pub mod version;

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Read every cached value and print the focuser state.
    Status(StatusArgs),
    /// Read the current position.
    Position(PortArgs),
    /// Move to an absolute position.
    Goto(GotoArgs),
    /// Move by a signed number of ticks.
    Move(MoveArgs),
    /// Redefine the current position without moving.
    Sync(SyncArgs),
    /// Halt motion.
    Abort(PortArgs),
    /// Read or set the upper travel limit.
    Max(MaxArgs),
    /// Read or switch the cooling fan.
    Fan(SwitchArgs),
    /// Read or switch calibration mode.
    Calibration(SwitchArgs),
    /// Read the primary and ambient temperatures.
    Temperature(PortArgs),
    /// Query the controller firmware version.
    Firmware(PortArgs),
    /// Show version information.
    Version(VersionArgs),
}

pub fn run(command: Command, format: OutputFormat) -> CliResult<i32> {
    match command {
        Command::Status(args) => query::status(args, format),
        Command::Position(args) => query::position(args, format),
        Command::Goto(args) => motion::goto(args, format),
        Command::Move(args) => motion::move_relative(args, format),
        Command::Sync(args) => motion::sync(args, format),
        Command::Abort(args) => motion::abort(args, format),
        Command::Max(args) => motion::max(args, format),
        Command::Fan(args) => switch::fan(args, format),
        Command::Calibration(args) => switch::calibration(args, format),
        Command::Temperature(args) => query::temperature(args, format),
        Command::Firmware(args) => query::firmware(args, format),
        Command::Version(args) => version::run(args),
    }
}

#[derive(Args, Debug)]
pub struct PortArgs {
    /// Serial device the controller is attached to.
    #[arg(long, short = 'p', env = "EFA_PORT")]
    pub port: String,
    /// Line speed.
    #[arg(long, env = "EFA_BAUD", default_value_t = DEFAULT_BAUD_RATE)]
    pub baud: u32,
    /// Reply timeout (e.g. 3s, 500ms).
    #[arg(long, default_value = "3s")]
    pub timeout: String,
    /// Discard the request echo returned by half-duplex bus adapters.
    #[arg(long)]
    pub echo: bool,
}

#[derive(Args, Debug)]
pub struct WaitArgs {
    /// Poll until the goto completes.
    #[arg(long)]
    pub wait: bool,
    /// Delay between completion checks when --wait is set.
    #[arg(long, default_value = "250ms")]
    pub poll_interval: String,
    /// Abort the move if it has not completed in this long.
    #[arg(long, default_value = "120s")]
    pub wait_timeout: String,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    #[command(flatten)]
    pub port: PortArgs,
}

#[derive(Args, Debug)]
pub struct GotoArgs {
    /// Target position in ticks.
    #[arg(value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_POSITION)))]
    pub target: u32,
    /// Upper travel limit to enforce when the device limit is not read.
    #[arg(long)]
    pub max: Option<u32>,
    /// Out-of-range handling.
    #[arg(long, value_enum, default_value = "reject")]
    pub limit: LimitArg,
    #[command(flatten)]
    pub wait: WaitArgs,
    #[command(flatten)]
    pub port: PortArgs,
}

#[derive(Args, Debug)]
pub struct MoveArgs {
    /// Signed tick delta; negative moves inward.
    #[arg(allow_negative_numbers = true)]
    pub delta: i64,
    /// Mirror the direction of the move.
    #[arg(long)]
    pub reverse: bool,
    /// Out-of-range handling.
    #[arg(long, value_enum, default_value = "reject")]
    pub limit: LimitArg,
    #[command(flatten)]
    pub wait: WaitArgs,
    #[command(flatten)]
    pub port: PortArgs,
}

#[derive(Args, Debug)]
pub struct SyncArgs {
    /// New value for the current position.
    #[arg(value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_POSITION)))]
    pub ticks: u32,
    #[command(flatten)]
    pub port: PortArgs,
}

#[derive(Args, Debug)]
pub struct MaxArgs {
    /// New limit; omit to read the current one.
    #[arg(value_parser = clap::value_parser!(u32).range(0..=i64::from(MAX_POSITION)))]
    pub ticks: Option<u32>,
    #[command(flatten)]
    pub port: PortArgs,
}

#[derive(Args, Debug)]
pub struct SwitchArgs {
    /// New state; omit to read the current one.
    #[arg(value_enum)]
    pub state: Option<SwitchState>,
    #[command(flatten)]
    pub port: PortArgs,
}

#[derive(Args, Debug)]
pub struct VersionArgs {
    /// Show extended build provenance.
    #[arg(long)]
    pub extended: bool,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum SwitchState {
    On,
    Off,
}

impl SwitchState {
    pub fn enabled(self) -> bool {
        matches!(self, SwitchState::On)
    }
}

#[derive(Copy, Clone, Debug, ValueEnum)]
pub enum LimitArg {
    Reject,
    Clamp,
}

impl From<LimitArg> for LimitPolicy {
    fn from(arg: LimitArg) -> Self {
        match arg {
            LimitArg::Reject => LimitPolicy::Reject,
            LimitArg::Clamp => LimitPolicy::Clamp,
        }
    }
}

/// An open port with a fresh session.
pub struct Connection {
    pub transport: SerialTransport,
    pub session: CommandSession,
}

impl PortArgs {
    pub fn session_config(&self) -> CliResult<SessionConfig> {
        Ok(SessionConfig {
            timeout: parse_duration(&self.timeout)?,
            discard_echo: self.echo,
            tick_reads_temperature: false,
            ..SessionConfig::default()
        })
    }

    pub fn connect(&self, config: SessionConfig) -> CliResult<Connection> {
        let serial = SerialConfig {
            path: self.port.clone(),
            baud_rate: self.baud,
            timeout: config.timeout,
        };
        let transport =
            SerialTransport::open(&serial).map_err(|err| transport_error("open failed", err))?;
        Ok(Connection {
            transport,
            session: CommandSession::new(config),
        })
    }

    pub fn open(&self) -> CliResult<Connection> {
        self.connect(self.session_config()?)
    }
}

pub(crate) fn parse_duration(input: &str) -> CliResult<Duration> {
    let input = input.trim();
    if input.is_empty() {
        return Err(CliError::new(USAGE, "duration must not be empty"));
    }

    let (number, unit) = if let Some(num) = input.strip_suffix("ms") {
        (num, "ms")
    } else if let Some(num) = input.strip_suffix('s') {
        (num, "s")
    } else {
        (input, "s")
    };

    let value: u64 = number
        .parse()
        .map_err(|_| CliError::new(USAGE, format!("invalid duration value: {input}")))?;

    if value == 0 {
        return Err(CliError::new(USAGE, "duration must be greater than zero"));
    }

    Ok(match unit {
        "ms" => Duration::from_millis(value),
        _ => Duration::from_secs(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn durations_accept_seconds_and_millis() {
        assert_eq!(parse_duration("3s").unwrap(), Duration::from_secs(3));
        assert_eq!(parse_duration("250ms").unwrap(), Duration::from_millis(250));
        assert_eq!(parse_duration(" 7 ").unwrap(), Duration::from_secs(7));
    }

    #[test]
    fn durations_reject_zero_and_garbage() {
        assert_eq!(parse_duration("0s").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("fast").unwrap_err().code, USAGE);
        assert_eq!(parse_duration("1.5s").unwrap_err().code, USAGE);
    }

    #[test]
    fn session_config_follows_port_args() {
        let args = PortArgs {
            port: "/dev/ttyUSB0".to_string(),
            baud: DEFAULT_BAUD_RATE,
            timeout: "500ms".to_string(),
            echo: true,
        };
        let config = args.session_config().unwrap();
        assert_eq!(config.timeout, Duration::from_millis(500));
        assert!(config.discard_echo);
        assert!(!config.tick_reads_temperature);
        assert_eq!(config.limit_policy, LimitPolicy::Reject);
    }

    #[test]
    fn limit_arg_maps_to_policy() {
        assert_eq!(LimitPolicy::from(LimitArg::Clamp), LimitPolicy::Clamp);
        assert_eq!(LimitPolicy::from(LimitArg::Reject), LimitPolicy::Reject);
    }
}
