mod cmd;
mod exit;
mod logging;
mod output;

use clap::Parser;

use crate::cmd::Command;
use crate::logging::{init_logging, LogFormat, LogLevel};
use crate::output::OutputFormat;

#[derive(Parser, Debug)]
#[command(name = "efaproto", version, about = "PlaneWave EFA focuser CLI")]
struct Cli {
    /// Output format.
    #[arg(long, value_name = "FORMAT", global = true)]
    format: Option<OutputFormat>,

    /// Log output format (stderr).
    #[arg(long, value_name = "FORMAT", default_value = "text", global = true)]
    log_format: LogFormat,

    /// Minimum log level (stderr).
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Command,
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.log_format, cli.log_level);

    let format = cli.format.unwrap_or_else(OutputFormat::default_for_stdout);
    let result = cmd::run(cli.command, format);

    match result {
        Ok(code) => std::process::exit(code),
        Err(err) => {
            eprintln!("error: {err}");
            std::process::exit(err.code);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cmd::{LimitArg, SwitchState};

    #[test]
    fn parses_goto_with_wait() {
        let cli = Cli::try_parse_from([
            "efaproto",
            "goto",
            "15000",
            "--port",
            "/dev/ttyUSB0",
            "--wait",
            "--poll-interval",
            "100ms",
        ])
        .expect("goto args should parse");

        match cli.command {
            Command::Goto(args) => {
                assert_eq!(args.target, 15000);
                assert!(args.wait.wait);
                assert_eq!(args.wait.poll_interval, "100ms");
                assert_eq!(args.port.port, "/dev/ttyUSB0");
            }
            other => panic!("expected goto, got {other:?}"),
        }
    }

    #[test]
    fn move_accepts_negative_delta() {
        let cli = Cli::try_parse_from([
            "efaproto", "move", "-250", "--port", "COM3", "--limit", "clamp", "--reverse",
        ])
        .expect("negative delta should parse");

        match cli.command {
            Command::Move(args) => {
                assert_eq!(args.delta, -250);
                assert!(args.reverse);
                assert!(matches!(args.limit, LimitArg::Clamp));
            }
            other => panic!("expected move, got {other:?}"),
        }
    }

    #[test]
    fn fan_without_state_is_a_query() {
        let cli = Cli::try_parse_from(["efaproto", "fan", "--port", "/dev/ttyUSB0"])
            .expect("fan query should parse");
        assert!(matches!(cli.command, Command::Fan(ref args) if args.state.is_none()));

        let cli = Cli::try_parse_from(["efaproto", "fan", "on", "--port", "/dev/ttyUSB0"])
            .expect("fan set should parse");
        assert!(matches!(
            cli.command,
            Command::Fan(ref args) if matches!(args.state, Some(SwitchState::On))
        ));
    }

    #[test]
    fn rejects_position_above_24_bits() {
        let err = Cli::try_parse_from(["efaproto", "goto", "16777216", "--port", "/dev/ttyUSB0"])
            .expect_err("out of range target should fail");
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn parses_global_format_after_subcommand() {
        let cli = Cli::try_parse_from([
            "efaproto", "status", "--port", "/dev/ttyUSB0", "--format", "json",
        ])
        .expect("status args should parse");
        assert!(matches!(cli.format, Some(OutputFormat::Json)));
        assert!(matches!(cli.command, Command::Status(_)));
    }

    #[test]
    fn version_needs_no_port() {
        let cli = Cli::try_parse_from(["efaproto", "version", "--extended"])
            .expect("version args should parse");
        assert!(matches!(cli.command, Command::Version(ref args) if args.extended));
    }
}
