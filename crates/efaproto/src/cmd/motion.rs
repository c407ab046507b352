use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use efaproto_session::{GotoEvent, GotoState, SessionConfig};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::cmd::{
    parse_duration, Connection, GotoArgs, MaxArgs, MoveArgs, PortArgs, SyncArgs, WaitArgs,
};
use crate::exit::{
    session_error, CliError, CliResult, FAILURE, INTERNAL, INTERRUPTED, SUCCESS, TIMEOUT,
};
use crate::output::{goto_label, print_report, ticks, OutputFormat};

#[derive(Serialize)]
struct GotoOutput {
    kind: &'static str,
    target: u32,
    position: Option<u32>,
    state: GotoState,
}

impl GotoOutput {
    fn print(&self, format: OutputFormat) {
        let rows = [
            ("target", self.target.to_string()),
            ("position", ticks(self.position)),
            ("state", goto_label(self.state).to_string()),
        ];
        print_report(self, &rows, format);
    }
}

pub fn goto(args: GotoArgs, format: OutputFormat) -> CliResult<i32> {
    let config = SessionConfig {
        limit_policy: args.limit.into(),
        max_position: args.max,
        ..args.port.session_config()?
    };
    let mut conn = args.port.connect(config)?;

    // An explicit --max wins over the limit stored in the controller.
    if args.max.is_none() {
        read_device_limit(&mut conn)?;
    }

    let target = conn
        .session
        .move_absolute(&mut conn.transport, args.target)
        .map_err(|err| session_error("goto rejected", err))?;
    finish_move(conn, target, &args.wait, format)
}

pub fn move_relative(args: MoveArgs, format: OutputFormat) -> CliResult<i32> {
    let config = SessionConfig {
        limit_policy: args.limit.into(),
        ..args.port.session_config()?
    };
    let mut conn = args.port.connect(config)?;
    conn.session.set_reversed(args.reverse);

    conn.session
        .read_position(&mut conn.transport)
        .map_err(|err| session_error("read position failed", err))?;
    read_device_limit(&mut conn)?;

    let target = conn
        .session
        .move_relative(&mut conn.transport, args.delta)
        .map_err(|err| session_error("move rejected", err))?;
    finish_move(conn, target, &args.wait, format)
}

#[derive(Serialize)]
struct TicksOutput {
    kind: &'static str,
    ticks: u32,
}

pub fn sync(args: SyncArgs, format: OutputFormat) -> CliResult<i32> {
    let mut conn = args.port.open()?;
    conn.session
        .sync(&mut conn.transport, args.ticks)
        .map_err(|err| session_error("sync failed", err))?;

    let out = TicksOutput {
        kind: "sync",
        ticks: args.ticks,
    };
    print_report(&out, &[("position", args.ticks.to_string())], format);
    Ok(SUCCESS)
}

#[derive(Serialize)]
struct AbortOutput {
    kind: &'static str,
    aborted: bool,
}

pub fn abort(args: PortArgs, format: OutputFormat) -> CliResult<i32> {
    let mut conn = args.open()?;
    conn.session
        .abort(&mut conn.transport)
        .map_err(|err| session_error("abort failed", err))?;

    let out = AbortOutput {
        kind: "abort",
        aborted: true,
    };
    print_report(&out, &[("aborted", "true".to_string())], format);
    Ok(SUCCESS)
}

pub fn max(args: MaxArgs, format: OutputFormat) -> CliResult<i32> {
    let mut conn = args.port.open()?;
    let ticks = match args.ticks {
        Some(ticks) => {
            conn.session
                .set_max_position(&mut conn.transport, ticks)
                .map_err(|err| session_error("set max position failed", err))?;
            ticks
        }
        None => conn
            .session
            .read_max_position(&mut conn.transport)
            .map_err(|err| session_error("read max position failed", err))?,
    };

    let out = TicksOutput {
        kind: "max-position",
        ticks,
    };
    print_report(&out, &[("max_position", ticks.to_string())], format);
    Ok(SUCCESS)
}

fn read_device_limit(conn: &mut Connection) -> CliResult<()> {
    conn.session
        .read_max_position(&mut conn.transport)
        .map(|_| ())
        .map_err(|err| session_error("read max position failed", err))
}

fn finish_move(
    mut conn: Connection,
    target: u32,
    wait: &WaitArgs,
    format: OutputFormat,
) -> CliResult<i32> {
    info!(target, "goto issued");
    let position = if wait.wait {
        Some(wait_for_goto(&mut conn, wait)?)
    } else {
        None
    };

    GotoOutput {
        kind: "goto",
        target,
        position,
        state: conn.session.state().goto,
    }
    .print(format);
    Ok(SUCCESS)
}

/// Tick the session until the goto completes; abort on Ctrl-C or timeout.
fn wait_for_goto(conn: &mut Connection, wait: &WaitArgs) -> CliResult<u32> {
    let poll_interval = parse_duration(&wait.poll_interval)?;
    let wait_timeout = parse_duration(&wait.wait_timeout)?;

    let running = Arc::new(AtomicBool::new(true));
    install_ctrlc_handler(running.clone())?;

    let started = Instant::now();
    loop {
        if !running.load(Ordering::SeqCst) {
            abort_quietly(conn);
            return Err(CliError::new(INTERRUPTED, "interrupted; motion aborted"));
        }
        if started.elapsed() >= wait_timeout {
            abort_quietly(conn);
            return Err(CliError::new(
                TIMEOUT,
                format!("goto did not complete within {wait_timeout:?}; motion aborted"),
            ));
        }

        let report = conn
            .session
            .tick(&mut conn.transport)
            .map_err(|err| session_error("goto poll failed", err))?;

        match report.goto {
            Some(GotoEvent::Completed { position }) => return Ok(position),
            Some(GotoEvent::StillMoving) => {
                debug!(elapsed = ?started.elapsed(), "goto still moving");
                std::thread::sleep(remaining(poll_interval, started, wait_timeout));
            }
            None => return Err(CliError::new(FAILURE, "goto is no longer active")),
        }
    }
}

fn remaining(poll_interval: Duration, started: Instant, wait_timeout: Duration) -> Duration {
    poll_interval.min(wait_timeout.saturating_sub(started.elapsed()))
}

fn abort_quietly(conn: &mut Connection) {
    if let Err(err) = conn.session.abort(&mut conn.transport) {
        warn!(%err, "abort after interrupted wait failed");
    }
}

fn install_ctrlc_handler(running: Arc<AtomicBool>) -> CliResult<()> {
    ctrlc::set_handler(move || {
        running.store(false, Ordering::SeqCst);
    })
    .map_err(|err| CliError::new(INTERNAL, format!("signal handler setup failed: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_sleep_never_overruns_the_deadline() {
        let started = Instant::now();
        let slept = remaining(Duration::from_secs(10), started, Duration::from_millis(50));
        assert!(slept <= Duration::from_millis(50));

        let slept = remaining(Duration::from_millis(5), started, Duration::from_secs(60));
        assert_eq!(slept, Duration::from_millis(5));
    }

    #[test]
    fn goto_output_serializes_state_in_snake_case() {
        let out = GotoOutput {
            kind: "goto",
            target: 500,
            position: None,
            state: GotoState::MoveIssued,
        };
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["state"], "move_issued");
        assert!(json["position"].is_null());
    }
}
