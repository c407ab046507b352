use efaproto_transport::SerialTransport;
use serde::Serialize;

use efaproto_session::{CommandSession, Result as SessionResult};

use crate::cmd::SwitchArgs;
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_report, switch, OutputFormat};

#[derive(Serialize)]
struct SwitchOutput {
    kind: &'static str,
    enabled: bool,
}

type ReadSwitch = fn(&mut CommandSession, &mut SerialTransport) -> SessionResult<bool>;
type WriteSwitch = fn(&mut CommandSession, &mut SerialTransport, bool) -> SessionResult<()>;

pub fn fan(args: SwitchArgs, format: OutputFormat) -> CliResult<i32> {
    run(
        args,
        "fan",
        CommandSession::read_fan,
        CommandSession::set_fan,
        format,
    )
}

pub fn calibration(args: SwitchArgs, format: OutputFormat) -> CliResult<i32> {
    run(
        args,
        "calibration",
        CommandSession::read_calibration,
        CommandSession::set_calibration,
        format,
    )
}

fn run(
    args: SwitchArgs,
    kind: &'static str,
    read: ReadSwitch,
    write: WriteSwitch,
    format: OutputFormat,
) -> CliResult<i32> {
    let mut conn = args.port.open()?;
    let enabled = match args.state {
        Some(state) => {
            write(&mut conn.session, &mut conn.transport, state.enabled())
                .map_err(|err| session_error(&format!("set {kind} failed"), err))?;
            state.enabled()
        }
        None => read(&mut conn.session, &mut conn.transport)
            .map_err(|err| session_error(&format!("read {kind} failed"), err))?,
    };

    let out = SwitchOutput { kind, enabled };
    print_report(&out, &[(kind, switch(Some(enabled)))], format);
    Ok(SUCCESS)
}
