use serde::Serialize;

use efaproto_session::Temperatures;

use crate::cmd::{PortArgs, StatusArgs};
use crate::exit::{session_error, CliResult, SUCCESS};
use crate::output::{print_report, print_state, temperature_rows, OutputFormat};

pub fn status(args: StatusArgs, format: OutputFormat) -> CliResult<i32> {
    let mut conn = args.port.open()?;
    conn.session
        .refresh_all(&mut conn.transport)
        .map_err(|err| session_error("status failed", err))?;
    print_state(conn.session.state(), format);
    Ok(SUCCESS)
}

#[derive(Serialize)]
struct PositionOutput {
    kind: &'static str,
    position: u32,
}

pub fn position(args: PortArgs, format: OutputFormat) -> CliResult<i32> {
    let mut conn = args.open()?;
    let position = conn
        .session
        .read_position(&mut conn.transport)
        .map_err(|err| session_error("read position failed", err))?;

    let out = PositionOutput {
        kind: "position",
        position,
    };
    print_report(&out, &[("position", position.to_string())], format);
    Ok(SUCCESS)
}

#[derive(Serialize)]
struct TemperatureOutput {
    kind: &'static str,
    #[serde(flatten)]
    reading: Temperatures,
}

pub fn temperature(args: PortArgs, format: OutputFormat) -> CliResult<i32> {
    let mut conn = args.open()?;
    let reading = conn
        .session
        .read_temperature(&mut conn.transport)
        .map_err(|err| session_error("read temperature failed", err))?
        .reading;

    let out = TemperatureOutput {
        kind: "temperature",
        reading,
    };
    print_report(&out, &temperature_rows(&reading), format);
    Ok(SUCCESS)
}

#[derive(Serialize)]
struct FirmwareOutput {
    kind: &'static str,
    port: String,
    version: String,
}

pub fn firmware(args: PortArgs, format: OutputFormat) -> CliResult<i32> {
    let mut conn = args.open()?;
    let version = conn
        .session
        .handshake(&mut conn.transport)
        .map_err(|err| session_error("version query failed", err))?;

    let rows = [("port", args.port.clone()), ("firmware", version.clone())];
    let out = FirmwareOutput {
        kind: "firmware",
        port: args.port,
        version,
    };
    print_report(&out, &rows, format);
    Ok(SUCCESS)
}
