use std::io::IsTerminal;

use clap::ValueEnum;
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use efaproto_session::{format_fixed, FocuserState, GotoState, Temperatures};
use serde::Serialize;

#[derive(Clone, Debug, Copy, ValueEnum)]
pub enum OutputFormat {
    Json,
    Table,
    Pretty,
}

impl OutputFormat {
    pub fn default_for_stdout() -> Self {
        if std::io::stdout().is_terminal() {
            Self::Table
        } else {
            Self::Json
        }
    }
}

/// Print one result: `value` as JSON, or `rows` as a table or `key=value` line.
pub fn print_report<T: Serialize>(value: &T, rows: &[(&str, String)], format: OutputFormat) {
    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string(value).unwrap_or_else(|_| "{}".to_string())
            );
        }
        OutputFormat::Table => {
            let mut table = Table::new();
            table
                .load_preset(UTF8_FULL)
                .set_content_arrangement(ContentArrangement::Dynamic)
                .set_header(vec!["FIELD", "VALUE"]);
            for (field, value) in rows {
                table.add_row(vec![field.to_string(), value.clone()]);
            }
            println!("{table}");
        }
        OutputFormat::Pretty => {
            let line = rows
                .iter()
                .map(|(field, value)| format!("{field}={value}"))
                .collect::<Vec<_>>()
                .join(" ");
            println!("{line}");
        }
    }
}

#[derive(Serialize)]
struct StateOutput<'a> {
    kind: &'static str,
    #[serde(flatten)]
    state: &'a FocuserState,
}

pub fn print_state(state: &FocuserState, format: OutputFormat) {
    let out = StateOutput {
        kind: "focuser-state",
        state,
    };
    print_report(&out, &state_rows(state), format);
}

pub fn state_rows(state: &FocuserState) -> Vec<(&'static str, String)> {
    let temperature = state.temperature.unwrap_or_default();
    vec![
        ("firmware", state.version.clone().unwrap_or_else(unknown)),
        ("position", ticks(state.position)),
        ("max_position", ticks(state.max_position)),
        ("goto", goto_label(state.goto).to_string()),
        ("primary_temp", celsius(temperature.primary)),
        ("ambient_temp", celsius(temperature.ambient)),
        ("fan", switch(state.fan)),
        ("calibration", switch(state.calibration)),
        ("reversed", state.reversed.to_string()),
    ]
}

pub fn temperature_rows(temperature: &Temperatures) -> Vec<(&'static str, String)> {
    vec![
        ("primary_temp", celsius(temperature.primary)),
        ("ambient_temp", celsius(temperature.ambient)),
    ]
}

pub fn ticks(value: Option<u32>) -> String {
    value.map(|v| v.to_string()).unwrap_or_else(unknown)
}

pub fn switch(value: Option<bool>) -> String {
    match value {
        Some(true) => "on".to_string(),
        Some(false) => "off".to_string(),
        None => unknown(),
    }
}

pub fn celsius(value: Option<f64>) -> String {
    match value {
        Some(degrees) => format!("{} °C", format_fixed(degrees, 0, 2)),
        None => "n/a".to_string(),
    }
}

pub fn goto_label(state: GotoState) -> &'static str {
    match state {
        GotoState::Idle => "idle",
        GotoState::MoveIssued => "move issued",
        GotoState::Polling => "moving",
        GotoState::Complete => "complete",
        GotoState::Aborted => "aborted",
    }
}

fn unknown() -> String {
    "unknown".to_string()
}
