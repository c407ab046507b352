#![cfg(all(unix, feature = "cli"))]

use std::process::Command;

fn efaproto() -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_efaproto"));
    cmd.env_remove("EFA_PORT").env_remove("EFA_BAUD");
    cmd
}

#[test]
fn version_reports_package_version() {
    let output = efaproto()
        .arg("version")
        .output()
        .expect("version command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf-8");
    assert_eq!(
        stdout.trim(),
        format!("efaproto {}", env!("CARGO_PKG_VERSION"))
    );
}

#[test]
fn extended_version_lists_serial_defaults() {
    let output = efaproto()
        .args(["version", "--extended"])
        .output()
        .expect("version command should run");

    assert!(output.status.success());
    let stdout = String::from_utf8(output.stdout).expect("stdout should be utf-8");
    assert!(stdout.contains("features: serial=true, cli=true"));
    assert!(stdout.contains("baud=19200"));
}

#[test]
fn missing_port_returns_transport_error() {
    let output = efaproto()
        .args(["--log-level", "error", "position", "--port", "/nonexistent/ttyEFA"])
        .output()
        .expect("position command should run");

    assert_eq!(output.status.code(), Some(3));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("open failed"), "stderr: {stderr}");
    assert!(stderr.contains("/nonexistent/ttyEFA"), "stderr: {stderr}");
}

#[test]
fn port_is_required_without_env() {
    let output = efaproto()
        .arg("position")
        .output()
        .expect("position command should run");

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn invalid_timeout_is_a_usage_error() {
    let output = efaproto()
        .args(["position", "--port", "/nonexistent/ttyEFA", "--timeout", "soon"])
        .output()
        .expect("position command should run");

    assert_eq!(output.status.code(), Some(64));
}
