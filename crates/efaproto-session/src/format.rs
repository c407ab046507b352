/// Right-align `value` in `width` columns with `precision` decimals.
pub fn format_fixed(value: f64, width: usize, precision: usize) -> String {
    format!("{value:>width$.precision$}")
}

/// Firmware version string from the two version bytes.
pub fn format_version(major: u8, minor: u8) -> String {
    format!("{major}.{minor}")
}
