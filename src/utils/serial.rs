pub const SERIAL_PREFIX: &str = "CUS";

/// `CUS` followed by a zero padded six digit sequence.
pub fn format_serial(sequence: u64) -> String {
    format!("{SERIAL_PREFIX}{sequence:06}")
}

/// Sequence part of a serial, or `None` if it is not of the `CUS######` form.
pub fn parse_serial(serial: &str) -> Option<u64> {
    let digits = serial.strip_prefix(SERIAL_PREFIX)?;
    if digits.len() < 6 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

/// Next sequence to try: one past the row count, or past the highest serial
/// already handed out when deletions have left the count behind.
pub fn next_sequence(row_count: u64, highest_serial: Option<&str>) -> u64 {
    let highest = highest_serial.and_then(parse_serial).unwrap_or(0);
    row_count.max(highest) + 1
}
