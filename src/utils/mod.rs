pub mod date_format;
pub mod serial;
pub mod spreadsheet;

pub use date_format::{MONTHS, format_date, format_time, parse_date};
pub use serial::{format_serial, next_sequence, parse_serial};
