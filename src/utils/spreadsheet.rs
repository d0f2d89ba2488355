//! Thin layer over the xlsx reader/writer.
//!
//! Reading turns the first worksheet into header-keyed rows; writing takes
//! a header list plus typed cells. Everything customer specific lives in
//! the bulk transfer service.

use crate::error::{AppError, AppResult};
use calamine::{Data, Reader, open_workbook_auto_from_rs};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal::RoundingStrategy;
use rust_decimal::prelude::FromPrimitive;
use rust_xlsxwriter::{Format, Workbook};
use std::collections::HashMap;
use std::io::Cursor;
use std::str::FromStr;

use super::date_format::{from_excel_serial, parse_date};

/// One data row keyed by the trimmed header text of its column.
pub type SheetRow = HashMap<String, Data>;

pub fn read_first_sheet(bytes: &[u8]) -> AppResult<Vec<SheetRow>> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes.to_vec()))?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| AppError::SpreadsheetError("Workbook has no sheets".to_string()))??;

    let mut rows = range.rows();
    let Some(header_row) = rows.next() else {
        return Ok(Vec::new());
    };
    let headers: Vec<Option<String>> = header_row.iter().map(cell_text).collect();

    let mut out = Vec::new();
    for row in rows {
        if row.iter().all(|c| matches!(c, Data::Empty)) {
            continue;
        }
        let mut record = SheetRow::new();
        for (header, cell) in headers.iter().zip(row.iter()) {
            if let Some(header) = header {
                record.insert(header.clone(), cell.clone());
            }
        }
        out.push(record);
    }
    Ok(out)
}

/// Text content of a cell. Whole numbers lose the trailing `.0` so that
/// phone numbers and ids typed as numbers survive.
pub fn cell_text(cell: &Data) -> Option<String> {
    let text = match cell {
        Data::Empty | Data::Error(_) => return None,
        Data::String(s) | Data::DateTimeIso(s) | Data::DurationIso(s) => s.trim().to_string(),
        Data::Int(i) => i.to_string(),
        Data::Float(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", *f as i64),
        Data::Float(f) => f.to_string(),
        Data::Bool(b) => b.to_string(),
        Data::DateTime(dt) => match dt.as_datetime() {
            Some(ts) => ts.date().format("%Y-%m-%d").to_string(),
            None => dt.as_f64().to_string(),
        },
    };
    if text.is_empty() { None } else { Some(text) }
}

/// Numeric content. Blank cells are `Ok(None)`.
pub fn cell_decimal(cell: &Data) -> Result<Option<Decimal>, String> {
    match cell {
        Data::Empty => Ok(None),
        Data::Int(i) => Ok(Some(Decimal::from(*i))),
        Data::Float(f) => Decimal::from_f64(*f)
            .map(|d| Some(round_amount(d)))
            .ok_or_else(|| format!("Invalid amount: {f}")),
        Data::String(s) if s.trim().is_empty() => Ok(None),
        Data::String(s) => Decimal::from_str(s.trim())
            .map(|d| Some(round_amount(d)))
            .map_err(|_| format!("Invalid amount: {s}")),
        other => Err(format!("Invalid amount: {other}")),
    }
}

fn round_amount(d: Decimal) -> Decimal {
    d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Date content: real date cells, Excel serial numbers or text dates.
pub fn cell_date(cell: &Data) -> Result<Option<NaiveDate>, String> {
    match cell {
        Data::Empty => Ok(None),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map(|ts| Some(ts.date()))
            .ok_or_else(|| format!("Invalid date: {}", dt.as_f64())),
        Data::Float(f) => from_excel_serial(*f)
            .map(Some)
            .ok_or_else(|| format!("Invalid date: {f}")),
        Data::Int(i) => from_excel_serial(*i as f64)
            .map(Some)
            .ok_or_else(|| format!("Invalid date: {i}")),
        Data::String(s) | Data::DateTimeIso(s) => parse_date(s),
        other => Err(format!("Invalid date: {other}")),
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Number(f64),
    Empty,
}

impl From<Option<String>> for Cell {
    fn from(value: Option<String>) -> Self {
        value.map(Cell::Text).unwrap_or(Cell::Empty)
    }
}

/// Serializes a single-sheet workbook, bold header row first.
pub fn write_sheet(sheet_name: &str, headers: &[&str], rows: &[Vec<Cell>]) -> AppResult<Vec<u8>> {
    let mut workbook = Workbook::new();
    let header_format = Format::new().set_bold();

    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name)?;

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *header, &header_format)?;
    }

    for (i, row) in rows.iter().enumerate() {
        let row_num = (i + 1) as u32;
        for (col, cell) in row.iter().enumerate() {
            match cell {
                Cell::Text(s) => {
                    worksheet.write_string(row_num, col as u16, s.as_str())?;
                }
                Cell::Number(n) => {
                    worksheet.write_number(row_num, col as u16, *n)?;
                }
                Cell::Empty => {}
            }
        }
    }

    Ok(workbook.save_to_buffer()?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_written_sheet_reads_back_by_header() {
        let bytes = write_sheet(
            "Customers",
            &["Store Name", "Paid Pack Amount", "City"],
            &[
                vec![Cell::Text("Acme".into()), Cell::Number(10.5), Cell::Empty],
                vec![Cell::Empty, Cell::Empty, Cell::Empty],
                vec![Cell::Text("Globex".into()), Cell::Empty, Cell::Text("Pune".into())],
            ],
        )
        .unwrap();

        let rows = read_first_sheet(&bytes).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(cell_text(&rows[0]["Store Name"]).as_deref(), Some("Acme"));
        assert_eq!(
            cell_decimal(&rows[0]["Paid Pack Amount"]).unwrap(),
            Decimal::from_str("10.5").ok()
        );
        assert_eq!(cell_text(&rows[1]["City"]).as_deref(), Some("Pune"));
    }

    #[test]
    fn test_cell_text_drops_integral_fraction() {
        assert_eq!(cell_text(&Data::Float(9876543210.0)).as_deref(), Some("9876543210"));
        assert_eq!(cell_text(&Data::String("  ".into())), None);
        assert_eq!(cell_text(&Data::Empty), None);
    }

    #[test]
    fn test_cell_decimal() {
        assert_eq!(cell_decimal(&Data::Empty), Ok(None));
        assert_eq!(cell_decimal(&Data::Int(3)), Ok(Some(Decimal::from(3))));
        assert_eq!(
            cell_decimal(&Data::String("12.345".into())),
            Ok(Decimal::from_str("12.35").ok())
        );
        assert!(cell_decimal(&Data::String("twelve".into())).is_err());
    }

    #[test]
    fn test_cell_date_accepts_text_and_serials() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5);
        assert_eq!(cell_date(&Data::String("05 - MAR - 2024".into())), Ok(expected));
        assert_eq!(cell_date(&Data::Float(45356.0)), Ok(expected));
        assert_eq!(cell_date(&Data::Empty), Ok(None));
        assert!(cell_date(&Data::Bool(true)).is_err());
    }

    #[test]
    fn test_unreadable_bytes_are_rejected() {
        assert!(matches!(
            read_first_sheet(b"not a workbook"),
            Err(AppError::SpreadsheetError(_))
        ));
    }
}
