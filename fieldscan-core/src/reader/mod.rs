//! Excel/ODS file reader using calamine

use crate::error::{FieldScanError, Result};
use calamine::{Data, Range, Reader, Sheets, open_workbook_auto};
use chrono::{NaiveDate, NaiveDateTime};
use log::{debug, warn};
use std::iter;
use std::path::Path;

pub mod workbook;

pub use workbook::{CellValue, Column, PLACEHOLDER_PREFIX, SheetWarning, Workbook, Worksheet};

/// Read a workbook from a file path.
///
/// A worksheet that fails to parse is recorded in [`Workbook::warnings`] and
/// the remaining worksheets are still loaded.
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<Workbook> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(FieldScanError::InputMissing(path.to_path_buf()));
    }

    let mut excel: Sheets<_> = open_workbook_auto(path).map_err(|source| FieldScanError::Open {
        path: path.to_path_buf(),
        source,
    })?;

    let sheet_names = excel.sheet_names();
    debug!("Found {} worksheets in {}", sheet_names.len(), path.display());

    let mut sheets = Vec::new();
    let mut warnings = Vec::new();

    for sheet_name in &sheet_names {
        match excel.worksheet_range(sheet_name) {
            Ok(range) => {
                let sheet = parse_sheet(sheet_name, &range);
                debug!(
                    "Loaded sheet '{}' with {} rows and {} columns",
                    sheet.name,
                    sheet.row_count(),
                    sheet.column_count()
                );
                sheets.push(sheet);
            }
            Err(e) => {
                warn!("Could not load sheet '{}': {}", sheet_name, e);
                warnings.push(SheetWarning {
                    sheet: sheet_name.clone(),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(Workbook {
        path: path.to_path_buf(),
        sheets,
        warnings,
    })
}

// The first row of the used range is the header row. Columns keep their
// worksheet position: a range starting at column C gets two empty columns.
fn parse_sheet(name: &str, range: &Range<Data>) -> Worksheet {
    let leading = range.start().map_or(0, |(_, col)| col as usize);
    let parse_row = |row: &[Data]| -> Vec<CellValue> {
        iter::repeat_n(CellValue::Empty, leading)
            .chain(row.iter().map(parse_cell_value))
            .collect()
    };

    let mut rows = range.rows();
    let Some(header) = rows.next() else {
        return Worksheet::new(name, Vec::new(), Vec::new());
    };

    let header = parse_row(header);
    let data = rows.map(parse_row).collect();

    Worksheet::from_grid(name, header, data)
}

fn parse_cell_value(data: &Data) -> CellValue {
    match data {
        Data::Int(i) => CellValue::Integer(*i),
        Data::Float(f) => float_value(*f),
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Error(e.to_string()),
        Data::Empty => CellValue::Empty,
        Data::DateTime(dt) => {
            if dt.is_datetime() {
                dt.as_datetime()
                    .map(CellValue::DateTime)
                    .unwrap_or_else(|| float_value(dt.as_f64()))
            } else {
                float_value(dt.as_f64())
            }
        }
        Data::DateTimeIso(s) => parse_iso_datetime(s)
            .map(CellValue::DateTime)
            .unwrap_or_else(|| CellValue::Text(s.clone())),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}

// Spreadsheet numbers with no fractional part read back as integers.
fn float_value(f: f64) -> CellValue {
    const MAX_EXACT: f64 = 9_007_199_254_740_992.0;
    if f.fract() == 0.0 && f.abs() < MAX_EXACT {
        CellValue::Integer(f as i64)
    } else {
        CellValue::Number(f)
    }
}

fn parse_iso_datetime(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .or_else(|| {
            NaiveDate::parse_from_str(s, "%Y-%m-%d")
                .ok()
                .and_then(|d| d.and_hms_opt(0, 0, 0))
        })
}
