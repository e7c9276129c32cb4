//! Read the two input sheets from a workbook
//!
//! The first non-blank row of a sheet is its header. Blank headers become
//! "Unnamed: N" and repeated headers get ".1", ".2" suffixes so every
//! column name is unique. Fully blank rows are skipped.

use calamine::{Data, Range, Reader, Sheets, open_workbook_auto_from_rs};
use std::collections::HashSet;
use std::io::{Cursor, Read, Seek};
use std::path::Path;

use crate::config::ProcessingConfig;
use crate::dedup::{InputTables, Table, Value};
use crate::error::ProcessError;

/// Read the detail and done sheets from an `.xlsx`/`.xls` file
pub fn read_input_workbook<P: AsRef<Path>>(
    path: P,
    config: &ProcessingConfig,
) -> Result<InputTables, ProcessError> {
    let path = path.as_ref();
    log::info!("Reading workbook: {}", path.display());
    let bytes = std::fs::read(path)?;
    read_input_bytes(bytes, config)
}

/// Read the detail and done sheets from an in-memory upload
///
/// The format (xlsx, xls, xlsb, ods) is detected from the content.
pub fn read_input_bytes(
    bytes: Vec<u8>,
    config: &ProcessingConfig,
) -> Result<InputTables, ProcessError> {
    let mut workbook = open_workbook_auto_from_rs(Cursor::new(bytes))?;
    read_sheets(&mut workbook, config)
}

fn read_sheets<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    config: &ProcessingConfig,
) -> Result<InputTables, ProcessError> {
    let detail = read_table(workbook, &config.detail_sheet)?;
    let done = read_table(workbook, &config.done_sheet)?;

    log::info!(
        "Loaded '{}' ({} rows) and '{}' ({} rows)",
        detail.name,
        detail.len(),
        done.name,
        done.len()
    );

    Ok(InputTables { detail, done })
}

fn read_table<RS: Read + Seek>(
    workbook: &mut Sheets<RS>,
    sheet: &str,
) -> Result<Table, ProcessError> {
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(ProcessError::MissingSheet {
            sheet: sheet.to_string(),
        });
    }

    let range = workbook.worksheet_range(sheet)?;
    Ok(range_to_table(sheet, &range))
}

/// Convert a worksheet range into a table
pub fn range_to_table(name: &str, range: &Range<Data>) -> Table {
    // Columns left of the first used cell still count, as blank columns
    let lead = range.start().map(|(_, col)| col as usize).unwrap_or(0);

    let mut rows = range
        .rows()
        .filter(|row| row.iter().any(|c| !matches!(c, Data::Empty)));

    let Some(header) = rows.next() else {
        return Table::new(name, Vec::new());
    };

    let header_cells = std::iter::repeat_n(&Data::Empty, lead).chain(header.iter());
    let mut table = Table::new(name, header_names(header_cells));

    for row in rows {
        let values = std::iter::repeat_n(Value::Null, lead)
            .chain(row.iter().map(cell_to_value))
            .collect();
        table.push_row(values);
    }

    table
}

fn header_names<'a>(cells: impl Iterator<Item = &'a Data>) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut names = Vec::new();

    for (idx, cell) in cells.enumerate() {
        let base = match cell_to_value(cell) {
            Value::Null => format!("Unnamed: {}", idx),
            Value::Float(f) if f.fract() == 0.0 && f.is_finite() => format!("{}", f as i64),
            value => value.to_string(),
        };

        let mut name = base.clone();
        let mut suffix = 1;
        while !seen.insert(name.clone()) {
            name = format!("{}.{}", base, suffix);
            suffix += 1;
        }
        names.push(name);
    }

    names
}

/// Convert an Excel cell into a table value
pub fn cell_to_value(cell: &Data) -> Value {
    match cell {
        Data::Empty => Value::Null,
        Data::String(s) if s.is_empty() => Value::Null,
        Data::String(s) => Value::String(s.clone()),
        Data::Int(i) => Value::Int(*i),
        Data::Float(f) => Value::Float(*f),
        Data::Bool(b) => Value::Bool(*b),
        Data::DateTime(dt) if dt.is_duration() => Value::Duration(dt.as_f64()),
        Data::DateTime(dt) => Value::DateTime(dt.as_f64()),
        Data::DateTimeIso(s) => Value::String(s.clone()),
        Data::DurationIso(s) => Value::String(s.clone()),
        Data::Error(_) => Value::Null,
    }
}
