//! Render the output sheets into an `.xlsx` buffer

use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook, Worksheet};

use crate::dedup::{Report, Table, Value};
use crate::error::ProcessError;

/// MIME type of the rendered workbook
pub const CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// File name used when the caller does not choose one
pub const DEFAULT_OUTPUT_NAME: &str = "处理结果.xlsx";

struct Formats {
    header: Format,
    datetime: Format,
    duration: Format,
}

impl Formats {
    fn new() -> Self {
        Self {
            header: Format::new()
                .set_bold()
                .set_border(FormatBorder::Thin)
                .set_align(FormatAlign::Center),
            datetime: Format::new().set_num_format("yyyy-mm-dd hh:mm:ss"),
            duration: Format::new().set_num_format("[h]:mm:ss"),
        }
    }
}

/// Render the report's three sheets, in order, into workbook bytes
pub fn write_report(report: &Report) -> Result<Vec<u8>, ProcessError> {
    let mut workbook = Workbook::new();
    let formats = Formats::new();

    for table in report.sheets() {
        write_table(&mut workbook, table, &formats)?;
    }

    let bytes = workbook.save_to_buffer()?;
    log::debug!("Rendered output workbook ({} bytes)", bytes.len());
    Ok(bytes)
}

fn write_table(
    workbook: &mut Workbook,
    table: &Table,
    formats: &Formats,
) -> Result<(), ProcessError> {
    let sheet = workbook.add_worksheet();
    sheet.set_name(&table.name)?;

    if table.is_empty() {
        log::debug!("Sheet '{}' has no rows, writing header only", table.name);
    }

    for (col, name) in table.columns.iter().enumerate() {
        sheet.write_string_with_format(0, col as u16, name, &formats.header)?;
    }

    for (row_idx, row) in table.rows.iter().enumerate() {
        let row_num = (row_idx + 1) as u32;
        for (col, value) in row.iter().enumerate() {
            write_value(sheet, row_num, col as u16, value, formats)?;
        }
    }

    sheet.autofit();
    Ok(())
}

fn write_value(
    ws: &mut Worksheet,
    row: u32,
    col: u16,
    value: &Value,
    formats: &Formats,
) -> Result<(), ProcessError> {
    match value {
        Value::Null => { /* Leave cell empty */ }
        Value::String(s) => { ws.write_string(row, col, s)?; }
        Value::Int(i) => { ws.write_number(row, col, *i as f64)?; }
        Value::Float(f) => { ws.write_number(row, col, *f)?; }
        Value::Bool(b) => { ws.write_boolean(row, col, *b)?; }
        Value::DateTime(x) => { ws.write_number_with_format(row, col, *x, &formats.datetime)?; }
        Value::Duration(x) => { ws.write_number_with_format(row, col, *x, &formats.duration)?; }
    }
    Ok(())
}
