//! Failure taxonomy for a processing run
//!
//! A run is all-or-nothing: any of these aborts it before an output
//! workbook or summary exists.

use std::fmt;

/// Error from reading, processing or rendering a workbook
#[derive(Debug)]
pub enum ProcessError {
    /// A required sheet is not present in the input workbook
    MissingSheet { sheet: String },
    /// A required column is not present on a sheet
    MissingColumn { sheet: String, column: String },
    /// A column that is synthesized already exists on the sheet
    DuplicateColumn { sheet: String, column: String },
    /// An identifier cell could not be coerced to an integer
    Coercion {
        sheet: String,
        /// 1-based spreadsheet row, header included
        row: usize,
        column: String,
        value: String,
    },
    /// The input workbook could not be parsed
    Read(calamine::Error),
    /// The output workbook could not be rendered
    Write(rust_xlsxwriter::XlsxError),
    Io(std::io::Error),
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::MissingSheet { sheet } => {
                write!(f, "Worksheet named '{}' not found", sheet)
            }
            ProcessError::MissingColumn { sheet, column } => {
                write!(f, "Sheet '{}' has no column '{}'", sheet, column)
            }
            ProcessError::DuplicateColumn { sheet, column } => {
                write!(f, "Cannot insert column '{}' on sheet '{}', it already exists", column, sheet)
            }
            ProcessError::Coercion {
                sheet,
                row,
                column,
                value,
            } => write!(
                f,
                "Sheet '{}' row {}: could not convert '{}' in column '{}' to an integer",
                sheet, row, value, column
            ),
            ProcessError::Read(e) => write!(f, "Failed to read workbook: {}", e),
            ProcessError::Write(e) => write!(f, "Failed to build output workbook: {}", e),
            ProcessError::Io(e) => write!(f, "I/O error: {}", e),
        }
    }
}

impl std::error::Error for ProcessError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ProcessError::Read(e) => Some(e),
            ProcessError::Write(e) => Some(e),
            ProcessError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<calamine::Error> for ProcessError {
    fn from(e: calamine::Error) -> Self {
        ProcessError::Read(e)
    }
}

impl From<rust_xlsxwriter::XlsxError> for ProcessError {
    fn from(e: rust_xlsxwriter::XlsxError) -> Self {
        ProcessError::Write(e)
    }
}

impl From<std::io::Error> for ProcessError {
    fn from(e: std::io::Error) -> Self {
        ProcessError::Io(e)
    }
}
