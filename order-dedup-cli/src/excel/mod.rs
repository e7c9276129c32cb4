//! Workbook import/export for order ledgers

mod reader;
mod writer;

pub use reader::{read_input_bytes, read_input_workbook};
pub use writer::{CONTENT_TYPE, DEFAULT_OUTPUT_NAME, write_report};
