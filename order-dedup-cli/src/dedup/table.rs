//! In-memory sheet representation

use std::fmt;

use crate::config::ProcessingConfig;

/// A single cell value read from or written to a worksheet
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// Empty cell
    Null,
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// Date/time as an Excel serial number
    DateTime(f64),
    /// Duration as an Excel serial number (fraction of days)
    Duration(f64),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Null => Ok(()),
            Value::String(s) => write!(f, "{}", s),
            Value::Int(i) => write!(f, "{}", i),
            // Debug keeps the trailing ".0" on whole floats
            Value::Float(x) => write!(f, "{:?}", x),
            Value::Bool(b) => write!(f, "{}", if *b { "True" } else { "False" }),
            Value::DateTime(x) | Value::Duration(x) => write!(f, "{:?}", x),
        }
    }
}

/// Which input sheet a row came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Origin {
    Detail,
    Done,
}

impl Origin {
    /// Text written to the origin column for rows of this origin
    pub fn label(self, config: &ProcessingConfig) -> &str {
        match self {
            Origin::Detail => &config.detail_label,
            Origin::Done => &config.done_label,
        }
    }
}

/// A normalized order identifier: a non-empty run of digits
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct OrderId(String);

impl OrderId {
    /// Wrap a digit string, rejecting empty or non-digit input
    pub fn new(s: impl Into<String>) -> Option<Self> {
        let s = s.into();
        let digits = s.strip_prefix('-').unwrap_or(&s);
        let valid = !digits.is_empty() && digits.chars().all(char::is_numeric);
        valid.then_some(OrderId(s))
    }
}

impl fmt::Display for OrderId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A named sheet with a header row and data rows
///
/// Every row holds exactly `columns.len()` values.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == column)
    }

    /// Append a row, padding or truncating it to the column count
    pub fn push_row(&mut self, mut row: Vec<Value>) {
        row.resize(self.columns.len(), Value::Null);
        self.rows.push(row);
    }

    /// Insert a column at `index`, filling it from `values` (missing -> Null)
    pub fn insert_column(&mut self, index: usize, name: impl Into<String>, values: Vec<Value>) {
        let index = index.min(self.columns.len());
        self.columns.insert(index, name.into());
        let mut values = values.into_iter();
        for row in &mut self.rows {
            row.insert(index, values.next().unwrap_or(Value::Null));
        }
    }

    /// Set every row's value in `column`, appending the column if absent
    pub fn set_column(&mut self, column: &str, value: Value) {
        match self.column_index(column) {
            Some(col) => {
                for row in &mut self.rows {
                    row[col] = value.clone();
                }
            }
            None => {
                self.columns.push(column.to_string());
                for row in &mut self.rows {
                    row.push(value.clone());
                }
            }
        }
    }

    /// Position of each of `columns` in this table, if present
    pub fn column_map(&self, columns: &[String]) -> Vec<Option<usize>> {
        columns.iter().map(|c| self.column_index(c)).collect()
    }

    /// An empty table with the same name and columns
    pub fn empty_like(&self) -> Self {
        Self::new(self.name.clone(), self.columns.clone())
    }
}
