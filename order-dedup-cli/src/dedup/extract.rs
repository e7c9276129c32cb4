//! Order identifier extraction from single cells

use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;

use super::table::{OrderId, Value};

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\d+").unwrap());

/// Cell texts the spreadsheet loader treats as missing values
const NA_MARKERS: &[&str] = &[
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

/// Code point of the zero in each block of ten Unicode decimal digits
const DECIMAL_ZEROS: &[u32] = &[
    0x0660, 0x06F0, 0x07C0, 0x0966, 0x09E6, 0x0A66, 0x0AE6, 0x0B66, 0x0BE6, 0x0C66, 0x0CE6,
    0x0D66, 0x0DE6, 0x0E50, 0x0ED0, 0x0F20, 0x1040, 0x1090, 0x17E0, 0x1810, 0x1946, 0x19D0,
    0x1A80, 0x1A90, 0x1B50, 0x1BB0, 0x1C40, 0x1C50, 0xA620, 0xA8D0, 0xA900, 0xA9D0, 0xA9F0,
    0xAA50, 0xABF0, 0xFF10, 0x104A0, 0x11066, 0x110F0, 0x11136, 0x111D0, 0x112F0, 0x11450,
    0x114D0, 0x11650, 0x116C0, 0x11730, 0x118E0, 0x11C50, 0x11D50, 0x16A60, 0x16B50,
    0x1D7CE, 0x1D7D8, 0x1D7E2, 0x1D7EC, 0x1D7F6, 0x1E950,
];

/// A cell that is present but cannot be read as a number
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionError {
    pub value: String,
}

impl fmt::Display for CoercionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "could not convert '{}' to an integer", self.value)
    }
}

/// True for empty cells and placeholder texts such as "NaN" or "#N/A"
pub fn is_missing(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => {
            let s = s.trim();
            s.is_empty() || NA_MARKERS.contains(&s)
        }
        Value::Float(x) => x.is_nan(),
        _ => false,
    }
}

/// Read an identifier stored as a number or numeric text
///
/// Float storage ("123456789012.0") is truncated to its integer part.
/// Missing cells yield `Ok(None)`.
pub fn extract_from_numeric(value: &Value) -> Result<Option<OrderId>, CoercionError> {
    if is_missing(value) {
        return Ok(None);
    }

    let coercion_error = || CoercionError {
        value: value.to_string(),
    };

    let digits = match value {
        Value::Int(i) => i.to_string(),
        Value::Float(x) => format_integral(*x).ok_or_else(coercion_error)?,
        Value::Bool(b) => u8::from(*b).to_string(),
        Value::String(s) => {
            let x: f64 = numeric_text(s.trim())
                .and_then(|t| t.parse().ok())
                .ok_or_else(coercion_error)?;
            format_integral(x).ok_or_else(coercion_error)?
        }
        Value::DateTime(_) | Value::Duration(_) => return Err(coercion_error()),
        Value::Null => return Ok(None),
    };

    Ok(OrderId::new(digits))
}

/// Rewrite numeric text into the form `f64::from_str` accepts
///
/// Any Unicode decimal digit ("１２３") becomes its ASCII digit and single
/// underscores between digits ("1_000") are dropped. An underscore anywhere
/// else makes the text unreadable.
fn numeric_text(s: &str) -> Option<String> {
    let chars: Vec<char> = s
        .chars()
        .map(|c| match decimal_digit(c) {
            Some(d) => char::from_digit(d, 10).unwrap_or(c),
            None => c,
        })
        .collect();

    let mut out = String::with_capacity(chars.len());
    for (i, &c) in chars.iter().enumerate() {
        if c == '_' {
            let before = i.checked_sub(1).map(|j| chars[j]);
            let after = chars.get(i + 1).copied();
            let between_digits = matches!((before, after), (Some(b), Some(a))
                if b.is_ascii_digit() && a.is_ascii_digit());
            if !between_digits {
                return None;
            }
            continue;
        }
        out.push(c);
    }
    Some(out)
}

fn decimal_digit(c: char) -> Option<u32> {
    if let Some(d) = c.to_digit(10) {
        return Some(d);
    }
    let cp = c as u32;
    DECIMAL_ZEROS
        .iter()
        .find(|&&zero| (zero..zero + 10).contains(&cp))
        .map(|zero| cp - zero)
}

/// Integer part of a finite float, printed without a fraction
fn format_integral(x: f64) -> Option<String> {
    if !x.is_finite() {
        return None;
    }
    let t = x.trunc();
    if t == 0.0 {
        // avoids "-0"
        return Some("0".to_string());
    }
    Some(format!("{:.0}", t))
}

/// Finds identifiers embedded in free text
#[derive(Debug, Clone)]
pub struct IdPattern {
    min_digits: usize,
}

impl IdPattern {
    pub fn new(min_digits: usize) -> Self {
        Self {
            min_digits: min_digits.max(1),
        }
    }

    /// First maximal digit run of at least `min_digits` digits, scanning left to right
    pub fn find<'a>(&self, text: &'a str) -> Option<&'a str> {
        DIGIT_RUN
            .find_iter(text)
            .map(|m| m.as_str())
            .find(|run| run.chars().count() >= self.min_digits)
    }

    /// Date and duration cells never hold an identifier
    pub fn extract_from_text(&self, value: &Value) -> Option<OrderId> {
        if is_missing(value) || matches!(value, Value::DateTime(_) | Value::Duration(_)) {
            return None;
        }
        let text = value.to_string();
        self.find(&text).and_then(OrderId::new)
    }
}

impl Default for IdPattern {
    fn default() -> Self {
        Self::new(12)
    }
}
