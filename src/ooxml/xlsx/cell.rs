//! Cell values and A1-style references for Excel worksheets.

use crate::common::{Error, Result};
use std::fmt;

/// The value held by one worksheet cell.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    /// No value (missing cell)
    #[default]
    Empty,
    /// Integral number
    Int(i64),
    /// Non-integral number
    Float(f64),
    /// Text (shared, inline or formula string result)
    String(String),
    /// Boolean
    Bool(bool),
}

impl CellValue {
    /// Parse the content of a numeric `<v>` element.
    ///
    /// Integral literals stay integers; anything else that parses as a float
    /// becomes a float, and unparseable content is kept as text.
    pub fn from_number_literal(raw: &str) -> Self {
        let raw = raw.trim();
        if let Ok(int) = raw.parse::<i64>() {
            CellValue::Int(int)
        } else if let Ok(float) = raw.parse::<f64>() {
            CellValue::Float(float)
        } else {
            CellValue::String(raw.to_string())
        }
    }

    /// Whether the cell has no value or only an empty string.
    pub fn is_blank(&self) -> bool {
        match self {
            CellValue::Empty => true,
            CellValue::String(s) => s.is_empty(),
            _ => false,
        }
    }

    /// Text of the cell, `None` when blank.
    pub fn as_text(&self) -> Option<String> {
        if self.is_blank() { None } else { Some(self.to_string()) }
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Int(v) => f.write_str(itoa::Buffer::new().format(*v)),
            CellValue::Float(v) => f.write_str(ryu::Buffer::new().format(*v)),
            CellValue::String(s) => f.write_str(s),
            CellValue::Bool(true) => f.write_str("TRUE"),
            CellValue::Bool(false) => f.write_str("FALSE"),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::String(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::String(value)
    }
}

impl From<u32> for CellValue {
    fn from(value: u32) -> Self {
        CellValue::Int(value as i64)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        CellValue::Int(value)
    }
}

/// Convert column number to Excel column letters (e.g., 1 -> "A", 26 -> "Z", 27 -> "AA").
pub fn column_to_letters(col: u32) -> String {
    let mut letters = Vec::with_capacity(3);
    let mut col = col;

    while col > 0 {
        col -= 1;
        letters.push((col % 26) as u8 + b'A');
        col /= 26;
    }

    letters.reverse();
    String::from_utf8(letters).unwrap_or_default()
}

/// Convert an Excel reference (e.g., "B7") to `(column, row)`, both 1-based.
pub fn reference_to_coords(reference: &str) -> Result<(u32, u32)> {
    let split = reference
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(reference.len());
    let (col_str, row_str) = reference.split_at(split);

    if col_str.is_empty() {
        return Err(Error::InvalidFormat(format!("Invalid cell reference: {}", reference)));
    }

    let mut col_num = 0u32;
    for ch in col_str.bytes() {
        col_num = col_num
            .checked_mul(26)
            .and_then(|n| n.checked_add((ch.to_ascii_uppercase() - b'A' + 1) as u32))
            .ok_or_else(|| Error::InvalidFormat(format!("Column out of range: {}", reference)))?;
    }

    let row_num = row_str
        .parse::<u32>()
        .map_err(|_| Error::InvalidFormat(format!("Invalid row number in reference: {}", reference)))?;

    Ok((col_num, row_num))
}

/// Build an A1-style reference from 1-based coordinates.
pub fn coords_to_reference(col: u32, row: u32) -> String {
    let mut reference = column_to_letters(col);
    reference.push_str(itoa::Buffer::new().format(row));
    reference
}
