//! Worksheet parsing for Excel files.
//!
//! Only the cell values of `<sheetData>` are read; formatting, formulas and
//! every other worksheet feature are ignored.

use super::cell::{CellValue, reference_to_coords};
use super::shared_strings::SharedStrings;
use crate::common::xml::{append_text, attribute};
use crate::common::{Error, Result};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

/// Cell values of one worksheet, row by row.
///
/// Rows are dense: `rows()[0]` is spreadsheet row 1, and rows missing from
/// the file between two present rows appear as empty vectors.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Worksheet {
    name: String,
    rows: Vec<Vec<CellValue>>,
}

/// Where a cell's value comes from, decided by its `t` attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CellKind {
    Number,
    Shared,
    Inline,
    FormulaString,
    Bool,
    Error,
}

impl CellKind {
    fn from_attr(t: Option<&str>) -> Self {
        match t {
            Some("s") => CellKind::Shared,
            Some("inlineStr") => CellKind::Inline,
            Some("str") => CellKind::FormulaString,
            Some("b") => CellKind::Bool,
            Some("e") => CellKind::Error,
            _ => CellKind::Number,
        }
    }
}

/// Parse state of the cell currently being read.
struct PendingCell {
    column: u32,
    kind: CellKind,
    text: String,
}

impl Worksheet {
    /// Create a worksheet from already-built rows.
    pub fn new(name: impl Into<String>, rows: Vec<Vec<CellValue>>) -> Self {
        Self {
            name: name.into(),
            rows,
        }
    }

    /// Parse a worksheet part.
    pub fn parse(name: &str, xml: &[u8], shared: &SharedStrings) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::with_capacity(1024);

        let mut rows: Vec<Vec<CellValue>> = Vec::new();
        let mut current_row: Option<usize> = None;
        let mut cell: Option<PendingCell> = None;
        let mut in_value = false;

        loop {
            buf.clear();
            let event = reader.read_event_into(&mut buf)?;
            match &event {
                Event::Start(e) | Event::Empty(e) => {
                    let self_closing = matches!(event, Event::Empty(_));
                    match e.local_name().as_ref() {
                        b"row" => {
                            let index = Self::row_index(e, rows.len())?;
                            if rows.len() <= index {
                                rows.resize_with(index + 1, Vec::new);
                            }
                            current_row = if self_closing { None } else { Some(index) };
                        },
                        b"c" if !self_closing => {
                            let row = current_row.ok_or_else(|| {
                                Error::InvalidFormat("cell outside of a row".to_string())
                            })?;
                            let column = Self::cell_column(e, rows[row].len())?;
                            let kind = CellKind::from_attr(attribute(e, b"t")?.as_deref());
                            cell = Some(PendingCell {
                                column,
                                kind,
                                text: String::new(),
                            });
                        },
                        b"v" if !self_closing => in_value = true,
                        // Inline string text lives in <is><t>, possibly split over runs
                        b"t" if !self_closing => {
                            in_value = cell.as_ref().is_some_and(|c| c.kind == CellKind::Inline);
                        },
                        _ => {},
                    }
                },
                Event::End(e) => match e.local_name().as_ref() {
                    b"v" | b"t" => in_value = false,
                    b"c" => {
                        if let (Some(pending), Some(row)) = (cell.take(), current_row) {
                            let value = Self::resolve(pending.kind, &pending.text, shared)?;
                            let slot = (pending.column - 1) as usize;
                            let cells = &mut rows[row];
                            if cells.len() <= slot {
                                cells.resize(slot + 1, CellValue::Empty);
                            }
                            cells[slot] = value;
                        }
                    },
                    b"row" => current_row = None,
                    _ => {},
                },
                Event::Eof => break,
                other if in_value => {
                    if let Some(pending) = cell.as_mut() {
                        append_text(&mut pending.text, other)?;
                    }
                },
                _ => {},
            }
        }

        Ok(Self {
            name: name.to_string(),
            rows,
        })
    }

    /// 0-based row index from the `r` attribute, or the next row when absent.
    fn row_index(e: &BytesStart<'_>, next: usize) -> Result<usize> {
        match attribute(e, b"r")? {
            Some(r) => {
                let number: usize = r
                    .trim()
                    .parse()
                    .map_err(|_| Error::InvalidFormat(format!("Invalid row number: {}", r)))?;
                if number == 0 {
                    return Err(Error::InvalidFormat("Row numbers start at 1".to_string()));
                }
                Ok(number - 1)
            },
            None => Ok(next),
        }
    }

    /// 1-based column from the `r` attribute, or the next column when absent.
    fn cell_column(e: &BytesStart<'_>, filled: usize) -> Result<u32> {
        match attribute(e, b"r")? {
            Some(reference) => {
                let (column, _) = reference_to_coords(&reference)?;
                if column == 0 {
                    return Err(Error::InvalidFormat(format!("Invalid cell reference: {}", reference)));
                }
                Ok(column)
            },
            None => Ok(filled as u32 + 1),
        }
    }

    fn resolve(kind: CellKind, text: &str, shared: &SharedStrings) -> Result<CellValue> {
        let value = match kind {
            CellKind::Number if text.is_empty() => CellValue::Empty,
            CellKind::Number => CellValue::from_number_literal(text),
            CellKind::Shared => {
                let index: usize = text.trim().parse().map_err(|_| {
                    Error::InvalidFormat(format!("Invalid shared string index: {}", text))
                })?;
                let s = shared.get(index).ok_or_else(|| {
                    Error::InvalidFormat(format!("Shared string {} out of range", index))
                })?;
                CellValue::String(s.to_string())
            },
            CellKind::Inline | CellKind::FormulaString | CellKind::Error => {
                CellValue::String(text.to_string())
            },
            CellKind::Bool => CellValue::Bool(text.trim() == "1"),
        };
        Ok(value)
    }

    /// Worksheet name as shown on its tab.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// All rows, starting at spreadsheet row 1.
    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    /// Consume the worksheet and return its rows.
    pub fn into_rows(self) -> Vec<Vec<CellValue>> {
        self.rows
    }

    /// Number of the last row present (0 for an empty sheet).
    pub fn max_row(&self) -> usize {
        self.rows.len()
    }
}
