//! Typed ledger rows.
use crate::common::{Error, Result};
use crate::ooxml::xlsx::CellValue;
use chrono::{Datelike, NaiveDate};

/// Column names of the ledger header row, in column order.
pub const HEADER: [&str; 13] = [
    "numero_os",
    "data",
    "veiculo",
    "placa",
    "km_entrada",
    "km_saida",
    "itens",
    "observacoes",
    "step",
    "chave_roda",
    "macaco",
    "triangulo",
    "docx_path",
];

/// Column of the order number.
pub const NUMBER_COLUMN: usize = 0;
/// Column of the vehicle name.
pub const VEHICLE_COLUMN: usize = 2;

/// Date format of the `data` column and of the date tokens.
pub const DATE_FORMAT: &str = "%d/%m/%Y";

/// One service order as stored in the ledger.
///
/// Columns are positional: field `n` of the struct is column `n` of the row,
/// following [`HEADER`].
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct OrderRecord {
    pub number: u32,
    /// Creation date, `dd/mm/YYYY`
    pub date: String,
    pub vehicle: String,
    pub plate: String,
    pub odometer_in: String,
    pub odometer_out: String,
    pub items_to_check: String,
    pub notes: String,
    pub step: String,
    pub wheel_key: String,
    pub jack: String,
    pub triangle: String,
    /// Path of the generated document
    pub document_path: String,
}

impl OrderRecord {
    /// Build a record from a ledger row.
    ///
    /// The first column must hold a non-negative integer, either as a number
    /// cell or as text made of ASCII digits. Missing trailing columns read as
    /// empty text.
    pub fn from_row(row: &[CellValue]) -> Result<Self> {
        let number = match row.get(NUMBER_COLUMN) {
            Some(CellValue::Int(n)) => u32::try_from(*n).ok(),
            Some(CellValue::String(s)) => parse_digits(s),
            _ => None,
        }
        .ok_or_else(|| {
            Error::InvalidFormat(format!(
                "order number '{}' is not an integer",
                row.get(NUMBER_COLUMN).map(CellValue::to_string).unwrap_or_default()
            ))
        })?;

        let text = |index: usize| row.get(index).map(CellValue::to_string).unwrap_or_default();

        Ok(Self {
            number,
            date: text(1),
            vehicle: text(VEHICLE_COLUMN),
            plate: text(3),
            odometer_in: text(4),
            odometer_out: text(5),
            items_to_check: text(6),
            notes: text(7),
            step: text(8),
            wheel_key: text(9),
            jack: text(10),
            triangle: text(11),
            document_path: text(12),
        })
    }

    /// The ledger row for this record: the number as a numeric cell, every
    /// other column as text.
    pub fn to_row(&self) -> Vec<CellValue> {
        let mut row = Vec::with_capacity(HEADER.len());
        row.push(CellValue::from(self.number));
        for text in [
            &self.date,
            &self.vehicle,
            &self.plate,
            &self.odometer_in,
            &self.odometer_out,
            &self.items_to_check,
            &self.notes,
            &self.step,
            &self.wheel_key,
            &self.jack,
            &self.triangle,
            &self.document_path,
        ] {
            row.push(CellValue::from(text.as_str()));
        }
        row
    }

    /// Number as `NNN/YYYY`, with the year of the record date.
    ///
    /// `None` when the date column does not hold a `dd/mm/YYYY` date.
    pub fn formatted_number(&self) -> Option<String> {
        let date = NaiveDate::parse_from_str(self.date.trim(), DATE_FORMAT).ok()?;
        Some(format_number(self.number, date.year()))
    }
}

/// Format an order number as `NNN/YYYY` (at least three digits).
///
/// ```
/// use ordem::ledger::format_number;
/// assert_eq!(format_number(7, 2024), "007/2024");
/// assert_eq!(format_number(1234, 2025), "1234/2025");
/// ```
pub fn format_number(number: u32, year: i32) -> String {
    format!("{:03}/{}", number, year)
}

/// Parse text made only of ASCII digits, surrounding whitespace allowed.
fn parse_digits(text: &str) -> Option<u32> {
    let text = text.trim();
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}
