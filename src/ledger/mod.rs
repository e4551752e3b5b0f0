//! Order ledger.
//!
//! [`LedgerStore`] persists [`OrderRecord`]s as rows of an `.xlsx` workbook
//! with a fixed 13-column header.
mod record;
mod store;

pub use record::{DATE_FORMAT, HEADER, NUMBER_COLUMN, OrderRecord, VEHICLE_COLUMN, format_number};
pub use store::{DEFAULT_SHEET_NAME, LedgerStore, Records, Rows};
