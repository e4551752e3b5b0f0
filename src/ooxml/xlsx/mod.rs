//! Excel (.xlsx) spreadsheet support.
//!
//! Reading covers the cell values of a workbook's worksheets (shared,
//! inline and formula strings, numbers and booleans). Writing produces a
//! minimal single-sheet workbook that Excel and LibreOffice open without
//! repairs, or appends rows to one worksheet of an existing workbook while
//! keeping every other part as it was.
//!
//! # Example
//!
//! ```rust,no_run
//! use ordem::ooxml::xlsx::Workbook;
//!
//! let workbook = Workbook::open("ordens_servico.xlsx")?;
//! for row in workbook.active_worksheet()?.rows() {
//!     println!("{:?}", row);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod cell;
pub mod shared_strings;
pub mod workbook;
pub mod worksheet;
pub mod writer;

pub use cell::CellValue;
pub use shared_strings::SharedStrings;
pub use workbook::{Workbook, WorksheetInfo};
pub use worksheet::Worksheet;
pub use writer::{RowAppender, WorkbookWriter};
