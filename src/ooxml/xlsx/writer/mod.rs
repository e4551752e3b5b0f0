//! Writer module for creating Excel workbooks and extending existing ones.
mod append;
mod sheet;
mod strings;
mod workbook;

pub use append::RowAppender;
pub use sheet::MutableWorksheet;
pub use strings::MutableSharedStrings;
pub use workbook::WorkbookWriter;
