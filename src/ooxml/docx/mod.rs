//! Word (.docx) templates.
//!
//! Only what order generation needs: open a template, replace `{{TOKEN}}`
//! markers in its body, headers and footers, and save the result.
mod package;
pub mod paragraph;
pub mod placeholder;

#[cfg(test)]
pub(crate) use package::fixtures;
pub use package::Package;
pub use paragraph::paragraph_texts;
pub use placeholder::{Placeholders, substitute_part};
