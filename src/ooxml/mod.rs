//! Office Open XML packages.
//!
//! - [`opc`]: the ZIP container and its relationships
//! - [`docx`]: Word templates with placeholder substitution
//! - [`xlsx`]: reading and writing Excel workbooks
pub mod docx;
pub mod opc;
pub mod xlsx;
