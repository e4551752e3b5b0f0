//! XML text helpers shared by the `.docx` and `.xlsx` code.
pub mod attr;
pub mod escape;
pub mod text;

pub use attr::attribute;
pub use escape::{escape_xml, resolve_reference, unescape_xml};
pub use text::append_text;
