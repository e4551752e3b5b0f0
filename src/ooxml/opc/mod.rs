//! Open Packaging Conventions (OPC) layer.
//!
//! `.docx` and `.xlsx` files are ZIP archives of XML parts tied together by
//! relationship parts. This module reads and writes those archives and
//! resolves relationships; the format modules build on top of it.
pub mod constants;
pub mod package;
pub mod phys_pkg;
pub mod rel;

pub use package::OpcPackage;
pub use rel::{Relationship, Relationships};
