//! Common types and utilities shared across the tool.
//!
//! This module provides the unified error type and the XML text helpers used
//! by both the Word template engine and the Excel ledger.

// Submodule declarations
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result};
