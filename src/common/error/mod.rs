//! Unified error types for the order tool.
//!
//! This module provides a single error type that covers package I/O, the
//! ledger, the template engine and the interactive front end.

// Submodule declarations
pub mod conversions;
pub mod types;

// Re-exports
pub use types::{Error, Result};
