//! # ordem
//!
//! Service order ("Ordem de Serviço") generation for a small vehicle fleet.
//!
//! An order is created by filling a Word template whose text contains
//! `{{TOKEN}}` markers, saving the result under a generated-documents
//! directory and appending one row to an Excel ledger. The ledger can then
//! be searched by order number and charted as orders per vehicle.
//!
//! ## Layout
//!
//! - [`ooxml`]: OPC packages, `.docx` templates and `.xlsx` workbooks
//! - [`ledger`]: the order ledger and its typed rows
//! - [`order`]: order creation
//! - [`query`]: lookup by order number
//! - [`chart`]: orders per vehicle, rendered as SVG
//! - [`opener`]: handing files to the desktop
//! - [`config`]: file locations
//! - [`ui`]: the interactive form
//!
//! ## Example
//!
//! ```rust,no_run
//! use ordem::config::Config;
//! use ordem::order::OrderFields;
//!
//! let config = Config::load(None)?;
//! let record = config.order_service().create_order(&OrderFields {
//!     vehicle: "Gol".to_string(),
//!     plate: "ABC1234".to_string(),
//!     step: "S".to_string(),
//!     ..Default::default()
//! })?;
//! println!("OS {} -> {}", record.number, record.document_path);
//!
//! let found = config.query_service().find_by_number(record.number)?;
//! assert!(found.is_some());
//! # Ok::<(), ordem::Error>(())
//! ```

pub mod chart;
pub mod common;
pub mod config;
pub mod ledger;
pub mod ooxml;
pub mod opener;
pub mod order;
pub mod query;
pub mod ui;

pub use common::{Error, Result};
