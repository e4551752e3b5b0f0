//! Service order creation.
//!
//! [`OrderService`] turns the [`OrderFields`] typed into the form into a
//! generated document and a ledger row.
mod fields;
mod service;

pub use fields::{Clock, FixedClock, OrderFields, PlaceholderMap, SystemClock, TOKENS};
pub use service::OrderService;
