//! Interactive front end.
//!
//! [`FormApp`] drives the order, query and chart services from a menu,
//! talking to the user through a [`Prompter`].
mod form;
mod prompt;
mod session;

pub use form::{FormApp, MenuAction, describe_record, user_message};
pub use prompt::{InquirePrompter, Prompter};
pub use session::Session;
