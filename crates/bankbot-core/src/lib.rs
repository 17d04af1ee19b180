//! Domain layer for the Bankbot client.
//!
//! Holds the types shared by every other crate: identities, conversation
//! entries, admin records, the wire schema and the traits at the seams
//! (remote service, local persistence, presentation).

pub mod admin;
pub mod api;
pub mod chat;
pub mod config;
pub mod error;
pub mod identity;
pub mod money;
pub mod schema;
pub mod transaction;
pub mod ui;

// Re-export common error type
pub use error::{BankbotError, Result};
