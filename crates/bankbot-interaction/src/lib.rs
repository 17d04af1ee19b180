//! Transport layer for the Bankbot client.
//!
//! Implements [`bankbot_core::api::BankApi`] over HTTP with reqwest.

pub mod http_bank_api;

pub use http_bank_api::{Access, HttpBankApi};
