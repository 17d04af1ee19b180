pub mod account;
pub mod admin;
pub mod chat;
pub mod utils;
