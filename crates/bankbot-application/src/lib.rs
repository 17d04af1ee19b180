//! Application layer for the Bankbot client.
//!
//! Coordinates the remote service, the client-local session cache and the
//! front end: session lifecycle, the admin gate, remote-backed tables and
//! the chat transcript.

pub mod admin_gate;
pub mod chat_session;
pub mod resource_table;
pub mod session_store;

#[cfg(test)]
mod testing;

pub use admin_gate::{AdminGate, AdminView};
pub use chat_session::ChatSession;
pub use resource_table::{ChatHistory, DeleteOutcome, RemoteResource, ResourceTable, TrainingRecords};
pub use session_store::SessionStore;
