//! Identity domain module.
//!
//! # Module Structure
//!
//! - `model`: Identity and login/registration inputs
//! - `repository`: client-local session persistence trait

mod model;
mod repository;

pub use model::{Credentials, Identity, IdentityKind, Registration};
pub use repository::{SessionRepository, StoredSession};
