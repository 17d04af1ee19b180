//! Identity domain model.
//!
//! Represents the authenticated principal of the current session together
//! with the inputs used to establish one.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{BankbotError, Result};
use crate::money::Money;

/// Kind of principal behind a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IdentityKind {
    User,
    Admin,
}

/// The authenticated principal of the current session.
///
/// Created only from a successful authentication response and owned by the
/// session store. `balance` is present for users only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub kind: IdentityKind,
    /// Server-side identifier, when the service reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub account_number: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub balance: Option<Money>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub card_last4: Option<String>,
}

impl Identity {
    /// Builds the identity of an administrator.
    ///
    /// The admin login endpoint returns no profile, so the submitted
    /// username doubles as name and email.
    pub fn admin(username: impl Into<String>) -> Self {
        let username = username.into();
        Self {
            kind: IdentityKind::Admin,
            id: None,
            name: username.clone(),
            email: username,
            account_number: None,
            balance: None,
            card_last4: None,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.kind == IdentityKind::Admin
    }
}

/// Email (or account number) and password for a user login.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Rejects blank fields before anything is sent.
    pub fn validate(&self) -> Result<()> {
        if self.email.trim().is_empty() || self.password.is_empty() {
            return Err(BankbotError::validation(
                "Provide email/account and password.",
            ));
        }
        Ok(())
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Profile data submitted on registration.
#[derive(Clone, PartialEq, Eq)]
pub struct Registration {
    pub name: String,
    pub email: String,
    pub account_number: String,
    pub password: String,
}

impl Registration {
    pub fn validate(&self) -> Result<()> {
        let fields = [
            &self.name,
            &self.email,
            &self.account_number,
            &self.password,
        ];
        if fields.iter().any(|field| field.trim().is_empty()) {
            return Err(BankbotError::validation("All fields required."));
        }
        if !self.email.contains('@') {
            return Err(BankbotError::validation("Enter a valid email address."));
        }
        Ok(())
    }
}

impl fmt::Debug for Registration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registration")
            .field("name", &self.name)
            .field("email", &self.email)
            .field("account_number", &self.account_number)
            .field("password", &"***")
            .finish()
    }
}
