//! Transaction history records.
//!
//! `TransactionRecord` is fixed demo data for the history viewer and is not
//! backed by any ledger. `StatementLine` is what the mini statement endpoint
//! returns for the logged-in user.

use std::fmt;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::money::Money;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TransactionType {
    Deposit,
    Withdrawal,
    Transfer,
    Payment,
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            TransactionType::Deposit => "Deposit",
            TransactionType::Withdrawal => "Withdrawal",
            TransactionType::Transfer => "Transfer",
            TransactionType::Payment => "Payment",
        };
        f.write_str(label)
    }
}

/// One row of the demo transaction history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    pub timestamp: NaiveDateTime,
    pub kind: TransactionType,
    pub amount: Money,
    pub details: String,
}

impl TransactionRecord {
    /// The static rows shown by the transaction viewer, newest first.
    pub fn demo_fixtures() -> Vec<TransactionRecord> {
        const ROWS: [(&str, TransactionType, u64, &str); 6] = [
            ("2025-03-14 09:12:00", TransactionType::Deposit, 2_000_000, "Salary credit"),
            ("2025-03-12 18:45:00", TransactionType::Payment, 129_900, "Electricity bill"),
            ("2025-03-10 13:05:00", TransactionType::Withdrawal, 50_000, "ATM withdrawal"),
            ("2025-03-08 20:30:00", TransactionType::Transfer, 250_000, "Transfer to account 4532"),
            ("2025-03-05 11:00:00", TransactionType::Payment, 70_000, "Online shopping"),
            ("2025-03-01 08:00:00", TransactionType::Deposit, 500_000, "Cash deposit"),
        ];

        ROWS.iter()
            .filter_map(|(timestamp, kind, cents, details)| {
                let timestamp =
                    NaiveDateTime::parse_from_str(timestamp, "%Y-%m-%d %H:%M:%S").ok()?;
                Some(TransactionRecord {
                    timestamp,
                    kind: *kind,
                    amount: Money::from_cents(*cents),
                    details: (*details).to_string(),
                })
            })
            .collect()
    }
}

/// One line of the user's mini statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatementLine {
    /// `credit` or `debit` as labelled by the service
    pub kind: String,
    pub amount: Money,
    pub description: String,
    pub timestamp: String,
}
