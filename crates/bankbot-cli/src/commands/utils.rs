use std::fmt;
use std::io::{self, BufRead, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use bankbot_application::{AdminGate, SessionStore};
use bankbot_core::config::ClientConfig;
use bankbot_core::ui::{Confirmation, Notice, NoticeLevel, Notifier};
use bankbot_infrastructure::{BankbotPaths, TomlSessionRepository};
use bankbot_interaction::HttpBankApi;
use colored::Colorize;

/// Marks a failure the user has already been told about.
#[derive(Debug)]
pub struct Reported;

impl fmt::Display for Reported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("operation failed")
    }
}

impl std::error::Error for Reported {}

pub trait ReportedExt<T> {
    /// Converts an error that went through the notifier into [`Reported`].
    fn reported(self) -> Result<T>;
}

impl<T> ReportedExt<T> for bankbot_core::Result<T> {
    fn reported(self) -> Result<T> {
        self.map_err(|_| anyhow::Error::new(Reported))
    }
}

/// Wiring shared by every command.
pub struct AppContext {
    pub session: Arc<SessionStore>,
    pub gate: AdminGate,
}

impl AppContext {
    /// Builds the client stack and restores any cached session.
    pub async fn init(paths: &BankbotPaths, config: &ClientConfig) -> Result<Self> {
        let api = Arc::new(HttpBankApi::new(config)?);
        let repository =
            Arc::new(TomlSessionRepository::new(paths).context("Failed to open session cache")?);
        let session = Arc::new(SessionStore::new(api, repository, Arc::new(TerminalNotifier)));

        // A corrupt cache only costs a fresh login.
        if let Err(e) = session.restore().await {
            tracing::warn!("[bankbot] Ignoring unreadable session cache: {}", e);
        }

        let gate = AdminGate::new(session.clone());
        Ok(Self { session, gate })
    }
}

/// Prints notices to the terminal, errors to stderr.
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, notice: Notice) {
        match notice.level {
            NoticeLevel::Info => println!("{}", notice.message.bright_black()),
            NoticeLevel::Success => println!("{}", notice.message.bright_green()),
            NoticeLevel::Error => eprintln!("{}", notice.message.red()),
        }
    }
}

/// Asks on stdin; anything but `y`/`yes` declines.
pub struct StdinConfirmation;

impl Confirmation for StdinConfirmation {
    fn confirm(&self, prompt: &str) -> bool {
        match prompt_line(&format!("{prompt} [y/N] ")) {
            Ok(answer) => matches!(answer.to_ascii_lowercase().as_str(), "y" | "yes"),
            Err(_) => false,
        }
    }
}

/// Reads one trimmed line from stdin after printing `prompt`.
fn prompt_line(prompt: &str) -> io::Result<String> {
    print!("{}", prompt.yellow());
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim().to_string())
}

/// Returns the password given on the command line, or asks for it without
/// echoing.
pub fn password_or_prompt(password: Option<String>) -> Result<String> {
    match password {
        Some(password) => Ok(password),
        None => rpassword::prompt_password("Password: ".yellow().to_string())
            .context("Failed to read password"),
    }
}

/// Renders rows as left-aligned columns under a bold header.
pub fn print_table(headers: &[&str], rows: &[Vec<String>]) {
    let mut widths: Vec<usize> = headers.iter().map(|h| h.len()).collect();
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let header = headers
        .iter()
        .zip(&widths)
        .map(|(h, w)| format!("{h:<w$}"))
        .collect::<Vec<_>>()
        .join("  ");
    println!("{}", header.bold());

    for row in rows {
        let line = row
            .iter()
            .zip(&widths)
            .map(|(cell, w)| format!("{cell:<w$}"))
            .collect::<Vec<_>>()
            .join("  ");
        println!("{}", line.trim_end());
    }
}
