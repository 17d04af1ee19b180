//! Interactive chat REPL.

use std::borrow::Cow::{self, Borrowed, Owned};
use std::sync::Arc;

use anyhow::Result;
use bankbot_application::ChatSession;
use bankbot_core::chat::{ConversationEntry, Speaker};
use colored::Colorize;
use rustyline::completion::{Completer, Pair};
use rustyline::error::ReadlineError;
use rustyline::highlight::Highlighter;
use rustyline::hint::Hinter;
use rustyline::validate::Validator;
use rustyline::{Context, Editor, Helper};

use super::utils::AppContext;

const SLASH_COMMANDS: [&str; 3] = ["/transcript", "/help", "/quit"];

/// Completion, hints and highlighting for slash commands.
#[derive(Clone)]
struct ChatHelper {
    commands: Vec<String>,
}

impl ChatHelper {
    fn new() -> Self {
        Self {
            commands: SLASH_COMMANDS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl Helper for ChatHelper {}

impl Completer for ChatHelper {
    type Candidate = Pair;

    fn complete(
        &self,
        line: &str,
        pos: usize,
        _ctx: &Context<'_>,
    ) -> rustyline::Result<(usize, Vec<Pair>)> {
        let line = &line[..pos];
        if !line.starts_with('/') {
            return Ok((0, vec![]));
        }

        let candidates = self
            .commands
            .iter()
            .filter(|cmd| cmd.starts_with(line))
            .map(|cmd| Pair {
                display: cmd.clone(),
                replacement: cmd.clone(),
            })
            .collect();
        Ok((0, candidates))
    }
}

impl Highlighter for ChatHelper {
    fn highlight<'l>(&self, line: &'l str, _pos: usize) -> Cow<'l, str> {
        if line.starts_with('/') {
            Owned(line.bright_cyan().to_string())
        } else {
            Borrowed(line)
        }
    }

    fn highlight_char(&self, _line: &str, _pos: usize, _forced: bool) -> bool {
        true
    }
}

impl Hinter for ChatHelper {
    type Hint = String;

    fn hint(&self, line: &str, pos: usize, _ctx: &Context<'_>) -> Option<String> {
        let line = &line[..pos];
        if !line.starts_with('/') || line.contains(' ') {
            return None;
        }
        self.commands
            .iter()
            .find(|cmd| cmd.starts_with(line) && cmd.len() > line.len())
            .map(|cmd| cmd[line.len()..].to_string())
    }
}

impl Validator for ChatHelper {}

/// Runs the chat loop until `/quit`, Ctrl-D or a terminal error.
///
/// The transcript lives only as long as this loop.
pub async fn run(ctx: &AppContext) -> Result<()> {
    let chat = ChatSession::new(Arc::clone(ctx.session.api()));

    let mut rl = Editor::new()?;
    rl.set_helper(Some(ChatHelper::new()));

    println!("{}", "=== Bankbot ===".bright_magenta().bold());
    if let Some(identity) = ctx.session.current_identity().await {
        println!("{}", format!("Logged in as {}.", identity.name).bright_black());
    }
    println!(
        "{}",
        "Ask about balances, cards or loans. Type '/help' for commands, '/quit' to exit."
            .bright_black()
    );
    println!();

    loop {
        match rl.readline("You> ") {
            Ok(line) => {
                let trimmed = line.trim();
                match trimmed {
                    "" => continue,
                    "/quit" | "quit" | "exit" => {
                        println!("{}", "Goodbye!".bright_green());
                        break;
                    }
                    "/help" => {
                        println!("{}", SLASH_COMMANDS.join("  ").bright_black());
                        continue;
                    }
                    "/transcript" => {
                        for entry in chat.transcript().await {
                            print_entry(&entry);
                        }
                        continue;
                    }
                    _ => {}
                }

                let _ = rl.add_history_entry(trimmed);
                if let Some(reply) = chat.send(trimmed).await {
                    print_entry(&reply);
                }
            }
            Err(ReadlineError::Interrupted) => {
                println!("{}", "CTRL-C detected. Type '/quit' to exit.".yellow());
            }
            Err(ReadlineError::Eof) => {
                println!("{}", "Goodbye!".bright_green());
                break;
            }
            Err(err) => {
                eprintln!("{}", format!("Error: {err:?}").red());
                break;
            }
        }
    }

    tracing::debug!("[chat] Session closed after {} entries", chat.len().await);
    Ok(())
}

fn print_entry(entry: &ConversationEntry) {
    match entry.speaker {
        Speaker::User => println!("{}", format!("{}> {}", entry.speaker.label(), entry.text).green()),
        Speaker::Bot => {
            let label = format!("{}>", entry.speaker.label()).bright_magenta();
            match &entry.intent {
                Some(intent) => println!(
                    "{} {} {}",
                    label,
                    entry.text.bright_blue(),
                    format!("[{intent}]").bright_black()
                ),
                None => println!("{} {}", label, entry.text.red()),
            }
        }
    }
}
