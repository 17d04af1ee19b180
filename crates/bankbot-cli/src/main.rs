use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use bankbot_core::admin::TrainingRecordId;
use bankbot_infrastructure::{BankbotPaths, ConfigService, ServiceType};
use clap::{Parser, Subcommand};
use colored::Colorize;

mod commands;
mod logging;

use commands::utils::{AppContext, Reported};

#[derive(Parser)]
#[command(name = "bankbot")]
#[command(about = "Bankbot CLI - talk to the banking chatbot and manage its training data", long_about = None)]
struct Cli {
    /// Service root URL, overriding config and environment
    #[arg(long, global = true)]
    base_url: Option<String>,

    /// Directory holding config.toml, session.toml and logs
    #[arg(long, global = true)]
    state_dir: Option<PathBuf>,

    /// Mirror logs to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Check that the service is reachable
    Ping,
    /// Log in as a customer
    Login {
        /// Email address or account number
        email: String,
        /// Prompted for when omitted
        #[arg(long)]
        password: Option<String>,
    },
    /// Create a customer account (does not log in)
    Register {
        #[arg(long)]
        name: String,
        #[arg(long)]
        email: String,
        #[arg(long)]
        account_number: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// End the current session
    Logout,
    /// Show the logged-in profile, confirmed with the service
    Whoami,
    /// Show the latest transactions from the service
    Statement,
    /// Show the demo transaction history
    Transactions,
    /// Start an interactive chat with the bot
    Chat,
    /// Admin dashboard
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Log in as an administrator
    Login {
        username: String,
        #[arg(long)]
        password: Option<String>,
    },
    /// End the admin session
    Logout,
    /// Show logged chat queries
    History,
    /// Manage NLU training records
    Nlu {
        #[command(subcommand)]
        action: NluAction,
    },
    /// Retrain the bot on the current training records
    Retrain,
}

#[derive(Subcommand)]
enum NluAction {
    /// List training records
    List,
    /// Add a training record
    Add {
        #[arg(long)]
        text: String,
        #[arg(long)]
        reply: String,
        #[arg(long)]
        intent: String,
    },
    /// Delete a training record
    Delete {
        id: i64,
        /// Skip the confirmation prompt
        #[arg(short, long)]
        yes: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            // Failures reported through the notifier were already printed.
            if !e.is::<Reported>() {
                eprintln!("{} {:#}", "Error:".red().bold(), e);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let paths = BankbotPaths::new(cli.state_dir);
    let mut config = ConfigService::new(paths.clone())
        .load()
        .context("Failed to load configuration")?;
    if let Some(base_url) = cli.base_url {
        config.base_url = base_url;
        config.validate()?;
    }

    let logs_dir = paths.get_path(ServiceType::Logs).ok();
    let _log_guard = logging::init(&config.log_level, logs_dir.as_deref(), cli.verbose);
    tracing::debug!("[bankbot] Using service at {}", config.base_url);

    let ctx = AppContext::init(&paths, &config).await?;

    match cli.command {
        Commands::Ping => commands::account::ping(&ctx).await,
        Commands::Login { email, password } => {
            commands::account::login(&ctx, email, password).await
        }
        Commands::Register {
            name,
            email,
            account_number,
            password,
        } => commands::account::register(&ctx, name, email, account_number, password).await,
        Commands::Logout => commands::account::logout(&ctx).await,
        Commands::Whoami => commands::account::whoami(&ctx).await,
        Commands::Statement => commands::account::statement(&ctx).await,
        Commands::Transactions => {
            commands::account::transactions();
            Ok(())
        }
        Commands::Chat => commands::chat::run(&ctx).await,
        Commands::Admin { action } => match action {
            AdminAction::Login { username, password } => {
                commands::admin::login(&ctx, username, password).await
            }
            AdminAction::Logout => commands::admin::logout(&ctx).await,
            AdminAction::History => commands::admin::history(&ctx).await,
            AdminAction::Nlu { action } => match action {
                NluAction::List => commands::admin::nlu_list(&ctx).await,
                NluAction::Add {
                    text,
                    reply,
                    intent,
                } => commands::admin::nlu_add(&ctx, text, reply, intent).await,
                NluAction::Delete { id, yes } => {
                    commands::admin::nlu_delete(&ctx, TrainingRecordId(id), yes).await
                }
            },
            AdminAction::Retrain => commands::admin::retrain(&ctx).await,
        },
    }
}
