//! Customer-facing commands.

use anyhow::Result;
use bankbot_core::identity::{Credentials, Identity, Registration};
use bankbot_core::transaction::TransactionRecord;
use colored::Colorize;

use super::utils::{AppContext, ReportedExt, password_or_prompt, print_table};

pub async fn ping(ctx: &AppContext) -> Result<()> {
    let message = ctx.session.api().ping().await?;
    println!("{}", message.bright_green());
    Ok(())
}

pub async fn login(ctx: &AppContext, email: String, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    let identity = ctx
        .session
        .authenticate(&Credentials::new(email, password))
        .await
        .reported()?;
    print_profile(&identity);
    Ok(())
}

pub async fn register(
    ctx: &AppContext,
    name: String,
    email: String,
    account_number: String,
    password: Option<String>,
) -> Result<()> {
    let registration = Registration {
        name,
        email,
        account_number,
        password: password_or_prompt(password)?,
    };
    ctx.session.register(&registration).await.reported()?;
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout().await;
    Ok(())
}

pub async fn whoami(ctx: &AppContext) -> Result<()> {
    let identity = ctx.session.revalidate().await.reported()?;
    print_profile(&identity);
    Ok(())
}

pub async fn statement(ctx: &AppContext) -> Result<()> {
    let lines = ctx.session.mini_statement().await.reported()?;
    if lines.is_empty() {
        println!("{}", "No recent transactions.".bright_black());
        return Ok(());
    }

    let rows: Vec<Vec<String>> = lines
        .into_iter()
        .map(|line| {
            vec![
                line.timestamp,
                line.kind,
                line.amount.to_string(),
                line.description,
            ]
        })
        .collect();
    print_table(&["Date", "Type", "Amount", "Description"], &rows);
    Ok(())
}

/// Prints the demo history. Nothing here comes from the service.
pub fn transactions() {
    let rows: Vec<Vec<String>> = TransactionRecord::demo_fixtures()
        .into_iter()
        .map(|record| {
            vec![
                record.timestamp.format("%Y-%m-%d %H:%M").to_string(),
                record.kind.to_string(),
                record.amount.to_string(),
                record.details,
            ]
        })
        .collect();
    print_table(&["Date", "Type", "Amount", "Details"], &rows);
}

fn print_profile(identity: &Identity) {
    println!("{} {}", "Name:".bold(), identity.name);
    println!("{} {}", "Email:".bold(), identity.email);
    if let Some(account) = &identity.account_number {
        println!("{} {}", "Account:".bold(), account);
    }
    if let Some(card) = &identity.card_last4 {
        println!("{} **** {}", "Card:".bold(), card);
    }
    if let Some(balance) = identity.balance {
        println!("{} {}", "Balance:".bold(), balance);
    }
}
