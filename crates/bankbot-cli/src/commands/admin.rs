//! Admin dashboard commands.

use anyhow::Result;
use bankbot_application::{AdminView, ChatHistory, DeleteOutcome, ResourceTable, TrainingRecords};
use bankbot_core::admin::{TrainingDraft, TrainingRecordId};
use bankbot_core::identity::Credentials;
use bankbot_core::ui::{Confirmation, Preconfirmed};
use colored::Colorize;

use super::utils::{AppContext, ReportedExt, StdinConfirmation, password_or_prompt, print_table};

pub async fn login(ctx: &AppContext, username: String, password: Option<String>) -> Result<()> {
    let password = password_or_prompt(password)?;
    ctx.gate
        .login(&Credentials::new(username, password))
        .await
        .reported()?;
    Ok(())
}

pub async fn logout(ctx: &AppContext) -> Result<()> {
    ctx.session.logout().await;
    Ok(())
}

pub async fn history(ctx: &AppContext) -> Result<()> {
    let table = ResourceTable::new(ChatHistory::new(ctx.gate.clone()), notifier(ctx));
    let records = gated(ctx, table.refresh()).await?;

    let rows: Vec<Vec<String>> = records
        .into_iter()
        .map(|record| {
            let confidence = record.confidence_percent();
            vec![record.timestamp, record.intent, confidence, record.query]
        })
        .collect();
    print_table(&["Date", "Intent", "Confidence", "Query"], &rows);
    Ok(())
}

pub async fn nlu_list(ctx: &AppContext) -> Result<()> {
    let table = training_table(ctx);
    gated(ctx, table.refresh()).await?;
    print_training(&table).await;
    Ok(())
}

pub async fn nlu_add(ctx: &AppContext, text: String, reply: String, intent: String) -> Result<()> {
    let table = training_table(ctx);
    gated(ctx, table.create(&TrainingDraft::new(text, reply, intent))).await?;
    print_training(&table).await;
    Ok(())
}

pub async fn nlu_delete(ctx: &AppContext, id: TrainingRecordId, yes: bool) -> Result<()> {
    let table = training_table(ctx);
    let confirmation: &dyn Confirmation = if yes {
        &Preconfirmed(true)
    } else {
        &StdinConfirmation
    };

    match gated(ctx, table.delete(id, confirmation)).await? {
        DeleteOutcome::Deleted => print_training(&table).await,
        DeleteOutcome::Cancelled => println!("{}", "Cancelled.".bright_black()),
    }
    Ok(())
}

pub async fn retrain(ctx: &AppContext) -> Result<()> {
    gated(ctx, ctx.gate.retrain()).await?;
    Ok(())
}

fn notifier(ctx: &AppContext) -> std::sync::Arc<dyn bankbot_core::ui::Notifier> {
    ctx.session.notifier().clone()
}

fn training_table(ctx: &AppContext) -> ResourceTable<TrainingRecords> {
    ResourceTable::new(TrainingRecords::new(ctx.gate.clone()), notifier(ctx))
}

/// Runs an admin operation and points at `admin login` once the gate
/// shows the login form again.
async fn gated<T>(
    ctx: &AppContext,
    op: impl Future<Output = bankbot_core::Result<T>>,
) -> Result<T> {
    let result = op.await;
    if result.is_err() && ctx.gate.view().await == AdminView::Login {
        println!("{}", "Run `bankbot admin login <username>` to continue.".yellow());
    }
    result.reported()
}

async fn print_training(table: &ResourceTable<TrainingRecords>) {
    let rows: Vec<Vec<String>> = table
        .rows()
        .await
        .into_iter()
        .map(|record| vec![record.id.to_string(), record.intent, record.text, record.bot_reply])
        .collect();
    if rows.is_empty() {
        println!("{}", "No training records.".bright_black());
    } else {
        print_table(&["ID", "Intent", "Query", "Bot reply"], &rows);
    }
}
