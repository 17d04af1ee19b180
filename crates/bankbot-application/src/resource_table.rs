//! Client-side view of a remote record set.
//!
//! The remote list is authoritative: every successful mutation is followed by
//! a full refetch, and local rows are never patched in place.

use std::convert::Infallible;
use std::fmt::Display;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bankbot_core::admin::{HistoryRecord, TrainingDraft, TrainingRecord, TrainingRecordId};
use bankbot_core::error::{BankbotError, GENERIC_FAILURE_MESSAGE, Result};
use bankbot_core::ui::{Confirmation, Notice, Notifier};
use tokio::sync::RwLock;

use crate::admin_gate::AdminGate;

/// A remote collection a [`ResourceTable`] can render and mutate.
///
/// Read-only collections implement `fetch_all` only; the mutating methods
/// default to `Unsupported`.
#[async_trait]
pub trait RemoteResource: Send + Sync {
    type Record: Clone + Send + Sync;
    type Draft: Send + Sync;
    type Id: Copy + Display + Send + Sync;

    /// Human-readable record name, used in prompts and logs.
    const NAME: &'static str;

    async fn fetch_all(&self) -> Result<Vec<Self::Record>>;

    /// Submits a new record and returns the service's confirmation.
    async fn create(&self, _draft: &Self::Draft) -> Result<String> {
        Err(BankbotError::Unsupported(format!("{} cannot be created", Self::NAME)))
    }

    /// Deletes a record and returns the service's confirmation.
    async fn delete(&self, _id: Self::Id) -> Result<String> {
        Err(BankbotError::Unsupported(format!("{} cannot be deleted", Self::NAME)))
    }
}

/// Outcome of [`ResourceTable::delete`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The user declined; nothing was sent.
    Cancelled,
}

struct Rendering<T> {
    seq: u64,
    rows: Vec<T>,
}

/// Generic controller keeping rendered rows in step with a remote list.
///
/// Each refresh is tagged with a sequence number taken when it starts. A
/// response older than the last applied one is dropped, so a slow refresh
/// can never overwrite the result of a newer one.
pub struct ResourceTable<R: RemoteResource> {
    resource: R,
    notifier: Arc<dyn Notifier>,
    rendering: RwLock<Rendering<R::Record>>,
    next_seq: AtomicU64,
}

impl<R: RemoteResource> ResourceTable<R> {
    pub fn new(resource: R, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            resource,
            notifier,
            rendering: RwLock::new(Rendering {
                seq: 0,
                rows: Vec::new(),
            }),
            next_seq: AtomicU64::new(0),
        }
    }

    /// Snapshot of the rows currently rendered.
    pub async fn rows(&self) -> Vec<R::Record> {
        self.rendering.read().await.rows.clone()
    }

    /// Replaces the rendering with the remote list.
    ///
    /// Returns the rows now rendered. When this response turned out to be
    /// stale, those are the rows of the newer refresh.
    ///
    /// # Errors
    ///
    /// On failure the user is notified and the rendering is left untouched.
    pub async fn refresh(&self) -> Result<Vec<R::Record>> {
        let seq = self.next_seq.fetch_add(1, Ordering::SeqCst) + 1;

        let rows = match self.resource.fetch_all().await {
            Ok(rows) => rows,
            Err(e) => {
                tracing::warn!("[ResourceTable] Refresh #{} of {} failed: {}", seq, R::NAME, e);
                return Err(self.report(e));
            }
        };

        let mut rendering = self.rendering.write().await;
        if seq < rendering.seq {
            tracing::debug!(
                "[ResourceTable] Discarding stale {} refresh #{} (applied #{})",
                R::NAME,
                seq,
                rendering.seq
            );
        } else {
            tracing::debug!(
                "[ResourceTable] Applied {} refresh #{}: {} rows",
                R::NAME,
                seq,
                rows.len()
            );
            rendering.seq = seq;
            rendering.rows = rows;
        }
        Ok(rendering.rows.clone())
    }

    /// Submits a new record, then refetches.
    pub async fn create(&self, draft: &R::Draft) -> Result<String> {
        let message = self
            .resource
            .create(draft)
            .await
            .map_err(|e| self.report(e))?;
        self.after_mutation(&message).await;
        Ok(message)
    }

    /// Deletes a record after explicit confirmation, then refetches.
    pub async fn delete(&self, id: R::Id, confirmation: &dyn Confirmation) -> Result<DeleteOutcome> {
        if !confirmation.confirm(&format!("Delete {} {}?", R::NAME, id)) {
            tracing::debug!("[ResourceTable] Delete of {} {} cancelled", R::NAME, id);
            return Ok(DeleteOutcome::Cancelled);
        }

        let message = self
            .resource
            .delete(id)
            .await
            .map_err(|e| self.report(e))?;
        self.after_mutation(&message).await;
        Ok(DeleteOutcome::Deleted)
    }

    async fn after_mutation(&self, message: &str) {
        self.notifier.notify(Notice::success(message));
        // Refresh failures are already reported; the mutation itself stood.
        if let Err(e) = self.refresh().await {
            tracing::debug!("[ResourceTable] Refresh after mutation failed: {}", e);
        }
    }

    fn report(&self, error: BankbotError) -> BankbotError {
        // Session expiry has been reported by the session guard.
        if !error.is_unauthorized() {
            self.notifier
                .notify(Notice::error(error.user_message(GENERIC_FAILURE_MESSAGE)));
        }
        error
    }
}

/// NLU training records, behind the admin gate.
pub struct TrainingRecords {
    gate: AdminGate,
}

impl TrainingRecords {
    pub fn new(gate: AdminGate) -> Self {
        Self { gate }
    }
}

#[async_trait]
impl RemoteResource for TrainingRecords {
    type Record = TrainingRecord;
    type Draft = TrainingDraft;
    type Id = TrainingRecordId;

    const NAME: &'static str = "training record";

    async fn fetch_all(&self) -> Result<Vec<TrainingRecord>> {
        self.gate.run(self.gate.api().training_records()).await
    }

    async fn create(&self, draft: &TrainingDraft) -> Result<String> {
        draft.validate()?;
        self.gate
            .run(self.gate.api().create_training_record(draft))
            .await
    }

    async fn delete(&self, id: TrainingRecordId) -> Result<String> {
        self.gate
            .run(self.gate.api().delete_training_record(id))
            .await
    }
}

/// Logged chat queries, read-only.
pub struct ChatHistory {
    gate: AdminGate,
}

impl ChatHistory {
    pub fn new(gate: AdminGate) -> Self {
        Self { gate }
    }
}

#[async_trait]
impl RemoteResource for ChatHistory {
    type Record = HistoryRecord;
    type Draft = Infallible;
    type Id = Infallible;

    const NAME: &'static str = "history record";

    async fn fetch_all(&self) -> Result<Vec<HistoryRecord>> {
        self.gate.run(self.gate.api().chat_history()).await
    }
}
