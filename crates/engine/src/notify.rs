//! Notification fan-out.
//!
//! [`NotificationEmitter`] writes one notification document per recipient
//! into the flat `notifications/` collection. Recipient writes are
//! independent: they all run, and failures are collected per recipient
//! rather than aborting siblings. The deduplicated variant backs recurring
//! due-date reminders, where repeated polling must not produce duplicate
//! records within one window.

use std::fmt;
use std::sync::Arc;

use futures::future::join_all;
use lattice_core::notification::{Correlation, Notification};
use lattice_core::types::{Timestamp, UserId};
use lattice_core::CoreError;
use lattice_store::client::encode;
use lattice_store::paths;
use lattice_store::{DocumentStore, Filter, StoreError};
use serde_json::Value;
use uuid::Uuid;

use crate::error::EngineError;

/// One failed recipient write.
#[derive(Debug)]
pub struct RecipientFailure {
    pub recipient: UserId,
    pub error: StoreError,
}

/// Outcome of a fan-out: how many writes landed and which failed.
#[derive(Debug, Default)]
pub struct FanoutReport {
    pub delivered: usize,
    pub failures: Vec<RecipientFailure>,
    /// Set when recipient resolution itself failed upstream and the fan-out
    /// was skipped entirely.
    pub roster_error: Option<CoreError>,
}

impl FanoutReport {
    /// A report for a fan-out skipped because recipients could not be
    /// resolved.
    pub fn degraded(error: CoreError) -> Self {
        Self {
            roster_error: Some(error),
            ..Self::default()
        }
    }

    /// Returns `true` if every attempted write succeeded and recipient
    /// resolution did not fail.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty() && self.roster_error.is_none()
    }

    /// The delivered count, or an [`EngineError::Fanout`] carrying this
    /// report if any recipient write failed or the fan-out was skipped.
    pub fn into_result(self) -> Result<usize, EngineError> {
        if self.is_complete() {
            Ok(self.delivered)
        } else {
            Err(EngineError::Fanout(self))
        }
    }
}

impl fmt::Display for FanoutReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} delivered, {} failed",
            self.delivered,
            self.failures.len()
        )?;
        for failure in &self.failures {
            write!(f, "; {}: {}", failure.recipient, failure.error)?;
        }
        if let Some(error) = &self.roster_error {
            write!(f, "; recipient resolution failed: {error}")?;
        }
        Ok(())
    }
}

/// Writes notification documents for engine-side events.
#[derive(Clone)]
pub struct NotificationEmitter {
    store: Arc<dyn DocumentStore>,
}

impl NotificationEmitter {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    /// Fan out `message` to every recipient except `actor_id`.
    ///
    /// Each recipient gets their own unread, visible document carrying the
    /// correlation ids. Duplicate recipients collapse to one write; an
    /// empty post-exclusion set is a no-op. All writes are attempted
    /// concurrently and failures are reported, never propagated mid-fan-out.
    pub async fn emit(
        &self,
        recipients: &[UserId],
        actor_id: &str,
        message: &str,
        correlation: &Correlation,
        now: Timestamp,
    ) -> FanoutReport {
        let mut targets: Vec<&UserId> = Vec::new();
        for recipient in recipients {
            if recipient != actor_id && !targets.contains(&recipient) {
                targets.push(recipient);
            }
        }
        if targets.is_empty() {
            return FanoutReport::default();
        }

        let writes = targets.iter().map(|recipient| {
            let recipient = (*recipient).clone();
            async move {
                let result = self
                    .write_one(&recipient, message, correlation, now)
                    .await;
                (recipient, result)
            }
        });

        let mut report = FanoutReport::default();
        for (recipient, result) in join_all(writes).await {
            match result {
                Ok(()) => report.delivered += 1,
                Err(error) => {
                    tracing::warn!(%recipient, error = %error, "Notification write failed");
                    report.failures.push(RecipientFailure { recipient, error });
                }
            }
        }
        tracing::info!(
            delivered = report.delivered,
            failed = report.failures.len(),
            "Notification fan-out finished"
        );
        report
    }

    /// Emit to a single recipient unless an equivalent notification already
    /// exists within `window`.
    ///
    /// Equivalence is the (recipient, todo id, window) triple; the query
    /// needs a correlation with a todo id to key on. Returns `true` if a
    /// document was written, `false` if a duplicate suppressed it.
    pub async fn emit_deduped(
        &self,
        recipient: &str,
        message: &str,
        correlation: &Correlation,
        window: (Timestamp, Timestamp),
        now: Timestamp,
    ) -> Result<bool, StoreError> {
        if let Some(todo_id) = &correlation.todo_id {
            let filters = [
                Filter::array_contains("recipients", recipient.to_string()),
                Filter::eq("todoId", todo_id.clone()),
                Filter::Range {
                    field: "createdAt".to_string(),
                    min: Some(timestamp_value(window.0)?),
                    max: Some(timestamp_value(window.1)?),
                },
            ];
            let existing = self.store.query(paths::NOTIFICATIONS, &filters).await?;
            if !existing.is_empty() {
                tracing::debug!(recipient, %todo_id, "Reminder already emitted in window");
                return Ok(false);
            }
        }

        self.write_one(recipient, message, correlation, now).await?;
        Ok(true)
    }

    /// Write one single-recipient notification document.
    async fn write_one(
        &self,
        recipient: &str,
        message: &str,
        correlation: &Correlation,
        now: Timestamp,
    ) -> Result<(), StoreError> {
        let id = Uuid::new_v4().to_string();
        let notification = Notification::new(id.clone(), vec![recipient.to_string()], message, now)
            .with_correlation(correlation);

        self.store
            .set(&paths::notification_doc(&id), encode(&notification)?)
            .await
    }
}

/// Serialize a timestamp for use as a query bound.
fn timestamp_value(ts: Timestamp) -> Result<Value, StoreError> {
    serde_json::to_value(ts).map_err(|e| StoreError::Backend(e.to_string()))
}
