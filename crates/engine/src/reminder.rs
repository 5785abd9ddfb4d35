//! Due-date reminder polling pass.
//!
//! [`DueDateReminder::run_once`] is one poll: it scans every active
//! project's todos for items due inside the current window and emits a
//! deduplicated reminder to each assignee. The caller owns the loop and its
//! cancellation; invoking the pass repeatedly within one window produces no
//! duplicate records.

use std::sync::Arc;

use chrono::NaiveTime;
use lattice_core::issue::UNASSIGNED;
use lattice_core::notification::Correlation;
use lattice_core::todo::Todo;
use lattice_core::types::Timestamp;
use lattice_store::paths::{self, Namespace};
use lattice_store::DocumentStore;

use crate::config::EngineConfig;
use crate::error::EngineError;
use crate::notify::NotificationEmitter;

/// Counters from one reminder pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReminderReport {
    /// Todos that were due in the window with a real assignee.
    pub examined: usize,
    /// Reminders actually written.
    pub emitted: usize,
    /// Reminders suppressed because one already existed in the window.
    pub duplicates: usize,
    /// Per-todo store failures (logged, never abort the pass).
    pub failures: usize,
}

/// Emits due-date reminders for active projects' todos.
pub struct DueDateReminder {
    store: Arc<dyn DocumentStore>,
    emitter: NotificationEmitter,
    config: EngineConfig,
}

impl DueDateReminder {
    pub fn new(store: Arc<dyn DocumentStore>, config: EngineConfig) -> Self {
        let emitter = NotificationEmitter::new(Arc::clone(&store));
        Self {
            store,
            emitter,
            config,
        }
    }

    /// The dedup window containing `now`: UTC midnight of the day plus the
    /// configured window length.
    fn window(&self, now: Timestamp) -> (Timestamp, Timestamp) {
        let start = now.date_naive().and_time(NaiveTime::MIN).and_utc();
        (start, start + self.config.reminder_window)
    }

    /// Run one reminder pass over every active project.
    ///
    /// A failure on one todo is logged and counted, then the pass moves on;
    /// only listing the tree itself can fail the whole pass.
    pub async fn run_once(&self, now: Timestamp) -> Result<ReminderReport, EngineError> {
        let window = self.window(now);
        let mut report = ReminderReport::default();

        let projects = self
            .store
            .list_children(Namespace::Active.root())
            .await?;
        for project in &projects {
            let issues = self
                .store
                .list_children(&paths::issues_collection(Namespace::Active, &project.id))
                .await?;
            for issue in &issues {
                let todos = self
                    .store
                    .list_children(&paths::todos_collection(
                        Namespace::Active,
                        &project.id,
                        &issue.id,
                    ))
                    .await?;
                for doc in &todos {
                    let todo: Todo = match doc.decode() {
                        Ok(todo) => todo,
                        Err(e) => {
                            tracing::warn!(todo_id = %doc.id, error = %e, "Skipping malformed todo");
                            report.failures += 1;
                            continue;
                        }
                    };
                    if !due_in_window(&todo, window) {
                        continue;
                    }
                    report.examined += 1;

                    let message = format!("\"{}\" is due today", todo.title);
                    let correlation = Correlation::todo(
                        project.id.clone(),
                        issue.id.clone(),
                        todo.id.clone(),
                    );
                    match self
                        .emitter
                        .emit_deduped(&todo.assignee, &message, &correlation, window, now)
                        .await
                    {
                        Ok(true) => report.emitted += 1,
                        Ok(false) => report.duplicates += 1,
                        Err(e) => {
                            tracing::warn!(
                                todo_id = %todo.id,
                                assignee = %todo.assignee,
                                error = %e,
                                "Reminder emission failed"
                            );
                            report.failures += 1;
                        }
                    }
                }
            }
        }

        tracing::info!(
            examined = report.examined,
            emitted = report.emitted,
            duplicates = report.duplicates,
            failures = report.failures,
            "Reminder pass finished"
        );
        Ok(report)
    }
}

/// A todo qualifies if it is incomplete, has a real assignee, and is due
/// inside the window (inclusive bounds).
fn due_in_window(todo: &Todo, window: (Timestamp, Timestamp)) -> bool {
    if todo.completed || todo.assignee.is_empty() || todo.assignee == UNASSIGNED {
        return false;
    }
    todo.due_date
        .is_some_and(|due| due >= window.0 && due <= window.1)
}
