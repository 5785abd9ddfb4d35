//! Notification entity model.

use serde::{Deserialize, Serialize};

use crate::types::{DocId, Timestamp, UserId};

/// A notification document at the top-level `notifications/{id}` collection.
///
/// Typically fanned out as one recipient per document so that reads and
/// deduplication stay per-user. Constructed via [`Notification::new`] and
/// enriched with [`Notification::with_correlation`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: DocId,
    /// Target user ids. Non-empty.
    pub recipients: Vec<UserId>,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    /// Client-side soft delete flag.
    #[serde(default)]
    pub hidden: bool,
    #[serde(default)]
    pub project_id: Option<DocId>,
    #[serde(default)]
    pub issue_id: Option<DocId>,
    #[serde(default)]
    pub todo_id: Option<DocId>,
    pub created_at: Timestamp,
}

impl Notification {
    /// Create an unread, visible notification with no correlation ids.
    pub fn new(
        id: impl Into<DocId>,
        recipients: Vec<UserId>,
        message: impl Into<String>,
        now: Timestamp,
    ) -> Self {
        Self {
            id: id.into(),
            recipients,
            message: message.into(),
            read: false,
            hidden: false,
            project_id: None,
            issue_id: None,
            todo_id: None,
            created_at: now,
        }
    }

    /// Attach the correlation ids the notification points back at.
    pub fn with_correlation(mut self, correlation: &Correlation) -> Self {
        self.project_id = correlation.project_id.clone();
        self.issue_id = correlation.issue_id.clone();
        self.todo_id = correlation.todo_id.clone();
        self
    }
}

/// Correlation ids carried by a notification for dedup and deep-linking.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Correlation {
    pub project_id: Option<DocId>,
    pub issue_id: Option<DocId>,
    pub todo_id: Option<DocId>,
}

impl Correlation {
    /// Correlation pointing at a project.
    pub fn project(project_id: impl Into<DocId>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            ..Default::default()
        }
    }

    /// Correlation pointing at an issue within a project.
    pub fn issue(project_id: impl Into<DocId>, issue_id: impl Into<DocId>) -> Self {
        Self {
            project_id: Some(project_id.into()),
            issue_id: Some(issue_id.into()),
            ..Default::default()
        }
    }

    /// Correlation pointing at a todo within an issue.
    pub fn todo(
        project_id: impl Into<DocId>,
        issue_id: impl Into<DocId>,
        todo_id: impl Into<DocId>,
    ) -> Self {
        Self {
            project_id: Some(project_id.into()),
            issue_id: Some(issue_id.into()),
            todo_id: Some(todo_id.into()),
        }
    }
}
