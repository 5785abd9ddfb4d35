//! Issue entity model: status, priority, and assignees.

use serde::{Deserialize, Serialize};

use crate::types::{DocId, Timestamp, UserId};

/// Sentinel assignee id meaning "nobody assigned yet".
pub const UNASSIGNED: &str = "unassigned";

/// Workflow status of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum IssueStatus {
    NotStarted,
    InProgress,
    OnHold,
    Done,
}

impl Default for IssueStatus {
    fn default() -> Self {
        Self::NotStarted
    }
}

/// Priority of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl Default for Priority {
    fn default() -> Self {
        Self::Medium
    }
}

/// An issue document under `{root}/{projectId}/issues/{id}`.
///
/// Lifecycle is bound to the parent project: issues cascade on
/// archive/restore and never outlive the project in a namespace.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Issue {
    pub id: DocId,
    pub title: String,
    /// Free-text memo shown in the issue detail view.
    #[serde(default)]
    pub memo: String,
    #[serde(default)]
    pub status: IssueStatus,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub start_date: Option<Timestamp>,
    #[serde(default)]
    pub due_date: Option<Timestamp>,
    /// May be empty or contain the [`UNASSIGNED`] sentinel.
    #[serde(default)]
    pub assignees: Vec<UserId>,
    /// Inherited from the parent project for display.
    #[serde(default)]
    pub color: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Issue {
    /// Assignee ids that refer to actual members (sentinel filtered out).
    pub fn real_assignees(&self) -> impl Iterator<Item = &UserId> {
        self.assignees.iter().filter(|a| a.as_str() != UNASSIGNED)
    }
}
