//! Todo entity model.

use serde::{Deserialize, Serialize};

use crate::types::{DocId, Timestamp, UserId};

/// A todo document under `{root}/{projectId}/issues/{issueId}/todos/{id}`.
///
/// Invariant: `completed_at` is `Some` if and only if `completed` is true.
/// Mutate completion state through [`Todo::set_completed`] to keep the two
/// fields in sync.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: DocId,
    pub title: String,
    pub assignee: UserId,
    #[serde(default)]
    pub due_date: Option<Timestamp>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    /// Denormalized parent titles for list rendering.
    #[serde(default)]
    pub project_title: String,
    #[serde(default)]
    pub issue_title: String,
    /// Inherited from the parent project for display.
    #[serde(default)]
    pub color: String,
}

impl Todo {
    /// Flip the completion flag, keeping `completed_at` consistent.
    pub fn set_completed(&mut self, completed: bool, now: Timestamp) {
        self.completed = completed;
        self.completed_at = if completed { Some(now) } else { None };
    }

    /// Returns `true` if the completed/completedAt pair is consistent.
    pub fn is_consistent(&self) -> bool {
        self.completed == self.completed_at.is_some()
    }
}
