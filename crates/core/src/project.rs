//! Project entity model.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DocId, Timestamp, UserId};

/// Maximum length of a project title in characters.
pub const MAX_TITLE_LENGTH: usize = 200;

/// A project document, root of the issues/todos and comments/replies trees.
///
/// Lives at `projects/{id}` while active and at `archives/{id}` once
/// archived. The member list is unique and always contains the creator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: DocId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Ordered, duplicate-free member ids. The creator is always present.
    pub members: Vec<UserId>,
    pub creator_id: UserId,
    #[serde(default)]
    pub due_date: Option<Timestamp>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    /// Display color, e.g. `"#4F86C6"`.
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub is_archived: bool,
}

impl Project {
    /// Create a new active project owned by `creator_id`.
    ///
    /// The creator is inserted at the head of the member list; any
    /// duplicates in `members` are dropped while preserving order.
    pub fn new(
        id: impl Into<DocId>,
        title: impl Into<String>,
        creator_id: impl Into<UserId>,
        members: Vec<UserId>,
        now: Timestamp,
    ) -> Self {
        let creator_id = creator_id.into();
        let mut unique = vec![creator_id.clone()];
        for m in members {
            if !unique.contains(&m) {
                unique.push(m);
            }
        }
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            members: unique,
            creator_id,
            due_date: None,
            created_at: now,
            updated_at: now,
            color: String::new(),
            is_archived: false,
        }
    }

    /// Add a member id, keeping the list duplicate-free.
    pub fn add_member(&mut self, uid: impl Into<UserId>) {
        let uid = uid.into();
        if !self.members.contains(&uid) {
            self.members.push(uid);
        }
    }

    /// Remove a member id. The creator cannot be removed.
    pub fn remove_member(&mut self, uid: &str) {
        self.members.retain(|m| m == &self.creator_id || m != uid);
    }
}

/// Validate a project title: non-empty and within the length limit.
pub fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation(
            "Project title cannot be empty".to_string(),
        ));
    }
    if title.chars().count() > MAX_TITLE_LENGTH {
        return Err(CoreError::Validation(format!(
            "Project title exceeds maximum length of {MAX_TITLE_LENGTH} characters"
        )));
    }
    Ok(())
}
