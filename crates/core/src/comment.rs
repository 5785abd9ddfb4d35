//! Comment and reply entity models.

use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::{DocId, Timestamp, UserId};

/// Maximum length of comment/reply content in characters.
pub const MAX_CONTENT_LENGTH: usize = 10_000;

/// Denormalized author snapshot embedded in comments and replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Author {
    pub id: UserId,
    pub display_name: String,
}

/// A comment document under `{root}/{projectId}/comments/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: DocId,
    pub author: Author,
    pub content: String,
    pub created_at: Timestamp,
    /// Member ids resolved from `@mentions` at post time.
    #[serde(default)]
    pub mentions: Vec<UserId>,
    /// Ids of members who liked this comment.
    #[serde(default)]
    pub likes: Vec<UserId>,
}

impl Comment {
    /// Toggle `uid` in the like set: add if absent, remove if present.
    pub fn toggle_like(&mut self, uid: &str) {
        if let Some(pos) = self.likes.iter().position(|l| l == uid) {
            self.likes.remove(pos);
        } else {
            self.likes.push(uid.to_string());
        }
    }
}

/// A reply document under `{root}/{projectId}/comments/{commentId}/replies/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: DocId,
    pub author: Author,
    pub content: String,
    pub created_at: Timestamp,
}

/// Validate comment/reply content: non-empty and within the length limit.
pub fn validate_content(content: &str) -> Result<(), CoreError> {
    if content.trim().is_empty() {
        return Err(CoreError::Validation(
            "Content cannot be empty".to_string(),
        ));
    }
    if content.chars().count() > MAX_CONTENT_LENGTH {
        return Err(CoreError::Validation(format!(
            "Content exceeds maximum length of {MAX_CONTENT_LENGTH} characters"
        )));
    }
    Ok(())
}
