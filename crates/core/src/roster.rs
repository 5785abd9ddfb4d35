//! Membership roster types and lookup seam.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::types::UserId;

/// A resolved project member at a point in time.
///
/// Derived data: the project document stores only member ids; a roster is
/// the result of resolving those ids against the user directory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub uid: UserId,
    pub display_name: String,
    #[serde(default)]
    pub email: String,
}

impl Member {
    /// Convenience constructor for tests and fixtures.
    pub fn new(uid: impl Into<UserId>, display_name: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            display_name: display_name.into(),
            email: String::new(),
        }
    }
}

/// Resolves a project's member id list to a roster of [`Member`]s.
///
/// Implemented by the host against its user directory and injected into the
/// engine services; no ambient global client.
#[async_trait]
pub trait RosterLookup: Send + Sync {
    /// Return the current roster for `project_id`.
    async fn roster(&self, project_id: &str) -> Result<Vec<Member>, CoreError>;
}
