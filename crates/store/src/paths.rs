//! Document path conventions.
//!
//! These strings are shared with existing data and must not drift: the
//! active tree lives under `projects/`, the archive mirror under
//! `archives/`, and notifications in a flat top-level collection. All path
//! construction goes through this module so the layout is owned in one
//! place.

/// Top-level collection for notification documents (not nested under a
/// project).
pub const NOTIFICATIONS: &str = "notifications";

/// Which tree of a project's data a path points into.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Namespace {
    /// Live data under `projects/*`.
    Active,
    /// Archived mirror under `archives/*`.
    Archive,
}

impl Namespace {
    /// Root collection name for this namespace.
    pub fn root(self) -> &'static str {
        match self {
            Self::Active => "projects",
            Self::Archive => "archives",
        }
    }

    /// The other namespace.
    pub fn other(self) -> Self {
        match self {
            Self::Active => Self::Archive,
            Self::Archive => Self::Active,
        }
    }
}

/// `{root}/{projectId}`
pub fn project_doc(ns: Namespace, project_id: &str) -> String {
    format!("{}/{project_id}", ns.root())
}

/// `{root}/{projectId}/issues`
pub fn issues_collection(ns: Namespace, project_id: &str) -> String {
    format!("{}/{project_id}/issues", ns.root())
}

/// `{root}/{projectId}/issues/{issueId}`
pub fn issue_doc(ns: Namespace, project_id: &str, issue_id: &str) -> String {
    format!("{}/{project_id}/issues/{issue_id}", ns.root())
}

/// `{root}/{projectId}/issues/{issueId}/todos`
pub fn todos_collection(ns: Namespace, project_id: &str, issue_id: &str) -> String {
    format!("{}/{project_id}/issues/{issue_id}/todos", ns.root())
}

/// `{root}/{projectId}/issues/{issueId}/todos/{todoId}`
pub fn todo_doc(ns: Namespace, project_id: &str, issue_id: &str, todo_id: &str) -> String {
    format!("{}/{project_id}/issues/{issue_id}/todos/{todo_id}", ns.root())
}

/// `{root}/{projectId}/comments`
pub fn comments_collection(ns: Namespace, project_id: &str) -> String {
    format!("{}/{project_id}/comments", ns.root())
}

/// `{root}/{projectId}/comments/{commentId}`
pub fn comment_doc(ns: Namespace, project_id: &str, comment_id: &str) -> String {
    format!("{}/{project_id}/comments/{comment_id}", ns.root())
}

/// `{root}/{projectId}/comments/{commentId}/replies`
pub fn replies_collection(ns: Namespace, project_id: &str, comment_id: &str) -> String {
    format!("{}/{project_id}/comments/{comment_id}/replies", ns.root())
}

/// `{root}/{projectId}/comments/{commentId}/replies/{replyId}`
pub fn reply_doc(ns: Namespace, project_id: &str, comment_id: &str, reply_id: &str) -> String {
    format!(
        "{}/{project_id}/comments/{comment_id}/replies/{reply_id}",
        ns.root()
    )
}

/// `notifications/{notificationId}`
pub fn notification_doc(notification_id: &str) -> String {
    format!("{NOTIFICATIONS}/{notification_id}")
}
