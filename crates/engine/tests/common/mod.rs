//! Shared fixtures for engine integration tests: a seeded project graph on
//! a [`MemoryStore`], a fixed roster, and a failure-injecting store wrapper
//! for partial-commit scenarios.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use lattice_core::comment::{Author, Comment, Reply};
use lattice_core::issue::{Issue, IssueStatus, Priority};
use lattice_core::project::Project;
use lattice_core::todo::Todo;
use lattice_core::types::{Fields, Timestamp};
use lattice_core::{CoreError, Member, RosterLookup};
use lattice_store::client::encode;
use lattice_store::paths::{self, Namespace};
use lattice_store::{Document, DocumentStore, Filter, MemoryStore, StoreError, WriteBatch};

/// Fixed creation timestamp so round-trip assertions are deterministic.
pub fn t0() -> Timestamp {
    Utc.with_ymd_and_hms(2026, 8, 25, 9, 0, 0).unwrap()
}

pub fn author(id: &str, name: &str) -> Author {
    Author {
        id: id.into(),
        display_name: name.into(),
    }
}

/// Seed a full project graph: `issues` issues with `todos_per_issue` todos
/// each, `comments` comments with `replies_per_comment` replies each.
pub async fn seed_project(
    store: &MemoryStore,
    project_id: &str,
    issues: usize,
    todos_per_issue: usize,
    comments: usize,
    replies_per_comment: usize,
) {
    let project = Project::new(
        project_id,
        "Roadmap",
        "u1",
        vec!["u2".into(), "u3".into()],
        t0(),
    );
    store
        .set(
            &paths::project_doc(Namespace::Active, project_id),
            encode(&project).unwrap(),
        )
        .await
        .unwrap();

    for i in 0..issues {
        let issue_id = format!("i{i}");
        let issue = Issue {
            id: issue_id.clone(),
            title: format!("Issue {i}"),
            memo: String::new(),
            status: IssueStatus::InProgress,
            priority: Priority::High,
            start_date: None,
            due_date: None,
            assignees: vec!["u2".into()],
            color: "#4F86C6".into(),
            created_at: t0(),
            updated_at: t0(),
        };
        store
            .set(
                &paths::issue_doc(Namespace::Active, project_id, &issue_id),
                encode(&issue).unwrap(),
            )
            .await
            .unwrap();

        for t in 0..todos_per_issue {
            let todo_id = format!("t{i}-{t}");
            let todo = Todo {
                id: todo_id.clone(),
                title: format!("Todo {t}"),
                assignee: "u2".into(),
                due_date: None,
                completed: false,
                completed_at: None,
                project_title: "Roadmap".into(),
                issue_title: format!("Issue {i}"),
                color: "#4F86C6".into(),
            };
            store
                .set(
                    &paths::todo_doc(Namespace::Active, project_id, &issue_id, &todo_id),
                    encode(&todo).unwrap(),
                )
                .await
                .unwrap();
        }
    }

    for c in 0..comments {
        let comment_id = format!("c{c}");
        let comment = Comment {
            id: comment_id.clone(),
            author: author("u1", "Alice"),
            content: format!("Comment {c}"),
            created_at: t0(),
            mentions: Vec::new(),
            likes: Vec::new(),
        };
        store
            .set(
                &paths::comment_doc(Namespace::Active, project_id, &comment_id),
                encode(&comment).unwrap(),
            )
            .await
            .unwrap();

        for r in 0..replies_per_comment {
            let reply_id = format!("r{c}-{r}");
            let reply = Reply {
                id: reply_id.clone(),
                author: author("u2", "Bob"),
                content: format!("Reply {r}"),
                created_at: t0(),
            };
            store
                .set(
                    &paths::reply_doc(Namespace::Active, project_id, &comment_id, &reply_id),
                    encode(&reply).unwrap(),
                )
                .await
                .unwrap();
        }
    }
}

// ---------------------------------------------------------------------------
// FixedRoster
// ---------------------------------------------------------------------------

/// Roster lookup returning the same member list for every project.
pub struct FixedRoster(pub Vec<Member>);

impl FixedRoster {
    pub fn standard() -> Self {
        Self(vec![
            Member::new("u1", "Alice"),
            Member::new("u2", "Bob"),
            Member::new("u3", "Carol"),
        ])
    }
}

#[async_trait]
impl RosterLookup for FixedRoster {
    async fn roster(&self, _project_id: &str) -> Result<Vec<Member>, CoreError> {
        Ok(self.0.clone())
    }
}

// ---------------------------------------------------------------------------
// FlakyStore
// ---------------------------------------------------------------------------

/// Store wrapper whose Nth batch commit (1-based) fails with a backend
/// error. Everything else delegates to the wrapped [`MemoryStore`].
pub struct FlakyStore {
    pub inner: MemoryStore,
    commits: Arc<AtomicUsize>,
    fail_on_commit: usize,
}

impl FlakyStore {
    pub fn failing_on_commit(inner: MemoryStore, fail_on_commit: usize) -> Self {
        Self {
            inner,
            commits: Arc::new(AtomicUsize::new(0)),
            fail_on_commit,
        }
    }
}

#[async_trait]
impl DocumentStore for FlakyStore {
    async fn get(&self, path: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, fields: Fields) -> Result<(), StoreError> {
        self.inner.set(path, fields).await
    }

    async fn delete(&self, path: &str) -> Result<(), StoreError> {
        self.inner.delete(path).await
    }

    async fn list_children(&self, collection: &str) -> Result<Vec<Document>, StoreError> {
        self.inner.list_children(collection).await
    }

    async fn query(
        &self,
        collection: &str,
        filters: &[Filter],
    ) -> Result<Vec<Document>, StoreError> {
        self.inner.query(collection, filters).await
    }

    fn batch(&self) -> Box<dyn WriteBatch> {
        Box::new(FlakyBatch {
            inner: self.inner.batch(),
            commits: Arc::clone(&self.commits),
            fail_on_commit: self.fail_on_commit,
        })
    }

    fn max_batch_ops(&self) -> usize {
        self.inner.max_batch_ops()
    }
}

struct FlakyBatch {
    inner: Box<dyn WriteBatch>,
    commits: Arc<AtomicUsize>,
    fail_on_commit: usize,
}

#[async_trait]
impl WriteBatch for FlakyBatch {
    fn set(&mut self, path: &str, fields: Fields) {
        self.inner.set(path, fields);
    }

    fn delete(&mut self, path: &str) {
        self.inner.delete(path);
    }

    fn len(&self) -> usize {
        self.inner.len()
    }

    async fn commit(self: Box<Self>) -> Result<(), StoreError> {
        let n = self.commits.fetch_add(1, Ordering::SeqCst) + 1;
        if n == self.fail_on_commit {
            return Err(StoreError::Backend("injected commit failure".to_string()));
        }
        self.inner.commit().await
    }
}
