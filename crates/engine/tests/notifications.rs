//! Integration tests for notification fan-out, reminder deduplication, and
//! the comment/issue services' mention wiring.

mod common;

use std::sync::Arc;

use assert_matches::assert_matches;
use async_trait::async_trait;
use chrono::{Duration, TimeZone, Utc};
use common::{author, FixedRoster};
use lattice_core::comment::{Comment, Reply};
use lattice_core::issue::{Issue, IssueStatus, Priority, UNASSIGNED};
use lattice_core::notification::{Correlation, Notification};
use lattice_core::todo::Todo;
use lattice_core::types::Fields;
use lattice_core::{CoreError, Member, RosterLookup};
use lattice_engine::{
    CommentService, DueDateReminder, EngineConfig, EngineError, IssueService, NotificationEmitter,
};
use lattice_store::{Document, DocumentStore, Filter, MemoryStore, StoreError, WriteBatch};
use tokio_util::sync::CancellationToken;

async fn notifications(store: &MemoryStore) -> Vec<Notification> {
    store
        .list_children("notifications")
        .await
        .unwrap()
        .iter()
        .map(|doc| doc.decode().unwrap())
        .collect()
}

// ---------------------------------------------------------------------------
// Emitter fan-out
// ---------------------------------------------------------------------------

#[tokio::test]
async fn fan_out_writes_one_unread_document_per_recipient() {
    let store = MemoryStore::new();
    let emitter = NotificationEmitter::new(Arc::new(store.clone()));

    let report = emitter
        .emit(
            &["u1".into(), "u2".into(), "u3".into()],
            "u9",
            "Release shipped",
            &Correlation::project("p1"),
            Utc::now(),
        )
        .await;

    assert_eq!(report.delivered, 3);
    assert!(report.is_complete());

    let all = notifications(&store).await;
    assert_eq!(all.len(), 3);
    for n in &all {
        assert_eq!(n.recipients.len(), 1);
        assert!(!n.read);
        assert!(!n.hidden);
        assert_eq!(n.project_id.as_deref(), Some("p1"));
    }
}

#[tokio::test]
async fn fan_out_excludes_the_actor_and_collapses_duplicates() {
    let store = MemoryStore::new();
    let emitter = NotificationEmitter::new(Arc::new(store.clone()));

    let report = emitter
        .emit(
            &["u1".into(), "u1".into(), "u9".into()],
            "u9",
            "hi",
            &Correlation::default(),
            Utc::now(),
        )
        .await;
    assert_eq!(report.delivered, 1);
    assert_eq!(notifications(&store).await.len(), 1);
}

#[tokio::test]
async fn fan_out_with_no_recipients_left_is_a_no_op() {
    let store = MemoryStore::new();
    let emitter = NotificationEmitter::new(Arc::new(store.clone()));

    let report = emitter
        .emit(
            &["u9".into()],
            "u9",
            "hi",
            &Correlation::default(),
            Utc::now(),
        )
        .await;
    assert_eq!(report.delivered, 0);
    assert!(store.is_empty().await);
}

// ---------------------------------------------------------------------------
// Per-recipient failure isolation
// ---------------------------------------------------------------------------

/// Store wrapper that rejects notification writes targeting one recipient.
struct RejectingStore {
    inner: MemoryStore,
    rejected_recipient: String,
}

#[async_trait]
impl DocumentStore for RejectingStore {
    async fn get(&self, path: &str) -> Result<Option<Document>, StoreError> {
        self.inner.get(path).await
    }

    async fn set(&self, path: &str, fields: Fields) -> Result<(), StoreError> {
        let targets_rejected = fields
            .get("recipients")
            .and_then(|r| r.as_array())
            .is_some_and(|arr| arr.iter().any(|v| *v == self.rejected_recipient.as_str()));
        if targets_rejected {
            return Err(StoreError::Backend("write rejected".to_string()));
        }
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
        self.inner.batch()
    }

    fn max_batch_ops(&self) -> usize {
        self.inner.max_batch_ops()
    }
}

#[tokio::test]
async fn one_failed_recipient_does_not_block_the_others() {
    let memory = MemoryStore::new();
    let store = RejectingStore {
        inner: memory.clone(),
        rejected_recipient: "u2".to_string(),
    };
    let emitter = NotificationEmitter::new(Arc::new(store));

    let report = emitter
        .emit(
            &["u1".into(), "u2".into(), "u3".into()],
            "u9",
            "hi",
            &Correlation::default(),
            Utc::now(),
        )
        .await;

    assert_eq!(report.delivered, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].recipient, "u2");
    assert_eq!(notifications(&memory).await.len(), 2);
    assert_matches!(report.into_result(), Err(EngineError::Fanout(_)));
}

// ---------------------------------------------------------------------------
// Reminder deduplication
// ---------------------------------------------------------------------------

fn seeded_todo(id: &str, assignee: &str, due: chrono::DateTime<Utc>, completed: bool) -> Todo {
    Todo {
        id: id.into(),
        title: "Ship the release".into(),
        assignee: assignee.into(),
        due_date: Some(due),
        completed,
        completed_at: completed.then(|| due),
        project_title: "Roadmap".into(),
        issue_title: "Release".into(),
        color: String::new(),
    }
}

#[tokio::test]
async fn reminder_pass_emits_once_per_window() {
    let store = MemoryStore::new();
    common::seed_project(&store, "p1", 1, 0, 0, 0).await;
    let noon = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
    store
        .set(
            "projects/p1/issues/i0/todos/t1",
            lattice_store::client::encode(&seeded_todo("t1", "u2", noon, false)).unwrap(),
        )
        .await
        .unwrap();

    let reminder = DueDateReminder::new(Arc::new(store.clone()), EngineConfig::default());

    let first = reminder.run_once(noon).await.unwrap();
    assert_eq!(first.examined, 1);
    assert_eq!(first.emitted, 1);
    assert_eq!(first.duplicates, 0);

    // Second poll in the same window is suppressed by the dedup query.
    let second = reminder.run_once(noon + Duration::hours(2)).await.unwrap();
    assert_eq!(second.emitted, 0);
    assert_eq!(second.duplicates, 1);

    let all = notifications(&store).await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].recipients, vec!["u2"]);
    assert_eq!(all[0].todo_id.as_deref(), Some("t1"));
}

#[tokio::test]
async fn reminder_skips_completed_and_unassigned_todos() {
    let store = MemoryStore::new();
    common::seed_project(&store, "p1", 1, 0, 0, 0).await;
    let noon = Utc.with_ymd_and_hms(2026, 8, 25, 12, 0, 0).unwrap();
    store
        .set(
            "projects/p1/issues/i0/todos/t1",
            lattice_store::client::encode(&seeded_todo("t1", "u2", noon, true)).unwrap(),
        )
        .await
        .unwrap();
    store
        .set(
            "projects/p1/issues/i0/todos/t2",
            lattice_store::client::encode(&seeded_todo("t2", UNASSIGNED, noon, false)).unwrap(),
        )
        .await
        .unwrap();

    let reminder = DueDateReminder::new(Arc::new(store.clone()), EngineConfig::default());
    let report = reminder.run_once(noon).await.unwrap();
    assert_eq!(report.examined, 0);
    assert_eq!(report.emitted, 0);
    assert!(store.list_children("notifications").await.unwrap().is_empty());
}

// ---------------------------------------------------------------------------
// Comment service
// ---------------------------------------------------------------------------

fn comment_service(store: &MemoryStore) -> CommentService {
    CommentService::new(
        Arc::new(store.clone()),
        Arc::new(FixedRoster::standard()),
    )
}

#[tokio::test]
async fn post_comment_resolves_mentions_and_notifies() {
    let store = MemoryStore::new();
    let service = comment_service(&store);

    let (comment, report) = service
        .post_comment("p1", &author("u1", "Alice"), "hello @Bob and @All")
        .await
        .unwrap();

    // Bob by name plus broadcast-minus-actor → {u2, u3}.
    assert_eq!(comment.mentions, vec!["u2", "u3"]);
    assert_eq!(report.delivered, 2);

    let stored: Comment = store
        .get(&format!("projects/p1/comments/{}", comment.id))
        .await
        .unwrap()
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(stored, comment);

    let all = notifications(&store).await;
    assert_eq!(all.len(), 2);
    for n in &all {
        assert_ne!(n.recipients, vec!["u1"]);
        assert!(n.message.starts_with("Alice mentioned you"));
        // The snippet is the content with mention tokens stripped.
        assert!(n.message.contains("hello  and"));
    }
}

#[tokio::test]
async fn post_comment_without_mentions_notifies_nobody() {
    let store = MemoryStore::new();
    let service = comment_service(&store);

    let (_, report) = service
        .post_comment("p1", &author("u1", "Alice"), "no mentions here")
        .await
        .unwrap();
    assert_eq!(report.delivered, 0);
    assert!(store.list_children("notifications").await.unwrap().is_empty());
}

#[tokio::test]
async fn post_comment_rejects_empty_content() {
    let store = MemoryStore::new();
    let service = comment_service(&store);

    let err = service
        .post_comment("p1", &author("u1", "Alice"), "   ")
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
    assert!(store.is_empty().await);
}

/// Roster lookup that always fails, simulating an unreachable directory.
struct UnavailableRoster;

#[async_trait]
impl RosterLookup for UnavailableRoster {
    async fn roster(&self, _project_id: &str) -> Result<Vec<Member>, CoreError> {
        Err(CoreError::Internal("directory unreachable".to_string()))
    }
}

#[tokio::test]
async fn roster_failure_degrades_to_a_mention_free_post() {
    let store = MemoryStore::new();
    let service = CommentService::new(Arc::new(store.clone()), Arc::new(UnavailableRoster));

    // The post still succeeds; only the mention side effect is lost.
    let (comment, report) = service
        .post_comment("p1", &author("u1", "Alice"), "hello @Bob")
        .await
        .unwrap();

    assert!(comment.mentions.is_empty());
    assert_eq!(report.delivered, 0);
    assert!(report.roster_error.is_some());
    assert!(!report.is_complete());
    assert_matches!(report.into_result(), Err(EngineError::Fanout(_)));

    let stored: Comment = store
        .get(&format!("projects/p1/comments/{}", comment.id))
        .await
        .unwrap()
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(stored, comment);
    assert!(store.list_children("notifications").await.unwrap().is_empty());
}

#[tokio::test]
async fn post_reply_notifies_the_comment_author() {
    let store = MemoryStore::new();
    let service = comment_service(&store);

    let (comment, _) = service
        .post_comment("p1", &author("u1", "Alice"), "thoughts?")
        .await
        .unwrap();
    let (reply, report) = service
        .post_reply("p1", &comment.id, &author("u2", "Bob"), "agreed")
        .await
        .unwrap();

    assert_eq!(report.delivered, 1);
    let stored: Reply = store
        .get(&format!(
            "projects/p1/comments/{}/replies/{}",
            comment.id, reply.id
        ))
        .await
        .unwrap()
        .unwrap()
        .decode()
        .unwrap();
    assert_eq!(stored, reply);

    let all = notifications(&store).await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].recipients, vec!["u1"]);
}

#[tokio::test]
async fn replying_to_your_own_comment_stays_silent() {
    let store = MemoryStore::new();
    let service = comment_service(&store);

    let (comment, _) = service
        .post_comment("p1", &author("u1", "Alice"), "note to self")
        .await
        .unwrap();
    let (_, report) = service
        .post_reply("p1", &comment.id, &author("u1", "Alice"), "follow-up")
        .await
        .unwrap();

    assert_eq!(report.delivered, 0);
    assert!(store.list_children("notifications").await.unwrap().is_empty());
}

#[tokio::test]
async fn delete_comment_cascades_to_replies() {
    let store = MemoryStore::new();
    let service = comment_service(&store);

    let (comment, _) = service
        .post_comment("p1", &author("u1", "Alice"), "thread root")
        .await
        .unwrap();
    for _ in 0..3 {
        service
            .post_reply("p1", &comment.id, &author("u2", "Bob"), "reply")
            .await
            .unwrap();
    }

    let removed = service
        .delete_comment("p1", &comment.id, &CancellationToken::new())
        .await
        .unwrap();
    assert_eq!(removed, 4);
    assert!(store
        .get(&format!("projects/p1/comments/{}", comment.id))
        .await
        .unwrap()
        .is_none());
    assert!(store
        .list_children(&format!("projects/p1/comments/{}/replies", comment.id))
        .await
        .unwrap()
        .is_empty());
}

// ---------------------------------------------------------------------------
// Issue service
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_issue_writes_atomically_and_notifies_real_assignees() {
    let store = MemoryStore::new();
    let service = IssueService::new(Arc::new(store.clone()));

    let now = Utc::now();
    let issue = Issue {
        id: "i1".into(),
        title: "Fix login".into(),
        memo: String::new(),
        status: IssueStatus::NotStarted,
        priority: Priority::High,
        start_date: None,
        due_date: None,
        assignees: vec!["u2".into(), UNASSIGNED.into(), "u1".into()],
        color: String::new(),
        created_at: now,
        updated_at: now,
    };
    let todos = vec![
        seeded_todo("t1", "u2", now, false),
        seeded_todo("t2", "u2", now, false),
    ];

    let report = service
        .create_issue("p1", "u1", &issue, &todos, &CancellationToken::new())
        .await
        .unwrap();

    // u2 only: the sentinel is filtered and the actor u1 is excluded.
    assert_eq!(report.delivered, 1);
    let all = notifications(&store).await;
    assert_eq!(all.len(), 1);
    assert_eq!(all[0].recipients, vec!["u2"]);
    assert_eq!(all[0].issue_id.as_deref(), Some("i1"));

    assert!(store.get("projects/p1/issues/i1").await.unwrap().is_some());
    assert_eq!(
        store
            .list_children("projects/p1/issues/i1/todos")
            .await
            .unwrap()
            .len(),
        2
    );
}

#[tokio::test]
async fn create_issue_rejects_blank_title() {
    let store = MemoryStore::new();
    let service = IssueService::new(Arc::new(store.clone()));

    let now = Utc::now();
    let issue = Issue {
        id: "i1".into(),
        title: "  ".into(),
        memo: String::new(),
        status: IssueStatus::NotStarted,
        priority: Priority::Low,
        start_date: None,
        due_date: None,
        assignees: vec![],
        color: String::new(),
        created_at: now,
        updated_at: now,
    };

    let err = service
        .create_issue("p1", "u1", &issue, &[], &CancellationToken::new())
        .await
        .unwrap_err();
    assert_matches!(err, EngineError::Core(CoreError::Validation(_)));
    assert!(store.is_empty().await);
}
