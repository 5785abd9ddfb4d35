//! Comment and reply actions with mention side effects.
//!
//! Posting a comment is the primary write; mention notifications are a side
//! effect. A fan-out failure therefore never fails the post: the comment is
//! stored, the failures are logged, and the report is handed back to the
//! caller alongside the comment.

use std::sync::Arc;

use chrono::Utc;
use lattice_core::comment::{validate_content, Author, Comment, Reply};
use lattice_core::mentions::{resolve_mentions, strip_mentions};
use lattice_core::notification::Correlation;
use lattice_core::RosterLookup;
use lattice_store::client::encode;
use lattice_store::paths::{self, Namespace};
use lattice_store::{DocumentStore, StoreError};
use tokio_util::sync::CancellationToken;
use uuid::Uuid;

use crate::chunk::{self, WriteOp};
use crate::error::{EngineError, Stage};
use crate::notify::{FanoutReport, NotificationEmitter};

/// Posts comments and replies on active projects and fans out mention
/// notifications.
pub struct CommentService {
    store: Arc<dyn DocumentStore>,
    roster: Arc<dyn RosterLookup>,
    emitter: NotificationEmitter,
}

impl CommentService {
    pub fn new(store: Arc<dyn DocumentStore>, roster: Arc<dyn RosterLookup>) -> Self {
        let emitter = NotificationEmitter::new(Arc::clone(&store));
        Self {
            store,
            roster,
            emitter,
        }
    }

    /// Post a comment under `projects/{project_id}`.
    ///
    /// Resolves `@mentions` against the current roster, stores the comment
    /// with the resolved ids, and notifies each mentioned member (the
    /// author is never notified, even via `@All`). A roster lookup failure
    /// does not fail the post: the comment is stored without mentions and
    /// the degradation is carried in the returned report.
    pub async fn post_comment(
        &self,
        project_id: &str,
        author: &Author,
        content: &str,
    ) -> Result<(Comment, FanoutReport), EngineError> {
        validate_content(content)?;

        let (roster, roster_error) = match self.roster.roster(project_id).await {
            Ok(roster) => (roster, None),
            Err(error) => {
                tracing::warn!(
                    project_id,
                    error = %error,
                    "Roster lookup failed; posting comment without mentions"
                );
                (Vec::new(), Some(error))
            }
        };
        let mentioned = resolve_mentions(content, &roster, &author.id);
        let now = Utc::now();

        let comment = Comment {
            id: Uuid::new_v4().to_string(),
            author: author.clone(),
            content: content.to_string(),
            created_at: now,
            mentions: mentioned.iter().cloned().collect(),
            likes: Vec::new(),
        };
        self.store
            .set(
                &paths::comment_doc(Namespace::Active, project_id, &comment.id),
                encode(&comment)?,
            )
            .await?;

        let report = if let Some(error) = roster_error {
            FanoutReport::degraded(error)
        } else {
            let recipients: Vec<_> = mentioned.into_iter().collect();
            let message = format!(
                "{} mentioned you: {}",
                author.display_name,
                strip_mentions(content)
            );
            self.emitter
                .emit(
                    &recipients,
                    &author.id,
                    &message,
                    &Correlation::project(project_id),
                    now,
                )
                .await
        };

        Ok((comment, report))
    }

    /// Post a reply under an existing comment and notify its author.
    pub async fn post_reply(
        &self,
        project_id: &str,
        comment_id: &str,
        author: &Author,
        content: &str,
    ) -> Result<(Reply, FanoutReport), EngineError> {
        validate_content(content)?;

        let parent_path = paths::comment_doc(Namespace::Active, project_id, comment_id);
        let Some(parent_doc) = self.store.get(&parent_path).await? else {
            return Err(EngineError::Store(StoreError::NotFound {
                path: parent_path,
            }));
        };
        let parent: Comment = parent_doc.decode()?;

        let now = Utc::now();
        let reply = Reply {
            id: Uuid::new_v4().to_string(),
            author: author.clone(),
            content: content.to_string(),
            created_at: now,
        };
        self.store
            .set(
                &paths::reply_doc(Namespace::Active, project_id, comment_id, &reply.id),
                encode(&reply)?,
            )
            .await?;

        let message = format!("{} replied to your comment", author.display_name);
        let report = self
            .emitter
            .emit(
                std::slice::from_ref(&parent.author.id),
                &author.id,
                &message,
                &Correlation::project(project_id),
                now,
            )
            .await;

        Ok((reply, report))
    }

    /// Delete a comment and all of its replies.
    ///
    /// The cascade goes through the chunked committer so an oversized reply
    /// list still deletes atomically per chunk. Returns the number of
    /// documents removed.
    pub async fn delete_comment(
        &self,
        project_id: &str,
        comment_id: &str,
        cancel: &CancellationToken,
    ) -> Result<usize, EngineError> {
        let mut ops = Vec::new();
        let replies = self
            .store
            .list_children(&paths::replies_collection(
                Namespace::Active,
                project_id,
                comment_id,
            ))
            .await?;
        for reply in &replies {
            ops.push(WriteOp::delete(paths::reply_doc(
                Namespace::Active,
                project_id,
                comment_id,
                &reply.id,
            )));
        }
        ops.push(WriteOp::delete(paths::comment_doc(
            Namespace::Active,
            project_id,
            comment_id,
        )));

        let removed = ops.len();
        chunk::commit_in_chunks(&*self.store, ops, cancel)
            .await
            .map_err(|e| e.into_engine(Stage::Comments))?;

        tracing::info!(project_id, comment_id, removed, "Comment deleted");
        Ok(removed)
    }
}
