//! Archival and notification engine for the Lattice project tracker.
//!
//! The two subsystems with real design weight live here:
//!
//! - [`GraphArchiver`] / [`GraphRestorer`] — move a project's entire nested
//!   graph (issues → todos, comments → replies) between the active and
//!   archive namespaces via atomic, bounded batch chunks.
//! - [`NotificationEmitter`] plus the [`comments`], [`issues`], and
//!   [`reminder`] services — resolve `@mentions` against the project roster
//!   and fan out per-recipient notification records, with windowed
//!   deduplication for recurring due-date reminders.
//!
//! Everything is written against the `lattice-store::DocumentStore` seam;
//! collaborators are injected explicitly, never reached through globals.

pub mod archive;
pub mod chunk;
pub mod comments;
pub mod config;
pub mod error;
pub mod issues;
pub mod notify;
pub mod reminder;
mod tree;

pub use archive::{GraphArchiver, GraphRestorer, MoveReport};
pub use comments::CommentService;
pub use config::EngineConfig;
pub use error::{EngineError, Stage};
pub use issues::IssueService;
pub use notify::{FanoutReport, NotificationEmitter};
pub use reminder::{DueDateReminder, ReminderReport};
