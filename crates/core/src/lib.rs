//! Domain types and pure logic for the Lattice project tracker core.
//!
//! This crate holds the data model shared by the store and engine crates
//! (projects, issues, todos, comments, notifications), the membership
//! roster abstraction, and the pure mention-resolution functions. It
//! performs no I/O.

pub mod comment;
pub mod error;
pub mod issue;
pub mod mentions;
pub mod notification;
pub mod project;
pub mod roster;
pub mod todo;
pub mod types;

pub use error::CoreError;
pub use roster::{Member, RosterLookup};
