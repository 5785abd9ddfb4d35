//! Document store client abstraction for the Lattice core.
//!
//! This crate defines the seam between the archival/notification engine and
//! whatever hierarchical document store the host runs against:
//!
//! - [`DocumentStore`] / [`WriteBatch`] — the client traits (get/set/delete,
//!   child listing, filtered queries, bounded atomic batches).
//! - [`Document`] and [`Filter`] — the wire-level types those traits speak.
//! - [`paths`] — the path conventions shared with existing data, preserved
//!   bit-for-bit.
//! - [`MemoryStore`] — an in-memory backend used by tests and local
//!   development.

pub mod client;
pub mod error;
pub mod memory;
pub mod paths;

pub use client::{Document, DocumentStore, Filter, WriteBatch};
pub use error::StoreError;
pub use memory::MemoryStore;
