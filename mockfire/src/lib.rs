//! Main mockfire crate: an in-memory stand-in for a document database client.
//!
//! This crate is the primary entry point for users of mockfire. It re-exports
//! the core types from `mockfire-core` and the in-memory backend from
//! `mockfire-memory`.
//!
//! # Features
//!
//! - **Familiar object model** - Collections, documents and sub-collections addressed by path
//! - **Queries** - `where_`, `order_by` and `limit`, chained left to right
//! - **Lazy materialization** - Referencing a collection or document creates it empty
//! - **Deterministic tests** - Pluggable id generation
//!
//! # Quick Start
//!
//! ```ignore
//! use mockfire::prelude::*;
//! use bson::doc;
//!
//! let client = mockfire::in_memory();
//! let scores = client.collection("scores")?;
//!
//! for (id, n) in [("a", 3), ("b", 5), ("c", 8), ("d", 10)] {
//!     scores.add(doc! { "n": n }, id)?;
//! }
//!
//! let high = scores
//!     .where_("n", ">", 5)?
//!     .order_by("n", SortDirection::Descending)?
//!     .limit(1);
//!
//! let best = high.get().next().unwrap();
//! assert_eq!(best.id(), "d");
//!
//! // Nested collections hang off documents
//! let comments = scores.document("a")?.collection("comments")?;
//! comments.add(doc! { "text": "nice" }, None)?;
//!
//! // Start over between tests
//! client.reset();
//! ```
//!
//! # Deterministic ids
//!
//! ```ignore
//! use mockfire::{prelude::*, id::SequenceIdGenerator, memory::InMemoryStore};
//!
//! let client = MockFirestore::builder(InMemoryStore::new())
//!     .id_generator(SequenceIdGenerator::new("doc-"))
//!     .build();
//!
//! let (_, first) = client.collection("c")?.add(doc! { "x": 1 }, None)?;
//! assert_eq!(first.id(), "doc-0");
//! ```

pub mod prelude;

pub use mockfire_core::{backend, collection, document, error, evaluator, id, path, query, snapshot, store};

// Re-export BSON types for convenience
pub use bson;

/// In-memory storage backend implementations.
pub mod memory {
    pub use mockfire_memory::InMemoryStore;
}

/// A client backed by the in-memory tree.
pub type InMemoryFirestore = store::MockFirestore<memory::InMemoryStore>;

/// Creates a client over a fresh in-memory store with default settings.
pub fn in_memory() -> InMemoryFirestore {
    store::MockFirestore::new(memory::InMemoryStore::new())
}
