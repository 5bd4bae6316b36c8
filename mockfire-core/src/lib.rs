//! An in-memory emulation of a document database client.
//!
//! Application code written against the hosted client's collection/document
//! object model can run against this crate in tests without a live backend.
//!
//! This crate is the core of the mockfire project and provides:
//!
//! - **Root client** ([`store`]) - Entry point, configuration and reset hook
//! - **Collection handles** ([`collection`]) - Document lookup, creation and query entry points
//! - **Document handles** ([`document`]) - Reads, writes, merges and sub-collections
//! - **Query engine** ([`query`]) - Filtering, ordering and limiting over a collection
//! - **Snapshots** ([`snapshot`]) - Immutable read views and timestamps
//! - **Store backend abstraction** ([`backend`]) - The path-addressed tree every handle delegates to
//! - **Paths** ([`path`]) - Segment paths addressing nodes in the tree
//! - **Id generation** ([`id`]) - Pluggable generators for auto-assigned document ids
//! - **Error handling** ([`error`]) - Error taxonomy and result type
//!
//! # Example
//!
//! ```ignore
//! use mockfire::{prelude::*, memory::InMemoryStore};
//! use bson::doc;
//!
//! let client = MockFirestore::new(InMemoryStore::new());
//! let scores = client.collection("scores")?;
//!
//! for n in [3, 5, 8, 10] {
//!     scores.add(doc! { "n": n }, None)?;
//! }
//!
//! let top = scores
//!     .order_by("n", SortDirection::Descending)?
//!     .limit(2);
//! ```

#[allow(unused_extern_crates)]
extern crate self as mockfire_core;

pub mod backend;
pub mod collection;
pub mod document;
pub mod error;
pub mod evaluator;
pub mod id;
pub mod path;
pub mod query;
pub mod snapshot;
pub mod store;
