//! In-memory storage backend for mockfire.
//!
//! This crate provides the [`InMemoryStore`], the path-addressed tree that
//! backs an emulated client. Nothing is persisted; the data lives exactly as
//! long as the store (and its clones).
//!
//! # Features
//!
//! - **Path-addressed tree** - Collections, documents and sub-collections are nested `bson::Document`s
//! - **Shared state** - Clones share one tree behind a read-write lock
//! - **Lazy materialization** - `ensure` creates empty placeholders on first reference
//!
//! # Quick Start
//!
//! ```ignore
//! use mockfire::{prelude::*, memory::InMemoryStore};
//! use bson::doc;
//!
//! let client = MockFirestore::new(InMemoryStore::new());
//! let users = client.collection("users")?;
//!
//! users.document("alice")?.set(doc! { "name": "Alice" }, false)?;
//! assert!(users.document("alice")?.get()?.exists());
//! ```

#[allow(unused_extern_crates)]
extern crate self as mockfire_memory;

pub mod store;

pub use store::InMemoryStore;
