//! Path-addressed storage backend abstraction.
//!
//! The emulated client keeps all of its data in a single tree of nested maps:
//! top-level collection names map to collections, collections map document ids
//! to documents, and documents map field names to values. A sub-collection is
//! just another key of a document whose value is a collection-shaped map.
//!
//! [`StoreBackend`] is the sole mutation surface for that tree. Handles in
//! [`collection`](crate::collection) and [`document`](crate::document) never
//! touch the tree directly; they translate each operation into calls on this
//! trait.
//!
//! # Examples
//!
//! ```ignore
//! use mockfire_core::{backend::StoreBackend, path::Path};
//! use bson::{doc, Bson};
//!
//! let backend = InMemoryStore::new();
//! let users = Path::parse("users")?;
//!
//! backend.ensure(&users)?;
//! backend.set(&users.child("alice")?, Bson::Document(doc! { "age": 30 }))?;
//! assert!(backend.contains(&users.child("alice")?)?);
//! ```

use bson::{Bson, Document};
use std::fmt::Debug;

use crate::{
    error::{ClientError, ClientResult},
    path::Path,
};

/// Structural operations over the path-addressed tree.
///
/// Implementations carry no query semantics. Lookups fail with
/// [`ClientError::NotFound`] when a segment is absent and with
/// [`ClientError::InvalidArgument`] when a path descends through a value that
/// is not a map.
///
/// # Thread Safety
///
/// The client is a single-caller model, but backends are required to be
/// `Send + Sync` so a client can live inside shared test fixtures.
pub trait StoreBackend: Send + Sync + Debug {
    /// Returns a copy of the value at `path`.
    ///
    /// The empty path returns the whole tree as a map.
    fn get(&self, path: &Path) -> ClientResult<Bson>;

    /// Overwrites or creates the value at `path`.
    ///
    /// Every ancestor must already exist; only the final segment is created.
    fn set(&self, path: &Path, value: Bson) -> ClientResult<()>;

    /// Removes the final segment of `path` from its parent map.
    fn delete(&self, path: &Path) -> ClientResult<()>;

    /// Materializes an empty map at `path` if nothing is stored there yet.
    ///
    /// Existing values are left untouched. The parent must exist.
    fn ensure(&self, path: &Path) -> ClientResult<()>;

    /// Shallow-merges `fields` into the map stored at `path`.
    ///
    /// Matching keys are overwritten, new keys are added and every other key is
    /// left as is. Fails with [`ClientError::NotFound`] if no map is stored at
    /// `path`.
    fn merge(&self, path: &Path, fields: Document) -> ClientResult<()>;

    /// Returns `true` if the final segment of `path` is present in its parent.
    ///
    /// The parent itself must exist.
    fn contains(&self, path: &Path) -> ClientResult<bool>;

    /// Returns the keys of the map at `path` in native iteration order.
    fn keys(&self, path: &Path) -> ClientResult<Vec<String>>;

    /// Discards the entire tree and starts over with an empty one.
    fn clear(&self);

    /// Returns a copy of the map stored at `path`.
    ///
    /// Fails with [`ClientError::InvalidArgument`] if the value is not a map.
    fn get_map(&self, path: &Path) -> ClientResult<Document> {
        match self.get(path)? {
            Bson::Document(document) => Ok(document),
            other => Err(ClientError::InvalidArgument(format!(
                "expected a map at {path}, found {:?}",
                other.element_type()
            ))),
        }
    }
}
