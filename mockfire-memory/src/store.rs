//! In-memory storage implementation for the emulated client.
//!
//! The whole database is one nested `bson::Document`: top-level collection
//! names map to collections, collections map ids to documents, and documents
//! map field names to values (including sub-collections).

use std::sync::Arc;
use bson::{Bson, Document};
use parking_lot::RwLock;

use mockfire_core::{
    backend::StoreBackend,
    error::{ClientError, ClientResult},
    path::Path,
};

/// In-memory tree of nested maps behind a read-write lock.
///
/// `InMemoryStore` is cloneable and uses an `Arc`-wrapped tree, so multiple
/// clones of the same instance share the same underlying data.
///
/// # Example
///
/// ```ignore
/// use mockfire_memory::InMemoryStore;
/// use mockfire_core::{backend::StoreBackend, path::Path};
/// use bson::{Bson, doc};
///
/// let store = InMemoryStore::new();
/// let users = Path::parse("users")?;
/// store.ensure(&users)?;
/// store.set(&users.child("alice")?, Bson::Document(doc! { "age": 30 }))?;
///
/// assert_eq!(store.keys(&users)?, vec!["alice".to_string()]);
/// ```
#[derive(Default, Clone, Debug)]
pub struct InMemoryStore {
    tree: Arc<RwLock<Document>>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self {
            tree: Arc::new(RwLock::new(Document::new())),
        }
    }
}

impl StoreBackend for InMemoryStore {
    fn get(&self, path: &Path) -> ClientResult<Bson> {
        log::trace!("get {path}");
        let tree = self.tree.read();

        match path.split_last() {
            Some((parent, last)) => resolve(&tree, parent)?
                .get(last)
                .cloned()
                .ok_or_else(|| ClientError::NotFound(path.to_string())),
            None => Ok(Bson::Document(tree.clone())),
        }
    }

    fn set(&self, path: &Path, value: Bson) -> ClientResult<()> {
        let (parent, last) = split_writable(path)?;
        let mut tree = self.tree.write();

        resolve_mut(&mut tree, parent)?.insert(last, value);
        log::debug!("set {path}");

        Ok(())
    }

    fn delete(&self, path: &Path) -> ClientResult<()> {
        let (parent, last) = split_writable(path)?;
        let mut tree = self.tree.write();

        if resolve_mut(&mut tree, parent)?.remove(last).is_none() {
            return Err(ClientError::NotFound(path.to_string()));
        }
        log::debug!("deleted {path}");

        Ok(())
    }

    fn ensure(&self, path: &Path) -> ClientResult<()> {
        let (parent, last) = split_writable(path)?;
        let mut tree = self.tree.write();
        let parent = resolve_mut(&mut tree, parent)?;

        if !parent.contains_key(last) {
            parent.insert(last, Document::new());
            log::debug!("materialized empty map at {path}");
        }

        Ok(())
    }

    fn merge(&self, path: &Path, fields: Document) -> ClientResult<()> {
        let mut tree = self.tree.write();
        let target = resolve_mut(&mut tree, path.segments())?;

        log::debug!("merging {} fields into {path}", fields.len());
        for (key, value) in fields {
            target.insert(key, value);
        }

        Ok(())
    }

    fn contains(&self, path: &Path) -> ClientResult<bool> {
        let (parent, last) = split_writable(path)?;
        let tree = self.tree.read();

        Ok(resolve(&tree, parent)?.contains_key(last))
    }

    fn keys(&self, path: &Path) -> ClientResult<Vec<String>> {
        let tree = self.tree.read();

        Ok(
            resolve(&tree, path.segments())?
                .keys()
                .cloned()
                .collect()
        )
    }

    fn clear(&self) {
        self.tree.write().clear();
        log::debug!("cleared store");
    }
}

fn split_writable(path: &Path) -> ClientResult<(&[String], &str)> {
    path.split_last()
        .ok_or_else(|| ClientError::InvalidArgument("the root of the store cannot be written".to_string()))
}

/// Walks `segments` down from `root`, requiring every node on the way to be a map.
fn resolve<'t>(root: &'t Document, segments: &[String]) -> ClientResult<&'t Document> {
    let mut node = root;

    for (depth, segment) in segments.iter().enumerate() {
        node = match node.get(segment) {
            Some(Bson::Document(child)) => child,
            Some(_) => return Err(not_a_map(segments, depth)),
            None => return Err(not_found(segments, depth)),
        };
    }

    Ok(node)
}

fn resolve_mut<'t>(root: &'t mut Document, segments: &[String]) -> ClientResult<&'t mut Document> {
    let mut node = root;

    for (depth, segment) in segments.iter().enumerate() {
        node = match node.get_mut(segment) {
            Some(Bson::Document(child)) => child,
            Some(_) => return Err(not_a_map(segments, depth)),
            None => return Err(not_found(segments, depth)),
        };
    }

    Ok(node)
}

fn not_found(segments: &[String], depth: usize) -> ClientError {
    ClientError::NotFound(segments[..=depth].join("/"))
}

fn not_a_map(segments: &[String], depth: usize) -> ClientError {
    ClientError::InvalidArgument(format!("{} is not a map", segments[..=depth].join("/")))
}
