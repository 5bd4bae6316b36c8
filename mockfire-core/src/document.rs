//! Document handles.
//!
//! A [`DocumentReference`] addresses one document by path. Reading a document
//! that does not exist never fails; it yields a snapshot whose
//! [`exists`](crate::snapshot::DocumentSnapshot::exists) is `false`.

use bson::{Bson, Document, ser::serialize_to_bson};
use serde::Serialize;

use crate::{
    backend::StoreBackend,
    collection::CollectionReference,
    error::{ClientError, ClientResult},
    path::Path,
    snapshot::{DocumentSnapshot, Timestamp},
    store::MockFirestore,
};

/// A handle to one document in the store tree.
#[derive(Debug)]
pub struct DocumentReference<'a, B: StoreBackend> {
    client: &'a MockFirestore<B>,
    path: Path,
}

impl<'a, B: StoreBackend> DocumentReference<'a, B> {
    pub(crate) fn new(client: &'a MockFirestore<B>, path: Path) -> Self {
        Self { client, path }
    }

    /// Returns the id of this document, the last segment of its path.
    pub fn id(&self) -> &str {
        self.path.last().unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the collection holding this document.
    pub fn parent(&self) -> CollectionReference<'a, B> {
        CollectionReference::new(self.client, self.path.parent().unwrap_or_default())
    }

    /// Reads the document.
    ///
    /// A missing document yields an empty, non-existent snapshot.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] if the path runs through a value
    /// that is not a map.
    pub fn get(&self) -> ClientResult<DocumentSnapshot> {
        let data = match self.client.backend().get_map(&self.path) {
            Ok(data) => data,
            Err(ClientError::NotFound(_)) => Document::new(),
            Err(err) => return Err(err),
        };

        Ok(DocumentSnapshot::new(self.path.clone(), data, Timestamp::now()))
    }

    /// Writes `data` to the document.
    ///
    /// Without `merge` the document is replaced wholesale, which also drops any
    /// sub-collections stored under it. With `merge` this is [`update`](Self::update).
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the parent collection does not exist,
    /// or with `merge` if the document itself does not exist.
    pub fn set(&self, data: Document, merge: bool) -> ClientResult<()> {
        let backend = self.client.backend();

        if merge {
            backend.merge(&self.path, data)
        } else {
            backend.set(&self.path, Bson::Document(data))
        }
    }

    /// Serializes `value` and writes it to the document, as [`set`](Self::set) does.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Serialization`] if `value` does not serialize to a map.
    pub fn set_from<T: Serialize>(&self, value: &T, merge: bool) -> ClientResult<()> {
        match serialize_to_bson(value)? {
            Bson::Document(data) => self.set(data, merge),
            other => Err(ClientError::Serialization(format!(
                "expected a map, {:?} cannot be stored as a document",
                other.element_type()
            ))),
        }
    }

    /// Shallow-merges `data` into the existing document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the document does not exist. Unlike
    /// handle construction, updating never creates a missing document.
    pub fn update(&self, data: Document) -> ClientResult<()> {
        self.client
            .backend()
            .merge(&self.path, data)
    }

    /// Removes the document from its collection.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if the document is already absent.
    pub fn delete(&self) -> ClientResult<()> {
        self.client
            .backend()
            .delete(&self.path)
    }

    /// Gets a handle to the sub-collection `name`, creating it empty if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if this document does not exist.
    pub fn collection(&self, name: &str) -> ClientResult<CollectionReference<'a, B>> {
        let path = self.path.child(name)?;

        self.client
            .backend()
            .ensure(&path)?;

        Ok(CollectionReference::new(self.client, path))
    }
}

impl<'a, B: StoreBackend> Clone for DocumentReference<'a, B> {
    fn clone(&self) -> Self {
        Self { client: self.client, path: self.path.clone() }
    }
}

impl<'a, B: StoreBackend> PartialEq for DocumentReference<'a, B> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.client, other.client) && self.path == other.path
    }
}
