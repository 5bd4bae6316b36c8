//! Collection handles.
//!
//! A [`CollectionReference`] is a lightweight `(client, path)` pair. Creating one
//! materializes an empty collection at its path, so a collection that has been
//! referenced always exists structurally, even before it holds documents.
//!
//! # Example
//!
//! ```ignore
//! use bson::doc;
//!
//! let users = client.collection("users")?;
//! let (_, alice) = users.add(doc! { "name": "Alice", "age": 30 }, "alice")?;
//! let (_, generated) = users.add(doc! { "name": "Bob", "age": 25 }, None)?;
//!
//! let adults = users.where_("age", ">=", 18)?;
//! assert_eq!(adults.len(), 2);
//! ```

use bson::{Bson, Document};

use crate::{
    backend::StoreBackend,
    document::DocumentReference,
    error::{ClientError, ClientResult},
    path::Path,
    query::{Query, SortDirection},
    snapshot::{DocumentSnapshot, Timestamp},
    store::MockFirestore,
};

/// A handle to one collection in the store tree.
#[derive(Debug)]
pub struct CollectionReference<'a, B: StoreBackend> {
    client: &'a MockFirestore<B>,
    path: Path,
}

impl<'a, B: StoreBackend> CollectionReference<'a, B> {
    /// Creates a new collection reference (internal use).
    ///
    /// Callers are responsible for materializing the collection first.
    pub(crate) fn new(client: &'a MockFirestore<B>, path: Path) -> Self {
        Self { client, path }
    }

    /// Returns the name of this collection.
    pub fn id(&self) -> &str {
        self.path.last().unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns the document owning this collection, or `None` for a top-level collection.
    pub fn parent(&self) -> Option<DocumentReference<'a, B>> {
        self.path
            .parent()
            .filter(Path::is_document)
            .map(|path| DocumentReference::new(self.client, path))
    }

    /// Gets a handle to the document `name`, or to a new randomly named document.
    ///
    /// The document is materialized as an empty map if it does not exist yet.
    /// Repeated calls with the same name address the same document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::NotFound`] if this collection no longer exists and
    /// [`ClientError::InvalidArgument`] if `name` is not a valid path segment.
    pub fn document<'n>(&self, name: impl Into<Option<&'n str>>) -> ClientResult<DocumentReference<'a, B>> {
        let name = match name.into() {
            Some(name) => name.to_string(),
            None => self.client.generate_id(),
        };
        let path = self.path.child(name)?;

        self.client
            .backend()
            .ensure(&path)?;

        Ok(DocumentReference::new(self.client, path))
    }

    /// Creates a new document holding `data`.
    ///
    /// The id is `document_id` if given, else the string or integer stored under
    /// `data["id"]`, else a generated id.
    ///
    /// # Returns
    ///
    /// The creation time and a handle to the new document.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::AlreadyExists`] if a document with that id is
    /// already present, including an empty one materialized by [`document`](Self::document).
    pub fn add<'n>(
        &self,
        data: Document,
        document_id: impl Into<Option<&'n str>>,
    ) -> ClientResult<(Timestamp, DocumentReference<'a, B>)> {
        let id = match document_id.into() {
            Some(id) => id.to_string(),
            None => match data.get("id") {
                Some(value) => id_from_field(value)?,
                None => self.client.generate_id(),
            },
        };
        let path = self.path.child(id)?;

        if self.client.backend().contains(&path)? {
            return Err(ClientError::AlreadyExists(path.to_string()));
        }

        let reference = DocumentReference::new(self.client, path);
        reference.set(data, false)?;

        Ok((Timestamp::now(), reference))
    }

    /// Returns snapshots of every document, ordered by document id.
    pub fn get(&self) -> ClientResult<Vec<DocumentSnapshot>> {
        Ok(self.query()?.get().collect())
    }

    /// Captures the collection's current documents as an unfiltered query.
    pub fn query(&self) -> ClientResult<Query> {
        let collection = self.client
            .backend()
            .get_map(&self.path)?;

        Ok(Query::from_collection(
            self.path.clone(),
            collection,
            self.client.missing_fields(),
        ))
    }

    /// Starts a query keeping the documents whose `field` satisfies `<op> value`.
    ///
    /// See [`Query::where_`].
    pub fn where_(&self, field: &str, op: &str, value: impl Into<Bson>) -> ClientResult<Query> {
        self.query()?.where_(field, op, value)
    }

    /// Starts a query sorted by `key`.
    ///
    /// See [`Query::order_by`].
    pub fn order_by(&self, key: &str, direction: SortDirection) -> ClientResult<Query> {
        self.query()?.order_by(key, direction)
    }

    /// Starts a query holding at most `limit` documents in id order.
    pub fn limit(&self, limit: usize) -> ClientResult<Query> {
        Ok(self.query()?.limit(limit))
    }

    /// Returns a handle for every document currently in the collection, in
    /// native order.
    ///
    /// `page_size` is accepted for call-site compatibility; all documents are
    /// always returned.
    pub fn list_documents(&self, page_size: Option<usize>) -> ClientResult<Vec<DocumentReference<'a, B>>> {
        if let Some(page_size) = page_size {
            log::debug!("list_documents on {} ignores page_size {page_size}", self.path);
        }

        self.client
            .backend()
            .keys(&self.path)?
            .into_iter()
            .map(|id| self.path.child(id).map(|path| DocumentReference::new(self.client, path)))
            .collect()
    }
}

impl<'a, B: StoreBackend> Clone for CollectionReference<'a, B> {
    fn clone(&self) -> Self {
        Self { client: self.client, path: self.path.clone() }
    }
}

impl<'a, B: StoreBackend> PartialEq for CollectionReference<'a, B> {
    fn eq(&self, other: &Self) -> bool {
        std::ptr::eq(self.client, other.client) && self.path == other.path
    }
}

fn id_from_field(value: &Bson) -> ClientResult<String> {
    match value {
        Bson::String(id) => Ok(id.clone()),
        Bson::Int32(id) => Ok(id.to_string()),
        Bson::Int64(id) => Ok(id.to_string()),
        other => Err(ClientError::InvalidArgument(format!(
            "document id field must be a string or integer, found {:?}",
            other.element_type()
        ))),
    }
}
