//! Root client: the entry point for all collection and document handles.
//!
//! [`MockFirestore`] owns a [`StoreBackend`] and the settings that handles
//! consult (id generation, missing-field policy). Handles borrow the client, so
//! they are cheap to create and never outlive it.
//!
//! # Example
//!
//! ```ignore
//! use mockfire::{prelude::*, memory::InMemoryStore};
//! use bson::doc;
//!
//! let client = MockFirestore::new(InMemoryStore::new());
//! let users = client.collection("users")?;
//! users.document("alice")?.set(doc! { "age": 30 }, false)?;
//!
//! client.reset();
//! assert!(client.collection("users")?.get()?.is_empty());
//! ```

use crate::{
    backend::StoreBackend,
    collection::CollectionReference,
    error::ClientResult,
    id::{IdGenerator, RandomIdGenerator},
    path::Path,
    query::MissingFieldPolicy,
};

/// An emulated database client bound to a specific backend implementation.
#[derive(Debug)]
pub struct MockFirestore<B: StoreBackend> {
    backend: B,
    ids: Box<dyn IdGenerator>,
    missing_fields: MissingFieldPolicy,
}

impl<B: StoreBackend> MockFirestore<B> {
    /// Creates a client with random ids and strict missing-field handling.
    pub fn new(backend: B) -> Self {
        MockFirestoreBuilder::new(backend).build()
    }

    /// Creates a builder for a client with custom settings.
    pub fn builder(backend: B) -> MockFirestoreBuilder<B> {
        MockFirestoreBuilder::new(backend)
    }

    /// Gets a handle to the top-level collection `name`, creating it empty if needed.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`](crate::error::ClientError::InvalidArgument)
    /// if `name` is not a valid path segment.
    pub fn collection<'a>(&'a self, name: &str) -> ClientResult<CollectionReference<'a, B>> {
        let path = Path::root().child(name)?;
        self.backend.ensure(&path)?;

        Ok(CollectionReference::new(self, path))
    }

    /// Lists handles to every top-level collection in native order.
    pub fn collections<'a>(&'a self) -> ClientResult<Vec<CollectionReference<'a, B>>> {
        self.backend
            .keys(&Path::root())?
            .into_iter()
            .map(|name| Path::root().child(name).map(|path| CollectionReference::new(self, path)))
            .collect()
    }

    /// Discards every collection and document.
    ///
    /// Handles obtained before the reset address paths that no longer exist
    /// until they are re-created.
    pub fn reset(&self) {
        log::debug!("resetting store");
        self.backend.clear();
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn missing_fields(&self) -> MissingFieldPolicy {
        self.missing_fields
    }

    pub(crate) fn generate_id(&self) -> String {
        self.ids.generate()
    }
}

/// Builder for constructing [`MockFirestore`] instances.
#[derive(Debug)]
pub struct MockFirestoreBuilder<B: StoreBackend> {
    backend: B,
    ids: Box<dyn IdGenerator>,
    missing_fields: MissingFieldPolicy,
}

impl<B: StoreBackend> MockFirestoreBuilder<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            ids: Box::new(RandomIdGenerator),
            missing_fields: MissingFieldPolicy::default(),
        }
    }

    /// Sets the generator used for documents created without an explicit id.
    pub fn id_generator(mut self, ids: impl IdGenerator + 'static) -> Self {
        self.ids = Box::new(ids);
        self
    }

    /// Sets how queries treat documents that lack a filtered or sorted field.
    pub fn missing_fields(mut self, policy: MissingFieldPolicy) -> Self {
        self.missing_fields = policy;
        self
    }

    pub fn build(self) -> MockFirestore<B> {
        MockFirestore {
            backend: self.backend,
            ids: self.ids,
            missing_fields: self.missing_fields,
        }
    }
}
