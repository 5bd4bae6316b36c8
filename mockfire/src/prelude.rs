//! Convenient re-exports of commonly used types from mockfire.
//!
//! ```ignore
//! use mockfire::prelude::*;
//! ```

pub use mockfire_core::{
    backend::StoreBackend,
    collection::CollectionReference,
    document::DocumentReference,
    error::{ClientError, ClientResult},
    id::{IdGenerator, RandomIdGenerator, SequenceIdGenerator},
    path::Path,
    query::{FieldOp, MissingFieldPolicy, Query, SortDirection},
    snapshot::{DocumentSnapshot, Timestamp},
    store::{MockFirestore, MockFirestoreBuilder},
};
pub use mockfire_memory::InMemoryStore;
