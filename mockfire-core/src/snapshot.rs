//! Read-side views of documents.
//!
//! A [`DocumentSnapshot`] is captured when a document is read and never changes
//! afterwards, even if the underlying document is later updated or deleted.

use bson::{Bson, Document, de::deserialize_from_bson};
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::{Value, to_value};

use crate::{error::ClientResult, path::Path};

/// A wall-clock instant split into whole seconds and nanoseconds.
///
/// Mirrors the seconds/nanos shape of the hosted service's protobuf timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Timestamp {
    seconds: i64,
    nanos: u32,
}

impl Timestamp {
    pub fn new(seconds: i64, nanos: u32) -> Self {
        Self { seconds, nanos }
    }

    /// Captures the current wall-clock time.
    pub fn now() -> Self {
        Utc::now().into()
    }

    pub fn seconds(&self) -> i64 {
        self.seconds
    }

    pub fn nanos(&self) -> u32 {
        self.nanos
    }

    /// Converts to a `chrono` UTC datetime, or `None` if out of range.
    pub fn to_datetime(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_opt(self.seconds, self.nanos).single()
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self {
            seconds: datetime.timestamp(),
            nanos: datetime.timestamp_subsec_nanos(),
        }
    }
}

/// Immutable view of one document's materialized state at read time.
///
/// A snapshot of a document that was never written (or was deleted) holds an
/// empty map and reports `exists() == false`.
#[derive(Debug, Clone, PartialEq)]
pub struct DocumentSnapshot {
    path: Path,
    data: Document,
    read_time: Timestamp,
}

impl DocumentSnapshot {
    pub fn new(path: Path, data: Document, read_time: Timestamp) -> Self {
        Self { path, data, read_time }
    }

    /// The id of the document, i.e. the last segment of its path.
    pub fn id(&self) -> &str {
        self.path.last().unwrap_or_default()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Returns `true` if the document held any fields when it was read.
    pub fn exists(&self) -> bool {
        !self.data.is_empty()
    }

    /// Returns a copy of the document's fields.
    pub fn to_dict(&self) -> Document {
        self.data.clone()
    }

    /// Returns a single field, if present.
    pub fn get(&self, field: &str) -> Option<&Bson> {
        self.data.get(field)
    }

    pub fn read_time(&self) -> Timestamp {
        self.read_time
    }

    /// The creation time reported for this document.
    ///
    /// Writes are not timestamped by the store, so this is the wall-clock time
    /// at which the snapshot was read. It is not authoritative.
    pub fn create_time(&self) -> Timestamp {
        self.read_time
    }

    /// Converts the document's fields to a JSON value.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> ClientResult<Value> {
        Ok(to_value(&self.data)?)
    }

    /// Deserializes the document's fields into `T`.
    ///
    /// # Errors
    ///
    /// Returns an error if deserialization fails or the structure does not match `T`.
    pub fn deserialize<T: DeserializeOwned>(&self) -> ClientResult<T> {
        Ok(deserialize_from_bson(Bson::Document(self.data.clone()))?)
    }
}
