//! Query evaluation over a collection's documents.
//!
//! A [`Query`] is a materialized, ordered list of `(document id, fields)`
//! entries captured from a collection at construction time. Each operation
//! returns a new query built from the previous one's result, so calls compose
//! left to right and never affect the query they were called on:
//!
//! ```ignore
//! use mockfire::prelude::*;
//!
//! let top_two = client
//!     .collection("scores")?
//!     .where_("n", ">", 5)?
//!     .order_by("n", SortDirection::Descending)?
//!     .limit(2);
//!
//! for snapshot in top_two.get() {
//!     println!("{} => {:?}", snapshot.id(), snapshot.to_dict());
//! }
//! ```
//!
//! Supported comparison operators are `==`, `<`, `<=`, `>` and `>=`.
//! Anything else is rejected with [`ClientError::InvalidArgument`].

use bson::{Bson, Document};
use std::{fmt, str::FromStr};

use crate::{
    error::{ClientError, ClientResult},
    evaluator::Comparable,
    path::Path,
    snapshot::{DocumentSnapshot, Timestamp},
};

/// Sort direction for [`Query::order_by`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortDirection {
    /// Smallest values first.
    #[default]
    Ascending,
    /// Largest values first.
    Descending,
}

impl FromStr for SortDirection {
    type Err = ClientError;

    fn from_str(direction: &str) -> Result<Self, Self::Err> {
        match direction {
            "ASCENDING" => Ok(SortDirection::Ascending),
            "DESCENDING" => Ok(SortDirection::Descending),
            other => Err(ClientError::InvalidArgument(format!(
                "unsupported sort direction {other:?}"
            ))),
        }
    }
}

/// Field comparison operators accepted by [`Query::where_`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldOp {
    /// Equal to (`==`).
    Eq,
    /// Less than (`<`).
    Lt,
    /// Less than or equal to (`<=`).
    Lte,
    /// Greater than (`>`).
    Gt,
    /// Greater than or equal to (`>=`).
    Gte,
}

impl FieldOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldOp::Eq => "==",
            FieldOp::Lt => "<",
            FieldOp::Lte => "<=",
            FieldOp::Gt => ">",
            FieldOp::Gte => ">=",
        }
    }

    /// Evaluates `left <op> right`.
    ///
    /// Range operators only match values of the same kind.
    pub fn matches<'v>(&self, left: &Comparable<'v>, right: &Comparable<'v>) -> bool {
        match self {
            FieldOp::Eq => left == right,
            FieldOp::Lt => left < right,
            FieldOp::Lte => left <= right,
            FieldOp::Gt => left > right,
            FieldOp::Gte => left >= right,
        }
    }
}

impl FromStr for FieldOp {
    type Err = ClientError;

    fn from_str(op: &str) -> Result<Self, Self::Err> {
        match op {
            "==" => Ok(FieldOp::Eq),
            "<" => Ok(FieldOp::Lt),
            "<=" => Ok(FieldOp::Lte),
            ">" => Ok(FieldOp::Gt),
            ">=" => Ok(FieldOp::Gte),
            other => Err(ClientError::InvalidArgument(format!(
                "unsupported comparison operator {other:?}"
            ))),
        }
    }
}

impl fmt::Display for FieldOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How filters and sorts treat documents that lack the referenced field.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MissingFieldPolicy {
    /// Fail with [`ClientError::FieldNotFound`].
    #[default]
    Error,
    /// Leave the document out of the result.
    Skip,
}

/// An ordered, materialized view over a collection's documents.
#[derive(Debug, Clone)]
pub struct Query {
    parent: Path,
    entries: Vec<(String, Document)>,
    missing_fields: MissingFieldPolicy,
}

impl Query {
    /// Captures the documents of `collection`, ordered by document id.
    ///
    /// Entries whose value is not a map are not documents and are ignored.
    pub fn from_collection(
        parent: Path,
        collection: Document,
        missing_fields: MissingFieldPolicy,
    ) -> Self {
        let mut entries = collection
            .into_iter()
            .filter_map(|(id, value)| match value {
                Bson::Document(document) => Some((id, document)),
                _ => None,
            })
            .collect::<Vec<_>>();
        entries.sort_by(|(a, _), (b, _)| a.cmp(b));

        Self { parent, entries, missing_fields }
    }

    /// Path of the collection this query reads from.
    pub fn parent(&self) -> &Path {
        &self.parent
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keeps only the documents whose `field` satisfies `<op> value`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] for an unsupported operator or a
    /// `value` of a type queries cannot compare (decimal128, regex, timestamp
    /// and the like), and [`ClientError::FieldNotFound`] if a document lacks
    /// `field` under [`MissingFieldPolicy::Error`].
    pub fn where_(&self, field: &str, op: &str, value: impl Into<Bson>) -> ClientResult<Query> {
        let op = op.parse::<FieldOp>()?;
        let value = value.into();
        let expected = Comparable::from(&value);
        if let Some(kind) = expected.unsupported_kind() {
            return Err(ClientError::InvalidArgument(format!(
                "cannot filter {field} by a value of type {kind:?}"
            )));
        }

        let mut entries = Vec::new();
        for (id, document) in &self.entries {
            let Some(actual) = self.field(id, document, field)? else {
                continue;
            };

            if op.matches(&Comparable::from(actual), &expected) {
                entries.push((id.clone(), document.clone()));
            }
        }

        log::trace!(
            "where {field} {op} {value} on {}: {} of {} documents kept",
            self.parent,
            entries.len(),
            self.entries.len()
        );

        Ok(self.derive(entries))
    }

    /// Stable-sorts the documents by the value of `key`.
    ///
    /// Documents comparing equal keep their previous relative order, in both
    /// directions.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::FieldNotFound`] if a document lacks `key` under
    /// [`MissingFieldPolicy::Error`], and [`ClientError::InvalidArgument`] if a
    /// document holds a value of a type queries cannot compare under `key`.
    pub fn order_by(&self, key: &str, direction: SortDirection) -> ClientResult<Query> {
        let mut keyed = Vec::with_capacity(self.entries.len());
        for entry in &self.entries {
            let (id, document) = entry;
            let Some(value) = self.field(id, document, key)? else {
                continue;
            };

            let value = Comparable::from(value);
            if let Some(kind) = value.unsupported_kind() {
                return Err(ClientError::InvalidArgument(format!(
                    "cannot order {} by {key}: unsupported value type {kind:?}",
                    self.document_path(id)
                )));
            }
            keyed.push((value, entry));
        }

        keyed.sort_by(|(left, _), (right, _)| match direction {
            SortDirection::Ascending => left.total_cmp(right),
            SortDirection::Descending => right.total_cmp(left),
        });

        let entries = keyed
            .into_iter()
            .map(|(_, entry)| entry.clone())
            .collect::<Vec<_>>();

        log::trace!("order_by {key} {direction:?} on {}", self.parent);

        Ok(self.derive(entries))
    }

    /// Keeps only the first `limit` documents in the current order.
    pub fn limit(&self, limit: usize) -> Query {
        self.derive(
            self.entries
                .iter()
                .take(limit)
                .cloned()
                .collect()
        )
    }

    /// Produces a snapshot for every document in the current order.
    ///
    /// All snapshots share the read time captured when this method is called.
    /// The query itself is left intact and can be read again.
    pub fn get(&self) -> impl Iterator<Item = DocumentSnapshot> + '_ {
        let read_time = Timestamp::now();

        self.entries.iter().map(move |(id, document)| {
            DocumentSnapshot::new(self.document_path(id), document.clone(), read_time)
        })
    }

    fn derive(&self, entries: Vec<(String, Document)>) -> Query {
        Query {
            parent: self.parent.clone(),
            entries,
            missing_fields: self.missing_fields,
        }
    }

    fn field<'d>(&self, id: &str, document: &'d Document, field: &str) -> ClientResult<Option<&'d Bson>> {
        match (document.get(field), self.missing_fields) {
            (Some(value), _) => Ok(Some(value)),
            (None, MissingFieldPolicy::Skip) => Ok(None),
            (None, MissingFieldPolicy::Error) => Err(ClientError::FieldNotFound {
                field: field.to_string(),
                document: self.document_path(id).to_string(),
            }),
        }
    }

    fn document_path(&self, id: &str) -> Path {
        // Only an empty key can fail validation here.
        self.parent
            .child(id)
            .unwrap_or_else(|_| self.parent.clone())
    }
}
