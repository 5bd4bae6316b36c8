//! Value comparison for query evaluation.
//!
//! Filters and sorts compare BSON field values through [`Comparable`]. Integers
//! stay exact; a float on either side makes the comparison go through f64.
//! Every kind has a rank so heterogeneous values can still be sorted
//! deterministically.

use std::cmp::Ordering;
use bson::{Bson, datetime::DateTime, spec::ElementType};

/// Type-erased, comparable representation of BSON values.
///
/// Kinds rank as null < bool < number < datetime < string < bytes < object id
/// < array < map. BSON types without a query semantics are kept as
/// [`Comparable::Unsupported`] and never equal anything.
#[derive(Debug)]
pub enum Comparable<'a> {
    /// Null value
    Null,
    /// Boolean value
    Bool(bool),
    /// 32 or 64 bit integer
    Int(i64),
    /// Floating point value
    Float(f64),
    /// DateTime value
    DateTime(DateTime),
    /// String value
    String(&'a str),
    /// Binary payload, compared byte-wise
    Bytes(&'a [u8]),
    /// Object id, compared by its raw bytes
    ObjectId([u8; 12]),
    /// Array of comparable values
    Array(Vec<Comparable<'a>>),
    /// Map entries in stored order
    Map(Vec<(&'a str, Comparable<'a>)>),
    /// A value of a BSON type queries cannot compare
    Unsupported(ElementType),
}

impl<'a> From<&'a Bson> for Comparable<'a> {
    fn from(bson: &'a Bson) -> Self {
        match bson {
            Bson::Null => Comparable::Null,
            Bson::Boolean(value) => Comparable::Bool(*value),
            Bson::Int32(value) => Comparable::Int(i64::from(*value)),
            Bson::Int64(value) => Comparable::Int(*value),
            Bson::Double(value) => Comparable::Float(*value),
            Bson::DateTime(value) => Comparable::DateTime(*value),
            Bson::String(value) => Comparable::String(value),
            Bson::Binary(binary) => Comparable::Bytes(&binary.bytes),
            Bson::ObjectId(oid) => Comparable::ObjectId(oid.bytes()),
            Bson::Array(arr) => Comparable::Array(
                arr
                    .iter()
                    .map(Comparable::from)
                    .collect::<Vec<_>>()
            ),
            Bson::Document(doc) => Comparable::Map(
                doc
                    .iter()
                    .map(|(k, v)| (k.as_str(), Comparable::from(v)))
                    .collect::<Vec<_>>()
            ),
            other => Comparable::Unsupported(other.element_type()),
        }
    }
}

impl<'a> Comparable<'a> {
    fn rank(&self) -> u8 {
        match self {
            Comparable::Null => 0,
            Comparable::Bool(_) => 1,
            Comparable::Int(_) | Comparable::Float(_) => 2,
            Comparable::DateTime(_) => 3,
            Comparable::String(_) => 4,
            Comparable::Bytes(_) => 5,
            Comparable::ObjectId(_) => 6,
            Comparable::Array(_) => 7,
            Comparable::Map(_) => 8,
            Comparable::Unsupported(_) => 9,
        }
    }

    /// Returns `true` if both values are of the same kind.
    pub fn same_kind(&self, other: &Self) -> bool {
        self.rank() == other.rank()
    }

    /// Returns the first BSON type in this value, nested ones included, that
    /// queries cannot compare.
    pub fn unsupported_kind(&self) -> Option<ElementType> {
        match self {
            Comparable::Unsupported(kind) => Some(*kind),
            Comparable::Array(values) => values.iter().find_map(Comparable::unsupported_kind),
            Comparable::Map(entries) => entries.iter().find_map(|(_, value)| value.unsupported_kind()),
            _ => None,
        }
    }

    fn as_f64(&self) -> Option<f64> {
        match self {
            Comparable::Int(value) => Some(*value as f64),
            Comparable::Float(value) => Some(*value),
            _ => None,
        }
    }

    /// Total order used for sorting: kind rank first, then value.
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => Ordering::Equal,
            (Comparable::Bool(a), Comparable::Bool(b)) => a.cmp(b),
            (Comparable::Int(a), Comparable::Int(b)) => a.cmp(b),
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a.cmp(b),
            (Comparable::String(a), Comparable::String(b)) => a.cmp(b),
            (Comparable::Bytes(a), Comparable::Bytes(b)) => a.cmp(b),
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a.cmp(b),
            (Comparable::Array(a), Comparable::Array(b)) => a
                .iter()
                .zip(b.iter())
                .map(|(x, y)| x.total_cmp(y))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            (Comparable::Map(a), Comparable::Map(b)) => a
                .iter()
                .zip(b.iter())
                .map(|((ka, va), (kb, vb))| ka.cmp(kb).then_with(|| va.total_cmp(vb)))
                .find(|ordering| ordering.is_ne())
                .unwrap_or_else(|| a.len().cmp(&b.len())),
            _ => match (self.as_f64(), other.as_f64()) {
                (Some(a), Some(b)) => a.total_cmp(&b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }
}

impl<'a> PartialEq for Comparable<'a> {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Comparable::Null, Comparable::Null) => true,
            (Comparable::Bool(a), Comparable::Bool(b)) => a == b,
            (Comparable::Int(a), Comparable::Int(b)) => a == b,
            (Comparable::Int(_) | Comparable::Float(_), Comparable::Int(_) | Comparable::Float(_)) => {
                self.as_f64() == other.as_f64()
            }
            (Comparable::DateTime(a), Comparable::DateTime(b)) => a == b,
            (Comparable::String(a), Comparable::String(b)) => a == b,
            (Comparable::Bytes(a), Comparable::Bytes(b)) => a == b,
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => a == b,
            (Comparable::Array(a), Comparable::Array(b)) => a == b,
            (Comparable::Map(a), Comparable::Map(b)) => a == b,
            _ => false,
        }
    }
}

impl<'a> PartialOrd for Comparable<'a> {
    /// Range comparisons are defined for booleans, numbers, datetimes, strings,
    /// bytes, object ids and arrays of those, within one kind. Null, maps and
    /// mixed kinds yield `None`.
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        match (self, other) {
            (Comparable::Bool(a), Comparable::Bool(b)) => Some(a.cmp(b)),
            (Comparable::Int(a), Comparable::Int(b)) => Some(a.cmp(b)),
            (Comparable::Int(_) | Comparable::Float(_), Comparable::Int(_) | Comparable::Float(_)) => {
                self.as_f64()?.partial_cmp(&other.as_f64()?)
            }
            (Comparable::DateTime(a), Comparable::DateTime(b)) => Some(a.cmp(b)),
            (Comparable::String(a), Comparable::String(b)) => Some(a.cmp(b)),
            (Comparable::Bytes(a), Comparable::Bytes(b)) => Some(a.cmp(b)),
            (Comparable::ObjectId(a), Comparable::ObjectId(b)) => Some(a.cmp(b)),
            (Comparable::Array(a), Comparable::Array(b)) => {
                for (x, y) in a.iter().zip(b.iter()) {
                    match x.partial_cmp(y)? {
                        Ordering::Equal => continue,
                        ordering => return Some(ordering),
                    }
                }
                Some(a.len().cmp(&b.len()))
            }
            _ => None,
        }
    }
}
