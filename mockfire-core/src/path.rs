//! Slash-free segment paths addressing nodes in the store tree.
//!
//! Paths alternate collection names and document ids: a path of odd length
//! points at a collection, a non-empty path of even length points at a document.

use std::fmt::{self, Display, Formatter};

use crate::error::{ClientError, ClientResult};

/// An ordered sequence of string segments locating a node in the store tree.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Path {
    segments: Vec<String>,
}

impl Path {
    /// The empty path, addressing the root of the tree.
    pub fn root() -> Self {
        Self { segments: Vec::new() }
    }

    /// Builds a path from segments, validating each one.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::InvalidArgument`] if a segment is empty or contains `/`.
    pub fn new<S: Into<String>>(segments: impl IntoIterator<Item = S>) -> ClientResult<Self> {
        segments
            .into_iter()
            .try_fold(Path::root(), |path, segment| path.child(segment))
    }

    /// Parses a slash-separated path such as `users/alice/posts`.
    pub fn parse(path: &str) -> ClientResult<Self> {
        Path::new(path.split('/'))
    }

    /// Returns a new path with `segment` appended.
    pub fn child(&self, segment: impl Into<String>) -> ClientResult<Path> {
        let segment = validate_segment(segment.into())?;
        let mut segments = self.segments.clone();
        segments.push(segment);

        Ok(Path { segments })
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Returns the last segment, or `None` for the root path.
    pub fn last(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// Returns the path with the final segment removed, or `None` for the root path.
    pub fn parent(&self) -> Option<Path> {
        self.split_last().map(|(parent, _)| Path { segments: parent.to_vec() })
    }

    /// Splits the path into its parent segments and its final segment.
    pub fn split_last(&self) -> Option<(&[String], &str)> {
        self.segments
            .split_last()
            .map(|(last, parent)| (parent, last.as_str()))
    }

    pub fn is_document(&self) -> bool {
        !self.segments.is_empty() && self.segments.len() % 2 == 0
    }

    pub fn is_collection(&self) -> bool {
        self.segments.len() % 2 == 1
    }
}

impl Display for Path {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.segments.join("/"))
    }
}

fn validate_segment(segment: String) -> ClientResult<String> {
    if segment.is_empty() {
        return Err(ClientError::InvalidArgument("path segment must not be empty".to_string()));
    }

    if segment.contains('/') {
        return Err(ClientError::InvalidArgument(format!(
            "path segment {segment:?} must not contain '/'"
        )));
    }

    Ok(segment)
}
