//! Document id generation.
//!
//! Ids are produced through the [`IdGenerator`] trait so tests can swap the
//! random default for something predictable.

use rand::{Rng, distributions::Alphanumeric, thread_rng};
use std::{
    fmt::Debug,
    sync::atomic::{AtomicUsize, Ordering},
};

/// Length of ids produced by [`RandomIdGenerator`].
pub const AUTO_ID_LENGTH: usize = 20;

/// Source of ids for documents created without an explicit name.
pub trait IdGenerator: Send + Sync + Debug {
    fn generate(&self) -> String;
}

/// Produces random 20-character alphanumeric ids.
#[derive(Debug, Default, Clone, Copy)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn generate(&self) -> String {
        thread_rng()
            .sample_iter(&Alphanumeric)
            .take(AUTO_ID_LENGTH)
            .map(char::from)
            .collect()
    }
}

/// Produces `<prefix>0`, `<prefix>1`, ... in order.
#[derive(Debug, Default)]
pub struct SequenceIdGenerator {
    prefix: String,
    next: AtomicUsize,
}

impl SequenceIdGenerator {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self { prefix: prefix.into(), next: AtomicUsize::new(0) }
    }
}

impl IdGenerator for SequenceIdGenerator {
    fn generate(&self) -> String {
        format!("{}{}", self.prefix, self.next.fetch_add(1, Ordering::Relaxed))
    }
}
