//! Trait definitions for external interactions
//!
//! These traits define the boundaries between the mapping engine and the
//! collaborators around it. Implementations live in other crates.

use crate::{Iri, Row, Term, Triple};

/// Trait for accumulating and looking up triples
///
/// Implemented by the storage layer (trellis-store). Insertion is total over
/// well-formed triples, so no operation here returns an error.
pub trait TripleStore {
    /// Insert a triple; returns `false` if it was already present
    fn insert(&mut self, triple: Triple) -> bool;

    /// Insert every triple; returns how many were new
    fn insert_all<I>(&mut self, triples: I) -> usize
    where
        I: IntoIterator<Item = Triple>,
        Self: Sized,
    {
        let mut added = 0;
        for triple in triples {
            if self.insert(triple) {
                added += 1;
            }
        }
        added
    }

    /// All triples matching the bound positions; `None` is a wildcard
    fn query(&self, subject: Option<&Term>, predicate: Option<&Iri>, object: Option<&Term>) -> Vec<Triple>;

    /// Number of distinct triples
    fn len(&self) -> usize;

    /// Whether the store holds no triples
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// A finite, restartable source of rows
///
/// Implemented by tabular adapters. Each call to `rows` starts a fresh pass.
pub trait RowSource {
    /// Start a new pass over the rows
    fn rows(&self) -> Box<dyn Iterator<Item = Row> + '_>;
}

impl RowSource for Vec<Row> {
    fn rows(&self) -> Box<dyn Iterator<Item = Row> + '_> {
        Box::new(self.iter().cloned())
    }
}

impl RowSource for [Row] {
    fn rows(&self) -> Box<dyn Iterator<Item = Row> + '_> {
        Box::new(self.iter().cloned())
    }
}
