//! In-memory deduplicated triple collection

use indexmap::IndexSet;
use std::collections::HashMap;
use std::hash::Hash;
use tracing::debug;
use trellis_domain::traits::TripleStore;
use trellis_domain::{Iri, Term, Triple};

/// Deduplicated set of triples with subject, predicate and object indices
///
/// Triples are never removed, so positions in the underlying set are stable
/// and the indices store plain offsets into it. Iteration follows insertion
/// order, which callers must not rely on for correctness.
///
/// # Thread Safety
///
/// `GraphStore` has no interior locking. Concurrent producers build private
/// stores (or triple buffers) and a single writer merges them.
#[derive(Debug, Clone, Default)]
pub struct GraphStore {
    triples: IndexSet<Triple>,
    by_subject: HashMap<Term, Vec<usize>>,
    by_predicate: HashMap<Iri, Vec<usize>>,
    by_object: HashMap<Term, Vec<usize>>,
}

impl GraphStore {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a triple; a no-op returning `false` if already present
    pub fn insert(&mut self, triple: Triple) -> bool {
        if self.triples.contains(&triple) {
            return false;
        }
        let position = self.triples.len();
        self.by_subject
            .entry(triple.subject().clone())
            .or_default()
            .push(position);
        self.by_predicate
            .entry(triple.predicate().clone())
            .or_default()
            .push(position);
        self.by_object
            .entry(triple.object().clone())
            .or_default()
            .push(position);
        self.triples.insert(triple);
        true
    }

    /// Insert every triple; returns how many were new
    pub fn insert_all<I>(&mut self, triples: I) -> usize
    where
        I: IntoIterator<Item = Triple>,
    {
        let mut added = 0;
        for triple in triples {
            if self.insert(triple) {
                added += 1;
            }
        }
        added
    }

    /// Whether the store holds this exact triple
    pub fn contains(&self, triple: &Triple) -> bool {
        self.triples.contains(triple)
    }

    /// All triples matching the bound positions; `None` is a wildcard
    ///
    /// When at least one position is bound, the smallest matching index is
    /// scanned and the remaining positions are filtered.
    pub fn query(&self, subject: Option<&Term>, predicate: Option<&Iri>, object: Option<&Term>) -> Vec<Triple> {
        let matches = |t: &Triple| {
            subject.map_or(true, |s| t.subject() == s)
                && predicate.map_or(true, |p| t.predicate() == p)
                && object.map_or(true, |o| t.object() == o)
        };

        let mut candidates: Vec<&[usize]> = Vec::with_capacity(3);
        if let Some(s) = subject {
            candidates.push(positions(&self.by_subject, s));
        }
        if let Some(p) = predicate {
            candidates.push(positions(&self.by_predicate, p));
        }
        if let Some(o) = object {
            candidates.push(positions(&self.by_object, o));
        }

        match candidates.into_iter().min_by_key(|c| c.len()) {
            Some(positions) => positions
                .iter()
                .filter_map(|&i| self.triples.get_index(i))
                .filter(|t| matches(t))
                .cloned()
                .collect(),
            None => self.triples.iter().cloned().collect(),
        }
    }

    /// Number of distinct triples
    pub fn len(&self) -> usize {
        self.triples.len()
    }

    /// Whether the store is empty
    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// Iterate over all triples; each call starts a fresh pass
    pub fn iter(&self) -> impl Iterator<Item = &Triple> + '_ {
        self.triples.iter()
    }

    /// Union another store into this one; returns how many triples were new
    pub fn merge(&mut self, other: &GraphStore) -> usize {
        let added = self.insert_all(other.iter().cloned());
        debug!("Merged {} of {} triple(s)", added, other.len());
        added
    }

    /// Union another store into this one, consuming it
    pub fn merge_owned(&mut self, other: GraphStore) -> usize {
        if self.is_empty() {
            let added = other.len();
            *self = other;
            return added;
        }
        self.insert_all(other.triples)
    }
}

fn positions<'a, K: Eq + Hash>(index: &'a HashMap<K, Vec<usize>>, key: &K) -> &'a [usize] {
    index.get(key).map(Vec::as_slice).unwrap_or_default()
}

impl TripleStore for GraphStore {
    fn insert(&mut self, triple: Triple) -> bool {
        GraphStore::insert(self, triple)
    }

    fn query(&self, subject: Option<&Term>, predicate: Option<&Iri>, object: Option<&Term>) -> Vec<Triple> {
        GraphStore::query(self, subject, predicate, object)
    }

    fn len(&self) -> usize {
        GraphStore::len(self)
    }
}

impl Extend<Triple> for GraphStore {
    fn extend<I: IntoIterator<Item = Triple>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl FromIterator<Triple> for GraphStore {
    fn from_iter<I: IntoIterator<Item = Triple>>(iter: I) -> Self {
        let mut store = GraphStore::new();
        store.insert_all(iter);
        store
    }
}

impl<'a> IntoIterator for &'a GraphStore {
    type Item = &'a Triple;
    type IntoIter = indexmap::set::Iter<'a, Triple>;

    fn into_iter(self) -> Self::IntoIter {
        self.triples.iter()
    }
}

/// Two stores are equal when they hold the same set of triples
impl PartialEq for GraphStore {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|t| other.contains(t))
    }
}

impl Eq for GraphStore {}
