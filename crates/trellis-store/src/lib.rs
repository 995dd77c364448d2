//! Trellis Storage Layer
//!
//! In-memory, deduplicated triple storage with positional indices, plus the
//! serialized and exported forms of a graph.
//!
//! # Architecture
//!
//! - [`GraphStore`]: set semantics, subject/predicate/object indices
//! - [`ntriples`]: lossless N-Triples writing and parsing
//! - [`export`]: walk a graph into a foreign RDF library through [`GraphBuilder`]
//!
//! Nothing here is persistent; a store lives as long as the run that built it.
//!
//! # Examples
//!
//! ```
//! use trellis_domain::{Iri, Term, Triple};
//! use trellis_store::GraphStore;
//!
//! let mut store = GraphStore::new();
//! let t = Triple::from_parts(
//!     Term::iri("http://example.org/p1").unwrap(),
//!     Iri::parse("http://xmlns.com/foaf/0.1/name").unwrap(),
//!     Term::string("Alice"),
//! )
//! .unwrap();
//!
//! assert!(store.insert(t.clone()));
//! assert!(!store.insert(t));
//! assert_eq!(store.len(), 1);
//! ```

#![warn(missing_docs)]

pub mod export;
mod graph;
pub mod ntriples;

pub use export::{export, GraphBuilder};
pub use graph::GraphStore;
pub use ntriples::{parse_ntriples, parse_term, read_ntriples, to_ntriples_string, write_ntriples, NTriplesError};
