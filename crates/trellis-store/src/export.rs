//! Export of a graph into a foreign RDF representation
//!
//! A converter implements [`GraphBuilder`] for its target library and hands
//! it to [`export`], which walks the store once and translates every term.

use crate::graph::GraphStore;
use std::collections::HashMap;
use trellis_domain::{BlankId, Literal, Term};

/// Target of a graph export
///
/// Implementations translate each term variant into the foreign library's
/// node type and accumulate triples. `finish` yields the built graph.
pub trait GraphBuilder {
    /// Foreign node type (IRI, blank node or literal)
    type Node: Clone;
    /// Foreign graph type
    type Output;
    /// Error raised by the foreign library
    type Error;

    /// Create an IRI node
    fn iri(&mut self, iri: &str) -> Result<Self::Node, Self::Error>;

    /// Create a new, distinct blank node
    fn blank(&mut self) -> Result<Self::Node, Self::Error>;

    /// Create a literal node
    fn literal(&mut self, literal: &Literal) -> Result<Self::Node, Self::Error>;

    /// Add one triple
    fn add(&mut self, subject: Self::Node, predicate: Self::Node, object: Self::Node) -> Result<(), Self::Error>;

    /// Finish and return the foreign graph
    fn finish(self) -> Result<Self::Output, Self::Error>;
}

/// Translate every triple of `graph` through `builder`
///
/// Within one call, every occurrence of a blank node id maps to the same
/// foreign blank node.
pub fn export<B: GraphBuilder>(graph: &GraphStore, mut builder: B) -> Result<B::Output, B::Error> {
    let mut blanks: HashMap<BlankId, B::Node> = HashMap::new();

    for triple in graph.iter() {
        let subject = node(&mut builder, &mut blanks, triple.subject())?;
        let predicate = builder.iri(triple.predicate().as_str())?;
        let object = node(&mut builder, &mut blanks, triple.object())?;
        builder.add(subject, predicate, object)?;
    }

    builder.finish()
}

fn node<B: GraphBuilder>(
    builder: &mut B,
    blanks: &mut HashMap<BlankId, B::Node>,
    term: &Term,
) -> Result<B::Node, B::Error> {
    match term {
        Term::Iri(iri) => builder.iri(iri.as_str()),
        Term::Literal(literal) => builder.literal(literal),
        Term::BlankNode(id) => {
            if let Some(existing) = blanks.get(id) {
                return Ok(existing.clone());
            }
            let fresh = builder.blank()?;
            blanks.insert(id.clone(), fresh.clone());
            Ok(fresh)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_domain::{Iri, Triple};

    #[derive(Debug, Clone, PartialEq)]
    enum Node {
        Named(String),
        Anon(usize),
        Value(String),
    }

    #[derive(Default)]
    struct Recorder {
        next_blank: usize,
        triples: Vec<(Node, Node, Node)>,
    }

    impl GraphBuilder for Recorder {
        type Node = Node;
        type Output = Vec<(Node, Node, Node)>;
        type Error = String;

        fn iri(&mut self, iri: &str) -> Result<Node, String> {
            Ok(Node::Named(iri.to_string()))
        }

        fn blank(&mut self) -> Result<Node, String> {
            self.next_blank += 1;
            Ok(Node::Anon(self.next_blank))
        }

        fn literal(&mut self, literal: &Literal) -> Result<Node, String> {
            Ok(Node::Value(literal.lexical().to_string()))
        }

        fn add(&mut self, s: Node, p: Node, o: Node) -> Result<(), String> {
            self.triples.push((s, p, o));
            Ok(())
        }

        fn finish(self) -> Result<Self::Output, String> {
            Ok(self.triples)
        }
    }

    #[test]
    fn test_blank_identity_preserved() {
        let b = Term::blank("addr").unwrap();
        let p = Iri::parse("http://example.org/p").unwrap();
        let mut graph = GraphStore::new();
        graph.insert(Triple::from_parts(Term::iri("http://example.org/x").unwrap(), p.clone(), b.clone()).unwrap());
        graph.insert(Triple::from_parts(b.clone(), p.clone(), Term::string("Oslo")).unwrap());
        graph.insert(Triple::from_parts(Term::blank("other").unwrap(), p, Term::string("Bergen")).unwrap());

        let out = export(&graph, Recorder::default()).unwrap();
        assert_eq!(out.len(), 3);
        assert_eq!(out[0].2, out[1].0);
        assert_ne!(out[1].0, out[2].0);
        assert_eq!(out[1].2, Node::Value("Oslo".into()));
    }
}
