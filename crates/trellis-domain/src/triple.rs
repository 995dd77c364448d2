//! Triple module - the unit of output of every expansion

use crate::term::{Iri, Term};
use std::fmt;

/// Why a (subject, predicate, object) combination is not a triple
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TripleError {
    /// The subject is a literal
    #[error("literal {0} cannot be a subject")]
    LiteralSubject(Term),
    /// The predicate is not an IRI
    #[error("predicate {0} is not an IRI")]
    NonIriPredicate(Term),
}

/// A subject-predicate-object fact
///
/// The predicate is always an IRI and the subject is never a literal.
/// Triples are immutable once built; equality is structural.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Triple {
    subject: Term,
    predicate: Iri,
    object: Term,
}

impl Triple {
    /// Build a triple from three terms, checking the position rules
    pub fn new(subject: Term, predicate: Term, object: Term) -> Result<Self, TripleError> {
        if subject.is_literal() {
            return Err(TripleError::LiteralSubject(subject));
        }
        let predicate = match predicate {
            Term::Iri(iri) => iri,
            other => return Err(TripleError::NonIriPredicate(other)),
        };
        Ok(Self {
            subject,
            predicate,
            object,
        })
    }

    /// Build a triple whose predicate is already known to be an IRI
    pub fn from_parts(subject: Term, predicate: Iri, object: Term) -> Result<Self, TripleError> {
        Self::new(subject, Term::Iri(predicate), object)
    }

    /// Subject term
    pub fn subject(&self) -> &Term {
        &self.subject
    }

    /// Predicate IRI
    pub fn predicate(&self) -> &Iri {
        &self.predicate
    }

    /// Object term
    pub fn object(&self) -> &Term {
        &self.object
    }

    /// Decompose into (subject, predicate, object)
    pub fn into_parts(self) -> (Term, Iri, Term) {
        (self.subject, self.predicate, self.object)
    }
}

impl fmt::Display for Triple {
    /// One N-Triples statement, including the terminating ` .`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {} .", self.subject, self.predicate, self.object)
    }
}
