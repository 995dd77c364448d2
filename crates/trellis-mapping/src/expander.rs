//! Instance expansion: one row against one resolved template
//!
//! Binding happens once per row. List parameters are zipped positionally and
//! the flattened patterns are emitted once per list position, with scalar
//! bindings held constant. Blank nodes come from a keyed hash over
//! (template, row identity, parameter or scoped label, list position), so
//! repeated runs over the same input produce the same graph.

use crate::coercion::coerce;
use crate::error::RowError;
use crate::types::{ExpandOptions, RowIdentity};
use std::sync::Arc;
use trellis_domain::{BlankId, Parameter, ParameterType, RawValue, Row, Term, Triple};
use trellis_templates::{PatternTerm, ResolvedTemplate};

const SEPARATOR: &[u8] = &[0x1f];

/// A parameter's value for one row
#[derive(Debug, Clone)]
enum Binding {
    /// Null or absent on an optional parameter
    Absent,
    Scalar(Term),
    /// One entry per list position; `None` for null elements
    List(Vec<Option<Term>>),
    /// Synthesized per list position
    Blank,
}

/// Expands rows against a single resolved template
#[derive(Debug, Clone)]
pub struct Expander {
    template: Arc<ResolvedTemplate>,
    options: ExpandOptions,
    fan_out: bool,
    row_base: usize,
}

impl Expander {
    /// Create an expander for one template and one set of options
    pub fn new(template: Arc<ResolvedTemplate>, options: ExpandOptions) -> Self {
        let fan_out = template.parameters.iter().any(|p| p.list && p.kind != ParameterType::Blank);
        Self {
            template,
            options,
            fan_out,
            row_base: 0,
        }
    }

    /// Offset ordinal identities by `base` when keying blank nodes
    ///
    /// Successive calls that each count rows from zero pass the number of
    /// rows already expanded, so their blank nodes stay distinct.
    pub fn with_row_base(mut self, base: usize) -> Self {
        self.row_base = base;
        self
    }

    /// The template being expanded
    pub fn template(&self) -> &ResolvedTemplate {
        &self.template
    }

    /// Expand one row into triples
    ///
    /// `ordinal` is the row's position in the source; it is the row identity
    /// unless key columns are configured. Either every triple of the row is
    /// returned or the row fails as a whole.
    pub fn expand_row(&self, ordinal: usize, row: &Row) -> Result<Vec<Triple>, RowError> {
        let identity = self.options.identify(ordinal, row);
        let bindings = self.bind(row, &identity)?;
        let positions = self.positions(&bindings, &identity)?;

        let mut triples = Vec::with_capacity(self.template.patterns.len() * positions);
        for index in 0..positions {
            for pattern in &self.template.patterns {
                if pattern
                    .guards
                    .iter()
                    .any(|&g| self.value(&bindings, g, index, &identity).is_none())
                {
                    continue;
                }

                let terms = (
                    self.resolve(&pattern.subject, &bindings, index, &identity),
                    self.resolve(&pattern.predicate, &bindings, index, &identity),
                    self.resolve(&pattern.object, &bindings, index, &identity),
                );
                let (Some(subject), Some(predicate), Some(object)) = terms else {
                    continue;
                };

                let triple = Triple::new(subject, predicate, object).map_err(|e| RowError::IllegalTriple {
                    row: identity.clone(),
                    reason: e.to_string(),
                })?;
                triples.push(triple);
            }
        }
        Ok(triples)
    }

    fn bind(&self, row: &Row, identity: &RowIdentity) -> Result<Vec<Binding>, RowError> {
        self.template
            .parameters
            .iter()
            .map(|parameter| self.bind_parameter(parameter, row.get(&parameter.name), identity))
            .collect()
    }

    fn bind_parameter(
        &self,
        parameter: &Parameter,
        value: Option<&RawValue>,
        identity: &RowIdentity,
    ) -> Result<Binding, RowError> {
        if parameter.kind == ParameterType::Blank {
            return Ok(Binding::Blank);
        }

        let value = match value {
            None | Some(RawValue::Null) if parameter.optional => return Ok(Binding::Absent),
            None | Some(RawValue::Null) => return Err(missing(parameter, identity)),
            Some(value) => value,
        };

        let language = self.options.language_tags.get(&parameter.name).map(String::as_str);
        let coercion_error = |reason: String| RowError::TypeCoercion {
            parameter: parameter.name.clone(),
            row: identity.clone(),
            declared: declared(parameter),
            reason,
        };

        match (parameter.list, value) {
            (true, RawValue::List(items)) => {
                let mut terms = Vec::with_capacity(items.len());
                for item in items {
                    if item.is_null() {
                        if !parameter.optional {
                            return Err(missing(parameter, identity));
                        }
                        terms.push(None);
                    } else {
                        terms.push(Some(coerce(item, &parameter.kind, language).map_err(coercion_error)?));
                    }
                }
                Ok(Binding::List(terms))
            }
            (true, other) => Err(coercion_error(format!("expected a list, found {}", other.kind()))),
            (false, value) => coerce(value, &parameter.kind, language)
                .map(Binding::Scalar)
                .map_err(coercion_error),
        }
    }

    /// Number of list positions to emit; 1 without list bindings
    fn positions(&self, bindings: &[Binding], identity: &RowIdentity) -> Result<usize, RowError> {
        let mut common: Option<(usize, &str)> = None;
        for (binding, parameter) in bindings.iter().zip(&self.template.parameters) {
            let Binding::List(items) = binding else {
                continue;
            };
            match common {
                None => common = Some((items.len(), parameter.name.as_str())),
                Some((len, first)) if len != items.len() => {
                    return Err(RowError::TypeCoercion {
                        parameter: parameter.name.clone(),
                        row: identity.clone(),
                        declared: declared(parameter),
                        reason: format!(
                            "list length {} does not match length {} of '{}'",
                            items.len(),
                            len,
                            first
                        ),
                    });
                }
                Some(_) => {}
            }
        }
        Ok(common.map_or(1, |(len, _)| len))
    }

    fn value(&self, bindings: &[Binding], parameter: usize, index: usize, identity: &RowIdentity) -> Option<Term> {
        match bindings.get(parameter)? {
            Binding::Absent => None,
            Binding::Scalar(term) => Some(term.clone()),
            Binding::List(items) => items.get(index).cloned().flatten(),
            Binding::Blank => {
                let name = &self.template.parameters[parameter].name;
                Some(self.blank(identity, &["param", name.as_str()], index))
            }
        }
    }

    fn resolve(&self, term: &PatternTerm, bindings: &[Binding], index: usize, identity: &RowIdentity) -> Option<Term> {
        match term {
            PatternTerm::Constant(term) => Some(term.clone()),
            PatternTerm::Variable(parameter) => self.value(bindings, *parameter, index, identity),
            PatternTerm::ScopedBlank { scope, label } => Some(self.blank(identity, &["local", scope.as_str(), label.as_str()], index)),
        }
    }

    /// Deterministic blank node for a key
    fn blank(&self, identity: &RowIdentity, parts: &[&str], index: usize) -> Term {
        let mut hasher = blake3::Hasher::new();
        hasher.update(self.template.name.as_bytes());
        hasher.update(SEPARATOR);
        hasher.update(&identity.key_bytes(self.row_base));
        for part in parts {
            hasher.update(SEPARATOR);
            hasher.update(part.as_bytes());
        }
        if self.fan_out {
            hasher.update(SEPARATOR);
            hasher.update(&(index as u64).to_le_bytes());
        }
        let digest = hasher.finalize();
        Term::BlankNode(BlankId::from_digest(&digest.as_bytes()[..16]))
    }
}

fn missing(parameter: &Parameter, identity: &RowIdentity) -> RowError {
    RowError::MissingRequiredValue {
        parameter: parameter.name.clone(),
        row: identity.clone(),
    }
}

fn declared(parameter: &Parameter) -> String {
    if parameter.list {
        format!("list<{}>", parameter.kind)
    } else {
        parameter.kind.to_string()
    }
}
