//! Template resolution: flattening composite templates into triple patterns
//!
//! Every template is reduced to a flat list of [`TriplePattern`]s over its
//! own parameters. Templates are resolved in post-order (callees first), so
//! inlining an instance only substitutes into an already-flattened callee;
//! each template is flattened exactly once regardless of fan-in.

use crate::error::{TemplateError, TemplateResult};
use crate::registry::ValidatedRegistry;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info};
use trellis_domain::{Argument, Instance, Parameter, Template, Term};

/// One position of a flattened triple pattern
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternTerm {
    /// A fixed term
    Constant(Term),
    /// Index into the resolved template's parameters
    Variable(usize),
    /// A body-local blank node, fresh per instantiation
    ///
    /// `scope` is the instance path from the top-level template down to the
    /// template whose body introduced the label; empty for the top level.
    ScopedBlank {
        /// Instance path (e.g. `0/2`)
        scope: String,
        /// Label as written in the template body
        label: String,
    },
}

impl PatternTerm {
    /// The parameter index, if this is a variable
    pub fn variable(&self) -> Option<usize> {
        match self {
            PatternTerm::Variable(i) => Some(*i),
            _ => None,
        }
    }
}

/// A base-triple pattern with its optionality guards
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriplePattern {
    /// Subject position
    pub subject: PatternTerm,
    /// Predicate position
    pub predicate: PatternTerm,
    /// Object position
    pub object: PatternTerm,
    /// Parameters that, when null, suppress this pattern even though they do
    /// not appear in it (required parameters of the nested templates the
    /// pattern came from)
    pub guards: Vec<usize>,
}

impl TriplePattern {
    /// Parameters referenced in any position or guard
    pub fn variables(&self) -> impl Iterator<Item = usize> + '_ {
        [&self.subject, &self.predicate, &self.object]
            .into_iter()
            .filter_map(PatternTerm::variable)
            .chain(self.guards.iter().copied())
    }
}

/// A template reduced to base-triple patterns
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTemplate {
    /// Template name
    pub name: String,
    /// Parameters of the template, indexed by [`PatternTerm::Variable`]
    pub parameters: Vec<Parameter>,
    /// Flattened body
    pub patterns: Vec<TriplePattern>,
}

impl ResolvedTemplate {
    /// Indices of list-valued parameters
    pub fn list_parameters(&self) -> Vec<usize> {
        self.parameters
            .iter()
            .enumerate()
            .filter(|(_, p)| p.list)
            .map(|(i, _)| i)
            .collect()
    }
}

/// The resolved form of every template in a validated registry
#[derive(Debug, Clone, Default)]
pub struct ResolvedTemplates {
    templates: HashMap<String, Arc<ResolvedTemplate>>,
}

impl ResolvedTemplates {
    /// Get a resolved template by name
    pub fn get(&self, name: &str) -> TemplateResult<Arc<ResolvedTemplate>> {
        let name = trellis_domain::template::normalize_template_name(name.to_string());
        self.templates
            .get(&name)
            .cloned()
            .ok_or(TemplateError::TemplateNotFound(name))
    }

    /// Number of resolved templates
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Whether nothing was resolved
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Resolved template names
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }
}

/// Flattens every template of a validated registry
pub struct Resolver<'a> {
    registry: &'a ValidatedRegistry,
    memo: HashMap<String, Arc<ResolvedTemplate>>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver over a validated registry
    pub fn new(registry: &'a ValidatedRegistry) -> Self {
        Self {
            registry,
            memo: HashMap::new(),
        }
    }

    /// Resolve every template, callees before callers
    pub fn resolve_all(mut self) -> TemplateResult<ResolvedTemplates> {
        for name in self.registry.post_order() {
            let template = self.registry.lookup(name)?;
            let resolved = self.flatten(template)?;
            debug!(
                "Resolved {} into {} pattern(s)",
                resolved.name,
                resolved.patterns.len()
            );
            self.memo.insert(name.clone(), Arc::new(resolved));
        }

        info!("Resolved {} template(s)", self.memo.len());
        Ok(ResolvedTemplates { templates: self.memo })
    }

    fn flatten(&self, template: &Template) -> TemplateResult<ResolvedTemplate> {
        let mut patterns = Vec::new();
        for (position, instance) in template.body.iter().enumerate() {
            self.inline(template, instance, position.to_string(), &mut patterns)?;
        }
        Ok(ResolvedTemplate {
            name: template.name.clone(),
            parameters: template.parameters.clone(),
            patterns,
        })
    }

    /// Inline one instance of `caller`'s body; returns the instance's value
    /// (its first argument) for use as a nested-instance argument.
    fn inline(
        &self,
        caller: &Template,
        instance: &Instance,
        path: String,
        out: &mut Vec<TriplePattern>,
    ) -> TemplateResult<Option<PatternTerm>> {
        let mut arguments = Vec::with_capacity(instance.arguments.len());
        for (index, argument) in instance.arguments.iter().enumerate() {
            let term = match argument {
                Argument::Constant(Term::BlankNode(id)) => PatternTerm::ScopedBlank {
                    scope: String::new(),
                    label: id.as_str().to_string(),
                },
                Argument::Constant(term) => PatternTerm::Constant(term.clone()),
                Argument::Variable(name) => {
                    let index = caller.parameter_index(name).ok_or_else(|| TemplateError::UnboundVariable {
                        template: caller.name.clone(),
                        variable: name.clone(),
                    })?;
                    PatternTerm::Variable(index)
                }
                Argument::Nested(nested) => self
                    .inline(caller, nested, format!("{}.{}", path, index), out)?
                    .ok_or_else(|| TemplateError::EmptyNestedInstance {
                        template: caller.name.clone(),
                        callee: nested.template.clone(),
                    })?,
            };
            arguments.push(term);
        }

        if instance.is_triple() {
            let [subject, predicate, object] = <[PatternTerm; 3]>::try_from(arguments).map_err(|found| {
                TemplateError::ArityMismatch {
                    caller: caller.name.clone(),
                    callee: instance.template.clone(),
                    expected: 3,
                    found: found.len(),
                }
            })?;
            check_constants(caller, &subject, &predicate)?;
            out.push(TriplePattern {
                subject: subject.clone(),
                predicate,
                object,
                guards: Vec::new(),
            });
            return Ok(Some(subject));
        }

        let callee = self
            .memo
            .get(&instance.template)
            .ok_or_else(|| TemplateError::TemplateNotFound(instance.template.clone()))?;

        if callee.parameters.len() != arguments.len() {
            return Err(TemplateError::ArityMismatch {
                caller: caller.name.clone(),
                callee: callee.name.clone(),
                expected: callee.parameters.len(),
                found: arguments.len(),
            });
        }

        // A null bound to a required callee parameter suppresses the whole instance.
        let instance_guards: Vec<usize> = callee
            .parameters
            .iter()
            .zip(&arguments)
            .filter(|(p, _)| !p.optional)
            .filter_map(|(_, a)| a.variable())
            .collect();

        for pattern in &callee.patterns {
            let subject = substitute(&pattern.subject, &arguments, &path);
            let predicate = substitute(&pattern.predicate, &arguments, &path);
            check_constants(caller, &subject, &predicate)?;

            let mut guards: Vec<usize> = pattern
                .guards
                .iter()
                .filter_map(|g| arguments[*g].variable())
                .chain(instance_guards.iter().copied())
                .collect();
            guards.sort_unstable();
            guards.dedup();

            out.push(TriplePattern {
                subject,
                predicate,
                object: substitute(&pattern.object, &arguments, &path),
                guards,
            });
        }

        Ok(arguments.into_iter().next())
    }
}

fn substitute(term: &PatternTerm, arguments: &[PatternTerm], path: &str) -> PatternTerm {
    match term {
        PatternTerm::Constant(t) => PatternTerm::Constant(t.clone()),
        PatternTerm::Variable(i) => arguments[*i].clone(),
        PatternTerm::ScopedBlank { scope, label } => PatternTerm::ScopedBlank {
            scope: if scope.is_empty() {
                path.to_string()
            } else {
                format!("{}/{}", path, scope)
            },
            label: label.clone(),
        },
    }
}

fn check_constants(template: &Template, subject: &PatternTerm, predicate: &PatternTerm) -> TemplateResult<()> {
    if let PatternTerm::Constant(Term::Literal(l)) = subject {
        return Err(TemplateError::IllegalConstant {
            template: template.name.clone(),
            reason: format!("literal {} cannot be a subject", l),
        });
    }
    match predicate {
        PatternTerm::Constant(Term::Iri(_)) | PatternTerm::Variable(_) => Ok(()),
        PatternTerm::Constant(other) => Err(TemplateError::IllegalConstant {
            template: template.name.clone(),
            reason: format!("predicate {} is not an IRI", other),
        }),
        PatternTerm::ScopedBlank { label, .. } => Err(TemplateError::IllegalConstant {
            template: template.name.clone(),
            reason: format!("blank node _:{} cannot be a predicate", label),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TemplateRegistry;

    fn iri(s: &str) -> Argument {
        Argument::constant(Term::iri(s).unwrap())
    }

    fn resolve(templates: Vec<Template>) -> ResolvedTemplates {
        let registry = TemplateRegistry::from_templates(templates).unwrap().validate().unwrap();
        Resolver::new(&registry).resolve_all().unwrap()
    }

    fn named(name: &str, parameters: Vec<Parameter>, body: Vec<Instance>) -> Template {
        Template::new(format!("http://example.org/{}", name), parameters, body)
    }

    #[test]
    fn test_base_template_patterns() {
        let person = named(
            "Person",
            vec![Parameter::iri("id"), Parameter::literal("name")],
            vec![Instance::triple(Argument::var("id"), iri("http://xmlns.com/foaf/0.1/name"), Argument::var("name"))],
        );
        let resolved = resolve(vec![person]);
        let person = resolved.get("http://example.org/Person").unwrap();

        assert_eq!(person.patterns.len(), 1);
        assert_eq!(person.patterns[0].subject, PatternTerm::Variable(0));
        assert_eq!(person.patterns[0].object, PatternTerm::Variable(1));
        assert!(person.patterns[0].guards.is_empty());
    }

    #[test]
    fn test_composite_substitutes_arguments() {
        let typed = named(
            "Typed",
            vec![Parameter::iri("x"), Parameter::iri("class")],
            vec![Instance::triple(
                Argument::var("x"),
                iri("http://www.w3.org/1999/02/22-rdf-syntax-ns#type"),
                Argument::var("class"),
            )],
        );
        let dog = named(
            "Dog",
            vec![Parameter::iri("d")],
            vec![Instance::new("http://example.org/Typed", vec![Argument::var("d"), iri("http://example.org/Dog")])],
        );
        let resolved = resolve(vec![dog, typed]);
        let dog = resolved.get("http://example.org/Dog").unwrap();

        assert_eq!(dog.patterns.len(), 1);
        assert_eq!(dog.patterns[0].subject, PatternTerm::Variable(0));
        assert_eq!(
            dog.patterns[0].object,
            PatternTerm::Constant(Term::iri("http://example.org/Dog").unwrap())
        );
        // `x` and `class` are required, so the instance is guarded on `d`.
        assert_eq!(dog.patterns[0].guards, vec![0]);
    }

    #[test]
    fn test_blank_nodes_scoped_per_instance() {
        let addr = named(
            "Address",
            vec![Parameter::iri("owner")],
            vec![
                Instance::triple(Argument::var("owner"), iri("http://example.org/address"), Argument::constant(Term::blank("a").unwrap())),
                Instance::triple(Argument::constant(Term::blank("a").unwrap()), iri("http://example.org/city"), Argument::constant(Term::string("Oslo"))),
            ],
        );
        let two = named(
            "TwoAddresses",
            vec![Parameter::iri("o")],
            vec![
                Instance::new("http://example.org/Address", vec![Argument::var("o")]),
                Instance::new("http://example.org/Address", vec![Argument::var("o")]),
            ],
        );
        let resolved = resolve(vec![addr, two]);

        let address = resolved.get("http://example.org/Address").unwrap();
        assert_eq!(
            address.patterns[0].object,
            PatternTerm::ScopedBlank { scope: String::new(), label: "a".into() }
        );
        assert_eq!(address.patterns[0].object, address.patterns[1].subject);

        let two = resolved.get("http://example.org/TwoAddresses").unwrap();
        assert_eq!(two.patterns.len(), 4);
        assert_eq!(
            two.patterns[0].object,
            PatternTerm::ScopedBlank { scope: "0".into(), label: "a".into() }
        );
        assert_eq!(
            two.patterns[2].object,
            PatternTerm::ScopedBlank { scope: "1".into(), label: "a".into() }
        );
    }

    #[test]
    fn test_nested_argument_yields_first_argument() {
        let named_thing = named(
            "Named",
            vec![Parameter::iri("x"), Parameter::literal("label")],
            vec![Instance::triple(Argument::var("x"), iri("http://www.w3.org/2000/01/rdf-schema#label"), Argument::var("label"))],
        );
        let link = named(
            "Link",
            vec![Parameter::iri("from"), Parameter::iri("to"), Parameter::literal("label")],
            vec![Instance::triple(
                Argument::var("from"),
                iri("http://example.org/linksTo"),
                Argument::nested(Instance::new(
                    "http://example.org/Named",
                    vec![Argument::var("to"), Argument::var("label")],
                )),
            )],
        );
        let resolved = resolve(vec![named_thing, link]);
        let link = resolved.get("http://example.org/Link").unwrap();

        assert_eq!(link.patterns.len(), 2);
        // The nested instance is emitted first, then the triple that uses its value.
        assert_eq!(link.patterns[0].subject, PatternTerm::Variable(1));
        assert_eq!(link.patterns[1].object, PatternTerm::Variable(1));
    }

    #[test]
    fn test_optional_callee_parameter_not_guarded() {
        let maybe = named(
            "Maybe",
            vec![Parameter::iri("x"), Parameter::literal("v").optional()],
            vec![Instance::triple(Argument::var("x"), iri("http://example.org/v"), Argument::var("v"))],
        );
        let outer = named(
            "Outer",
            vec![Parameter::iri("a"), Parameter::literal("b").optional()],
            vec![Instance::new("http://example.org/Maybe", vec![Argument::var("a"), Argument::var("b")])],
        );
        let resolved = resolve(vec![maybe, outer]);
        let outer = resolved.get("http://example.org/Outer").unwrap();
        assert_eq!(outer.patterns[0].guards, vec![0]);
    }

    #[test]
    fn test_literal_predicate_rejected() {
        let bad = named(
            "Bad",
            vec![Parameter::iri("x")],
            vec![Instance::triple(Argument::var("x"), Argument::constant(Term::string("p")), Argument::var("x"))],
        );
        let registry = TemplateRegistry::from_templates(vec![bad]).unwrap().validate().unwrap();
        assert!(matches!(
            Resolver::new(&registry).resolve_all(),
            Err(TemplateError::IllegalConstant { .. })
        ));
    }

    #[test]
    fn test_shared_callee_resolved_once() {
        let leaf = named(
            "Leaf",
            vec![Parameter::iri("x")],
            vec![Instance::triple(Argument::var("x"), iri("http://example.org/p"), Argument::constant(Term::string("leaf")))],
        );
        let left = named("Left", vec![Parameter::iri("x")], vec![Instance::new("http://example.org/Leaf", vec![Argument::var("x")])]);
        let right = named("Right", vec![Parameter::iri("x")], vec![Instance::new("http://example.org/Leaf", vec![Argument::var("x")])]);
        let top = named(
            "Top",
            vec![Parameter::iri("x")],
            vec![
                Instance::new("http://example.org/Left", vec![Argument::var("x")]),
                Instance::new("http://example.org/Right", vec![Argument::var("x")]),
            ],
        );
        let resolved = resolve(vec![top, left, right, leaf]);
        assert_eq!(resolved.len(), 4);
        assert_eq!(resolved.get("http://example.org/Top").unwrap().patterns.len(), 2);
    }
}
