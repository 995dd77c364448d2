//! Template data model
//!
//! A [`Template`] is a named, parameterized mapping rule whose body is a
//! sequence of [`Instance`]s. Instances of the primitive `ottr:Triple`
//! template emit triples directly; everything else references other
//! templates and is inlined during resolution.

use crate::term::{Iri, Term};
use crate::vocab::ottr;
use std::fmt;

/// Declared type of a parameter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParameterType {
    /// Values must coerce to an IRI
    Iri,
    /// Values become literals; an explicit datatype overrides the inferred one
    Literal(Option<Iri>),
    /// Values are ignored and a keyed blank node is synthesized
    Blank,
    /// Values become literals with the inferred datatype
    Any,
}

impl fmt::Display for ParameterType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParameterType::Iri => f.write_str("iri"),
            ParameterType::Literal(None) => f.write_str("literal"),
            ParameterType::Literal(Some(dt)) => write!(f, "literal({})", dt.as_str()),
            ParameterType::Blank => f.write_str("blank"),
            ParameterType::Any => f.write_str("any"),
        }
    }
}

/// A template-declared slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
    /// Name, unique within its template
    pub name: String,
    /// Declared type
    pub kind: ParameterType,
    /// Null values skip the affected triples instead of failing the row
    pub optional: bool,
    /// The bound value is a list and expansion fans out over it
    pub list: bool,
}

impl Parameter {
    /// A required scalar parameter
    pub fn new(name: impl Into<String>, kind: ParameterType) -> Self {
        Self {
            name: name.into(),
            kind,
            optional: false,
            list: false,
        }
    }

    /// Required scalar IRI parameter
    pub fn iri(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Iri)
    }

    /// Required scalar literal parameter with inferred datatype
    pub fn literal(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Literal(None))
    }

    /// Blank node parameter
    pub fn blank(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Blank)
    }

    /// Untyped parameter
    pub fn any(name: impl Into<String>) -> Self {
        Self::new(name, ParameterType::Any)
    }

    /// Mark the parameter optional
    pub fn optional(mut self) -> Self {
        self.optional = true;
        self
    }

    /// Mark the parameter list-valued
    pub fn list(mut self) -> Self {
        self.list = true;
        self
    }

    /// Set an explicit literal datatype
    pub fn with_datatype(mut self, datatype: Iri) -> Self {
        self.kind = ParameterType::Literal(Some(datatype));
        self
    }
}

/// A value supplied at an instance site
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Argument {
    /// A fixed term
    Constant(Term),
    /// Reference to a parameter of the enclosing template
    Variable(String),
    /// A nested instance; its value is the term bound to its first argument
    Nested(Box<Instance>),
}

impl Argument {
    /// Constant argument
    pub fn constant(term: Term) -> Self {
        Argument::Constant(term)
    }

    /// Variable argument
    pub fn var(name: impl Into<String>) -> Self {
        Argument::Variable(name.into())
    }

    /// Nested-instance argument
    pub fn nested(instance: Instance) -> Self {
        Argument::Nested(Box::new(instance))
    }
}

/// One invocation of a template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instance {
    /// Name of the referenced template
    pub template: String,
    /// Arguments, positionally matched to the callee's parameters
    pub arguments: Vec<Argument>,
}

impl Instance {
    /// Create an instance; the compact `ottr:Triple` name is normalized
    pub fn new(template: impl Into<String>, arguments: Vec<Argument>) -> Self {
        Self {
            template: normalize_template_name(template.into()),
            arguments,
        }
    }

    /// Shorthand for an `ottr:Triple` instance
    pub fn triple(subject: Argument, predicate: Argument, object: Argument) -> Self {
        Self::new(ottr::TRIPLE, vec![subject, predicate, object])
    }

    /// Whether this instance emits a triple directly
    pub fn is_triple(&self) -> bool {
        self.template == ottr::TRIPLE
    }
}

/// A named, reusable mapping rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    /// Unique name
    pub name: String,
    /// Ordered parameters
    pub parameters: Vec<Parameter>,
    /// Ordered body instances
    pub body: Vec<Instance>,
}

impl Template {
    /// Create a template
    pub fn new(name: impl Into<String>, parameters: Vec<Parameter>, body: Vec<Instance>) -> Self {
        Self {
            name: normalize_template_name(name.into()),
            parameters,
            body,
        }
    }

    /// The built-in primitive triple template
    pub fn triple_primitive() -> Self {
        Self {
            name: ottr::TRIPLE.to_string(),
            parameters: vec![
                Parameter::any("subject"),
                Parameter::iri("predicate"),
                Parameter::any("object"),
            ],
            body: Vec::new(),
        }
    }

    /// Number of parameters an instance must supply
    pub fn arity(&self) -> usize {
        self.parameters.len()
    }

    /// Position of a parameter by name
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.parameters.iter().position(|p| p.name == name)
    }

    /// A base template only contains primitive triple instances
    pub fn is_base(&self) -> bool {
        self.body.iter().all(|i| {
            i.is_triple()
                && i.arguments
                    .iter()
                    .all(|a| !matches!(a, Argument::Nested(_)))
        })
    }

    /// Names of every template referenced from the body, nested ones included
    pub fn references(&self) -> Vec<&str> {
        let mut out = Vec::new();
        for instance in &self.body {
            collect_references(instance, &mut out);
        }
        out
    }
}

fn collect_references<'a>(instance: &'a Instance, out: &mut Vec<&'a str>) {
    out.push(instance.template.as_str());
    for argument in &instance.arguments {
        if let Argument::Nested(nested) = argument {
            collect_references(nested, out);
        }
    }
}

/// Map the compact `ottr:Triple` spelling onto its full IRI
pub fn normalize_template_name(name: String) -> String {
    if name == ottr::TRIPLE_COMPACT {
        ottr::TRIPLE.to_string()
    } else {
        name
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> Template {
        Template::new(
            "http://example.org/Person",
            vec![Parameter::iri("id"), Parameter::literal("name")],
            vec![Instance::triple(
                Argument::var("id"),
                Argument::constant(Term::iri("http://xmlns.com/foaf/0.1/name").unwrap()),
                Argument::var("name"),
            )],
        )
    }

    #[test]
    fn test_compact_triple_name() {
        let i = Instance::new("ottr:Triple", vec![]);
        assert!(i.is_triple());
        assert_eq!(i.template, ottr::TRIPLE);
    }

    #[test]
    fn test_base_and_composite() {
        let base = person();
        assert!(base.is_base());
        assert_eq!(base.arity(), 2);
        assert_eq!(base.parameter_index("name"), Some(1));

        let composite = Template::new(
            "http://example.org/Team",
            vec![Parameter::iri("member")],
            vec![Instance::new(
                "http://example.org/Person",
                vec![Argument::var("member"), Argument::constant(Term::string("anon"))],
            )],
        );
        assert!(!composite.is_base());
        assert_eq!(composite.references(), vec!["http://example.org/Person"]);
    }

    #[test]
    fn test_nested_references() {
        let t = Template::new(
            "http://example.org/T",
            vec![Parameter::iri("x")],
            vec![Instance::triple(
                Argument::nested(Instance::new("http://example.org/Inner", vec![Argument::var("x")])),
                Argument::constant(Term::iri("http://example.org/p").unwrap()),
                Argument::var("x"),
            )],
        );
        assert!(!t.is_base());
        assert_eq!(t.references(), vec![ottr::TRIPLE, "http://example.org/Inner"]);
    }
}
