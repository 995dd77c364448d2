//! Template documents
//!
//! A template document is a TOML file with a `[[templates]]` array. Each
//! entry names a template, declares its parameters and lists the instances
//! of its body:
//!
//! ```toml
//! [[templates]]
//! name = "http://example.org/Person"
//! parameters = [
//!   { name = "id", type = "iri" },
//!   { name = "name", type = "literal", optional = true },
//! ]
//! body = [
//!   { template = "ottr:Triple", arguments = ["$id", "<http://xmlns.com/foaf/0.1/name>", "$name"] },
//! ]
//! ```
//!
//! An argument `"$name"` refers to a parameter; any other string is a term in
//! N-Triples syntax; an inline table is a nested instance.

use crate::error::{CliError, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;
use trellis_domain::{Argument, Instance, Iri, Parameter, ParameterType, Template};
use trellis_store::parse_term;
use trellis_templates::TemplateRegistry;

/// A parsed template document
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateDocument {
    /// Templates in declaration order
    #[serde(default)]
    pub templates: Vec<TemplateDoc>,
}

/// One `[[templates]]` entry
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TemplateDoc {
    /// Template IRI
    pub name: String,
    /// Parameters in positional order
    #[serde(default)]
    pub parameters: Vec<ParameterDoc>,
    /// Instances the template expands to
    #[serde(default)]
    pub body: Vec<InstanceDoc>,
}

/// A parameter declaration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ParameterDoc {
    /// Name used as `$name` in the body and as the row column
    pub name: String,
    /// Written as `type`; defaults to `any`
    #[serde(rename = "type", default)]
    pub kind: ParameterKind,
    /// Datatype IRI, literal parameters only
    #[serde(default)]
    pub datatype: Option<String>,
    /// Null or absent values skip the instances that use the parameter
    #[serde(default)]
    pub optional: bool,
    /// Takes a list value; instances fan out once per element
    #[serde(default)]
    pub list: bool,
}

/// Declared kind of a parameter
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    /// Absolute IRI
    Iri,
    /// Literal, typed by `datatype` or by the value's kind
    Literal,
    /// Blank node minted per row
    Blank,
    /// Untyped; values become literals of their native kind
    #[default]
    Any,
}

/// A template instance in a body or as a nested argument
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InstanceDoc {
    /// IRI of the called template, or `ottr:Triple`
    pub template: String,
    /// One argument per parameter of the called template
    #[serde(default)]
    pub arguments: Vec<ArgumentDoc>,
}

/// An argument as written in the document
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ArgumentDoc {
    /// `$variable` or an N-Triples term
    Text(String),
    /// Inline nested instance
    Nested(InstanceDoc),
}

impl TemplateDocument {
    /// Parse a document from TOML text
    pub fn from_toml(toml_str: &str) -> Result<Self> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Read and parse a document file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Convert every entry to a domain template
    pub fn into_templates(self) -> Result<Vec<Template>> {
        self.templates.into_iter().map(TemplateDoc::into_template).collect()
    }

    /// Register every template of the document
    ///
    /// The registry is not yet validated; duplicate names fail here, the
    /// remaining checks happen when the registry is compiled.
    pub fn into_registry(self) -> Result<TemplateRegistry> {
        Ok(TemplateRegistry::from_templates(self.into_templates()?)?)
    }
}

impl TemplateDoc {
    fn into_template(self) -> Result<Template> {
        let parameters = self
            .parameters
            .into_iter()
            .map(|p| p.into_parameter(&self.name))
            .collect::<Result<Vec<_>>>()?;
        let body = self
            .body
            .into_iter()
            .map(|i| i.into_instance(&self.name))
            .collect::<Result<Vec<_>>>()?;
        Ok(Template::new(self.name, parameters, body))
    }
}

impl ParameterDoc {
    fn into_parameter(self, template: &str) -> Result<Parameter> {
        let kind = match (self.kind, self.datatype) {
            (ParameterKind::Literal, Some(datatype)) => {
                let datatype = Iri::parse(&datatype).map_err(|e| {
                    CliError::InvalidInput(format!(
                        "datatype of parameter '{}' in {}: {}",
                        self.name, template, e
                    ))
                })?;
                ParameterType::Literal(Some(datatype))
            }
            (_, Some(_)) => {
                return Err(CliError::InvalidInput(format!(
                    "parameter '{}' in {} declares a datatype but is not a literal",
                    self.name, template
                )))
            }
            (ParameterKind::Iri, None) => ParameterType::Iri,
            (ParameterKind::Literal, None) => ParameterType::Literal(None),
            (ParameterKind::Blank, None) => ParameterType::Blank,
            (ParameterKind::Any, None) => ParameterType::Any,
        };

        let mut parameter = Parameter::new(self.name, kind);
        parameter.optional = self.optional;
        parameter.list = self.list;
        Ok(parameter)
    }
}

impl InstanceDoc {
    fn into_instance(self, template: &str) -> Result<Instance> {
        let arguments = self
            .arguments
            .into_iter()
            .map(|a| a.into_argument(template))
            .collect::<Result<Vec<_>>>()?;
        Ok(Instance::new(self.template, arguments))
    }
}

impl ArgumentDoc {
    fn into_argument(self, template: &str) -> Result<Argument> {
        match self {
            ArgumentDoc::Nested(instance) => Ok(Argument::nested(instance.into_instance(template)?)),
            ArgumentDoc::Text(text) => match text.strip_prefix('$') {
                Some("") => Err(CliError::InvalidInput(format!("empty variable name in {}", template))),
                Some(variable) => Ok(Argument::var(variable)),
                None => parse_term(&text).map(Argument::constant).map_err(|e| {
                    CliError::InvalidInput(format!("argument '{}' in {}: {}", text, template, e))
                }),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use trellis_domain::vocab::{ottr, xsd};
    use trellis_domain::Term;

    const PERSON: &str = r#"
[[templates]]
name = "http://example.org/Person"
parameters = [
  { name = "id", type = "iri" },
  { name = "name", type = "literal", optional = true },
  { name = "age", type = "literal", datatype = "http://www.w3.org/2001/XMLSchema#integer" },
  { name = "nick", type = "literal", list = true },
  { name = "node", type = "blank" },
  { name = "extra" },
]
body = [
  { template = "ottr:Triple", arguments = ["$id", "<http://www.w3.org/1999/02/22-rdf-syntax-ns#type>", "<http://example.org/Person>"] },
]
"#;

    #[test]
    fn test_parameters() {
        let templates = TemplateDocument::from_toml(PERSON).unwrap().into_templates().unwrap();
        assert_eq!(templates.len(), 1);

        let person = &templates[0];
        assert_eq!(person.arity(), 6);
        assert_eq!(person.parameters[0], Parameter::iri("id"));
        assert_eq!(person.parameters[1], Parameter::literal("name").optional());
        assert_eq!(
            person.parameters[2],
            Parameter::literal("age").with_datatype(Iri::parse(xsd::INTEGER).unwrap())
        );
        assert_eq!(person.parameters[3], Parameter::literal("nick").list());
        assert_eq!(person.parameters[4], Parameter::blank("node"));
        assert_eq!(person.parameters[5], Parameter::any("extra"));
    }

    #[test]
    fn test_body_arguments() {
        let templates = TemplateDocument::from_toml(PERSON).unwrap().into_templates().unwrap();
        let instance = &templates[0].body[0];

        assert_eq!(instance.template, ottr::TRIPLE);
        assert_eq!(instance.arguments[0], Argument::var("id"));
        assert_eq!(
            instance.arguments[2],
            Argument::constant(Term::iri("http://example.org/Person").unwrap())
        );
    }

    #[test]
    fn test_nested_instance_argument() {
        let doc = r#"
[[templates]]
name = "http://example.org/Knows"
parameters = [{ name = "a", type = "iri" }, { name = "b", type = "iri" }]
body = [
  { template = "ottr:Triple", arguments = [
      { template = "http://example.org/Named", arguments = ["$a", "\"Alice\"@en"] },
      "<http://xmlns.com/foaf/0.1/knows>",
      "$b",
  ] },
]
"#;
        let templates = TemplateDocument::from_toml(doc).unwrap().into_templates().unwrap();
        match &templates[0].body[0].arguments[0] {
            Argument::Nested(nested) => {
                assert_eq!(nested.template, "http://example.org/Named");
                assert_eq!(nested.arguments[0], Argument::var("a"));
                assert!(matches!(&nested.arguments[1], Argument::Constant(t) if t.is_literal()));
            }
            other => panic!("expected nested instance, got {:?}", other),
        }
    }

    #[test]
    fn test_datatype_on_iri_parameter() {
        let doc = r#"
[[templates]]
name = "http://example.org/T"
parameters = [{ name = "x", type = "iri", datatype = "http://www.w3.org/2001/XMLSchema#integer" }]
"#;
        let result = TemplateDocument::from_toml(doc).unwrap().into_templates();
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_bad_term_argument() {
        let doc = r#"
[[templates]]
name = "http://example.org/T"
parameters = [{ name = "x", type = "iri" }]
body = [{ template = "ottr:Triple", arguments = ["$x", "<not closed", "$x"] }]
"#;
        let result = TemplateDocument::from_toml(doc).unwrap().into_templates();
        assert!(matches!(result, Err(CliError::InvalidInput(_))));
    }

    #[test]
    fn test_unknown_field_is_rejected() {
        let doc = r#"
[[templates]]
name = "http://example.org/T"
paramters = []
"#;
        assert!(matches!(TemplateDocument::from_toml(doc), Err(CliError::Toml(_))));
    }

    #[test]
    fn test_duplicate_template_names() {
        let doc = r#"
[[templates]]
name = "http://example.org/T"

[[templates]]
name = "http://example.org/T"
"#;
        let result = TemplateDocument::from_toml(doc).unwrap().into_registry();
        assert!(matches!(result, Err(CliError::Template(_))));
    }
}
