//! Template generation from row columns
//!
//! The generated template has one triple per non-key column, with the
//! primary key as subject. Foreign keys become IRI objects; every other
//! column becomes an optional literal.

use crate::error::{MappingError, Result};
use trellis_domain::{Argument, Instance, Iri, Parameter, Template, Term};

/// Template IRI prefix used when none is given
pub const DEFAULT_TEMPLATE_PREFIX: &str = "urn:trellis:template:";

/// Predicate IRI prefix used when none is given
pub const DEFAULT_PREDICATE_PREFIX: &str = "urn:trellis:predicate:";

/// How to derive a template from a row source's columns
#[derive(Debug, Clone)]
pub struct DefaultTemplateOptions {
    /// Column holding the subject IRI
    pub primary_key: String,
    /// Columns holding IRIs of other resources
    pub foreign_keys: Vec<String>,
    /// Prefix for the generated template's name
    pub template_prefix: String,
    /// Prefix for predicate IRIs; the column name is appended
    pub predicate_prefix: String,
}

impl DefaultTemplateOptions {
    /// Options for a primary-key column with default prefixes
    pub fn new(primary_key: impl Into<String>) -> Self {
        Self {
            primary_key: primary_key.into(),
            foreign_keys: Vec::new(),
            template_prefix: DEFAULT_TEMPLATE_PREFIX.to_string(),
            predicate_prefix: DEFAULT_PREDICATE_PREFIX.to_string(),
        }
    }

    /// Set the foreign-key columns
    pub fn with_foreign_keys<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.foreign_keys = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Set the template name prefix
    pub fn with_template_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.template_prefix = prefix.into();
        self
    }

    /// Set the predicate prefix
    pub fn with_predicate_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.predicate_prefix = prefix.into();
        self
    }
}

/// Build the default template for a set of columns
pub fn default_template<S: AsRef<str>>(columns: &[S], options: &DefaultTemplateOptions) -> Result<Template> {
    let columns: Vec<&str> = columns.iter().map(AsRef::as_ref).collect();

    if !columns.contains(&options.primary_key.as_str()) {
        return Err(MappingError::InvalidInput(format!(
            "primary key column '{}' not found",
            options.primary_key
        )));
    }
    if let Some(missing) = options.foreign_keys.iter().find(|fk| !columns.contains(&fk.as_str())) {
        return Err(MappingError::InvalidInput(format!(
            "foreign key column '{}' not found",
            missing
        )));
    }

    let mut parameters = vec![Parameter::iri(&options.primary_key)];
    let mut body = Vec::new();

    for column in columns.iter().copied().filter(|c| *c != options.primary_key) {
        let parameter = if options.foreign_keys.iter().any(|fk| fk == column) {
            Parameter::iri(column).optional()
        } else {
            Parameter::literal(column).optional()
        };
        parameters.push(parameter);

        let predicate = Iri::parse(format!("{}{}", options.predicate_prefix, column)).map_err(|e| {
            MappingError::InvalidInput(format!("column '{}' does not form a predicate IRI: {}", column, e))
        })?;
        body.push(Instance::triple(
            Argument::var(&options.primary_key),
            Argument::constant(Term::Iri(predicate)),
            Argument::var(column),
        ));
    }

    Ok(Template::new(
        format!("{}{}", options.template_prefix, options.primary_key),
        parameters,
        body,
    ))
}
