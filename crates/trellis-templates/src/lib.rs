//! Trellis Templates
//!
//! Registers template definitions, validates them as a whole and flattens
//! every composite template into base-triple patterns.
//!
//! The template layer provides:
//! - Registration with duplicate detection
//! - Whole-registry validation (references, arity, variables, cycles)
//! - Memoized post-order resolution into [`TriplePattern`]s
//!
//! # Examples
//!
//! ```
//! use trellis_domain::{Argument, Instance, Parameter, Template, Term};
//! use trellis_templates::{Resolver, TemplateRegistry};
//!
//! let person = Template::new(
//!     "http://example.org/Person",
//!     vec![Parameter::iri("id"), Parameter::literal("name")],
//!     vec![Instance::triple(
//!         Argument::var("id"),
//!         Argument::constant(Term::iri("http://xmlns.com/foaf/0.1/name").unwrap()),
//!         Argument::var("name"),
//!     )],
//! );
//!
//! let registry = TemplateRegistry::from_templates(vec![person]).unwrap().validate().unwrap();
//! let resolved = Resolver::new(&registry).resolve_all().unwrap();
//! assert_eq!(resolved.get("http://example.org/Person").unwrap().patterns.len(), 1);
//! ```

#![warn(missing_docs)]

mod error;
mod registry;
mod resolver;

pub use error::{TemplateError, TemplateResult};
pub use registry::{TemplateRegistry, ValidatedRegistry};
pub use resolver::{PatternTerm, ResolvedTemplate, ResolvedTemplates, Resolver, TriplePattern};

/// Validate a registry and resolve every template in one step
pub fn compile(registry: TemplateRegistry) -> TemplateResult<ResolvedTemplates> {
    let validated = registry.validate()?;
    Resolver::new(&validated).resolve_all()
}
