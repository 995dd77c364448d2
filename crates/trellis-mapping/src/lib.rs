//! Trellis Mapping
//!
//! Turns rows of tabular data into an RDF graph by expanding templates.
//!
//! # Overview
//!
//! A [`Mapping`] owns a validated, resolved set of templates and the graph
//! built from them. Rows are bound to a template's parameters, coerced to
//! terms according to the declared parameter types, and the template's
//! flattened triple patterns are emitted once per row (or once per list
//! position for list parameters).
//!
//! # Architecture
//!
//! ```text
//! TemplateRegistry → validate → resolve → Expander (per row, parallel) → GraphStore
//! ```
//!
//! # Key Features
//!
//! - **Fail-fast or lenient** row error handling ([`ErrorPolicy`])
//! - **Deterministic blank nodes**: identical input gives an identical graph
//! - **Bounded memory**: rows are pulled lazily in chunks
//! - **Default templates** generated from a row's columns
//!
//! # Example Usage
//!
//! ```
//! use trellis_domain::{Argument, Instance, Parameter, Row, Template, Term};
//! use trellis_mapping::{ExpandOptions, Mapping, MappingConfig};
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
//! let mut mapping = Mapping::from_templates(vec![person], MappingConfig::default()).unwrap();
//! let rows = vec![Row::new().with("id", "http://example.org/p1").with("name", "Alice")];
//! let report = mapping
//!     .expand("http://example.org/Person", rows, &ExpandOptions::new())
//!     .unwrap();
//!
//! assert_eq!(report.triples_inserted, 1);
//! ```

#![warn(missing_docs)]

mod coercion;
mod config;
mod default_template;
mod error;
mod expander;
mod mapping;
mod report;
mod types;

pub use coercion::coerce;
pub use config::{ErrorPolicy, MappingConfig};
pub use default_template::{
    default_template, DefaultTemplateOptions, DEFAULT_PREDICATE_PREFIX, DEFAULT_TEMPLATE_PREFIX,
};
pub use error::{MappingError, Result, RowError};
pub use expander::Expander;
pub use mapping::Mapping;
pub use report::ExpansionReport;
pub use types::{ExpandOptions, KeyPart, RowFailure, RowIdentity};
