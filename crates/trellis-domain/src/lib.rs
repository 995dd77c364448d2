//! Trellis Domain Layer
//!
//! This crate defines the data model shared by every other Trellis crate:
//! RDF terms and triples, the raw values delivered by tabular sources, and
//! the template data model. It carries no engine logic.
//!
//! ## Key Concepts
//!
//! - **Term**: an IRI, a blank node, or a literal; immutable and structurally compared
//! - **Triple**: subject, IRI predicate, object
//! - **Row**: column name to [`RawValue`], the closed union of source value kinds
//! - **Template**: a named, parameterized rule whose body is a list of [`Instance`]s
//!
//! ## Architecture
//!
//! - Pure data types only
//! - Registry, resolution and expansion live in `trellis-templates` and `trellis-mapping`
//! - Trait definitions for the store and row-source seams

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod template;
pub mod term;
pub mod traits;
pub mod triple;
pub mod value;
pub mod vocab;

// Re-exports for convenience
pub use template::{Argument, Instance, Parameter, ParameterType, Template};
pub use term::{BlankId, Iri, Literal, Term, TermError};
pub use triple::{Triple, TripleError};
pub use value::{RawValue, Row};
