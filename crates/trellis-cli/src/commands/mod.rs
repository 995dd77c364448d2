//! Command implementations.

pub mod expand;
pub mod query;
pub mod validate;

pub use self::expand::{execute_expand, run_expand};
pub use self::query::{execute_query, run_query};
pub use self::validate::{execute_validate, validate_templates};
