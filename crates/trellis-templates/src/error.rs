//! Template registration and resolution errors
//!
//! Every variant is raised before any row is processed and is fatal to the
//! whole run.

use thiserror::Error;

/// Errors that can occur while registering, validating or resolving templates
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TemplateError {
    /// A template with this name is already registered
    #[error("Duplicate template: {0}")]
    DuplicateTemplate(String),

    /// No template with this name is registered
    #[error("Template not found: {0}")]
    TemplateNotFound(String),

    /// An instance supplies the wrong number of arguments
    #[error("Arity mismatch in {caller}: {callee} expects {expected} argument(s), got {found}")]
    ArityMismatch {
        /// Template whose body holds the instance
        caller: String,
        /// Referenced template
        callee: String,
        /// Parameter count of the callee
        expected: usize,
        /// Argument count at the instance site
        found: usize,
    },

    /// The template reference graph contains a cycle
    #[error("Cyclic template reference: {}", .cycle.join(" -> "))]
    CyclicTemplate {
        /// Template names along the cycle, first name repeated at the end
        cycle: Vec<String>,
    },

    /// Two parameters of one template share a name
    #[error("Duplicate parameter '{parameter}' in {template}")]
    DuplicateParameter {
        /// Template name
        template: String,
        /// Repeated parameter name
        parameter: String,
    },

    /// A body argument names a variable that is not a parameter
    #[error("Unbound variable '{variable}' in {template}")]
    UnboundVariable {
        /// Template name
        template: String,
        /// Variable name
        variable: String,
    },

    /// A nested-instance argument has no first argument to yield as its value
    #[error("Nested instance of {callee} in {template} has no arguments and yields no value")]
    EmptyNestedInstance {
        /// Template name
        template: String,
        /// Referenced template
        callee: String,
    },

    /// A constant in a triple position can never form a valid triple
    #[error("Illegal constant in {template}: {reason}")]
    IllegalConstant {
        /// Template name
        template: String,
        /// What is wrong with the constant
        reason: String,
    },
}

/// Result type for template operations
pub type TemplateResult<T> = Result<T, TemplateError>;
