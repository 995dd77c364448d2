//! Validate command implementation.

use crate::cli::ValidateArgs;
use crate::document::TemplateDocument;
use crate::error::Result;
use crate::output::Formatter;
use std::path::Path;
use tracing::info;
use trellis_domain::vocab::ottr;

/// Execute the validate command.
pub fn execute_validate(args: ValidateArgs, formatter: &Formatter) -> Result<()> {
    let names = validate_templates(&args.templates)?;

    println!(
        "{}",
        formatter.success(&format!("{} template(s) valid", names.len()))
    );
    println!("{}", formatter.format_names(&names)?);

    Ok(())
}

/// Load, validate and resolve a template document
///
/// Returns the names of the document's templates, sorted.
pub fn validate_templates(path: impl AsRef<Path>) -> Result<Vec<String>> {
    let path = path.as_ref();
    let registry = TemplateDocument::from_file(path)?.into_registry()?;
    let resolved = trellis_templates::compile(registry)?;

    let mut names: Vec<String> = resolved
        .names()
        .filter(|name| *name != ottr::TRIPLE)
        .map(str::to_string)
        .collect();
    names.sort();

    info!("Validated {} template(s) from {}", names.len(), path.display());
    Ok(names)
}
