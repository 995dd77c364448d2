//! Expand command implementation.

use crate::cli::ExpandArgs;
use crate::document::TemplateDocument;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use crate::rows::{load_rows, RowOptions};
use std::fs::File;
use std::io::{self, BufWriter};
use tracing::info;
use trellis_mapping::{ErrorPolicy, ExpandOptions, ExpansionReport, Mapping, MappingConfig};

/// Execute the expand command.
///
/// The graph goes to `--output` when given; otherwise it is written to
/// stdout and the report to stderr.
pub fn execute_expand(args: ExpandArgs, formatter: &Formatter) -> Result<()> {
    let (mapping, report) = run_expand(&args)?;

    match &args.output {
        Some(path) => {
            let written = mapping.write_ntriples(BufWriter::new(File::create(path)?))?;
            println!("{}", formatter.format_report(&report)?);
            println!(
                "{}",
                formatter.success(&format!("Wrote {} triple(s) to {}", written, path.display()))
            );
        }
        None => {
            mapping.write_ntriples(BufWriter::new(io::stdout().lock()))?;
            eprintln!("{}", formatter.format_report(&report)?);
        }
    }

    if !report.is_clean() {
        eprintln!(
            "{}",
            formatter.warning(&format!("{} row(s) skipped", report.rows_skipped))
        );
    }

    Ok(())
}

/// Build the mapping and expand the requested template over the rows
pub fn run_expand(args: &ExpandArgs) -> Result<(Mapping, ExpansionReport)> {
    let mut config = match &args.config {
        Some(path) => MappingConfig::from_file(path).map_err(CliError::Config)?,
        None => MappingConfig::default(),
    };
    if args.lenient {
        config.error_policy = ErrorPolicy::Lenient;
    }

    let registry = TemplateDocument::from_file(&args.templates)?.into_registry()?;
    let row_options = RowOptions {
        keep_strings: args.keep_strings,
    };
    let rows = load_rows(&args.rows, row_options)?;
    info!("Loaded {} row(s) from {}", rows.len(), args.rows.display());

    let options = args.languages.iter().fold(
        ExpandOptions::new().with_key_columns(&args.key_columns),
        |options, (column, tag)| options.with_language(column, tag),
    );

    let mut mapping = Mapping::new(registry, config)?;
    let report = mapping.expand(&args.template, rows, &options)?;
    Ok((mapping, report))
}
