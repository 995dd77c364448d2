//! Query command implementation.

use crate::cli::QueryArgs;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use std::fs::File;
use std::io::BufReader;
use trellis_domain::{Iri, Term, Triple};
use trellis_store::{parse_term, read_ntriples};

/// Execute the query command.
pub fn execute_query(args: QueryArgs, formatter: &Formatter) -> Result<()> {
    let triples = run_query(&args)?;
    println!("{}", formatter.format_triples(&triples)?);
    Ok(())
}

/// Load the graph and match the pattern given by the filters
pub fn run_query(args: &QueryArgs) -> Result<Vec<Triple>> {
    let subject = args.subject.as_deref().map(filter_term).transpose()?;
    let object = args.object.as_deref().map(filter_term).transpose()?;
    let predicate = match args.predicate.as_deref().map(filter_term).transpose()? {
        Some(Term::Iri(iri)) => Some(iri),
        Some(other) => {
            return Err(CliError::InvalidInput(format!(
                "predicate filter must be an IRI, got {}",
                other
            )))
        }
        None => None,
    };

    let graph = read_ntriples(BufReader::new(File::open(&args.graph)?))?;
    Ok(graph.query(subject.as_ref(), predicate.as_ref(), object.as_ref()))
}

/// A filter in N-Triples syntax, or a bare IRI without angle brackets
fn filter_term(text: &str) -> Result<Term> {
    if text.starts_with(['<', '"', '_']) {
        return Ok(parse_term(text)?);
    }
    Iri::parse(text)
        .map(Term::Iri)
        .map_err(|e| CliError::InvalidInput(format!("filter '{}': {}", text, e)))
}
