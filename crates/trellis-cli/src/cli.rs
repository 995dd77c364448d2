//! CLI command definitions and argument parsing.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Trellis CLI - Build RDF graphs from rows and templates.
#[derive(Debug, Parser)]
#[command(name = "trellis")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Output format
    #[arg(short, long, value_enum, global = true, default_value = "table")]
    pub format: CliFormat,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum CliFormat {
    /// Table format (default)
    Table,
    /// JSON format
    Json,
    /// One N-Triples statement per line
    #[value(name = "ntriples")]
    NTriples,
}

/// CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Check that a template document registers, validates and resolves
    Validate(ValidateArgs),

    /// Expand a template over JSON-lines rows
    Expand(ExpandArgs),

    /// Match triples of an N-Triples graph
    Query(QueryArgs),
}

/// Arguments for the validate command.
#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Template document (TOML)
    #[arg(long)]
    pub templates: PathBuf,
}

/// Arguments for the expand command.
#[derive(Debug, Parser)]
pub struct ExpandArgs {
    /// Template document (TOML)
    #[arg(long)]
    pub templates: PathBuf,

    /// Name of the template to expand
    #[arg(short, long)]
    pub template: String,

    /// Rows as JSON lines, one object per line
    ///
    /// Strings in RFC 3339 form are read as timestamps and become
    /// xsd:dateTime literals; pass --keep-strings to keep them as text.
    #[arg(short, long)]
    pub rows: PathBuf,

    /// Keep RFC 3339 strings in rows as plain text
    #[arg(long)]
    pub keep_strings: bool,

    /// Column that identifies a row; repeat for compound keys
    #[arg(short = 'k', long = "key-column")]
    pub key_columns: Vec<String>,

    /// Language tag for a string parameter, as COLUMN=TAG
    #[arg(long = "lang", value_parser = parse_language)]
    pub languages: Vec<(String, String)>,

    /// Mapping configuration (TOML)
    #[arg(short, long, env = "TRELLIS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Skip failing rows instead of aborting
    #[arg(long)]
    pub lenient: bool,

    /// Write the graph to this N-Triples file instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,
}

/// Arguments for the query command.
#[derive(Debug, Parser)]
pub struct QueryArgs {
    /// Graph to query (N-Triples)
    #[arg(short, long)]
    pub graph: PathBuf,

    /// Subject filter
    #[arg(short, long)]
    pub subject: Option<String>,

    /// Predicate filter
    #[arg(short, long)]
    pub predicate: Option<String>,

    /// Object filter
    #[arg(short, long)]
    pub object: Option<String>,
}

fn parse_language(value: &str) -> Result<(String, String), String> {
    match value.split_once('=') {
        Some((column, tag)) if !column.is_empty() && !tag.is_empty() => {
            Ok((column.to_string(), tag.to_string()))
        }
        _ => Err(format!("expected COLUMN=TAG, got '{}'", value)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_arguments() {
        let cli = Cli::try_parse_from([
            "trellis",
            "expand",
            "--templates",
            "people.toml",
            "-t",
            "http://example.org/Person",
            "--rows",
            "people.jsonl",
            "-k",
            "id",
            "--lang",
            "name=en",
            "--lenient",
        ])
        .unwrap();

        match cli.command {
            Command::Expand(args) => {
                assert_eq!(args.template, "http://example.org/Person");
                assert_eq!(args.key_columns, vec!["id".to_string()]);
                assert_eq!(args.languages, vec![("name".to_string(), "en".to_string())]);
                assert!(args.lenient);
                assert!(!args.keep_strings);
                assert!(args.output.is_none());
            }
            other => panic!("expected expand, got {:?}", other),
        }
        assert_eq!(cli.format, CliFormat::Table);
    }

    #[test]
    fn test_keep_strings_flag() {
        let cli = Cli::try_parse_from([
            "trellis",
            "expand",
            "--templates",
            "t.toml",
            "-t",
            "http://example.org/Person",
            "-r",
            "rows.jsonl",
            "--keep-strings",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Expand(args) if args.keep_strings));
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["trellis", "query", "-g", "out.nt", "--format", "ntriples", "-v"]).unwrap();
        assert_eq!(cli.format, CliFormat::NTriples);
        assert!(cli.verbose);
    }

    #[test]
    fn test_malformed_language() {
        assert!(parse_language("name").is_err());
        assert!(parse_language("=en").is_err());
        assert_eq!(parse_language("name=de").unwrap(), ("name".to_string(), "de".to_string()));
    }
}
