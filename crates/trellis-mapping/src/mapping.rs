//! The mapping run: validate, resolve, then expand rows into one graph

use crate::config::MappingConfig;
use crate::default_template::{default_template, DefaultTemplateOptions};
use crate::error::{MappingError, Result, RowError};
use crate::expander::Expander;
use crate::report::ExpansionReport;
use crate::types::{ExpandOptions, RowFailure};
use rayon::prelude::*;
use std::io::Write;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};
use trellis_domain::traits::RowSource;
use trellis_domain::{Iri, Row, Template, Term, Triple};
use trellis_store::{write_ntriples, GraphStore};
use trellis_templates::{compile, ResolvedTemplate, ResolvedTemplates, TemplateRegistry};

type RowResult = std::result::Result<Vec<Triple>, RowError>;

/// A set of validated templates and the graph they have produced so far
///
/// Templates are validated and flattened once, in [`Mapping::new`]; no row
/// is looked at before that succeeds. Each [`Mapping::expand`] call pulls
/// rows in bounded chunks, expands a chunk in parallel, and merges the
/// results into a staged graph on the calling thread. The staged graph
/// joins the mapping's graph only when the call succeeds.
///
/// Row ordinals in reports count from zero on every call. Blank nodes of
/// rows without a key are keyed by the row's position across all
/// successful calls, so separate calls never share them.
pub struct Mapping {
    resolved: ResolvedTemplates,
    config: MappingConfig,
    pool: Option<rayon::ThreadPool>,
    graph: GraphStore,
    rows_seen: usize,
}

impl Mapping {
    /// Validate and resolve the registry
    ///
    /// # Errors
    ///
    /// Any [`TemplateError`](trellis_templates::TemplateError) from
    /// validation or resolution, or an invalid configuration.
    pub fn new(registry: TemplateRegistry, config: MappingConfig) -> Result<Self> {
        config.validate().map_err(MappingError::Config)?;

        let resolved = compile(registry)?;

        let pool = if config.parallel && config.max_threads > 0 {
            let pool = rayon::ThreadPoolBuilder::new()
                .num_threads(config.max_threads)
                .build()
                .map_err(|e| MappingError::ThreadPool(e.to_string()))?;
            Some(pool)
        } else {
            None
        };

        info!("Mapping ready with {} template(s)", resolved.len());

        Ok(Self {
            resolved,
            config,
            pool,
            graph: GraphStore::new(),
            rows_seen: 0,
        })
    }

    /// Register the templates and build a mapping from them
    pub fn from_templates<I>(templates: I, config: MappingConfig) -> Result<Self>
    where
        I: IntoIterator<Item = Template>,
    {
        Self::new(TemplateRegistry::from_templates(templates)?, config)
    }

    /// Configuration in effect
    pub fn config(&self) -> &MappingConfig {
        &self.config
    }

    /// Names of every resolved template
    pub fn template_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.resolved.names().collect();
        names.sort_unstable();
        names
    }

    /// Expand `template` over `rows` into the mapping's graph
    ///
    /// In fail-fast mode the first row error aborts the call and the graph
    /// is left as it was. In lenient mode failing rows are skipped whole and
    /// listed in the report.
    pub fn expand<I>(&mut self, template: &str, rows: I, options: &ExpandOptions) -> Result<ExpansionReport>
    where
        I: IntoIterator<Item = Row>,
    {
        let resolved = self.resolved.get(template)?;
        self.run(resolved, rows, options)
    }

    /// Expand `template` over a fresh pass of `source`
    pub fn expand_source<S>(&mut self, template: &str, source: &S, options: &ExpandOptions) -> Result<ExpansionReport>
    where
        S: RowSource + ?Sized,
    {
        self.expand(template, source.rows(), options)
    }

    /// Generate a template from the rows' columns and expand the rows with it
    ///
    /// The column set is taken from the first row. When `options` has no key
    /// columns, the primary key identifies rows. Returns the generated
    /// template with the report.
    pub fn expand_default<I>(
        &mut self,
        rows: I,
        template_options: &DefaultTemplateOptions,
        options: &ExpandOptions,
    ) -> Result<(Template, ExpansionReport)>
    where
        I: IntoIterator<Item = Row>,
    {
        let mut rows = rows.into_iter().peekable();
        let columns: Vec<String> = match rows.peek() {
            Some(first) => first.column_names().map(str::to_string).collect(),
            None => return Err(MappingError::InvalidInput("no rows to derive a template from".to_string())),
        };

        let template = default_template(&columns, template_options)?;
        info!(
            "Generated template {} with {} parameter(s)",
            template.name,
            template.arity()
        );

        let resolved = compile(TemplateRegistry::from_templates([template.clone()])?)?.get(&template.name)?;

        let mut options = options.clone();
        if options.key_columns.is_empty() {
            options.key_columns = vec![template_options.primary_key.clone()];
        }

        let report = self.run(resolved, rows, &options)?;
        Ok((template, report))
    }

    fn run<I>(&mut self, template: Arc<ResolvedTemplate>, rows: I, options: &ExpandOptions) -> Result<ExpansionReport>
    where
        I: IntoIterator<Item = Row>,
    {
        options.validate().map_err(MappingError::Config)?;

        let started = Instant::now();
        let expander = Expander::new(template, options.clone()).with_row_base(self.rows_seen);
        let mut report = ExpansionReport::new(expander.template().name.clone());
        let mut staged = GraphStore::new();
        let mut rows = rows.into_iter();
        let mut ordinal = 0;

        info!(
            "Expanding {} ({} pattern(s), {})",
            report.template,
            expander.template().patterns.len(),
            if self.config.is_lenient() { "lenient" } else { "fail-fast" }
        );

        loop {
            if options.is_cancelled() {
                return Err(cancelled(&report));
            }

            let chunk: Vec<Row> = rows.by_ref().take(self.config.chunk_size).collect();
            if chunk.is_empty() {
                break;
            }

            for (offset, result) in self.expand_chunk(&expander, options, ordinal, &chunk).into_iter().enumerate() {
                let Some(result) = result else {
                    return Err(cancelled(&report));
                };
                match result {
                    Ok(triples) => {
                        report.record_row(triples.len());
                        staged.insert_all(triples);
                    }
                    Err(error) if self.config.is_lenient() => {
                        warn!("Skipping {}", error);
                        report.record_failure(RowFailure {
                            ordinal: ordinal + offset,
                            error,
                        });
                    }
                    Err(error) => return Err(error.into()),
                }
            }

            ordinal += chunk.len();
            debug!("Expanded {} row(s), {} staged triple(s)", ordinal, staged.len());
        }

        report.triples_inserted = self.graph.merge_owned(staged);
        self.rows_seen += ordinal;
        report.elapsed_ms = u64::try_from(started.elapsed().as_millis()).unwrap_or(u64::MAX);

        info!(
            "Expanded {}: {} row(s), {} skipped, {} new triple(s)",
            report.template, report.rows_processed, report.rows_skipped, report.triples_inserted
        );
        Ok(report)
    }

    /// Expand a chunk, in row order
    ///
    /// Rows reached after cancellation is requested yield `None`.
    fn expand_chunk(
        &self,
        expander: &Expander,
        options: &ExpandOptions,
        first: usize,
        chunk: &[Row],
    ) -> Vec<Option<RowResult>> {
        let expand = |i: usize, row: &Row| -> Option<RowResult> {
            if options.is_cancelled() {
                return None;
            }
            Some(expander.expand_row(first + i, row))
        };

        if !self.config.parallel || chunk.len() < 2 {
            return chunk.iter().enumerate().map(|(i, row)| expand(i, row)).collect();
        }

        let work = || -> Vec<Option<RowResult>> {
            chunk
                .par_iter()
                .enumerate()
                .map(|(i, row)| expand(i, row))
                .collect()
        };
        match &self.pool {
            Some(pool) => pool.install(work),
            None => work(),
        }
    }

    /// The accumulated graph
    pub fn graph(&self) -> &GraphStore {
        &self.graph
    }

    /// Hand the accumulated graph to the caller
    pub fn into_graph(self) -> GraphStore {
        self.graph
    }

    /// Triples matching the bound positions
    pub fn query(&self, subject: Option<&Term>, predicate: Option<&Iri>, object: Option<&Term>) -> Vec<Triple> {
        self.graph.query(subject, predicate, object)
    }

    /// Write the accumulated graph as N-Triples
    pub fn write_ntriples<W: Write>(&self, writer: W) -> Result<usize> {
        Ok(write_ntriples(&self.graph, writer)?)
    }
}

fn cancelled(report: &ExpansionReport) -> MappingError {
    warn!(
        "Expansion of {} cancelled after {} row(s)",
        report.template, report.rows_processed
    );
    MappingError::Cancelled {
        rows_processed: report.rows_processed,
    }
}

impl std::fmt::Debug for Mapping {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Mapping")
            .field("templates", &self.resolved.len())
            .field("config", &self.config)
            .field("triples", &self.graph.len())
            .field("rows_seen", &self.rows_seen)
            .finish()
    }
}
