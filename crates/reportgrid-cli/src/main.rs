//! ReportGrid Command-Line Runner
//!
//! Loads records and a saved report definition from JSON, runs the report
//! engine, and prints the grouped table.

mod formatter;
mod loader;

use std::path::PathBuf;

use clap::Parser;
use formatter::{Column, OutputFormat, ReportView};
use reportgrid_core::{EngineConfig, ExpandState, FieldCatalog, GroupPath, ReportEngine};
use reportgrid_proto::{Record, ReportConfig, DEFAULT_PAGE_SIZE};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// ReportGrid Command-Line Runner
#[derive(Parser, Debug)]
#[command(name = "reportgrid")]
#[command(version, about = "Run a report over a JSON record set")]
pub struct Args {
    /// Records to report on (JSON array of objects)
    #[arg(short, long)]
    pub data: PathBuf,

    /// Saved report definition (JSON)
    #[arg(short, long)]
    pub report: Option<PathBuf>,

    /// Field catalog used to validate the report (JSON array)
    #[arg(long)]
    pub fields: Option<PathBuf>,

    /// Free-text search applied across every field
    #[arg(short, long)]
    pub search: Option<String>,

    /// Expand a group; path segments separated by '/', with '\/' for a
    /// slash inside a key
    #[arg(short, long = "expand", value_name = "PATH")]
    pub expand: Vec<String>,

    /// Expand every group
    #[arg(long)]
    pub expand_all: bool,

    /// Reject references to fields missing from the catalog
    #[arg(long)]
    pub strict: bool,

    /// Output format
    #[arg(long, default_value = "table", value_enum)]
    pub format: OutputFormat,
}

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("reportgrid_cli=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let formatter = formatter::create_formatter(args.format);

    if let Err(e) = run(args) {
        eprintln!("{}", formatter.format_error(&e.to_string()));
        std::process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Box<dyn std::error::Error>> {
    let records = loader::load_records(&args.data)?;
    let report = match &args.report {
        Some(path) => loader::load_report(path)?,
        None => ReportConfig::new("ad-hoc", "Ad hoc report"),
    };

    let config = EngineConfig::new()
        .strict_fields(args.strict)
        .with_default_page_size(page_size(&report));
    config.validate()?;

    let mut engine = ReportEngine::new(config);
    let catalog = match &args.fields {
        Some(path) => Some(loader::load_catalog(path)?),
        None => None,
    };
    if let Some(catalog) = catalog.clone() {
        engine = engine.with_catalog(catalog);
    }

    let mut query = report.query();
    query.search = args.search.clone();

    info!(
        report = %report.id,
        records = records.len(),
        conditions = query.filter.condition_count(),
        group_levels = query.group_by.len(),
        "Running report"
    );

    let output = engine.run(&records, &query)?;

    let mut state: ExpandState = args.expand.iter().map(|p| GroupPath::parse(p)).collect();
    if args.expand_all {
        state.expand_all(output.groups());
    }
    for path in state.iter() {
        if output.groups().find(path).is_none() {
            warn!(path = %path, "Expanded path matches no group");
        }
    }

    let columns = columns(&report, catalog.as_ref(), &records);
    let rows = output.visible_rows(&state);
    let view = ReportView {
        title: &report.name,
        columns: &columns,
        rows: &rows,
        total: output.total(),
        page_count: output.page_count(engine.config().default_page_size),
    };

    let formatter = formatter::create_formatter(args.format);
    println!("{}", formatter.format_report(&view));
    Ok(())
}

/// Page size from the report, falling back to the default when the report
/// sets zero.
fn page_size(report: &ReportConfig) -> usize {
    if report.page_size == 0 {
        warn!(
            report = %report.id,
            fallback = DEFAULT_PAGE_SIZE,
            "Report page size is 0, using the default"
        );
        return DEFAULT_PAGE_SIZE;
    }
    report.page_size
}

/// Columns to render: the report's visible columns, or every field of the
/// first record when the report configures none.
fn columns(
    report: &ReportConfig,
    catalog: Option<&FieldCatalog>,
    records: &[Record],
) -> Vec<Column> {
    let configured: Vec<Column> = report
        .visible_columns()
        .map(|c| Column::new(&c.field_id, &c.label))
        .collect();
    if !configured.is_empty() {
        return configured;
    }

    records
        .first()
        .map(|record| {
            record
                .field_ids()
                .map(|id| {
                    let label = catalog.map_or(id, |c| c.label(id));
                    Column::new(id, label)
                })
                .collect()
        })
        .unwrap_or_default()
}
