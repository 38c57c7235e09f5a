//! Output formatters for report results.

use clap::ValueEnum;
use comfy_table::{Cell, Table};
use reportgrid_core::{GroupRow, VisibleRow};
use reportgrid_proto::{Record, Value};
use serde_json::json;

/// Output format for results.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// ASCII table format
    Table,
    /// JSON format
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// A column to render: the field it reads and its header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    pub field: String,
    pub label: String,
}

impl Column {
    pub fn new(field: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            label: label.into(),
        }
    }
}

/// Everything a formatter needs to print one report run.
#[derive(Debug)]
pub struct ReportView<'a> {
    pub title: &'a str,
    pub columns: &'a [Column],
    pub rows: &'a [VisibleRow<'a>],
    pub total: usize,
    pub page_count: usize,
}

/// Trait for formatting output.
pub trait Formatter {
    /// Format a report run.
    fn format_report(&self, view: &ReportView<'_>) -> String;

    /// Format an error message.
    fn format_error(&self, error: &str) -> String;
}

/// Create a formatter for the given output format.
pub fn create_formatter(format: OutputFormat) -> Box<dyn Formatter> {
    match format {
        OutputFormat::Table => Box::new(TableFormatter),
        OutputFormat::Json => Box::new(JsonFormatter),
    }
}

/// Table formatter using comfy-table.
pub struct TableFormatter;

impl Formatter for TableFormatter {
    fn format_report(&self, view: &ReportView<'_>) -> String {
        let mut table = Table::new();
        table.set_header(view.columns.iter().map(|c| Cell::new(&c.label)));

        for row in view.rows {
            match row {
                VisibleRow::Group(group) => {
                    table.add_row(vec![Cell::new(group_label(group))]);
                }
                VisibleRow::Record { depth, record } => {
                    table.add_row(record_cells(view.columns, record, *depth));
                }
            }
        }

        format!(
            "{}\n{}\n{} record(s), {} page(s)",
            view.title, table, view.total, view.page_count
        )
    }

    fn format_error(&self, error: &str) -> String {
        format!("Error: {}", error)
    }
}

/// JSON formatter.
pub struct JsonFormatter;

impl Formatter for JsonFormatter {
    fn format_report(&self, view: &ReportView<'_>) -> String {
        let rows: Vec<serde_json::Value> = view
            .rows
            .iter()
            .map(|row| match row {
                VisibleRow::Group(group) => json!({
                    "type": "group",
                    "path": group.path.segments(),
                    "key": group.key(),
                    "depth": group.depth,
                    "count": group.count,
                    "expanded": group.expanded,
                }),
                VisibleRow::Record { depth, record } => json!({
                    "type": "record",
                    "depth": depth,
                    "record": project(view.columns, record),
                }),
            })
            .collect();

        let output = json!({
            "title": view.title,
            "total": view.total,
            "pageCount": view.page_count,
            "rows": rows,
        });
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_error(&self, error: &str) -> String {
        json!({ "error": error }).to_string()
    }
}

/// Group summary label: disclosure marker, indentation, key, and count.
fn group_label(group: &GroupRow) -> String {
    let marker = if group.expanded { "v" } else { ">" };
    format!(
        "{}{} {} ({})",
        "  ".repeat(group.depth),
        marker,
        group.key(),
        group.count
    )
}

/// Cells of a record row; the first cell is indented under its group.
fn record_cells(columns: &[Column], record: &Record, depth: usize) -> Vec<Cell> {
    columns
        .iter()
        .enumerate()
        .map(|(i, column)| {
            let text = format_value(record.value(&column.field));
            if i == 0 {
                Cell::new(format!("{}{}", "  ".repeat(depth), text))
            } else {
                Cell::new(text)
            }
        })
        .collect()
}

/// Record restricted to the rendered columns, in column order.
fn project(columns: &[Column], record: &Record) -> Record {
    columns
        .iter()
        .map(|c| (c.field.clone(), record.value(&c.field).clone()))
        .collect()
}

/// Format a Value as a display string.
fn format_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        other => other.to_text().into_owned(),
    }
}
