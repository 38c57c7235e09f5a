//! The report pipeline: search, filter, sort, group.

use std::time::Instant;

use reportgrid_proto::{Record, ReportQuery};
use tracing::{debug, instrument};

use crate::catalog::FieldCatalog;
use crate::config::EngineConfig;
use crate::error::Error;

use super::expand::ExpandState;
use super::group::{group_records, GroupNode};
use super::predicate::FilterEvaluator;
use super::search::SearchTerm;
use super::sort::sort_records;
use super::view::{visible_rows, VisibleRow};

/// Runs report queries over an in-memory record set.
///
/// The engine holds only configuration and an optional field catalog;
/// every run is a pure function of the records and the query.
#[derive(Debug, Clone, Default)]
pub struct ReportEngine {
    config: EngineConfig,
    catalog: Option<FieldCatalog>,
}

impl ReportEngine {
    /// Create an engine with no catalog. Filters are evaluated without
    /// operator validation.
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            catalog: None,
        }
    }

    /// Attach a field catalog used to validate queries before running them.
    pub fn with_catalog(mut self, catalog: FieldCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn catalog(&self) -> Option<&FieldCatalog> {
        self.catalog.as_ref()
    }

    /// Validate `query` against the catalog, if one is attached.
    pub fn validate(&self, query: &ReportQuery) -> Result<(), Error> {
        match &self.catalog {
            Some(catalog) => catalog.validate_query(query, &self.config),
            None => Ok(()),
        }
    }

    /// Run the whole pipeline.
    #[instrument(skip_all, fields(records = records.len()))]
    pub fn run<'a>(
        &self,
        records: &'a [Record],
        query: &ReportQuery,
    ) -> Result<ReportOutput<'a>, Error> {
        let start = Instant::now();
        self.validate(query)?;

        let rows = self.select(records, query);
        let groups = group_records(&rows, &query.group_by, &self.config.root_label);

        debug!(
            matched = rows.len(),
            top_level_groups = groups.entries().len(),
            group_depth = query.group_by.len(),
            duration_us = start.elapsed().as_micros() as u64,
            "Report computed"
        );

        Ok(ReportOutput { rows, groups })
    }

    /// Search, filter, and sort without grouping: the flat sequence export
    /// consumers read.
    pub fn select<'a>(&self, records: &'a [Record], query: &ReportQuery) -> Vec<&'a Record> {
        let search = query.search.as_deref().and_then(SearchTerm::new);

        let mut rows: Vec<&'a Record> = records
            .iter()
            .filter(|record| search.as_ref().map_or(true, |term| term.matches(record)))
            .filter(|record| FilterEvaluator::evaluate(&query.filter, record))
            .collect();

        sort_records(&mut rows, &query.sort_by);
        rows
    }
}

/// Result of a report run.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportOutput<'a> {
    rows: Vec<&'a Record>,
    groups: GroupNode<'a>,
}

impl<'a> ReportOutput<'a> {
    /// Filtered and sorted records.
    pub fn rows(&self) -> &[&'a Record] {
        &self.rows
    }

    /// Group tree built from [`rows`](Self::rows).
    pub fn groups(&self) -> &GroupNode<'a> {
        &self.groups
    }

    /// Grand total; always equals the number of rows.
    pub fn total(&self) -> usize {
        self.groups.count()
    }

    /// Number of pages of `page_size` rows needed for the total. Zero when
    /// nothing matched or `page_size` is zero. No slicing is applied to the
    /// rows or the groups.
    pub fn page_count(&self, page_size: usize) -> usize {
        if page_size == 0 {
            return 0;
        }
        self.total().div_ceil(page_size)
    }

    /// Rows to render under `state`.
    pub fn visible_rows(&self, state: &ExpandState) -> Vec<VisibleRow<'a>> {
        visible_rows(&self.groups, state)
    }

    /// Take the flat rows, dropping the tree.
    pub fn into_rows(self) -> Vec<&'a Record> {
        self.rows
    }
}
