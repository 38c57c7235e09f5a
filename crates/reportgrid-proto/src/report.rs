//! Sort keys, columns, saved report definitions, and engine queries.

use serde::{Deserialize, Serialize};

use crate::filter::FilterNode;
use crate::DEFAULT_PAGE_SIZE;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

/// One tie-break key of a sort specification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortKey {
    /// Field to sort by.
    #[serde(rename = "fieldId", alias = "field")]
    pub field: String,
    /// Sort direction.
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortKey {
    /// Create an ascending sort key.
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    /// Create a descending sort key.
    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// One level of the row-grouping hierarchy in a saved report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupField {
    /// Field whose values form the group keys.
    pub field_id: String,
}

impl GroupField {
    pub fn new(field_id: impl Into<String>) -> Self {
        Self {
            field_id: field_id.into(),
        }
    }
}

/// A column of the rendered table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportColumn {
    /// Column id.
    pub id: String,
    /// Field shown in the column.
    pub field_id: String,
    /// Header label.
    pub label: String,
    /// Width in pixels, if the user resized it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    /// Whether the header can be clicked to sort.
    #[serde(default = "default_true")]
    pub sortable: bool,
    /// Whether the column is shown.
    #[serde(default = "default_true")]
    pub visible: bool,
}

fn default_true() -> bool {
    true
}

impl ReportColumn {
    /// Create a visible, sortable column whose id is the field id.
    pub fn new(field_id: impl Into<String>, label: impl Into<String>) -> Self {
        let field_id = field_id.into();
        Self {
            id: field_id.clone(),
            field_id,
            label: label.into(),
            width: None,
            sortable: true,
            visible: true,
        }
    }

    /// Hide the column.
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }
}

/// A saved report definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportConfig {
    pub id: String,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Module the report belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub module: Option<String>,
    #[serde(default)]
    pub columns: Vec<ReportColumn>,
    #[serde(default)]
    pub filters: FilterNode,
    #[serde(default)]
    pub group_by: Vec<GroupField>,
    #[serde(default)]
    pub sort_by: Vec<SortKey>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
}

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

impl ReportConfig {
    /// Create an empty report definition.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            description: None,
            module: None,
            columns: Vec::new(),
            filters: FilterNode::match_all(),
            group_by: Vec::new(),
            sort_by: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            created_at: None,
            updated_at: None,
        }
    }

    /// Columns with `visible` set, in configured order.
    pub fn visible_columns(&self) -> impl Iterator<Item = &ReportColumn> {
        self.columns.iter().filter(|c| c.visible)
    }

    /// Build the engine query for this report.
    pub fn query(&self) -> ReportQuery {
        ReportQuery {
            filter: self.filters.clone(),
            sort_by: self.sort_by.clone(),
            group_by: self.group_by.iter().map(|g| g.field_id.clone()).collect(),
            search: None,
        }
    }
}

/// Engine input: filter tree, sort specification, group specification, and
/// the optional free-text search term.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ReportQuery {
    /// Filter tree; defaults to an empty AND group.
    #[serde(default)]
    pub filter: FilterNode,
    /// Tie-break sort keys, first key dominant.
    #[serde(default)]
    pub sort_by: Vec<SortKey>,
    /// Group-by field ids, outermost level first.
    #[serde(default)]
    pub group_by: Vec<String>,
    /// Case-insensitive search across every field.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ReportQuery {
    /// Create a query that keeps every record in input order.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the filter tree.
    pub fn with_filter(mut self, filter: FilterNode) -> Self {
        self.filter = filter;
        self
    }

    /// Append a sort key.
    pub fn with_order(mut self, key: SortKey) -> Self {
        self.sort_by.push(key);
        self
    }

    /// Append a grouping level.
    pub fn with_group(mut self, field: impl Into<String>) -> Self {
        self.group_by.push(field.into());
        self
    }

    /// Set the search term.
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search = Some(term.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::GroupOperator;

    #[test]
    fn test_report_config_from_builder_json() {
        let json = r#"{
            "id": "r1",
            "name": "Pending by facility",
            "module": "samples",
            "columns": [
                {"id": "c1", "fieldId": "sample_id", "label": "Sample ID", "sortable": true, "visible": true},
                {"id": "c2", "fieldId": "analyst", "label": "Analyst", "width": 180, "sortable": true, "visible": false}
            ],
            "filters": {"id": "root", "type": "group", "operator": "AND", "conditions": [
                {"id": "c", "type": "condition", "field": "status", "operator": "equals", "value": "pending"}
            ]},
            "groupBy": [{"fieldId": "facility", "direction": "asc"}],
            "sortBy": [{"fieldId": "created_date", "direction": "desc"}],
            "pageSize": 50,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-02T00:00:00Z"
        }"#;

        let config: ReportConfig = serde_json::from_str(json).unwrap();
        assert_eq!(config.page_size, 50);
        assert_eq!(config.visible_columns().count(), 1);
        assert_eq!(config.columns[1].width, Some(180));

        let query = config.query();
        assert_eq!(query.group_by, vec!["facility".to_string()]);
        assert_eq!(query.sort_by, vec![SortKey::desc("created_date")]);
        assert!(query.search.is_none());
        let FilterNode::Group(group) = &query.filter else {
            panic!("expected group");
        };
        assert_eq!(group.operator, GroupOperator::And);
        assert_eq!(group.children.len(), 1);
    }

    #[test]
    fn test_report_config_defaults() {
        let config: ReportConfig = serde_json::from_str(r#"{"id": "r", "name": "All"}"#).unwrap();
        assert_eq!(config.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(config.filters, FilterNode::match_all());
        assert!(config.query().group_by.is_empty());
    }

    #[test]
    fn test_sort_key_field_alias() {
        let key: SortKey = serde_json::from_str(r#"{"field": "id"}"#).unwrap();
        assert_eq!(key, SortKey::asc("id"));
    }
}
