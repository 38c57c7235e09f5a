//! Field catalog and filter validation.
//!
//! The catalog is the immutable list of field descriptors supplied by the
//! host. The engine uses it to reject filter conditions whose operator is not
//! legal for the field's declared type before any record is evaluated.

use std::collections::HashMap;

use reportgrid_proto::{FieldDef, FilterNode, ReportQuery};
use tracing::{trace, warn};

use crate::config::EngineConfig;
use crate::error::Error;

/// Lookup table of field descriptors by id.
#[derive(Debug, Clone, Default)]
pub struct FieldCatalog {
    fields: Vec<FieldDef>,
    index: HashMap<String, usize>,
}

impl FieldCatalog {
    /// Build a catalog. A later descriptor with a duplicate id replaces the
    /// earlier one.
    pub fn new(fields: Vec<FieldDef>) -> Self {
        let mut catalog = Self::default();
        for field in fields {
            match catalog.index.get(&field.id) {
                Some(&i) => catalog.fields[i] = field,
                None => {
                    catalog.index.insert(field.id.clone(), catalog.fields.len());
                    catalog.fields.push(field);
                }
            }
        }
        catalog
    }

    /// Parse a catalog from a JSON array of field descriptors.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let fields: Vec<FieldDef> = serde_json::from_str(json)?;
        Ok(Self::new(fields))
    }

    /// Get a field descriptor by id.
    pub fn get(&self, id: &str) -> Option<&FieldDef> {
        self.index.get(id).map(|&i| &self.fields[i])
    }

    /// All descriptors in catalog order.
    pub fn fields(&self) -> &[FieldDef] {
        &self.fields
    }

    /// Display label for a field, falling back to the id.
    pub fn label<'a>(&'a self, id: &'a str) -> &'a str {
        self.get(id).map(|f| f.label.as_str()).unwrap_or(id)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Validate every field reference and operator of a query.
    pub fn validate_query(
        &self,
        query: &ReportQuery,
        config: &EngineConfig,
    ) -> Result<(), Error> {
        self.validate_filter(&query.filter, config)?;
        for key in &query.sort_by {
            self.validate_field(&key.field, config)?;
        }
        for field in &query.group_by {
            self.validate_field(field, config)?;
        }
        Ok(())
    }

    /// Validate a filter tree.
    ///
    /// Conditions with an unknown operator pass: they evaluate permissively
    /// while the user is still editing them.
    pub fn validate_filter(
        &self,
        filter: &FilterNode,
        config: &EngineConfig,
    ) -> Result<(), Error> {
        match filter {
            FilterNode::Condition(condition) => {
                let Some(def) = self.get(&condition.field) else {
                    return self.unknown_field(&condition.field, config);
                };
                if !condition.operator.is_known() {
                    trace!(
                        field = %condition.field,
                        operator = %condition.operator,
                        "Unknown operator left for permissive evaluation"
                    );
                    return Ok(());
                }
                if config.validate_operators && !def.field_type.allows(&condition.operator) {
                    return Err(Error::InvalidOperator {
                        field: condition.field.clone(),
                        operator: condition.operator.to_string(),
                        field_type: def.field_type,
                    });
                }
                Ok(())
            }
            FilterNode::Group(group) => {
                for child in &group.children {
                    self.validate_filter(child, config)?;
                }
                Ok(())
            }
        }
    }

    /// Validate a single field reference.
    pub fn validate_field(&self, field: &str, config: &EngineConfig) -> Result<(), Error> {
        if self.get(field).is_some() {
            Ok(())
        } else {
            self.unknown_field(field, config)
        }
    }

    fn unknown_field(&self, field: &str, config: &EngineConfig) -> Result<(), Error> {
        if config.strict_fields {
            return Err(Error::UnknownField(field.to_string()));
        }
        warn!(field = %field, "Field not in catalog, values will read as null");
        Ok(())
    }
}
