//! Field descriptors supplied by the field catalog.

use serde::{Deserialize, Serialize};

use crate::filter::Operator;

const TEXT_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::Contains,
    Operator::NotContains,
    Operator::StartsWith,
    Operator::EndsWith,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const ORDERED_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::GreaterThan,
    Operator::LessThan,
    Operator::Between,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const SELECT_OPERATORS: &[Operator] = &[
    Operator::Equals,
    Operator::NotEquals,
    Operator::In,
    Operator::NotIn,
    Operator::IsEmpty,
    Operator::IsNotEmpty,
];

const BOOLEAN_OPERATORS: &[Operator] = &[Operator::Equals, Operator::NotEquals];

/// Declared type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldType {
    Text,
    Number,
    Date,
    Select,
    Boolean,
}

impl FieldType {
    /// Operators a condition on a field of this type may use.
    pub fn allowed_operators(self) -> &'static [Operator] {
        match self {
            FieldType::Text => TEXT_OPERATORS,
            FieldType::Number | FieldType::Date => ORDERED_OPERATORS,
            FieldType::Select => SELECT_OPERATORS,
            FieldType::Boolean => BOOLEAN_OPERATORS,
        }
    }

    /// Check whether `operator` is legal for this type.
    pub fn allows(self, operator: &Operator) -> bool {
        self.allowed_operators().contains(operator)
    }

    /// Lowercase type name.
    pub fn as_str(self) -> &'static str {
        match self {
            FieldType::Text => "text",
            FieldType::Number => "number",
            FieldType::Date => "date",
            FieldType::Select => "select",
            FieldType::Boolean => "boolean",
        }
    }
}

/// Describes one field of the record set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Field id, the key used in records.
    pub id: String,
    /// Display label.
    pub label: String,
    /// Declared type.
    #[serde(rename = "type")]
    pub field_type: FieldType,
    /// Catalog category used to group fields in pickers.
    #[serde(default)]
    pub category: String,
    /// Allowed values for select fields.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
}

impl FieldDef {
    /// Create a field with no category or options.
    pub fn new(id: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            field_type,
            category: String::new(),
            options: None,
        }
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Set the select options.
    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }
}
