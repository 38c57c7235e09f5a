//! Recursive boolean filter trees.

use std::collections::HashSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::value::Value;

/// Comparison operator of a filter condition.
///
/// Operator names the builder does not know deserialize to
/// [`Operator::Unknown`] instead of failing, so a saved report with a newer
/// operator still loads.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Operator {
    Equals,
    NotEquals,
    Contains,
    NotContains,
    StartsWith,
    EndsWith,
    GreaterThan,
    LessThan,
    Between,
    In,
    NotIn,
    IsEmpty,
    IsNotEmpty,
    /// An operator name with no known semantics.
    Unknown(String),
}

impl Operator {
    /// Every known operator, in the order the filter builder lists them.
    pub const ALL: [Operator; 13] = [
        Operator::Equals,
        Operator::NotEquals,
        Operator::Contains,
        Operator::NotContains,
        Operator::StartsWith,
        Operator::EndsWith,
        Operator::GreaterThan,
        Operator::LessThan,
        Operator::Between,
        Operator::In,
        Operator::NotIn,
        Operator::IsEmpty,
        Operator::IsNotEmpty,
    ];

    /// Parse an operator from its wire name.
    pub fn parse(name: &str) -> Self {
        match name {
            "equals" => Operator::Equals,
            "not_equals" => Operator::NotEquals,
            "contains" => Operator::Contains,
            "not_contains" => Operator::NotContains,
            "starts_with" => Operator::StartsWith,
            "ends_with" => Operator::EndsWith,
            "greater_than" => Operator::GreaterThan,
            "less_than" => Operator::LessThan,
            "between" => Operator::Between,
            "in" => Operator::In,
            "not_in" => Operator::NotIn,
            "is_empty" => Operator::IsEmpty,
            "is_not_empty" => Operator::IsNotEmpty,
            other => Operator::Unknown(other.to_string()),
        }
    }

    /// The wire name of the operator.
    pub fn as_str(&self) -> &str {
        match self {
            Operator::Equals => "equals",
            Operator::NotEquals => "not_equals",
            Operator::Contains => "contains",
            Operator::NotContains => "not_contains",
            Operator::StartsWith => "starts_with",
            Operator::EndsWith => "ends_with",
            Operator::GreaterThan => "greater_than",
            Operator::LessThan => "less_than",
            Operator::Between => "between",
            Operator::In => "in",
            Operator::NotIn => "not_in",
            Operator::IsEmpty => "is_empty",
            Operator::IsNotEmpty => "is_not_empty",
            Operator::Unknown(name) => name,
        }
    }

    /// Human-readable label shown in the filter builder.
    pub fn label(&self) -> &str {
        match self {
            Operator::Equals => "is",
            Operator::NotEquals => "isn't",
            Operator::Contains => "contains",
            Operator::NotContains => "doesn't contain",
            Operator::StartsWith => "starts with",
            Operator::EndsWith => "ends with",
            Operator::GreaterThan => "greater than",
            Operator::LessThan => "less than",
            Operator::Between => "between",
            Operator::In => "in",
            Operator::NotIn => "not in",
            Operator::IsEmpty => "is empty",
            Operator::IsNotEmpty => "is not empty",
            Operator::Unknown(name) => name,
        }
    }

    /// Whether the condition needs a value operand.
    pub fn takes_value(&self) -> bool {
        !matches!(self, Operator::IsEmpty | Operator::IsNotEmpty)
    }

    /// Whether this is an operator with known semantics.
    pub fn is_known(&self) -> bool {
        !matches!(self, Operator::Unknown(_))
    }
}

impl From<String> for Operator {
    fn from(name: String) -> Self {
        Operator::parse(&name)
    }
}

impl From<Operator> for String {
    fn from(op: Operator) -> Self {
        op.as_str().to_string()
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a filter group combines its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GroupOperator {
    /// Every child must match.
    #[default]
    #[serde(rename = "AND")]
    And,
    /// At least one child must match.
    #[serde(rename = "OR")]
    Or,
}

/// Operand of a condition: a scalar, or a list for `in` / `not_in` / `between`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConditionValue {
    Scalar(Value),
    List(Vec<Value>),
}

impl Default for ConditionValue {
    fn default() -> Self {
        ConditionValue::Scalar(Value::Null)
    }
}

impl ConditionValue {
    /// Get the scalar operand, if this is not a list.
    pub fn as_scalar(&self) -> Option<&Value> {
        match self {
            ConditionValue::Scalar(v) => Some(v),
            ConditionValue::List(_) => None,
        }
    }

    /// Get the list operand, if this is a list.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            ConditionValue::List(values) => Some(values),
            ConditionValue::Scalar(_) => None,
        }
    }

    /// Get the `[low, high]` bounds, if this is a two-element list.
    pub fn as_range(&self) -> Option<(&Value, &Value)> {
        match self.as_list()? {
            [low, high] => Some((low, high)),
            _ => None,
        }
    }
}

impl From<Value> for ConditionValue {
    fn from(v: Value) -> Self {
        ConditionValue::Scalar(v)
    }
}

impl From<Vec<Value>> for ConditionValue {
    fn from(v: Vec<Value>) -> Self {
        ConditionValue::List(v)
    }
}

/// A leaf condition: `field <operator> value`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    /// Field id the condition reads.
    pub field: String,
    /// Comparison operator.
    pub operator: Operator,
    /// Operand; absent for `is_empty` / `is_not_empty`.
    #[serde(default)]
    pub value: ConditionValue,
}

impl Condition {
    /// Create a condition.
    pub fn new(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<ConditionValue>,
    ) -> Self {
        Self {
            field: field.into(),
            operator,
            value: value.into(),
        }
    }
}

/// An internal node: children combined with AND or OR.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FilterGroup {
    /// Combinator.
    pub operator: GroupOperator,
    /// Ordered children; an empty group matches everything.
    #[serde(default, rename = "conditions", alias = "children")]
    pub children: Vec<FilterNode>,
}

/// A node of the filter tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum FilterNode {
    Condition(Condition),
    Group(FilterGroup),
}

impl Default for FilterNode {
    fn default() -> Self {
        FilterNode::match_all()
    }
}

impl FilterNode {
    /// An empty AND group, which matches every record.
    pub fn match_all() -> Self {
        FilterNode::and(Vec::new())
    }

    /// Create an AND group.
    pub fn and(children: Vec<FilterNode>) -> Self {
        FilterNode::Group(FilterGroup {
            operator: GroupOperator::And,
            children,
        })
    }

    /// Create an OR group.
    pub fn or(children: Vec<FilterNode>) -> Self {
        FilterNode::Group(FilterGroup {
            operator: GroupOperator::Or,
            children,
        })
    }

    /// Create a condition node.
    pub fn condition(
        field: impl Into<String>,
        operator: Operator,
        value: impl Into<ConditionValue>,
    ) -> Self {
        FilterNode::Condition(Condition::new(field, operator, value))
    }

    /// Create an `equals` condition.
    pub fn equals(field: impl Into<String>, value: impl Into<Value>) -> Self {
        FilterNode::condition(field, Operator::Equals, value.into())
    }

    /// Create an inclusive `between` condition.
    pub fn between(
        field: impl Into<String>,
        low: impl Into<Value>,
        high: impl Into<Value>,
    ) -> Self {
        FilterNode::condition(field, Operator::Between, vec![low.into(), high.into()])
    }

    /// Create an `in` condition.
    pub fn one_of<V: Into<Value>>(field: impl Into<String>, values: Vec<V>) -> Self {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        FilterNode::condition(field, Operator::In, values)
    }

    /// Create an `is_empty` condition.
    pub fn is_empty(field: impl Into<String>) -> Self {
        FilterNode::condition(field, Operator::IsEmpty, Value::Null)
    }

    /// Collect every field id referenced by a condition in this tree.
    pub fn referenced_fields(&self) -> HashSet<String> {
        let mut fields = HashSet::new();
        self.collect_fields(&mut fields);
        fields
    }

    fn collect_fields(&self, fields: &mut HashSet<String>) {
        match self {
            FilterNode::Condition(condition) => {
                fields.insert(condition.field.clone());
            }
            FilterNode::Group(group) => {
                for child in &group.children {
                    child.collect_fields(fields);
                }
            }
        }
    }

    /// Count the conditions in this tree.
    pub fn condition_count(&self) -> usize {
        match self {
            FilterNode::Condition(_) => 1,
            FilterNode::Group(group) => group.children.iter().map(|c| c.condition_count()).sum(),
        }
    }
}
