//! Filter evaluation.
//!
//! This module provides the `FilterEvaluator` that decides whether a record
//! passes a filter tree. Evaluation never fails: a condition whose operand
//! cannot be coerced, or whose value has the wrong shape for its operator,
//! does not match, and a condition with an unknown operator matches.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use tracing::trace;

use reportgrid_proto::{
    Condition, ConditionValue, FilterGroup, FilterNode, GroupOperator, Operator, Record, Value,
};

use crate::catalog::FieldCatalog;
use crate::config::EngineConfig;
use crate::error::Error;

/// Evaluates filter trees against records.
pub struct FilterEvaluator;

impl FilterEvaluator {
    /// Evaluate a filter tree against a record.
    ///
    /// Returns `true` if the record matches. Empty groups match everything.
    pub fn evaluate(filter: &FilterNode, record: &Record) -> bool {
        match filter {
            FilterNode::Condition(condition) => Self::evaluate_condition(condition, record),
            FilterNode::Group(group) => Self::evaluate_group(group, record),
        }
    }

    /// Validate the filter against a catalog under `config`, then evaluate it.
    ///
    /// Fails with [`Error::InvalidOperator`] when a condition uses an
    /// operator its field's type does not allow and `validate_operators` is
    /// set, and with [`Error::UnknownField`] for a field missing from the
    /// catalog when `strict_fields` is set.
    pub fn evaluate_checked(
        filter: &FilterNode,
        record: &Record,
        catalog: &FieldCatalog,
        config: &EngineConfig,
    ) -> Result<bool, Error> {
        catalog.validate_filter(filter, config)?;
        Ok(Self::evaluate(filter, record))
    }

    fn evaluate_group(group: &FilterGroup, record: &Record) -> bool {
        match group.operator {
            GroupOperator::And => group.children.iter().all(|c| Self::evaluate(c, record)),
            // An empty OR is vacuously true as well.
            GroupOperator::Or => {
                group.children.is_empty()
                    || group.children.iter().any(|c| Self::evaluate(c, record))
            }
        }
    }

    /// Evaluate a single condition.
    pub fn evaluate_condition(condition: &Condition, record: &Record) -> bool {
        let field_value = record.value(&condition.field);
        let operand = &condition.value;

        match &condition.operator {
            Operator::Equals => Self::values_equal(field_value, operand),
            Operator::NotEquals => !Self::values_equal(field_value, operand),
            Operator::Contains => Self::text_test(field_value, operand, |h, n| h.contains(n)),
            Operator::NotContains => {
                !Self::text_test(field_value, operand, |h, n| h.contains(n))
            }
            Operator::StartsWith => {
                Self::text_test(field_value, operand, |h, n| h.starts_with(n))
            }
            Operator::EndsWith => Self::text_test(field_value, operand, |h, n| h.ends_with(n)),
            Operator::GreaterThan => {
                Self::numeric_test(condition, field_value, operand, |a, b| a > b)
            }
            Operator::LessThan => {
                Self::numeric_test(condition, field_value, operand, |a, b| a < b)
            }
            Operator::Between => {
                let Some((low, high)) = operand.as_range() else {
                    trace!(
                        field = %condition.field,
                        "between operand is not a [low, high] pair"
                    );
                    return false;
                };
                match (coerce_number(field_value), coerce_number(low), coerce_number(high)) {
                    (Some(v), Some(low), Some(high)) => low <= v && v <= high,
                    _ => {
                        trace!(
                            field = %condition.field,
                            "non-numeric value in between, not matching"
                        );
                        false
                    }
                }
            }
            Operator::In => operand
                .as_list()
                .is_some_and(|values| values.contains(field_value)),
            Operator::NotIn => operand
                .as_list()
                .is_some_and(|values| !values.contains(field_value)),
            Operator::IsEmpty => field_value.is_empty(),
            Operator::IsNotEmpty => !field_value.is_empty(),
            Operator::Unknown(name) => {
                trace!(
                    field = %condition.field,
                    operator = %name,
                    "Unknown operator, matching"
                );
                true
            }
        }
    }

    /// Strict, type-aware equality: a number never equals its string form.
    fn values_equal(field_value: &Value, operand: &ConditionValue) -> bool {
        operand.as_scalar().is_some_and(|v| v == field_value)
    }

    /// Case-insensitive text test with both sides coerced to text.
    fn text_test<F>(field_value: &Value, operand: &ConditionValue, test: F) -> bool
    where
        F: FnOnce(&str, &str) -> bool,
    {
        let haystack = field_value.to_text().to_lowercase();
        let needle = operand_text(operand).to_lowercase();
        test(&haystack, &needle)
    }

    fn numeric_test<F>(
        condition: &Condition,
        field_value: &Value,
        operand: &ConditionValue,
        test: F,
    ) -> bool
    where
        F: FnOnce(f64, f64) -> bool,
    {
        let rhs = operand.as_scalar().and_then(coerce_number);
        match (coerce_number(field_value), rhs) {
            (Some(a), Some(b)) => test(a, b),
            _ => {
                trace!(
                    field = %condition.field,
                    operator = %condition.operator,
                    "non-numeric comparison, not matching"
                );
                false
            }
        }
    }
}

/// Text form of a condition operand; list operands join with commas.
fn operand_text(operand: &ConditionValue) -> String {
    match operand {
        ConditionValue::Scalar(v) => v.to_text().into_owned(),
        ConditionValue::List(values) => values
            .iter()
            .map(|v| v.to_text())
            .collect::<Vec<_>>()
            .join(","),
    }
}

/// Coerce a value to a number for ordered comparisons.
///
/// Numbers pass through, booleans become 0/1, and strings are parsed as a
/// decimal number or else as an ISO-8601 date (milliseconds since the Unix
/// epoch). Null, empty strings, non-finite spellings such as `"Infinity"`,
/// and anything unparseable yield `None`.
pub fn coerce_number(value: &Value) -> Option<f64> {
    match value {
        Value::Int64(n) => Some(*n as f64),
        Value::Float64(n) if n.is_nan() => None,
        Value::Float64(n) => Some(*n),
        Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        Value::String(s) => {
            let s = s.trim();
            if s.is_empty() {
                return None;
            }
            // "inf", "infinity" and "nan" parse as f64 but are not numbers here.
            match s.parse::<f64>() {
                Ok(n) if n.is_finite() => Some(n),
                Ok(_) => None,
                Err(_) => parse_date_millis(s).map(|ms| ms as f64),
            }
        }
        Value::Null => None,
    }
}

fn parse_date_millis(s: &str) -> Option<i64> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.timestamp_millis());
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return Some(dt.and_utc().timestamp_millis());
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|dt| dt.and_utc().timestamp_millis())
}
