//! Core error types.

use reportgrid_proto::FieldType;
use thiserror::Error;

/// Engine errors.
///
/// None of these come out of evaluation itself: evaluation is total and
/// degrades a misconfigured condition to a non-match. Errors are raised by
/// validation against a field catalog and by configuration loading.
#[derive(Debug, Error)]
pub enum Error {
    /// Operator not legal for the field's declared type.
    #[error("operator '{operator}' is not valid for {} field '{field}'", .field_type.as_str())]
    InvalidOperator {
        field: String,
        operator: String,
        field_type: FieldType,
    },

    /// Field not present in the catalog.
    #[error("unknown field: {0}")]
    UnknownField(String),

    /// Invalid configuration value.
    #[error("invalid config: {0}")]
    InvalidConfig(String),

    /// JSON parsing error.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}
