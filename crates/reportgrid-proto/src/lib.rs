//! ReportGrid data model.
//!
//! This crate defines the types a report is built from: the records being
//! reported on, the field catalog describing them, and the filter / sort /
//! grouping definitions the engine in `reportgrid-core` consumes.
//!
//! # Modules
//!
//! - [`value`] - Typed record values and their coercions
//! - [`record`] - Flat field-id to value mappings
//! - [`field`] - Field descriptors and operator legality
//! - [`filter`] - Recursive boolean filter trees
//! - [`report`] - Sort keys, columns, saved report definitions and queries
//!
//! # Serialization
//!
//! All types derive `serde::Serialize` / `serde::Deserialize` and accept the
//! JSON shape produced by the report builder:
//!
//! ```ignore
//! use reportgrid_proto::{FilterNode, ReportConfig};
//!
//! let config: ReportConfig = serde_json::from_str(json)?;
//! let query = config.query();
//! ```

pub mod field;
pub mod filter;
pub mod record;
pub mod report;
pub mod value;

// Re-export commonly used types at crate root
pub use field::{FieldDef, FieldType};
pub use filter::{Condition, ConditionValue, FilterGroup, FilterNode, GroupOperator, Operator};
pub use record::Record;
pub use report::{GroupField, ReportColumn, ReportConfig, ReportQuery, SortDirection, SortKey};
pub use value::Value;

/// Default number of rows per page for a report.
pub const DEFAULT_PAGE_SIZE: usize = 25;
