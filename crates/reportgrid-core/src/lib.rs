//! ReportGrid Core - report query and grouping engine.
//!
//! Turns a record set plus a filter tree, a sort specification, and a group
//! specification into a filtered, sorted, hierarchically grouped result with
//! per-group counts. The pipeline is pure: every call re-derives its output
//! from its inputs. The only state that lives across calls is the
//! [`ExpandState`], which the caller owns.

pub mod catalog;
pub mod config;
pub mod error;
pub mod query;

pub use catalog::FieldCatalog;
pub use config::EngineConfig;
pub use error::Error;
pub use query::{
    group_records, sort_records, visible_rows, ExpandState, FilterEvaluator, GroupEntry,
    GroupNode, GroupPath, GroupRow, ReportEngine, ReportOutput, SearchTerm, VisibleRow,
};

/// Re-export data model types.
pub use reportgrid_proto as proto;
