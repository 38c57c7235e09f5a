//! Report query engine.
//!
//! The pipeline runs in a fixed order: search term and filter tree select
//! records, the sort specification orders them, and the group specification
//! partitions the ordered sequence into a tree of counted groups.

mod expand;
mod group;
mod pipeline;
mod predicate;
mod search;
mod sort;
mod view;

pub use expand::ExpandState;
pub use group::{group_records, GroupEntry, GroupNode, GroupPath};
pub use pipeline::{ReportEngine, ReportOutput};
pub use predicate::{coerce_number, FilterEvaluator};
pub use search::SearchTerm;
pub use sort::{compare_records, sort_records};
pub use view::{visible_rows, GroupRow, VisibleRow};
