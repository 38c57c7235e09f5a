//! Multi-key tie-break sorting.

use std::cmp::Ordering;

use reportgrid_proto::{Record, SortDirection, SortKey};

/// Compare two records by a sort specification.
///
/// The first key dominates; later keys are consulted only while every
/// earlier key compares equal. Missing fields compare as null.
pub fn compare_records(a: &Record, b: &Record, sort_by: &[SortKey]) -> Ordering {
    for key in sort_by {
        let cmp = a.value(&key.field).natural_cmp(b.value(&key.field));

        let cmp = match key.direction {
            SortDirection::Asc => cmp,
            SortDirection::Desc => cmp.reverse(),
        };

        if cmp != Ordering::Equal {
            return cmp;
        }
    }
    Ordering::Equal
}

/// Sort records in place. The sort is stable: records equal on every key
/// keep their input order.
pub fn sort_records(records: &mut [&Record], sort_by: &[SortKey]) {
    if sort_by.is_empty() {
        return;
    }
    records.sort_by(|a, b| compare_records(a, b, sort_by));
}
