//! Free-text search across every field of a record.

use reportgrid_proto::Record;

/// A case-insensitive substring test against the text form of every field.
///
/// The search term is applied before the filter tree and is AND-ed with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchTerm {
    needle: String,
}

impl SearchTerm {
    /// Create a search term. Returns `None` for an empty term, which
    /// matches every record and needs no evaluation.
    pub fn new(term: &str) -> Option<Self> {
        if term.is_empty() {
            None
        } else {
            Some(Self {
                needle: term.to_lowercase(),
            })
        }
    }

    /// The lowercased term.
    pub fn as_str(&self) -> &str {
        &self.needle
    }

    /// Check whether any field of the record contains the term.
    pub fn matches(&self, record: &Record) -> bool {
        record
            .fields()
            .any(|(_, value)| value.to_text().to_lowercase().contains(&self.needle))
    }
}
