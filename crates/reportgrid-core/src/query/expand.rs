//! Expand/collapse state of group rows.

use std::collections::HashSet;

use super::group::{GroupNode, GroupPath};

/// The set of currently expanded group paths.
///
/// Owned by the caller, not the engine. A new state has every group
/// collapsed. Paths are not pruned when the data or grouping changes: a path
/// whose group no longer exists stays in the set and simply matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpandState {
    expanded: HashSet<GroupPath>,
}

impl ExpandState {
    /// Create a state with every group collapsed.
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip the expansion of `path`. Returns whether it is now expanded.
    pub fn toggle(&mut self, path: &GroupPath) -> bool {
        if self.expanded.remove(path) {
            false
        } else {
            self.expanded.insert(path.clone());
            true
        }
    }

    /// Check whether `path` is expanded.
    pub fn is_expanded(&self, path: &GroupPath) -> bool {
        self.expanded.contains(path)
    }

    pub fn expand(&mut self, path: GroupPath) {
        self.expanded.insert(path);
    }

    pub fn collapse(&mut self, path: &GroupPath) {
        self.expanded.remove(path);
    }

    /// Expand every group of `tree`.
    pub fn expand_all(&mut self, tree: &GroupNode<'_>) {
        self.expanded.extend(tree.paths());
    }

    /// Collapse everything, as when a new grouping is applied.
    pub fn clear(&mut self) {
        self.expanded.clear();
    }

    pub fn len(&self) -> usize {
        self.expanded.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expanded.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &GroupPath> {
        self.expanded.iter()
    }
}

impl FromIterator<GroupPath> for ExpandState {
    fn from_iter<I: IntoIterator<Item = GroupPath>>(iter: I) -> Self {
        Self {
            expanded: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::group::group_records;
    use reportgrid_proto::Record;

    #[test]
    fn test_starts_collapsed() {
        let state = ExpandState::new();
        assert!(state.is_empty());
        assert!(!state.is_expanded(&GroupPath::new(["pending"])));
    }

    #[test]
    fn test_toggle_twice_restores() {
        let mut state: ExpandState = [GroupPath::new(["done"])].into_iter().collect();
        let before = state.clone();
        let path = GroupPath::new(["pending", "Lab A"]);

        assert!(state.toggle(&path));
        assert!(state.is_expanded(&path));
        assert!(!state.toggle(&path));
        assert_eq!(state, before);
    }

    #[test]
    fn test_expand_and_collapse() {
        let mut state = ExpandState::new();
        state.expand(GroupPath::new(["a"]));
        state.expand(GroupPath::new(["a"]));
        assert_eq!(state.len(), 1);

        state.collapse(&GroupPath::new(["a"]));
        state.collapse(&GroupPath::new(["missing"]));
        assert!(state.is_empty());
    }

    #[test]
    fn test_expand_all_then_clear() {
        let data = vec![
            Record::new().with("s", "a").with("f", "x"),
            Record::new().with("s", "b").with("f", "y"),
        ];
        let rows: Vec<&Record> = data.iter().collect();
        let tree = group_records(&rows, &["s".to_string(), "f".to_string()], "All Data");

        let mut state = ExpandState::new();
        state.expand_all(&tree);
        assert_eq!(state.len(), 4);
        assert!(state.is_expanded(&GroupPath::new(["b", "y"])));

        state.clear();
        assert!(state.is_empty());
    }

    #[test]
    fn test_stale_paths_are_inert() {
        let data = vec![Record::new().with("s", "a")];
        let rows: Vec<&Record> = data.iter().collect();
        let tree = group_records(&rows, &["s".to_string()], "All Data");

        let stale = GroupPath::new(["gone"]);
        let state: ExpandState = [stale.clone()].into_iter().collect();
        assert!(state.is_expanded(&stale));
        assert!(tree.find(&stale).is_none());
    }
}
