//! Flattening the group tree into the rows a table shows.

use reportgrid_proto::Record;

use super::expand::ExpandState;
use super::group::{GroupNode, GroupPath};

/// Summary row of one group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupRow {
    /// Identity of the group, used to toggle it.
    pub path: GroupPath,
    /// Nesting level, 0 for outermost groups.
    pub depth: usize,
    /// Records under the group.
    pub count: usize,
    /// Whether the group's children are shown below it.
    pub expanded: bool,
    /// Whether the group holds records directly rather than subgroups.
    pub leaf: bool,
}

impl GroupRow {
    /// The group's own key.
    pub fn key(&self) -> &str {
        self.path.key().unwrap_or_default()
    }
}

/// A row of the rendered grouped table.
#[derive(Debug, Clone, PartialEq)]
pub enum VisibleRow<'a> {
    Group(GroupRow),
    Record { depth: usize, record: &'a Record },
}

impl VisibleRow<'_> {
    pub fn depth(&self) -> usize {
        match self {
            VisibleRow::Group(row) => row.depth,
            VisibleRow::Record { depth, .. } => *depth,
        }
    }
}

/// Rows visible under `state`.
///
/// Every top-level group shows a summary row. An expanded group is followed
/// by its subgroups' rows or, at the innermost level, by its records. A
/// collapsed group shows only its summary row.
pub fn visible_rows<'a>(tree: &GroupNode<'a>, state: &ExpandState) -> Vec<VisibleRow<'a>> {
    let mut rows = Vec::new();
    match tree {
        GroupNode::Leaf(records) => {
            rows.extend(records.iter().map(|&record| VisibleRow::Record { depth: 0, record }));
        }
        GroupNode::Branch(_) => push_group_rows(tree, &GroupPath::root(), 0, state, &mut rows),
    }
    rows
}

fn push_group_rows<'a>(
    node: &GroupNode<'a>,
    parent: &GroupPath,
    depth: usize,
    state: &ExpandState,
    rows: &mut Vec<VisibleRow<'a>>,
) {
    for entry in node.entries() {
        let path = parent.child(entry.key.as_str());
        let expanded = state.is_expanded(&path);

        rows.push(VisibleRow::Group(GroupRow {
            path: path.clone(),
            depth,
            count: entry.node.count(),
            expanded,
            leaf: entry.node.is_leaf(),
        }));

        if !expanded {
            continue;
        }
        match &entry.node {
            GroupNode::Leaf(records) => rows.extend(
                records
                    .iter()
                    .map(|&record| VisibleRow::Record { depth: depth + 1, record }),
            ),
            GroupNode::Branch(_) => {
                push_group_rows(&entry.node, &path, depth + 1, state, rows)
            }
        }
    }
}
