//! Hierarchical grouping of an ordered record sequence.
//!
//! Grouping never reorders: buckets appear in the order their key is first
//! seen, so the upstream sort order decides both bucket order and the order
//! of records inside each bucket.

use std::collections::HashMap;
use std::fmt;

use reportgrid_proto::Record;

/// Identity of a group node: the keys of its ancestors and itself, from the
/// outermost level down.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct GroupPath(Vec<String>);

impl GroupPath {
    /// The empty path, naming the root of the tree.
    pub fn root() -> Self {
        Self::default()
    }

    /// Build a path from its segments.
    pub fn new<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(segments.into_iter().map(Into::into).collect())
    }

    /// Parse a `/`-separated path, as typed on a command line.
    ///
    /// `\/` stands for a slash inside a segment and `\\` for a backslash,
    /// so keys such as `N/A` or `03/15/2024` stay addressable. Any other
    /// backslash is kept as is.
    pub fn parse(path: &str) -> Self {
        if path.is_empty() {
            return Self::root();
        }
        let mut segments = Vec::new();
        let mut current = String::new();
        let mut chars = path.chars();
        while let Some(c) = chars.next() {
            match c {
                '\\' => match chars.next() {
                    Some(next @ ('/' | '\\')) => current.push(next),
                    Some(next) => {
                        current.push('\\');
                        current.push(next);
                    }
                    None => current.push('\\'),
                },
                '/' => segments.push(std::mem::take(&mut current)),
                _ => current.push(c),
            }
        }
        segments.push(current);
        Self(segments)
    }

    /// Path of a child of this node.
    pub fn child(&self, key: impl Into<String>) -> Self {
        let mut segments = self.0.clone();
        segments.push(key.into());
        Self(segments)
    }

    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Number of segments; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Last segment, the node's own key.
    pub fn key(&self) -> Option<&str> {
        self.0.last().map(String::as_str)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }
}

/// Writes the form [`GroupPath::parse`] reads back.
impl fmt::Display for GroupPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            f.write_str(&segment.replace('\\', "\\\\").replace('/', "\\/"))?;
        }
        Ok(())
    }
}

/// A keyed child of an internal group node.
#[derive(Debug, Clone, PartialEq)]
pub struct GroupEntry<'a> {
    /// Group key: the text form of the grouped field's value.
    pub key: String,
    /// The subtree for this key.
    pub node: GroupNode<'a>,
}

/// A node of the group tree.
#[derive(Debug, Clone, PartialEq)]
pub enum GroupNode<'a> {
    /// Innermost level: the records of the group, in upstream order.
    Leaf(Vec<&'a Record>),
    /// Intermediate level: child groups in first-seen key order.
    Branch(Vec<GroupEntry<'a>>),
}

impl<'a> GroupNode<'a> {
    /// Number of records under this node, computed recursively.
    pub fn count(&self) -> usize {
        match self {
            GroupNode::Leaf(records) => records.len(),
            GroupNode::Branch(entries) => entries.iter().map(|e| e.node.count()).sum(),
        }
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self, GroupNode::Leaf(_))
    }

    /// Child entries; empty for a leaf.
    pub fn entries(&self) -> &[GroupEntry<'a>] {
        match self {
            GroupNode::Leaf(_) => &[],
            GroupNode::Branch(entries) => entries,
        }
    }

    /// Records of a leaf; empty for a branch.
    pub fn records(&self) -> &[&'a Record] {
        match self {
            GroupNode::Leaf(records) => records,
            GroupNode::Branch(_) => &[],
        }
    }

    /// Child node for `key`.
    pub fn get(&self, key: &str) -> Option<&GroupNode<'a>> {
        self.entries().iter().find(|e| e.key == key).map(|e| &e.node)
    }

    /// Node at `path` below this node. Paths naming keys that do not exist
    /// resolve to `None`.
    pub fn find(&self, path: &GroupPath) -> Option<&GroupNode<'a>> {
        path.segments()
            .iter()
            .try_fold(self, |node, key| node.get(key))
    }

    /// Every record under this node, in tree order.
    pub fn flatten(&self) -> Vec<&'a Record> {
        let mut out = Vec::with_capacity(self.count());
        self.collect_records(&mut out);
        out
    }

    fn collect_records(&self, out: &mut Vec<&'a Record>) {
        match self {
            GroupNode::Leaf(records) => out.extend(records.iter().copied()),
            GroupNode::Branch(entries) => {
                for entry in entries {
                    entry.node.collect_records(out);
                }
            }
        }
    }

    /// Paths of every group below this node, depth first.
    pub fn paths(&self) -> Vec<GroupPath> {
        let mut out = Vec::new();
        self.collect_paths(&GroupPath::root(), &mut out);
        out
    }

    fn collect_paths(&self, parent: &GroupPath, out: &mut Vec<GroupPath>) {
        for entry in self.entries() {
            let path = parent.child(entry.key.as_str());
            entry.node.collect_paths(&path, out);
            out.push(path);
        }
    }
}

/// Group an ordered record sequence by `fields`, outermost level first.
///
/// With no fields the result is a single group keyed `root_label` holding
/// every record. The root of the returned tree is always a branch.
pub fn group_records<'a>(
    records: &[&'a Record],
    fields: &[String],
    root_label: &str,
) -> GroupNode<'a> {
    if fields.is_empty() {
        return GroupNode::Branch(vec![GroupEntry {
            key: root_label.to_string(),
            node: GroupNode::Leaf(records.to_vec()),
        }]);
    }
    partition(records, fields)
}

fn partition<'a>(records: &[&'a Record], fields: &[String]) -> GroupNode<'a> {
    let Some((field, rest)) = fields.split_first() else {
        return GroupNode::Leaf(records.to_vec());
    };

    let mut buckets: Vec<(String, Vec<&'a Record>)> = Vec::new();
    let mut index: HashMap<String, usize> = HashMap::new();

    for &record in records {
        // Null keys get their own "null" bucket.
        let key = record.value(field).to_text();
        match index.get(key.as_ref()) {
            Some(&i) => buckets[i].1.push(record),
            None => {
                let key = key.into_owned();
                index.insert(key.clone(), buckets.len());
                buckets.push((key, vec![record]));
            }
        }
    }

    let entries = buckets
        .into_iter()
        .map(|(key, bucket)| GroupEntry {
            key,
            node: if rest.is_empty() {
                GroupNode::Leaf(bucket)
            } else {
                partition(&bucket, rest)
            },
        })
        .collect();

    GroupNode::Branch(entries)
}
