use std::collections::HashMap;
use std::fmt;

use crate::split::{present_nanos, Split};

/// One position in a call tree: the splits recorded for `name` at this
/// path, and the calls made beneath it.
///
/// Children are keyed by name, so the same operation under two different
/// parents is two distinct nodes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallTreeNode {
    name: String,
    splits: Vec<Split>,
    /// Children in first-occurrence order
    children: Vec<CallTreeNode>,
    index: HashMap<String, usize>,
}

impl CallTreeNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            splits: Vec::with_capacity(1),
            children: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn add_split(&mut self, split: Split) {
        self.splits.push(split);
    }

    pub fn splits(&self) -> &[Split] {
        &self.splits
    }

    /// Number of calls recorded directly on this node.
    pub fn counter(&self) -> usize {
        self.splits.len()
    }

    /// Sum of this node's own split durations, in nanoseconds.
    pub fn total(&self) -> u64 {
        self.splits
            .iter()
            .fold(0u64, |acc, s| acc.saturating_add(s.running_for))
    }

    pub fn children(&self) -> &[CallTreeNode] {
        &self.children
    }

    pub fn child(&self, name: &str) -> Option<&CallTreeNode> {
        self.index.get(name).map(|&i| &self.children[i])
    }

    pub fn get_or_add_child(&mut self, name: &str) -> &mut CallTreeNode {
        let i = self.child_index(name);
        &mut self.children[i]
    }

    pub(super) fn child_index(&mut self, name: &str) -> usize {
        if let Some(&i) = self.index.get(name) {
            return i;
        }
        let i = self.children.len();
        self.children.push(CallTreeNode::new(name));
        self.index.insert(name.to_owned(), i);
        i
    }

    pub(super) fn child_at_mut(&mut self, i: usize) -> &mut CallTreeNode {
        &mut self.children[i]
    }

    fn render(&self, f: &mut fmt::Formatter<'_>, depth: usize, parent_total: Option<u64>) -> fmt::Result {
        let total = self.total();
        for _ in 0..depth {
            f.write_str("\t")?;
        }
        write!(f, "{} ", self.name)?;
        if let Some(parent_total) = parent_total.filter(|&t| t > 0) {
            let pct = u128::from(total) * 100 / u128::from(parent_total);
            write!(f, "{pct}%, ")?;
        }
        f.write_str(&present_nanos(total as f64))?;
        if self.counter() > 1 {
            write!(f, ", {}", self.counter())?;
        }
        writeln!(f)?;
        for child in &self.children {
            child.render(f, depth + 1, Some(total))?;
        }
        Ok(())
    }
}

/// Indented report, one line per node:
/// `name [percent of parent%, ]total[, call count]`.
impl fmt::Display for CallTreeNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.render(f, 0, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MS: u64 = 1_000_000;

    #[test]
    fn test_children_keyed_by_name() {
        let mut root = CallTreeNode::new("controller");
        root.get_or_add_child("service").add_split(Split::new(0, 5));
        root.get_or_add_child("dao");
        root.get_or_add_child("service").add_split(Split::new(10, 7));

        assert_eq!(root.children().len(), 2);
        let service = root.child("service").unwrap();
        assert_eq!(service.counter(), 2);
        assert_eq!(service.total(), 12);
        assert!(root.child("missing").is_none());
        let names: Vec<_> = root.children().iter().map(CallTreeNode::name).collect();
        assert_eq!(names, vec!["service", "dao"]);
    }

    #[test]
    fn test_render_report() {
        let mut root = CallTreeNode::new("controller");
        root.add_split(Split::new(0, 100 * MS));
        let service = root.get_or_add_child("service");
        service.add_split(Split::new(0, 75 * MS));
        let dao = service.get_or_add_child("dao");
        dao.add_split(Split::new(0, 20 * MS));
        dao.add_split(Split::new(30 * MS, 10 * MS));

        let expected = "controller 100.00 ms\n\
                        \tservice 75%, 75.00 ms\n\
                        \t\tdao 40%, 30.00 ms, 2\n";
        assert_eq!(root.to_string(), expected);
    }

    #[test]
    fn test_render_skips_percent_for_zero_parent() {
        let mut root = CallTreeNode::new("root");
        root.get_or_add_child("child").add_split(Split::new(0, 5));
        assert_eq!(root.to_string(), "root 0 ns\n\tchild 5 ns\n");
    }
}
