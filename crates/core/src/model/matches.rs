use std::collections::BTreeSet;

use crate::model::ids::NodeId;

/// Nodes selected by evaluating a query against a tree.
///
/// Duplicates collapse and engine order is not retained; two match sets are
/// equal iff they select the same nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchSet {
    nodes: BTreeSet<NodeId>,
}

impl MatchSet {
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[must_use]
    pub fn contains(&self, node: NodeId) -> bool {
        self.nodes.contains(&node)
    }

    pub fn iter(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().copied()
    }
}

impl FromIterator<NodeId> for MatchSet {
    fn from_iter<I: IntoIterator<Item = NodeId>>(iter: I) -> Self {
        Self {
            nodes: iter.into_iter().collect(),
        }
    }
}

impl<const N: usize> From<[NodeId; N]> for MatchSet {
    fn from(nodes: [NodeId; N]) -> Self {
        nodes.into_iter().collect()
    }
}
