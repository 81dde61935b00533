//! Nested-row serialization of a [`NodeTree`].
//!
//! A tree is written as an ordered list of rows; each row is the node's own
//! fields plus, for containers with children, a `children` list of rows.
//! Children found under a leaf on load are dropped.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::arena::{NodeId, NodeTree};
use super::node::Node;

#[derive(Serialize)]
#[serde(bound = "T: Node + Serialize")]
struct RowRef<'a, T> {
    #[serde(flatten)]
    node: &'a T,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    children: Vec<RowRef<'a, T>>,
}

impl<'a, T: Node> RowRef<'a, T> {
    fn new(tree: &'a NodeTree<T>, id: NodeId) -> Option<Self> {
        let node = tree.get(id)?;
        let children = tree
            .children(id)
            .iter()
            .filter_map(|&child| Self::new(tree, child))
            .collect();
        Some(Self { node, children })
    }
}

#[derive(Deserialize)]
#[serde(bound = "T: Deserialize<'de>")]
struct Row<T> {
    #[serde(flatten)]
    node: T,
    #[serde(default)]
    children: Vec<Row<T>>,
}

impl<T: Node + Serialize> Serialize for NodeTree<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let rows: Vec<RowRef<'_, T>> = self
            .roots()
            .iter()
            .filter_map(|&root| RowRef::new(self, root))
            .collect();
        rows.serialize(serializer)
    }
}

impl<'de, T: Node + Deserialize<'de>> Deserialize<'de> for NodeTree<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let rows = Vec::<Row<T>>::deserialize(deserializer)?;
        let mut tree = NodeTree::new();
        for row in rows {
            tree.attach_row(None, row);
        }
        Ok(tree)
    }
}

impl<T: Node> NodeTree<T> {
    fn attach_row(&mut self, parent: Option<NodeId>, row: Row<T>) {
        let container = row.node.is_container();
        let id = self.attach(parent, row.node);
        if !container && !row.children.is_empty() {
            tracing::debug!(dropped = row.children.len(), "ignoring children of a leaf row");
            return;
        }
        for child in row.children {
            self.attach_row(Some(id), child);
        }
    }
}
