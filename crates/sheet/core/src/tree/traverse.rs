use bitflags::bitflags;

use super::arena::{NodeId, NodeTree};
use super::node::Node;

bitflags! {
    /// Filters applied by [`Walk`].
    ///
    /// `EXCLUDE_DISABLED` skips disabled nodes together with their whole
    /// subtree. `EXCLUDE_CONTAINERS` only hides containers from the output;
    /// their children are still visited.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Traversal: u8 {
        const EXCLUDE_DISABLED   = 1 << 0;
        const EXCLUDE_CONTAINERS = 1 << 1;
    }
}

/// Lazy depth-first, pre-order iterator over a [`NodeTree`].
pub struct Walk<'a, T> {
    tree: &'a NodeTree<T>,
    stack: Vec<NodeId>,
    flags: Traversal,
}

impl<'a, T: Node> Walk<'a, T> {
    pub(super) fn new(tree: &'a NodeTree<T>, starts: &[NodeId], flags: Traversal) -> Self {
        let exclude_disabled = flags.contains(Traversal::EXCLUDE_DISABLED);
        let stack = starts
            .iter()
            .rev()
            .copied()
            .filter(|&start| !exclude_disabled || tree.is_enabled(start))
            .collect();
        Self { tree, stack, flags }
    }
}

impl<'a, T: Node> Iterator for Walk<'a, T> {
    type Item = (NodeId, &'a T);

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(id) = self.stack.pop() {
            let Some(node) = self.tree.get(id) else {
                continue;
            };
            if self.flags.contains(Traversal::EXCLUDE_DISABLED) && !node.is_self_enabled() {
                continue;
            }
            self.stack
                .extend(self.tree.children(id).iter().rev().copied());
            if self.flags.contains(Traversal::EXCLUDE_CONTAINERS) && node.is_container() {
                continue;
            }
            return Some((id, node));
        }
        None
    }
}
