use std::sync::{Arc, PoisonError, RwLock};

use super::arena::NodeTree;
use super::node::Node;

/// One tree behind a readers-writer lock.
///
/// The tree itself is not synchronized; when a loaded list is shared across
/// threads, this wrapper is the single exclusion boundary for it. Cost and
/// traversal run under [`read`](Self::read), edits under
/// [`write`](Self::write).
#[derive(Debug)]
pub struct SharedTree<T>(Arc<RwLock<NodeTree<T>>>);

impl<T> Clone for SharedTree<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Node> SharedTree<T> {
    pub fn new(tree: NodeTree<T>) -> Self {
        Self(Arc::new(RwLock::new(tree)))
    }

    pub fn read<R>(&self, f: impl FnOnce(&NodeTree<T>) -> R) -> R {
        let guard = self.0.read().unwrap_or_else(PoisonError::into_inner);
        f(&guard)
    }

    pub fn write<R>(&self, f: impl FnOnce(&mut NodeTree<T>) -> R) -> R {
        let mut guard = self.0.write().unwrap_or_else(PoisonError::into_inner);
        f(&mut guard)
    }
}

impl<T: Node> From<NodeTree<T>> for SharedTree<T> {
    fn from(tree: NodeTree<T>) -> Self {
        Self::new(tree)
    }
}
