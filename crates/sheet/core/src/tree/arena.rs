use std::fmt;

use crate::error::TreeError;
use crate::nameables::NameableKeys;
use crate::sheet::SheetRef;
use crate::tid::Tid;

use super::node::Node;
use super::traverse::{Traversal, Walk};

/// Handle to a node slot inside one [`NodeTree`].
///
/// Handles stay valid until the node is removed. Freed slots are reused
/// under a new generation, so a stale handle resolves to nothing rather than
/// to another node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeId {
    index: u32,
    generation: u32,
}

impl NodeId {
    /// Handle to the first generation of slot `index`.
    pub const fn from_index(index: usize) -> Self {
        Self {
            index: index as u32,
            generation: 0,
        }
    }

    pub const fn index(self) -> usize {
        self.index as usize
    }

    pub const fn generation(self) -> u32 {
        self.generation
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.generation == 0 {
            write!(f, "#{}", self.index)
        } else {
            write!(f, "#{}v{}", self.index, self.generation)
        }
    }
}

#[derive(Clone, Debug)]
struct Slot<T> {
    node: T,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

#[derive(Clone, Debug)]
struct Entry<T> {
    generation: u32,
    slot: Option<Slot<T>>,
}

/// Ordered forest of entity nodes.
///
/// Parent links are plain [`NodeId`]s, never owners: the tree owns every
/// node, children are ordered per parent, and top-level nodes are ordered in
/// [`roots`](Self::roots). Structural edits can never make a node its own
/// descendant.
#[derive(Clone, Debug)]
pub struct NodeTree<T> {
    entries: Vec<Entry<T>>,
    /// Indices of empty entries, reused before the arena grows.
    free: Vec<u32>,
    live: usize,
    roots: Vec<NodeId>,
    owner: Option<SheetRef>,
}

impl<T> Default for NodeTree<T> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            free: Vec::new(),
            live: 0,
            roots: Vec::new(),
            owner: None,
        }
    }
}

impl<T: Node> NodeTree<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live nodes.
    pub fn len(&self) -> usize {
        self.live
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.slot(id).ok().map(|slot| &slot.node)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        self.slot_mut(id).ok().map(|slot| &mut slot.node)
    }

    pub fn node(&self, id: NodeId) -> Result<&T, TreeError> {
        self.slot(id).map(|slot| &slot.node)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Result<&mut T, TreeError> {
        self.slot_mut(id).map(|slot| &mut slot.node)
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.slot(id).ok().and_then(|slot| slot.parent)
    }

    /// Ordered children of `id`; empty for leaves and unknown handles.
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.slot(id).map(|slot| slot.children.as_slice()).unwrap_or(&[])
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    /// Locates a node by its identifier.
    pub fn find(&self, tid: Tid) -> Option<NodeId> {
        self.walk(Traversal::empty())
            .find(|(_, node)| node.id() == tid)
            .map(|(id, _)| id)
    }

    /// Parent, grandparent, ... up to the top level.
    pub fn ancestors(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        std::iter::successors(self.parent(id), move |&current| self.parent(current))
    }

    /// Number of ancestor links; zero for top-level nodes.
    pub fn depth(&self, id: NodeId) -> usize {
        self.ancestors(id).count()
    }

    /// True if the node or any ancestor is disabled. Unknown handles count
    /// as disabled.
    pub fn effectively_disabled(&self, id: NodeId) -> bool {
        !self.is_enabled(id)
    }

    pub fn is_enabled(&self, id: NodeId) -> bool {
        std::iter::once(id)
            .chain(self.ancestors(id))
            .all(|current| self.get(current).is_some_and(Node::is_self_enabled))
    }

    pub fn owner(&self) -> Option<&SheetRef> {
        self.owner.as_ref()
    }

    /// Propagates the owning sheet to every node, including anything nested
    /// inside nodes (such as a trait's modifiers). Nodes added later inherit
    /// the same owner.
    pub fn set_owning_entity(&mut self, owner: Option<SheetRef>) {
        for slot in self.slots_mut() {
            slot.node.set_owner(owner.clone());
        }
        self.owner = owner;
    }

    /// Creates a fresh node under `parent` (or at the top level).
    pub fn insert(&mut self, parent: Option<NodeId>, container: bool) -> Result<NodeId, TreeError> {
        self.push(parent, T::new_node(container))
    }

    /// Appends `node` under `parent` (or at the top level).
    pub fn push(&mut self, parent: Option<NodeId>, mut node: T) -> Result<NodeId, TreeError> {
        if let Some(parent) = parent {
            self.require_container(parent)?;
        }
        node.set_owner(self.owner.clone());
        Ok(self.attach(parent, node))
    }

    /// Moves every top-level node of `subtree` under `parent`, inserting them
    /// at `index` among the existing children (appending when `None`).
    pub fn graft(
        &mut self,
        parent: Option<NodeId>,
        index: Option<usize>,
        mut subtree: NodeTree<T>,
    ) -> Result<Vec<NodeId>, TreeError> {
        if let Some(parent) = parent {
            self.require_container(parent)?;
        }
        let roots = std::mem::take(&mut subtree.roots);
        let added: Vec<NodeId> = roots
            .into_iter()
            .filter_map(|root| subtree.transplant(root, self, parent))
            .collect();

        if let Some(index) = index {
            let siblings = self.siblings_mut(parent)?;
            let tail = siblings.split_off(siblings.len() - added.len());
            let at = index.min(siblings.len());
            siblings.splice(at..at, tail);
        }

        let owner = self.owner.clone();
        for &root in &added {
            self.for_each_in_subtree(root, |node| node.set_owner(owner.clone()));
        }
        Ok(added)
    }

    /// Detaches the subtree rooted at `id` and returns it as its own tree.
    pub fn remove(&mut self, id: NodeId) -> Result<NodeTree<T>, TreeError> {
        let parent = self.slot(id)?.parent;
        self.siblings_mut(parent)?.retain(|&child| child != id);

        let mut removed = NodeTree::new();
        self.transplant(id, &mut removed, None);
        removed.set_owning_entity(None);
        Ok(removed)
    }

    /// Re-parents `id` as the last child of `new_parent` (or the last
    /// top-level node).
    ///
    /// # Errors
    ///
    /// [`TreeError::WouldCreateCycle`] if `new_parent` is `id` itself or one
    /// of its descendants, [`TreeError::NotAContainer`] if it is a leaf.
    pub fn move_node(&mut self, id: NodeId, new_parent: Option<NodeId>) -> Result<(), TreeError> {
        let old_parent = self.slot(id)?.parent;
        if let Some(target) = new_parent {
            self.require_container(target)?;
            if target == id || self.ancestors(target).any(|ancestor| ancestor == id) {
                return Err(TreeError::WouldCreateCycle { node: id, target });
            }
        }

        self.siblings_mut(old_parent)?.retain(|&child| child != id);
        self.slot_mut(id)?.parent = new_parent;
        self.siblings_mut(new_parent)?.push(id);
        Ok(())
    }

    /// Deep-copies the subtree rooted at `id` into a new tree. Identifiers
    /// are regenerated unless `preserve_ids` is set.
    pub fn extract(&self, id: NodeId, preserve_ids: bool) -> Result<NodeTree<T>, TreeError> {
        self.slot(id)?;
        let mut copy = NodeTree::new();
        self.copy_into(id, &mut copy, None, preserve_ids);
        copy.owner = self.owner.clone();
        Ok(copy)
    }

    /// Deep-copies `id` and inserts the copy directly after it.
    pub fn duplicate(&mut self, id: NodeId, preserve_ids: bool) -> Result<NodeId, TreeError> {
        let copy = self.extract(id, preserve_ids)?;
        let parent = self.parent(id);
        let position = self
            .siblings(parent)
            .iter()
            .position(|&sibling| sibling == id)
            .map(|index| index + 1);
        let added = self.graft(parent, position, copy)?;
        added.first().copied().ok_or(TreeError::NodeNotFound(id))
    }

    /// Turns a leaf into a container of the same family.
    pub fn convert_to_container(&mut self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node_mut(id)?;
        if !node.is_container() {
            node.set_id(node.id().to_container());
            node.clear_unused_fields_for_type();
        }
        Ok(())
    }

    /// Turns an empty container into a leaf of the same family.
    pub fn convert_to_leaf(&mut self, id: NodeId) -> Result<(), TreeError> {
        let slot = self.slot_mut(id)?;
        if !slot.node.is_container() {
            return Ok(());
        }
        if !slot.children.is_empty() {
            return Err(TreeError::HasChildren(slot.node.id()));
        }
        slot.node.set_id(slot.node.id().to_leaf());
        slot.node.clear_unused_fields_for_type();
        Ok(())
    }

    /// Lazy pre-order walk over the whole forest.
    pub fn walk(&self, flags: Traversal) -> Walk<'_, T> {
        Walk::new(self, &self.roots, flags)
    }

    /// Lazy pre-order walk starting at `starts`.
    pub fn walk_from(&self, starts: &[NodeId], flags: Traversal) -> Walk<'_, T> {
        Walk::new(self, starts, flags)
    }

    /// Visits nodes below `starts` in pre-order until `visitor` returns
    /// `true`. Returns whether the visitor stopped the walk.
    pub fn traverse<F>(&self, flags: Traversal, starts: &[NodeId], mut visitor: F) -> bool
    where
        F: FnMut(NodeId, &T) -> bool,
    {
        self.walk_from(starts, flags)
            .any(|(id, node)| visitor(id, node))
    }

    /// Collects placeholders from every effectively enabled leaf.
    pub fn fill_with_nameable_keys(&self, keys: &mut NameableKeys) {
        for (_, node) in self.walk(Traversal::EXCLUDE_DISABLED | Traversal::EXCLUDE_CONTAINERS) {
            node.fill_nameable_keys(keys);
        }
    }

    /// Substitutes placeholders in every effectively enabled leaf.
    pub fn apply_nameable_keys(&mut self, keys: &NameableKeys) {
        let targets: Vec<NodeId> = self
            .walk(Traversal::EXCLUDE_DISABLED | Traversal::EXCLUDE_CONTAINERS)
            .map(|(id, _)| id)
            .collect();
        for id in targets {
            if let Some(node) = self.get_mut(id) {
                node.apply_nameable_keys(keys);
            }
        }
    }

    pub fn clear_unused_fields(&mut self) {
        for slot in self.slots_mut() {
            slot.node.clear_unused_fields_for_type();
        }
    }

    /// Gives every node a fresh identifier of the same kind.
    pub fn regenerate_ids(&mut self) {
        for slot in self.slots_mut() {
            slot.node.regenerate_ids();
        }
    }

    fn slot(&self, id: NodeId) -> Result<&Slot<T>, TreeError> {
        self.entries
            .get(id.index())
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.slot.as_ref())
            .ok_or(TreeError::NodeNotFound(id))
    }

    fn slot_mut(&mut self, id: NodeId) -> Result<&mut Slot<T>, TreeError> {
        self.entries
            .get_mut(id.index())
            .filter(|entry| entry.generation == id.generation)
            .and_then(|entry| entry.slot.as_mut())
            .ok_or(TreeError::NodeNotFound(id))
    }

    fn slots_mut(&mut self) -> impl Iterator<Item = &mut Slot<T>> {
        self.entries.iter_mut().filter_map(|entry| entry.slot.as_mut())
    }

    /// Empties the slot of `id` and queues it for reuse.
    fn release(&mut self, id: NodeId) -> Option<Slot<T>> {
        let entry = self
            .entries
            .get_mut(id.index())
            .filter(|entry| entry.generation == id.generation)?;
        let slot = entry.slot.take()?;
        entry.generation = entry.generation.wrapping_add(1);
        self.free.push(id.index);
        self.live -= 1;
        Some(slot)
    }

    fn require_container(&self, id: NodeId) -> Result<(), TreeError> {
        let node = self.node(id)?;
        if node.is_container() {
            Ok(())
        } else {
            Err(TreeError::NotAContainer(node.id()))
        }
    }

    fn siblings(&self, parent: Option<NodeId>) -> &[NodeId] {
        match parent {
            Some(parent) => self.children(parent),
            None => &self.roots,
        }
    }

    fn siblings_mut(&mut self, parent: Option<NodeId>) -> Result<&mut Vec<NodeId>, TreeError> {
        match parent {
            Some(parent) => Ok(&mut self.slot_mut(parent)?.children),
            None => Ok(&mut self.roots),
        }
    }

    /// Appends a node without validating the parent.
    pub(super) fn attach(&mut self, parent: Option<NodeId>, node: T) -> NodeId {
        let slot = Slot {
            node,
            parent,
            children: Vec::new(),
        };
        let id = match self.free.pop() {
            Some(index) => {
                let entry = &mut self.entries[index as usize];
                entry.slot = Some(slot);
                NodeId {
                    index,
                    generation: entry.generation,
                }
            }
            None => {
                self.entries.push(Entry {
                    generation: 0,
                    slot: Some(slot),
                });
                NodeId::from_index(self.entries.len() - 1)
            }
        };
        self.live += 1;
        match parent.and_then(|parent| self.slot_mut(parent).ok()) {
            Some(slot) => slot.children.push(id),
            None => self.roots.push(id),
        }
        id
    }

    /// Moves the subtree at `id` out of `self` and appends it to `target`.
    fn transplant(&mut self, id: NodeId, target: &mut NodeTree<T>, parent: Option<NodeId>) -> Option<NodeId> {
        let Slot { node, children, .. } = self.release(id)?;
        let new_id = target.attach(parent, node);
        for child in children {
            self.transplant(child, target, Some(new_id));
        }
        Some(new_id)
    }

    fn copy_into(&self, id: NodeId, target: &mut NodeTree<T>, parent: Option<NodeId>, preserve_ids: bool) {
        let Ok(slot) = self.slot(id) else {
            return;
        };
        let mut node = slot.node.clone();
        if !preserve_ids {
            node.regenerate_ids();
        }
        let new_id = target.attach(parent, node);
        for &child in &slot.children {
            self.copy_into(child, target, Some(new_id), preserve_ids);
        }
    }

    fn for_each_in_subtree(&mut self, root: NodeId, mut f: impl FnMut(&mut T)) {
        let ids: Vec<NodeId> = self
            .walk_from(&[root], Traversal::empty())
            .map(|(id, _)| id)
            .collect();
        for id in ids {
            if let Some(node) = self.get_mut(id) {
                f(node);
            }
        }
    }
}
