use crate::nameables::NameableKeys;
use crate::sheet::SheetRef;
use crate::tid::{EntityKind, KindFamily, Tid};

/// Capability contract shared by every entity kind stored in a
/// [`NodeTree`](super::NodeTree).
///
/// Structure (parent, children, depth) lives in the tree; a node only knows
/// its own fields. Container-ness is encoded in the node's [`Tid`], so
/// conversions go through [`set_id`](Node::set_id) followed by
/// [`clear_unused_fields_for_type`](Node::clear_unused_fields_for_type).
pub trait Node: Clone {
    /// Family this kind's identifiers belong to.
    const FAMILY: KindFamily;

    /// Creates a node with a fresh id and the kind label as its name.
    fn new_node(container: bool) -> Self;

    fn id(&self) -> Tid;

    fn set_id(&mut self, id: Tid);

    fn is_container(&self) -> bool {
        self.id().is_container()
    }

    fn kind(&self) -> EntityKind {
        self.id().kind()
    }

    fn kind_label(&self) -> &'static str {
        self.kind().label()
    }

    /// The node's own flag, ignoring ancestors. Kinds without a disabled
    /// field are always enabled.
    fn is_self_enabled(&self) -> bool {
        true
    }

    fn set_enabled(&mut self, _enabled: bool) {}

    fn is_open(&self) -> bool;

    fn set_open(&mut self, open: bool);

    /// Resets fields that do not apply to the current container-ness.
    fn clear_unused_fields_for_type(&mut self);

    fn owner(&self) -> Option<&SheetRef>;

    fn set_owner(&mut self, owner: Option<SheetRef>);

    /// Gives this node, and anything nested inside it, fresh identifiers of
    /// the same kinds.
    fn regenerate_ids(&mut self) {
        self.set_id(Tid::new(self.kind()));
    }

    /// Records the `@key@` placeholders of this node's text fields.
    /// Containers and self-disabled nodes contribute nothing.
    fn fill_nameable_keys(&self, keys: &mut NameableKeys);

    /// Substitutes placeholders in this node's text fields.
    fn apply_nameable_keys(&mut self, keys: &NameableKeys);
}
