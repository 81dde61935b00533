//! Generic container/leaf tree shared by every entity kind.
//!
//! Nodes live in an arena ([`NodeTree`]) addressed by [`NodeId`]; parent links
//! are indices, never owners. Queries that climb the tree (`depth`,
//! `effectively_disabled`) walk parent links on every call and are O(depth).

mod arena;
mod node;
mod rows;
mod shared;
mod traverse;

pub use arena::{NodeId, NodeTree};
pub use node::Node;
pub use shared::SharedTree;
pub use traverse::{Traversal, Walk};
