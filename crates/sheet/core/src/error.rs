//! Common error infrastructure for sheet-core.
//!
//! This module provides the shared severity classification and the
//! [`SheetError`] trait implemented by every error enum in the workspace.
//! Concern-specific errors (e.g. [`TreeError`], the file loading errors in
//! `sheet-content`) are defined alongside the operations they guard.
//!
//! Per-entity data inconsistencies (an unknown modifier cost type, a missing
//! ancestry, an unresolvable embedded expression) are never errors: they are
//! logged through `tracing` and replaced with a safe default so a single bad
//! row never aborts loading a whole list.

use crate::tid::Tid;
use crate::tree::NodeId;

/// Severity level of an error, used for categorization and recovery strategies.
///
/// - **Recoverable**: the caller can retry, e.g. after fixing a file permission
/// - **Validation**: invalid input that should be rejected without retry
/// - **Internal**: a programming error such as a stale node handle
/// - **Fatal**: the data cannot be used at all
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    Recoverable,
    Validation,
    Internal,
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates an internal bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common trait for all sheet errors.
///
/// # Implementation Guidelines
///
/// - Use `#[derive(thiserror::Error)]` for the Display/Error impl
/// - Classify severity based on recoverability, not impact
/// - Return a stable, upper-case `error_code` per variant
pub trait SheetError: std::error::Error {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static string identifier for this error variant.
    fn error_code(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Errors raised by structural tree operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    /// The handle refers to a removed node or a node of another tree.
    #[error("node {0} not found")]
    NodeNotFound(NodeId),

    /// Children can only be attached to containers.
    #[error("node {0} is not a container")]
    NotAContainer(Tid),

    /// Moving a node below itself or one of its descendants.
    #[error("moving node {node} under {target} would create a cycle")]
    WouldCreateCycle { node: NodeId, target: NodeId },

    /// A container with children cannot become a leaf.
    #[error("container {0} still has children")]
    HasChildren(Tid),
}

impl SheetError for TreeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            TreeError::NodeNotFound(_) => ErrorSeverity::Internal,
            TreeError::NotAContainer(_)
            | TreeError::WouldCreateCycle { .. }
            | TreeError::HasChildren(_) => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            TreeError::NodeNotFound(_) => "TREE_NODE_NOT_FOUND",
            TreeError::NotAContainer(_) => "TREE_NOT_A_CONTAINER",
            TreeError::WouldCreateCycle { .. } => "TREE_WOULD_CREATE_CYCLE",
            TreeError::HasChildren(_) => "TREE_HAS_CHILDREN",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tid::EntityKind;

    #[test]
    fn tree_errors_are_classified() {
        let missing = TreeError::NodeNotFound(NodeId::from_index(3));
        assert!(missing.severity().is_internal());
        assert_eq!(missing.error_code(), "TREE_NODE_NOT_FOUND");

        let leaf = TreeError::NotAContainer(Tid::new(EntityKind::Trait));
        assert_eq!(leaf.severity(), ErrorSeverity::Validation);
        assert!(!leaf.severity().is_recoverable());
    }
}
