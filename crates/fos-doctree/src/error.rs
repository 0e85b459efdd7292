//! DOM operation errors
//!
//! Every failing operation leaves the tree exactly as it was before the call.

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// A name or data value violates lexical rules
    #[error("Invalid character: {0}")]
    InvalidCharacter(String),

    /// Qualified name and namespace URI do not fit together
    #[error("Namespace error: {0}")]
    Namespace(String),

    /// Mutation would break containment or cycle rules
    #[error("Hierarchy request error: {0}")]
    HierarchyRequest(&'static str),

    /// Referenced node is not where the caller claims
    #[error("Node not found")]
    NotFound,

    /// Operation does not apply to this node kind
    #[error("Not supported: {0}")]
    NotSupported(&'static str),

    /// Attribute already belongs to another element
    #[error("Attribute is in use by another element")]
    InUseAttribute,

    /// Id does not refer to a node of this tree
    #[error("Not a node: {0:?}")]
    UnknownNode(NodeId),

    /// Node is of the wrong kind for the operation
    #[error("Type error: expected {expected}")]
    TypeMismatch { expected: &'static str },
}

impl DomError {
    /// DOMException-style error name
    pub fn name(&self) -> &'static str {
        match self {
            Self::InvalidCharacter(_) => "InvalidCharacterError",
            Self::Namespace(_) => "NamespaceError",
            Self::HierarchyRequest(_) => "HierarchyRequestError",
            Self::NotFound => "NotFoundError",
            Self::NotSupported(_) => "NotSupportedError",
            Self::InUseAttribute => "InUseAttributeError",
            Self::UnknownNode(_) | Self::TypeMismatch { .. } => "TypeError",
        }
    }
}
