//! fOS Document Tree
//!
//! In-memory document tree with validated structural mutation.
//!
//! All nodes of every document live in a single arena ([`DomTree`]) and are
//! addressed by [`NodeId`]. Parent/child links are the only ownership edges;
//! the owner-document reference is a plain index lookup.
//!
//! # Example
//! ```rust
//! use fos_doctree::DomTree;
//!
//! let mut tree = DomTree::new();
//! let doc = tree.create_document();
//! let root = tree.create_element(doc, "root").unwrap();
//! tree.append_child(doc, root).unwrap();
//! assert_eq!(tree.document_element(doc), Some(root));
//! ```

mod character_data;
mod config;
mod document;
mod element;
mod error;
mod interner;
mod mutation;
mod names;
mod namespace;
mod node;
mod transfer;
mod tree;

pub use character_data::CharData;
pub use config::TreeConfig;
pub use error::{DomError, DomResult};
pub use interner::{InternedString, StringInterner};
pub use names::{validate_name, validate_qualified_name, validate_qname, XMLNS_NAMESPACE, XML_NAMESPACE};
pub use node::{AttrData, ElementData, Node, NodeData, NodeType, QualName};
pub use tree::{Ancestors, Children, Descendants, DomTree};

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Sentinel for "no node"
    pub const NONE: NodeId = NodeId(u32::MAX);

    /// Build an id from a raw arena index
    pub fn from_raw(raw: u32) -> Self {
        Self(raw)
    }

    /// Raw arena index
    pub fn raw(self) -> u32 {
        self.0
    }

    /// Check that this is not the `NONE` sentinel
    #[inline]
    pub fn is_valid(self) -> bool {
        self.0 != u32::MAX
    }

    /// Convert the sentinel into an `Option`
    #[inline]
    pub fn to_option(self) -> Option<NodeId> {
        if self.is_valid() { Some(self) } else { None }
    }

    #[inline]
    pub(crate) fn index(self) -> usize {
        self.0 as usize
    }
}

impl From<Option<NodeId>> for NodeId {
    fn from(id: Option<NodeId>) -> Self {
        id.unwrap_or(NodeId::NONE)
    }
}
