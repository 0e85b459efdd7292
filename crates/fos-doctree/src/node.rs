//! DOM Node - Arena representation
//!
//! Links are stored as `NodeId` with `NodeId::NONE` for "absent", so a node is
//! a flat record with no heap pointers of its own apart from its payload.

use crate::{CharData, InternedString, NodeId};

/// Node type enumeration, with the DOM numeric codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NodeType {
    Element,
    Attribute,
    Text,
    CDataSection,
    ProcessingInstruction,
    Comment,
    Document,
    DocumentType,
    DocumentFragment,
}

impl NodeType {
    /// DOM `nodeType` code
    pub fn code(self) -> u32 {
        match self {
            NodeType::Element => 1,
            NodeType::Attribute => 2,
            NodeType::Text => 3,
            NodeType::CDataSection => 4,
            NodeType::ProcessingInstruction => 7,
            NodeType::Comment => 8,
            NodeType::Document => 9,
            NodeType::DocumentType => 10,
            NodeType::DocumentFragment => 11,
        }
    }

    /// Text-bearing kinds sharing the offset-based editing operations
    pub fn is_character_data(self) -> bool {
        matches!(
            self,
            NodeType::Text
                | NodeType::CDataSection
                | NodeType::Comment
                | NodeType::ProcessingInstruction
        )
    }

    /// Kinds that own a child sequence
    pub fn can_have_children(self) -> bool {
        matches!(
            self,
            NodeType::Document | NodeType::DocumentFragment | NodeType::Element
        )
    }
}

/// Namespace-qualified name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct QualName {
    /// Namespace URI
    pub ns: Option<InternedString>,
    /// Namespace prefix
    pub prefix: Option<InternedString>,
    /// Local name
    pub local: InternedString,
}

impl QualName {
    /// Name with no namespace and no prefix
    pub fn local(local: InternedString) -> Self {
        Self {
            ns: None,
            prefix: None,
            local,
        }
    }
}

/// DOM Node - Core structure
#[derive(Debug, Clone)]
pub struct Node {
    pub(crate) parent: NodeId,
    pub(crate) first_child: NodeId,
    pub(crate) last_child: NodeId,
    pub(crate) prev_sibling: NodeId,
    pub(crate) next_sibling: NodeId,
    /// Owning document; a Document points at itself
    pub(crate) owner: NodeId,
    pub(crate) data: NodeData,
}

impl Node {
    pub(crate) fn new(owner: NodeId, data: NodeData) -> Self {
        Self {
            parent: NodeId::NONE,
            first_child: NodeId::NONE,
            last_child: NodeId::NONE,
            prev_sibling: NodeId::NONE,
            next_sibling: NodeId::NONE,
            owner,
            data,
        }
    }

    /// Node-specific payload
    #[inline]
    pub fn data(&self) -> &NodeData {
        &self.data
    }

    /// Kind tag
    pub fn node_type(&self) -> NodeType {
        match &self.data {
            NodeData::Document => NodeType::Document,
            NodeData::DocumentType { .. } => NodeType::DocumentType,
            NodeData::DocumentFragment => NodeType::DocumentFragment,
            NodeData::Element(_) => NodeType::Element,
            NodeData::Attribute(_) => NodeType::Attribute,
            NodeData::Text(_) => NodeType::Text,
            NodeData::CDataSection(_) => NodeType::CDataSection,
            NodeData::Comment(_) => NodeType::Comment,
            NodeData::ProcessingInstruction { .. } => NodeType::ProcessingInstruction,
        }
    }

    /// Check if this is an element
    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Check if this is text (CDATA sections count as text)
    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self.data, NodeData::Text(_) | NodeData::CDataSection(_))
    }

    #[inline]
    pub fn is_document(&self) -> bool {
        matches!(self.data, NodeData::Document)
    }

    #[inline]
    pub fn is_doctype(&self) -> bool {
        matches!(self.data, NodeData::DocumentType { .. })
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            _ => None,
        }
    }

    /// Get attribute data if this is an attribute
    #[inline]
    pub fn as_attr(&self) -> Option<&AttrData> {
        match &self.data {
            NodeData::Attribute(a) => Some(a),
            _ => None,
        }
    }

    #[inline]
    pub fn as_attr_mut(&mut self) -> Option<&mut AttrData> {
        match &mut self.data {
            NodeData::Attribute(a) => Some(a),
            _ => None,
        }
    }

    /// Character data of Text, CDATA, Comment and PI nodes
    pub fn character_data(&self) -> Option<&CharData> {
        match &self.data {
            NodeData::Text(s)
            | NodeData::CDataSection(s)
            | NodeData::Comment(s)
            | NodeData::ProcessingInstruction { data: s, .. } => Some(s),
            _ => None,
        }
    }

    pub(crate) fn character_data_mut(&mut self) -> Option<&mut CharData> {
        match &mut self.data {
            NodeData::Text(s)
            | NodeData::CDataSection(s)
            | NodeData::Comment(s)
            | NodeData::ProcessingInstruction { data: s, .. } => Some(s),
            _ => None,
        }
    }
}

/// Node-specific data
#[derive(Debug, Clone)]
pub enum NodeData {
    /// Document root
    Document,
    /// DOCTYPE
    DocumentType {
        name: InternedString,
        public_id: String,
        system_id: String,
    },
    /// Detached container whose children move as a batch
    DocumentFragment,
    /// Element
    Element(ElementData),
    /// Attribute, reachable only through its owner element
    Attribute(AttrData),
    /// Text content
    Text(CharData),
    /// CDATA section
    CDataSection(CharData),
    /// Comment
    Comment(CharData),
    /// Processing instruction
    ProcessingInstruction {
        target: InternedString,
        data: CharData,
    },
}

/// Element-specific data
#[derive(Debug, Clone)]
pub struct ElementData {
    /// Tag name (qualified)
    pub name: QualName,
    /// Attribute nodes in insertion order, unique per (namespace, local name)
    pub(crate) attrs: Vec<NodeId>,
}

impl ElementData {
    pub fn new(name: QualName) -> Self {
        Self {
            name,
            attrs: Vec::new(),
        }
    }

    /// Attribute node ids in insertion order
    pub fn attrs(&self) -> &[NodeId] {
        &self.attrs
    }
}

/// Attribute-specific data
#[derive(Debug, Clone)]
pub struct AttrData {
    pub name: QualName,
    pub value: String,
    /// Element currently holding this attribute (NONE if detached)
    pub(crate) owner_element: NodeId,
}

impl AttrData {
    pub fn new(name: QualName, value: String) -> Self {
        Self {
            name,
            value,
            owner_element: NodeId::NONE,
        }
    }

    pub fn owner_element(&self) -> Option<NodeId> {
        self.owner_element.to_option()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_type_codes() {
        assert_eq!(NodeType::Element.code(), 1);
        assert_eq!(NodeType::Attribute.code(), 2);
        assert_eq!(NodeType::Text.code(), 3);
        assert_eq!(NodeType::CDataSection.code(), 4);
        assert_eq!(NodeType::ProcessingInstruction.code(), 7);
        assert_eq!(NodeType::Comment.code(), 8);
        assert_eq!(NodeType::Document.code(), 9);
        assert_eq!(NodeType::DocumentType.code(), 10);
        assert_eq!(NodeType::DocumentFragment.code(), 11);
    }

    #[test]
    fn test_node_kinds() {
        let text = Node::new(NodeId(0), NodeData::Text(CharData::from("hi")));
        assert!(text.is_text());
        assert_eq!(text.character_data().unwrap(), "hi");
        assert!(text.node_type().is_character_data());
        assert!(!text.node_type().can_have_children());

        let elem = Node::new(
            NodeId(0),
            NodeData::Element(ElementData::new(QualName::local(InternedString(7)))),
        );
        assert!(elem.is_element());
        assert!(elem.node_type().can_have_children());
        assert!(elem.character_data().is_none());
        assert!(!elem.parent.is_valid());
    }
}
