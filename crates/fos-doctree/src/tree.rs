//! DOM Tree (arena-based allocation)
//!
//! One arena holds the nodes of every document created through it, which is
//! what lets adopt/import move or copy nodes between documents by simply
//! restamping owner indices. Nodes are never freed: a removed node stays in
//! the arena as an unattached root until the whole tree is dropped.

use std::borrow::Cow;

use crate::{
    CharData, DomError, DomResult, InternedString, Node, NodeData, NodeId, NodeType, QualName,
    StringInterner, TreeConfig,
};

/// Arena-based DOM tree
#[derive(Debug, Clone, Default)]
pub struct DomTree {
    nodes: Vec<Node>,
    interner: StringInterner,
    config: TreeConfig,
}

impl DomTree {
    /// Create a new empty DOM tree
    pub fn new() -> Self {
        Self::with_config(TreeConfig::default())
    }

    /// Create a tree with room for `capacity` nodes
    pub fn with_capacity(capacity: usize) -> Self {
        Self::with_config(TreeConfig {
            initial_capacity: capacity,
            ..TreeConfig::default()
        })
    }

    /// Create a tree with explicit configuration
    pub fn with_config(config: TreeConfig) -> Self {
        Self {
            nodes: Vec::with_capacity(config.initial_capacity),
            interner: StringInterner::new(),
            config,
        }
    }

    /// Active configuration
    pub fn config(&self) -> &TreeConfig {
        &self.config
    }

    /// Get a node by ID
    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    /// Get a node, failing with a type error for ids outside the arena
    pub fn node(&self, id: NodeId) -> DomResult<&Node> {
        self.nodes.get(id.index()).ok_or(DomError::UnknownNode(id))
    }

    /// Caller must have validated `id`
    #[inline]
    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.index()]
    }

    #[inline]
    pub(crate) fn raw(&self, id: NodeId) -> &Node {
        &self.nodes[id.index()]
    }

    pub(crate) fn alloc(&mut self, owner: NodeId, data: NodeData) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        let owner = if matches!(data, NodeData::Document) { id } else { owner };
        self.nodes.push(Node::new(owner, data));
        id
    }

    /// Number of nodes in the arena (attached or not)
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if tree is empty
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Name interner
    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Resolve an interned name
    #[inline]
    pub fn resolve(&self, s: InternedString) -> &str {
        self.interner.get(s)
    }

    pub(crate) fn intern(&mut self, s: &str) -> InternedString {
        self.interner.intern(s)
    }

    pub(crate) fn intern_opt(&mut self, s: Option<&str>) -> Option<InternedString> {
        s.map(|s| self.interner.intern(s))
    }

    /// `prefix:local` or `local`
    pub fn qualified_name(&self, name: &QualName) -> String {
        match name.prefix {
            Some(prefix) => format!("{}:{}", self.resolve(prefix), self.resolve(name.local)),
            None => self.resolve(name.local).to_string(),
        }
    }

    // ------------------------------------------------------------------
    // Navigation
    // ------------------------------------------------------------------

    pub fn node_type(&self, id: NodeId) -> DomResult<NodeType> {
        Ok(self.node(id)?.node_type())
    }

    pub fn parent_node(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent.to_option())
    }

    /// Parent, if it is an element
    pub fn parent_element(&self, id: NodeId) -> Option<NodeId> {
        self.parent_node(id)
            .filter(|&p| self.raw(p).is_element())
    }

    pub fn first_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.first_child.to_option())
    }

    pub fn last_child(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.last_child.to_option())
    }

    pub fn previous_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.prev_sibling.to_option())
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.next_sibling.to_option())
    }

    pub fn has_child_nodes(&self, id: NodeId) -> bool {
        self.first_child(id).is_some()
    }

    /// Owning document; `None` for a Document itself
    pub fn owner_document(&self, id: NodeId) -> Option<NodeId> {
        let node = self.get(id)?;
        if node.is_document() { None } else { Some(node.owner) }
    }

    /// Owning document, or the node itself when it is a Document
    #[inline]
    pub(crate) fn node_document(&self, id: NodeId) -> NodeId {
        self.raw(id).owner
    }

    /// Child nodes in order
    pub fn child_nodes(&self, id: NodeId) -> Children<'_> {
        Children {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// Ancestor chain, nearest first
    pub fn ancestors(&self, id: NodeId) -> Ancestors<'_> {
        Ancestors {
            tree: self,
            next: self.get(id).map_or(NodeId::NONE, |n| n.parent),
        }
    }

    /// Descendants in tree order, excluding `id`
    pub fn descendants(&self, id: NodeId) -> Descendants<'_> {
        Descendants {
            tree: self,
            root: id,
            next: self.get(id).map_or(NodeId::NONE, |n| n.first_child),
        }
    }

    /// True if `other` is `id` or one of its descendants
    pub fn contains(&self, id: NodeId, other: NodeId) -> bool {
        if self.get(id).is_none() || self.get(other).is_none() {
            return false;
        }
        other == id || self.ancestors(other).any(|a| a == id)
    }

    /// Root of the tree `id` currently belongs to
    pub fn root_of(&self, id: NodeId) -> NodeId {
        self.ancestors(id).last().unwrap_or(id)
    }

    // ------------------------------------------------------------------
    // Accessors
    // ------------------------------------------------------------------

    /// DOM `nodeName`
    pub fn node_name(&self, id: NodeId) -> DomResult<String> {
        let name = match &self.node(id)?.data {
            NodeData::Document => "#document".to_string(),
            NodeData::DocumentFragment => "#document-fragment".to_string(),
            NodeData::DocumentType { name, .. } => self.resolve(*name).to_string(),
            NodeData::Element(e) => self.qualified_name(&e.name),
            NodeData::Attribute(a) => self.qualified_name(&a.name),
            NodeData::Text(_) => "#text".to_string(),
            NodeData::CDataSection(_) => "#cdata-section".to_string(),
            NodeData::Comment(_) => "#comment".to_string(),
            NodeData::ProcessingInstruction { target, .. } => self.resolve(*target).to_string(),
        };
        Ok(name)
    }

    /// DOM `nodeValue`: attribute value or character data
    pub fn node_value(&self, id: NodeId) -> Option<Cow<'_, str>> {
        let node = self.get(id)?;
        match &node.data {
            NodeData::Attribute(a) => Some(Cow::Borrowed(a.value.as_str())),
            _ => node.character_data().map(|d| Cow::Owned(d.to_string_lossy())),
        }
    }

    /// Set `nodeValue`; no effect on kinds without a value
    pub fn set_node_value(&mut self, id: NodeId, value: &str) -> DomResult<()> {
        self.node(id)?;
        let node = self.node_mut(id);
        if let Some(attr) = node.as_attr_mut() {
            attr.value = value.to_string();
        } else if let Some(data) = node.character_data_mut() {
            *data = CharData::from(value);
        }
        Ok(())
    }

    /// DOM `textContent`
    pub fn text_content(&self, id: NodeId) -> Option<String> {
        let node = self.get(id)?;
        match &node.data {
            NodeData::Document | NodeData::DocumentType { .. } => None,
            NodeData::Element(_) | NodeData::DocumentFragment => {
                // Join code units first so pairs split across nodes decode whole
                let mut out = CharData::new();
                for d in self.descendants(id) {
                    if let NodeData::Text(s) | NodeData::CDataSection(s) = &self.raw(d).data {
                        out.push(s);
                    }
                }
                Some(out.to_string_lossy())
            }
            _ => self.node_value(id).map(Cow::into_owned),
        }
    }

    /// Structural equality (DOM `isEqualNode`)
    pub fn is_equal_node(&self, a: NodeId, b: NodeId) -> bool {
        let (Some(na), Some(nb)) = (self.get(a), self.get(b)) else {
            return false;
        };
        let same_payload = match (&na.data, &nb.data) {
            (NodeData::Document, NodeData::Document)
            | (NodeData::DocumentFragment, NodeData::DocumentFragment) => true,
            (
                NodeData::DocumentType { name: n1, public_id: p1, system_id: s1 },
                NodeData::DocumentType { name: n2, public_id: p2, system_id: s2 },
            ) => n1 == n2 && p1 == p2 && s1 == s2,
            (NodeData::Element(e1), NodeData::Element(e2)) => {
                e1.name == e2.name
                    && e1.attrs.len() == e2.attrs.len()
                    && e1.attrs.iter().all(|&x| {
                        e2.attrs.iter().any(|&y| self.is_equal_node(x, y))
                    })
            }
            (NodeData::Attribute(a1), NodeData::Attribute(a2)) => {
                a1.name.ns == a2.name.ns && a1.name.local == a2.name.local && a1.value == a2.value
            }
            (
                NodeData::ProcessingInstruction { target: t1, data: d1 },
                NodeData::ProcessingInstruction { target: t2, data: d2 },
            ) => t1 == t2 && d1 == d2,
            (NodeData::Text(x), NodeData::Text(y))
            | (NodeData::CDataSection(x), NodeData::CDataSection(y))
            | (NodeData::Comment(x), NodeData::Comment(y)) => x == y,
            _ => false,
        };
        if !same_payload {
            return false;
        }
        let mut left = self.child_nodes(a);
        let mut right = self.child_nodes(b);
        loop {
            match (left.next(), right.next()) {
                (None, None) => return true,
                (Some(x), Some(y)) if self.is_equal_node(x, y) => continue,
                _ => return false,
            }
        }
    }
}

/// Iterator over child nodes
pub struct Children<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Children<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.to_option()?;
        self.next = self.tree.raw(current).next_sibling;
        Some(current)
    }
}

/// Iterator over ancestors, nearest first
pub struct Ancestors<'a> {
    tree: &'a DomTree,
    next: NodeId,
}

impl Iterator for Ancestors<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.to_option()?;
        self.next = self.tree.raw(current).parent;
        Some(current)
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    tree: &'a DomTree,
    root: NodeId,
    next: NodeId,
}

impl Iterator for Descendants<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<NodeId> {
        let current = self.next.to_option()?;
        let node = self.tree.raw(current);
        self.next = if node.first_child.is_valid() {
            node.first_child
        } else {
            // Climb until a next sibling exists, stopping at the subtree root
            let mut cursor = current;
            loop {
                if cursor == self.root {
                    break NodeId::NONE;
                }
                let n = self.tree.raw(cursor);
                if n.next_sibling.is_valid() {
                    break n.next_sibling;
                }
                cursor = n.parent;
                if !cursor.is_valid() {
                    break NodeId::NONE;
                }
            }
        };
        Some(current)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_tree() {
        let tree = DomTree::new();
        assert!(tree.is_empty());
        assert!(tree.get(NodeId(999)).is_none());
        assert_eq!(tree.child_nodes(NodeId(999)).count(), 0);
        assert_eq!(tree.node(NodeId(5)).unwrap_err(), DomError::UnknownNode(NodeId(5)));
    }

    #[test]
    fn test_descendants_stay_in_subtree() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let a = tree.create_element(doc, "a").unwrap();
        let b = tree.create_element(doc, "b").unwrap();
        let c = tree.create_element(doc, "c").unwrap();
        let d = tree.create_element(doc, "d").unwrap();
        tree.append_child(doc, a).unwrap();
        tree.append_child(a, b).unwrap();
        tree.append_child(b, c).unwrap();
        tree.append_child(a, d).unwrap();

        let under_b: Vec<_> = tree.descendants(b).collect();
        assert_eq!(under_b, vec![c]);
        let under_doc: Vec<_> = tree.descendants(doc).collect();
        assert_eq!(under_doc, vec![a, b, c, d]);
        assert_eq!(tree.ancestors(c).collect::<Vec<_>>(), vec![b, a, doc]);
        assert_eq!(tree.root_of(c), doc);
    }

    #[test]
    fn test_node_names() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let text = tree.create_text_node(doc, "x").unwrap();
        let frag = tree.create_document_fragment(doc).unwrap();
        let pi = tree.create_processing_instruction(doc, "target", "data").unwrap();
        assert_eq!(tree.node_name(doc).unwrap(), "#document");
        assert_eq!(tree.node_name(text).unwrap(), "#text");
        assert_eq!(tree.node_name(frag).unwrap(), "#document-fragment");
        assert_eq!(tree.node_name(pi).unwrap(), "target");
        assert_eq!(tree.node_value(pi).as_deref(), Some("data"));
        assert_eq!(tree.node_value(doc), None);
    }

    #[test]
    fn test_text_content_concatenates() {
        let mut tree = DomTree::new();
        let doc = tree.create_document();
        let p = tree.create_element(doc, "p").unwrap();
        let t1 = tree.create_text_node(doc, "Hello, ").unwrap();
        let b = tree.create_element(doc, "b").unwrap();
        let t2 = tree.create_text_node(doc, "World").unwrap();
        let comment = tree.create_comment(doc, "ignored").unwrap();
        tree.append_child(p, t1).unwrap();
        tree.append_child(p, b).unwrap();
        tree.append_child(b, t2).unwrap();
        tree.append_child(p, comment).unwrap();
        assert_eq!(tree.text_content(p).as_deref(), Some("Hello, World"));
        assert_eq!(tree.text_content(doc), None);
    }
}
