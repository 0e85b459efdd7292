//! DOM Node Operations
//!
//! Core tree mutation: appendChild, insertBefore, removeChild, replaceChild.
//!
//! Every public operation runs all of its checks before touching a link, so
//! a failed call leaves the tree unchanged. Inserting a node that is already
//! attached moves it: it is unlinked from its old parent as part of the same
//! step that links it into the new one.

use crate::{CharData, DomError, DomResult, DomTree, NodeData, NodeId, NodeType};

/// What the Document constraint check is validating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Placement {
    /// Insert before `child` (append when NONE)
    Insert,
    /// Take the place of `child`
    Replace,
}

impl DomTree {
    /// Append `node` as the last child of `parent`
    pub fn append_child(&mut self, parent: NodeId, node: NodeId) -> DomResult<NodeId> {
        self.pre_insert(node, parent, None)
    }

    /// Insert `node` before `child`, or append when `child` is `None`
    pub fn insert_before(
        &mut self,
        parent: NodeId,
        node: NodeId,
        child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.pre_insert(node, parent, child)
    }

    /// Remove `child` from `parent`, returning it as an unattached root
    pub fn remove_child(&mut self, parent: NodeId, child: NodeId) -> DomResult<NodeId> {
        self.node(parent)?;
        if self.node(child)?.parent != parent {
            return Err(DomError::NotFound);
        }
        self.unlink(child);
        Ok(child)
    }

    /// Detach `node` from its parent, if it has one
    pub fn detach(&mut self, node: NodeId) -> DomResult<()> {
        if self.node(node)?.parent.is_valid() {
            self.unlink(node);
        }
        Ok(())
    }

    /// Replace `child` of `parent` with `node`, returning `child`
    pub fn replace_child(
        &mut self,
        parent: NodeId,
        node: NodeId,
        child: NodeId,
    ) -> DomResult<NodeId> {
        self.node(child)?;
        self.check_parent_and_node(parent, node)?;
        if self.raw(child).parent != parent {
            return Err(DomError::NotFound);
        }
        self.check_node_kind(parent, node)?;
        if self.raw(parent).is_document() {
            self.check_document_child(parent, node, child, Placement::Replace)?;
        }

        let mut reference = self.raw(child).next_sibling;
        if reference == node {
            reference = self.raw(node).next_sibling;
        }

        let doc = self.node_document(parent);
        self.adopt_into(node, doc);
        if self.raw(child).parent.is_valid() {
            self.unlink(child);
        }
        self.insert(node, parent, reference);
        tracing::trace!("Replaced {:?} with {:?} in {:?}", child, node, parent);
        Ok(child)
    }

    /// Validate inserting `node` into `parent` before `child`
    pub fn pre_insertion_check(
        &self,
        parent: NodeId,
        node: NodeId,
        child: Option<NodeId>,
    ) -> DomResult<()> {
        if let Some(child) = child {
            self.node(child)?;
        }
        self.check_parent_and_node(parent, node)?;
        if let Some(child) = child {
            if self.raw(child).parent != parent {
                return Err(DomError::NotFound);
            }
        }
        self.check_node_kind(parent, node)?;
        if self.raw(parent).is_document() {
            self.check_document_child(parent, node, child.into(), Placement::Insert)?;
        }
        Ok(())
    }

    fn pre_insert(
        &mut self,
        node: NodeId,
        parent: NodeId,
        child: Option<NodeId>,
    ) -> DomResult<NodeId> {
        self.pre_insertion_check(parent, node, child)?;

        let mut reference = NodeId::from(child);
        if reference == node {
            reference = self.raw(node).next_sibling;
        }

        let doc = self.node_document(parent);
        self.adopt_into(node, doc);
        self.insert(node, parent, reference);
        Ok(node)
    }

    fn check_parent_and_node(&self, parent: NodeId, node: NodeId) -> DomResult<()> {
        let parent_type = self.node(parent)?.node_type();
        self.node(node)?;
        if !parent_type.can_have_children() {
            return Err(DomError::HierarchyRequest("parent cannot have children"));
        }
        if self.contains(node, parent) {
            return Err(DomError::HierarchyRequest(
                "node is an inclusive ancestor of the parent",
            ));
        }
        Ok(())
    }

    fn check_node_kind(&self, parent: NodeId, node: NodeId) -> DomResult<()> {
        let parent_is_document = self.raw(parent).is_document();
        match self.raw(node).node_type() {
            NodeType::Document => Err(DomError::HierarchyRequest("a document cannot be a child")),
            NodeType::Attribute => {
                Err(DomError::HierarchyRequest("an attribute cannot be a child"))
            }
            NodeType::Text | NodeType::CDataSection if parent_is_document => {
                Err(DomError::HierarchyRequest("text cannot be a child of a document"))
            }
            NodeType::DocumentType if !parent_is_document => Err(DomError::HierarchyRequest(
                "a doctype can only be a child of a document",
            )),
            _ => Ok(()),
        }
    }

    /// Singleton (and optional ordering) rules for Document children.
    /// `child` is the reference child for inserts and the replaced child
    /// for replacements.
    fn check_document_child(
        &self,
        doc: NodeId,
        node: NodeId,
        child: NodeId,
        placement: Placement,
    ) -> DomResult<()> {
        let excluded = if placement == Placement::Replace { child } else { NodeId::NONE };
        let has_other_element = self
            .child_nodes(doc)
            .any(|c| c != excluded && self.raw(c).is_element());

        match self.raw(node).node_type() {
            NodeType::DocumentFragment => {
                let mut elements = 0;
                for c in self.child_nodes(node) {
                    let n = self.raw(c);
                    if n.is_text() {
                        return Err(DomError::HierarchyRequest(
                            "text cannot be a child of a document",
                        ));
                    }
                    if n.is_element() {
                        elements += 1;
                    }
                }
                if elements > 1 {
                    return Err(DomError::HierarchyRequest(
                        "a document can only have one element child",
                    ));
                }
                if elements == 1 {
                    if has_other_element {
                        return Err(DomError::HierarchyRequest(
                            "document already has a document element",
                        ));
                    }
                    self.check_element_order(child, placement)?;
                }
            }
            NodeType::Element => {
                if has_other_element {
                    return Err(DomError::HierarchyRequest(
                        "document already has a document element",
                    ));
                }
                self.check_element_order(child, placement)?;
            }
            NodeType::DocumentType => {
                let has_other_doctype = self
                    .child_nodes(doc)
                    .any(|c| c != excluded && self.raw(c).is_doctype());
                if has_other_doctype {
                    return Err(DomError::HierarchyRequest("document already has a doctype"));
                }
                if self.config().enforce_doctype_order {
                    let element_before = match child.to_option() {
                        Some(child) => self
                            .child_nodes(doc)
                            .take_while(|&c| c != child)
                            .any(|c| self.raw(c).is_element()),
                        None => has_other_element,
                    };
                    if element_before {
                        return Err(DomError::HierarchyRequest(
                            "doctype must precede the document element",
                        ));
                    }
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn check_element_order(&self, child: NodeId, placement: Placement) -> DomResult<()> {
        if !self.config().enforce_doctype_order {
            return Ok(());
        }
        let Some(child) = child.to_option() else {
            return Ok(());
        };
        let mut cursor = match placement {
            Placement::Insert => child,
            Placement::Replace => self.raw(child).next_sibling,
        };
        while cursor.is_valid() {
            if self.raw(cursor).is_doctype() {
                return Err(DomError::HierarchyRequest(
                    "document element must follow the doctype",
                ));
            }
            cursor = self.raw(cursor).next_sibling;
        }
        Ok(())
    }

    /// Splice `node` (or a fragment's children) before `reference`.
    /// All checks must have passed and `node` must be adopted already.
    fn insert(&mut self, node: NodeId, parent: NodeId, reference: NodeId) {
        let nodes: Vec<NodeId> = if matches!(self.raw(node).data, NodeData::DocumentFragment) {
            let children: Vec<NodeId> = self.child_nodes(node).collect();
            for &c in &children {
                self.unlink(c);
            }
            children
        } else {
            if self.raw(node).parent.is_valid() {
                self.unlink(node);
            }
            vec![node]
        };

        for n in nodes {
            self.link_before(parent, n, reference);
            tracing::trace!("Inserted {:?} into {:?} before {:?}", n, parent, reference);
        }
    }

    pub(crate) fn link_before(&mut self, parent: NodeId, node: NodeId, reference: NodeId) {
        let prev = if reference.is_valid() {
            self.raw(reference).prev_sibling
        } else {
            self.raw(parent).last_child
        };

        {
            let n = self.node_mut(node);
            n.parent = parent;
            n.prev_sibling = prev;
            n.next_sibling = reference;
        }

        if prev.is_valid() {
            self.node_mut(prev).next_sibling = node;
        } else {
            self.node_mut(parent).first_child = node;
        }
        if reference.is_valid() {
            self.node_mut(reference).prev_sibling = node;
        } else {
            self.node_mut(parent).last_child = node;
        }
    }

    /// Cut `node` out of its parent's child list
    pub(crate) fn unlink(&mut self, node: NodeId) {
        let (parent, prev, next) = {
            let n = self.raw(node);
            (n.parent, n.prev_sibling, n.next_sibling)
        };
        if !parent.is_valid() {
            return;
        }

        if prev.is_valid() {
            self.node_mut(prev).next_sibling = next;
        } else {
            self.node_mut(parent).first_child = next;
        }
        if next.is_valid() {
            self.node_mut(next).prev_sibling = prev;
        } else {
            self.node_mut(parent).last_child = prev;
        }

        let n = self.node_mut(node);
        n.parent = NodeId::NONE;
        n.prev_sibling = NodeId::NONE;
        n.next_sibling = NodeId::NONE;
        tracing::trace!("Removed {:?} from {:?}", node, parent);
    }

    /// DOM `textContent` setter
    pub fn set_text_content(&mut self, id: NodeId, text: &str) -> DomResult<()> {
        match self.node(id)?.node_type() {
            NodeType::Element | NodeType::DocumentFragment => {
                let children: Vec<NodeId> = self.child_nodes(id).collect();
                for c in children {
                    self.unlink(c);
                }
                if !text.is_empty() {
                    let doc = self.node_document(id);
                    let t = self.alloc(doc, NodeData::Text(CharData::from(text)));
                    self.link_before(id, t, NodeId::NONE);
                }
                Ok(())
            }
            NodeType::Document | NodeType::DocumentType => Ok(()),
            _ => self.set_node_value(id, text),
        }
    }

    /// Drop empty Text nodes and merge adjacent ones, recursively.
    /// The first non-empty Text node of a run keeps the merged data.
    pub fn normalize(&mut self, id: NodeId) -> DomResult<()> {
        self.node(id)?;
        let mut child = self.raw(id).first_child;
        while child.is_valid() {
            let next = self.raw(child).next_sibling;
            let text_len = match &self.raw(child).data {
                NodeData::Text(s) => Some(s.len()),
                _ => None,
            };
            match text_len {
                None => {
                    self.normalize(child)?;
                    child = next;
                    continue;
                }
                Some(0) => {
                    self.unlink(child);
                    child = next;
                    continue;
                }
                Some(_) => {}
            }

            let mut merged = CharData::new();
            let mut sibling = next;
            while sibling.is_valid() {
                let NodeData::Text(s) = &self.raw(sibling).data else {
                    break;
                };
                merged.push(s);
                let following = self.raw(sibling).next_sibling;
                self.unlink(sibling);
                sibling = following;
            }

            if !merged.is_empty() {
                if let NodeData::Text(s) = &mut self.node_mut(child).data {
                    s.push(&merged);
                }
            }
            child = sibling;
        }
        Ok(())
    }
}
