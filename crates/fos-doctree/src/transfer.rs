//! Cross-document transfer: cloneNode, importNode, adoptNode
//!
//! Cloning allocates new arena slots; adopting only rewrites owner indices
//! on an existing subtree, so the adopted node keeps its identity.

use crate::{DomError, DomResult, DomTree, NodeData, NodeId};

impl DomTree {
    /// Copy `node` (and its subtree when `deep`) within its own document.
    /// Cloning a Document yields a new Document.
    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> DomResult<NodeId> {
        self.node(node)?;
        let copy = self.clone_with_owner(node, None, deep)?;
        tracing::debug!("Cloned {:?} as {:?} (deep: {})", node, copy, deep);
        Ok(copy)
    }

    /// Copy a node from any document into `doc`; the source is untouched
    pub fn import_node(&mut self, doc: NodeId, node: NodeId, deep: bool) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        if self.node(node)?.is_document() {
            return Err(DomError::NotSupported("cannot import a document"));
        }
        let copy = self.clone_with_owner(node, Some(doc), deep)?;
        tracing::debug!("Imported {:?} into {:?} as {:?}", node, doc, copy);
        Ok(copy)
    }

    /// Move `node` and its subtree into `doc`, detaching it first
    pub fn adopt_node(&mut self, doc: NodeId, node: NodeId) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        if self.node(node)?.is_document() {
            return Err(DomError::NotSupported("cannot adopt a document"));
        }
        if let Some(element) = self.raw(node).as_attr().and_then(|a| a.owner_element()) {
            self.detach_attribute(element, node);
        }
        self.adopt_into(node, doc);
        Ok(node)
    }

    /// Detach `node` and restamp its owner document across the subtree,
    /// including element attributes. Callers have done all validation.
    pub(crate) fn adopt_into(&mut self, node: NodeId, doc: NodeId) {
        if self.raw(node).parent.is_valid() {
            self.unlink(node);
        }
        if self.raw(node).owner == doc {
            return;
        }

        let old = self.raw(node).owner;
        let subtree: Vec<NodeId> = std::iter::once(node).chain(self.descendants(node)).collect();
        let mut count = 0;
        for id in subtree {
            let attrs = self
                .raw(id)
                .as_element()
                .map(|e| e.attrs.clone())
                .unwrap_or_default();
            self.node_mut(id).owner = doc;
            count += 1;
            for attr in attrs {
                self.node_mut(attr).owner = doc;
                count += 1;
            }
        }
        tracing::debug!("Adopted {:?} from {:?} into {:?} ({} nodes)", node, old, doc, count);
    }

    fn clone_with_owner(
        &mut self,
        node: NodeId,
        owner: Option<NodeId>,
        deep: bool,
    ) -> DomResult<NodeId> {
        let owner = owner.unwrap_or_else(|| self.node_document(node));

        let (copy, children_owner) = match self.raw(node).data.clone() {
            NodeData::Document => {
                let copy = self.create_document();
                (copy, copy)
            }
            NodeData::Element(mut data) => {
                let source_attrs = std::mem::take(&mut data.attrs);
                let copy = self.alloc(owner, NodeData::Element(data));
                for attr in source_attrs {
                    let attr_copy = self.clone_with_owner(attr, Some(owner), false)?;
                    self.attach_attribute(copy, attr_copy);
                }
                (copy, owner)
            }
            NodeData::Attribute(mut data) => {
                data.owner_element = NodeId::NONE;
                (self.alloc(owner, NodeData::Attribute(data)), owner)
            }
            data => (self.alloc(owner, data), owner),
        };

        if deep {
            let children: Vec<NodeId> = self.child_nodes(node).collect();
            for child in children {
                let child_copy = self.clone_with_owner(child, Some(children_owner), true)?;
                self.append_child(copy, child_copy)?;
            }
        }
        Ok(copy)
    }
}
