//! Element attributes and element-only views
//!
//! Attributes are arena nodes kept in their element's ordered list, never in
//! a child sequence. An attribute belongs to at most one element at a time.

use crate::names::validate_name;
use crate::{AttrData, DomError, DomResult, DomTree, InternedString, NodeData, NodeId, QualName};

impl DomTree {
    pub(crate) fn expect_element(&self, id: NodeId) -> DomResult<()> {
        if self.node(id)?.is_element() {
            Ok(())
        } else {
            Err(DomError::TypeMismatch { expected: "element" })
        }
    }

    fn name_of(&self, id: NodeId) -> Option<&QualName> {
        match &self.get(id)?.data {
            NodeData::Element(e) => Some(&e.name),
            NodeData::Attribute(a) => Some(&a.name),
            _ => None,
        }
    }

    /// Qualified tag name of an element
    pub fn tag_name(&self, id: NodeId) -> Option<String> {
        let element = self.get(id)?.as_element()?;
        Some(self.qualified_name(&element.name))
    }

    /// Local name of an element or attribute
    pub fn local_name(&self, id: NodeId) -> Option<&str> {
        self.name_of(id).map(|n| self.resolve(n.local))
    }

    /// Namespace prefix of an element or attribute
    pub fn prefix(&self, id: NodeId) -> Option<&str> {
        self.name_of(id)?.prefix.map(|p| self.resolve(p))
    }

    /// Namespace URI of an element or attribute
    pub fn namespace_uri(&self, id: NodeId) -> Option<&str> {
        self.name_of(id)?.ns.map(|ns| self.resolve(ns))
    }

    // ------------------------------------------------------------------
    // Element views
    // ------------------------------------------------------------------

    /// Element children in order
    pub fn element_children(&self, id: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.child_nodes(id).filter(|&c| self.raw(c).is_element())
    }

    pub fn first_element_child(&self, id: NodeId) -> Option<NodeId> {
        self.element_children(id).next()
    }

    pub fn last_element_child(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.last_child(id);
        while let Some(c) = cursor {
            if self.raw(c).is_element() {
                return Some(c);
            }
            cursor = self.previous_sibling(c);
        }
        None
    }

    pub fn child_element_count(&self, id: NodeId) -> usize {
        self.element_children(id).count()
    }

    pub fn previous_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.previous_sibling(id);
        while let Some(c) = cursor {
            if self.raw(c).is_element() {
                return Some(c);
            }
            cursor = self.previous_sibling(c);
        }
        None
    }

    pub fn next_element_sibling(&self, id: NodeId) -> Option<NodeId> {
        let mut cursor = self.next_sibling(id);
        while let Some(c) = cursor {
            if self.raw(c).is_element() {
                return Some(c);
            }
            cursor = self.next_sibling(c);
        }
        None
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Attribute nodes of an element in insertion order
    pub fn attributes(&self, id: NodeId) -> &[NodeId] {
        self.get(id)
            .and_then(|n| n.as_element())
            .map(|e| e.attrs())
            .unwrap_or(&[])
    }

    /// Element an attribute is attached to
    pub fn owner_element(&self, attr: NodeId) -> Option<NodeId> {
        self.get(attr)?.as_attr()?.owner_element()
    }

    fn attr_data(&self, attr: NodeId) -> &AttrData {
        match &self.raw(attr).data {
            NodeData::Attribute(a) => a,
            _ => unreachable!("element attribute list holds only attributes"),
        }
    }

    pub(crate) fn attach_attribute(&mut self, element: NodeId, attr: NodeId) {
        if let Some(e) = self.node_mut(element).as_element_mut() {
            e.attrs.push(attr);
        }
        if let Some(a) = self.node_mut(attr).as_attr_mut() {
            a.owner_element = element;
        }
    }

    pub(crate) fn detach_attribute(&mut self, element: NodeId, attr: NodeId) {
        if let Some(e) = self.node_mut(element).as_element_mut() {
            e.attrs.retain(|&a| a != attr);
        }
        if let Some(a) = self.node_mut(attr).as_attr_mut() {
            a.owner_element = NodeId::NONE;
        }
    }

    /// First attribute whose qualified name is `name`
    pub fn get_attribute_node(&self, element: NodeId, name: &str) -> Option<NodeId> {
        self.attributes(element)
            .iter()
            .copied()
            .find(|&a| self.qualified_name(&self.attr_data(a).name) == name)
    }

    /// Attribute by namespace and local name
    pub fn get_attribute_node_ns(
        &self,
        element: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<NodeId> {
        let ns = match namespace.filter(|ns| !ns.is_empty()) {
            Some(ns) => Some(self.interner().lookup(ns)?),
            None => None,
        };
        let local = self.interner().lookup(local_name)?;
        self.find_attr(element, ns, local)
    }

    fn find_attr(
        &self,
        element: NodeId,
        ns: Option<InternedString>,
        local: InternedString,
    ) -> Option<NodeId> {
        self.attributes(element).iter().copied().find(|&a| {
            let name = &self.attr_data(a).name;
            name.ns == ns && name.local == local
        })
    }

    pub fn get_attribute(&self, element: NodeId, name: &str) -> Option<&str> {
        let attr = self.get_attribute_node(element, name)?;
        Some(&self.attr_data(attr).value)
    }

    pub fn get_attribute_ns(
        &self,
        element: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> Option<&str> {
        let attr = self.get_attribute_node_ns(element, namespace, local_name)?;
        Some(&self.attr_data(attr).value)
    }

    pub fn has_attribute(&self, element: NodeId, name: &str) -> bool {
        self.get_attribute_node(element, name).is_some()
    }

    pub fn has_attribute_ns(
        &self,
        element: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> bool {
        self.get_attribute_node_ns(element, namespace, local_name).is_some()
    }

    /// Set an attribute by qualified name, creating it without a namespace
    pub fn set_attribute(&mut self, element: NodeId, name: &str, value: &str) -> DomResult<()> {
        self.expect_element(element)?;
        validate_name(name)?;
        match self.get_attribute_node(element, name) {
            Some(attr) => self.set_node_value(attr, value),
            None => {
                let local = self.intern(name);
                let doc = self.node_document(element);
                let data = AttrData::new(QualName::local(local), value.to_string());
                let attr = self.alloc(doc, NodeData::Attribute(data));
                self.attach_attribute(element, attr);
                Ok(())
            }
        }
    }

    /// Set a namespaced attribute
    pub fn set_attribute_ns(
        &mut self,
        element: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
        value: &str,
    ) -> DomResult<()> {
        self.expect_element(element)?;
        let name = self.validated_qual_name(namespace, qualified_name)?;
        match self.find_attr(element, name.ns, name.local) {
            Some(attr) => self.set_node_value(attr, value),
            None => {
                let doc = self.node_document(element);
                let data = AttrData::new(name, value.to_string());
                let attr = self.alloc(doc, NodeData::Attribute(data));
                self.attach_attribute(element, attr);
                Ok(())
            }
        }
    }

    pub fn remove_attribute(&mut self, element: NodeId, name: &str) -> DomResult<()> {
        self.expect_element(element)?;
        if let Some(attr) = self.get_attribute_node(element, name) {
            self.detach_attribute(element, attr);
        }
        Ok(())
    }

    pub fn remove_attribute_ns(
        &mut self,
        element: NodeId,
        namespace: Option<&str>,
        local_name: &str,
    ) -> DomResult<()> {
        self.expect_element(element)?;
        if let Some(attr) = self.get_attribute_node_ns(element, namespace, local_name) {
            self.detach_attribute(element, attr);
        }
        Ok(())
    }

    /// Attach an attribute node, replacing one with the same namespace and
    /// local name. Returns the replaced attribute.
    pub fn set_attribute_node(&mut self, element: NodeId, attr: NodeId) -> DomResult<Option<NodeId>> {
        self.expect_element(element)?;
        let data = self
            .node(attr)?
            .as_attr()
            .ok_or(DomError::TypeMismatch { expected: "attribute" })?;
        let owner = data.owner_element;
        let name = data.name;
        if owner.is_valid() && owner != element {
            return Err(DomError::InUseAttribute);
        }

        let old = self.find_attr(element, name.ns, name.local);
        if old == Some(attr) {
            return Ok(old);
        }

        let doc = self.node_document(element);
        self.adopt_into(attr, doc);
        match old {
            Some(old) => {
                if let Some(e) = self.node_mut(element).as_element_mut() {
                    if let Some(slot) = e.attrs.iter_mut().find(|a| **a == old) {
                        *slot = attr;
                    }
                }
                if let Some(a) = self.node_mut(old).as_attr_mut() {
                    a.owner_element = NodeId::NONE;
                }
                if let Some(a) = self.node_mut(attr).as_attr_mut() {
                    a.owner_element = element;
                }
            }
            None => self.attach_attribute(element, attr),
        }
        Ok(old)
    }

    /// Detach `attr` from `element`
    pub fn remove_attribute_node(&mut self, element: NodeId, attr: NodeId) -> DomResult<NodeId> {
        self.expect_element(element)?;
        self.node(attr)?;
        if !self.attributes(element).contains(&attr) {
            return Err(DomError::NotFound);
        }
        self.detach_attribute(element, attr);
        Ok(attr)
    }
}
