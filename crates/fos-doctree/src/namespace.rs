//! Namespace lookup
//!
//! lookupNamespaceURI / lookupPrefix / isDefaultNamespace walk from the
//! starting element up through ancestor elements. At each element its own
//! name is checked before its `xmlns` declarations, and the nearest
//! binding wins. Nodes with no element in scope bind nothing, not even the
//! reserved `xml` and `xmlns` prefixes.

use crate::{DomTree, InternedString, NodeData, NodeId, XMLNS_NAMESPACE, XML_NAMESPACE};

impl DomTree {
    /// Element at which a namespace walk starts for `node`
    fn namespace_scope(&self, node: NodeId) -> Option<NodeId> {
        match &self.get(node)?.data {
            NodeData::Element(_) => Some(node),
            NodeData::Document => self.document_element(node),
            NodeData::DocumentType { .. } | NodeData::DocumentFragment => None,
            NodeData::Attribute(attr) => attr.owner_element(),
            _ => self.parent_element(node),
        }
    }

    /// Namespace URI bound to `prefix` (`None` or `""` for the default namespace)
    pub fn lookup_namespace_uri(&self, node: NodeId, prefix: Option<&str>) -> Option<&str> {
        let prefix = prefix.filter(|p| !p.is_empty());
        let scope = self.namespace_scope(node)?;
        match prefix {
            Some("xml") => return Some(XML_NAMESPACE),
            Some("xmlns") => return Some(XMLNS_NAMESPACE),
            _ => {}
        }
        // A prefix that was never interned cannot be bound anywhere
        let prefix = match prefix {
            Some(p) => Some(self.interner().lookup(p)?),
            None => None,
        };

        let mut cursor = Some(scope);
        while let Some(element) = cursor {
            if let Some(found) = self.namespace_declared_on(element, prefix) {
                return found;
            }
            cursor = self.parent_element(element);
        }
        None
    }

    /// `Some(result)` when `element` settles the lookup for `prefix`
    fn namespace_declared_on(
        &self,
        element: NodeId,
        prefix: Option<InternedString>,
    ) -> Option<Option<&str>> {
        let data = self.raw(element).as_element()?;
        if let Some(ns) = data.name.ns {
            if data.name.prefix == prefix {
                return Some(Some(self.resolve(ns)));
            }
        }

        for &attr in data.attrs() {
            let Some(a) = self.raw(attr).as_attr() else {
                continue;
            };
            if a.name.ns != Some(InternedString::XMLNS_NS) {
                continue;
            }
            let declares = match prefix {
                Some(p) => a.name.prefix == Some(InternedString::XMLNS) && a.name.local == p,
                None => a.name.prefix.is_none() && a.name.local == InternedString::XMLNS,
            };
            if declares {
                let value = a.value.as_str();
                return Some(if value.is_empty() { None } else { Some(value) });
            }
        }
        None
    }

    /// Nearest prefix bound to `namespace`
    pub fn lookup_prefix(&self, node: NodeId, namespace: Option<&str>) -> Option<&str> {
        let namespace = namespace.filter(|ns| !ns.is_empty())?;
        let ns_atom = self.interner().lookup(namespace);

        let mut cursor = self.namespace_scope(node);
        while let Some(element) = cursor {
            let data = self.raw(element).as_element()?;
            if ns_atom.is_some() && data.name.ns == ns_atom {
                if let Some(prefix) = data.name.prefix {
                    return Some(self.resolve(prefix));
                }
            }
            for &attr in data.attrs() {
                let Some(a) = self.raw(attr).as_attr() else {
                    continue;
                };
                if a.name.prefix == Some(InternedString::XMLNS)
                    && a.name.ns == Some(InternedString::XMLNS_NS)
                    && a.value == namespace
                {
                    return Some(self.resolve(a.name.local));
                }
            }
            cursor = self.parent_element(element);
        }
        None
    }

    /// True if `namespace` is the default namespace in scope at `node`
    pub fn is_default_namespace(&self, node: NodeId, namespace: Option<&str>) -> bool {
        let namespace = namespace.filter(|ns| !ns.is_empty());
        self.lookup_namespace_uri(node, None) == namespace
    }
}
