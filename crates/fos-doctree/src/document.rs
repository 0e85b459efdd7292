//! Document - node factories and document-level views
//!
//! Every factory stamps the new node with the owning document. The
//! `documentElement` and `doctype` views are recomputed from the child list
//! on each read, so they can never drift from it.

use crate::names::{validate_name, validate_qname, validate_qualified_name};
use crate::{AttrData, CharData, DomError, DomResult, DomTree, ElementData, NodeData, NodeId, QualName};

impl DomTree {
    pub(crate) fn expect_document(&self, id: NodeId) -> DomResult<()> {
        if self.node(id)?.is_document() {
            Ok(())
        } else {
            Err(DomError::TypeMismatch { expected: "document" })
        }
    }

    /// Create a new empty document
    pub fn create_document(&mut self) -> NodeId {
        let doc = self.alloc(NodeId::NONE, NodeData::Document);
        tracing::debug!("Created document {:?}", doc);
        doc
    }

    /// Create an XML document, optionally with a doctype and a document element
    pub fn create_xml_document(
        &mut self,
        namespace: Option<&str>,
        qualified_name: &str,
        doctype: Option<NodeId>,
    ) -> DomResult<NodeId> {
        // Validate everything before the document exists
        if !qualified_name.is_empty() {
            validate_qualified_name(namespace, qualified_name)?;
        }
        if let Some(doctype) = doctype {
            if !self.node(doctype)?.is_doctype() {
                return Err(DomError::TypeMismatch { expected: "document type" });
            }
        }

        let doc = self.create_document();
        if let Some(doctype) = doctype {
            self.append_child(doc, doctype)?;
        }
        if !qualified_name.is_empty() {
            let element = self.create_element_ns(doc, namespace, qualified_name)?;
            self.append_child(doc, element)?;
        }
        Ok(doc)
    }

    /// Create an element with no namespace
    pub fn create_element(&mut self, doc: NodeId, name: &str) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        validate_name(name)?;
        let local = self.intern(name);
        let data = ElementData::new(QualName::local(local));
        Ok(self.alloc(doc, NodeData::Element(data)))
    }

    /// Create a namespaced element from a qualified name
    pub fn create_element_ns(
        &mut self,
        doc: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
    ) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        let name = self.validated_qual_name(namespace, qualified_name)?;
        Ok(self.alloc(doc, NodeData::Element(ElementData::new(name))))
    }

    pub(crate) fn validated_qual_name(
        &mut self,
        namespace: Option<&str>,
        qualified_name: &str,
    ) -> DomResult<QualName> {
        let (ns, prefix, local) = validate_qualified_name(namespace, qualified_name)?;
        Ok(QualName {
            ns: self.intern_opt(ns),
            prefix: self.intern_opt(prefix),
            local: self.intern(local),
        })
    }

    pub fn create_text_node(&mut self, doc: NodeId, data: &str) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        Ok(self.alloc(doc, NodeData::Text(CharData::from(data))))
    }

    pub fn create_comment(&mut self, doc: NodeId, data: &str) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        Ok(self.alloc(doc, NodeData::Comment(CharData::from(data))))
    }

    /// Create a CDATA section; `data` may not contain `]]>`
    pub fn create_cdata_section(&mut self, doc: NodeId, data: &str) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        if data.contains("]]>") {
            return Err(DomError::InvalidCharacter(
                "CDATA section data may not contain \"]]>\"".to_string(),
            ));
        }
        Ok(self.alloc(doc, NodeData::CDataSection(CharData::from(data))))
    }

    /// Create a processing instruction; `data` may not contain `?>`
    pub fn create_processing_instruction(
        &mut self,
        doc: NodeId,
        target: &str,
        data: &str,
    ) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        validate_name(target)?;
        if data.contains("?>") {
            return Err(DomError::InvalidCharacter(
                "processing instruction data may not contain \"?>\"".to_string(),
            ));
        }
        let target = self.intern(target);
        Ok(self.alloc(
            doc,
            NodeData::ProcessingInstruction {
                target,
                data: CharData::from(data),
            },
        ))
    }

    /// Create a detached attribute with no namespace
    pub fn create_attribute(&mut self, doc: NodeId, name: &str) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        validate_name(name)?;
        let local = self.intern(name);
        let data = AttrData::new(QualName::local(local), String::new());
        Ok(self.alloc(doc, NodeData::Attribute(data)))
    }

    /// Create a detached namespaced attribute
    pub fn create_attribute_ns(
        &mut self,
        doc: NodeId,
        namespace: Option<&str>,
        qualified_name: &str,
    ) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        let name = self.validated_qual_name(namespace, qualified_name)?;
        Ok(self.alloc(doc, NodeData::Attribute(AttrData::new(name, String::new()))))
    }

    pub fn create_document_type(
        &mut self,
        doc: NodeId,
        qualified_name: &str,
        public_id: &str,
        system_id: &str,
    ) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        validate_qname(qualified_name)?;
        let name = self.intern(qualified_name);
        Ok(self.alloc(
            doc,
            NodeData::DocumentType {
                name,
                public_id: public_id.to_string(),
                system_id: system_id.to_string(),
            },
        ))
    }

    pub fn create_document_fragment(&mut self, doc: NodeId) -> DomResult<NodeId> {
        self.expect_document(doc)?;
        Ok(self.alloc(doc, NodeData::DocumentFragment))
    }

    /// The single Element child of a document
    pub fn document_element(&self, doc: NodeId) -> Option<NodeId> {
        if !self.get(doc)?.is_document() {
            return None;
        }
        self.child_nodes(doc).find(|&c| self.raw(c).is_element())
    }

    /// The single DocumentType child of a document
    pub fn doctype(&self, doc: NodeId) -> Option<NodeId> {
        if !self.get(doc)?.is_document() {
            return None;
        }
        self.child_nodes(doc).find(|&c| self.raw(c).is_doctype())
    }

    pub fn doctype_name(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::DocumentType { name, .. } => Some(self.resolve(*name)),
            _ => None,
        }
    }

    pub fn public_id(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::DocumentType { public_id, .. } => Some(public_id),
            _ => None,
        }
    }

    pub fn system_id(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::DocumentType { system_id, .. } => Some(system_id),
            _ => None,
        }
    }

    /// Processing instruction target
    pub fn target(&self, id: NodeId) -> Option<&str> {
        match &self.get(id)?.data {
            NodeData::ProcessingInstruction { target, .. } => Some(self.resolve(*target)),
            _ => None,
        }
    }
}
