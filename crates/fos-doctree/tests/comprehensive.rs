//! Comprehensive tests for fos-doctree
//!
//! Whole-tree behaviour across documents: structure, moves, transfer and
//! namespaces.

use fos_doctree::{DomError, DomTree, NodeId, NodeType, TreeConfig, XML_NAMESPACE};

/// Fresh tree, with traces printed when `RUST_LOG` is set
fn new_tree() -> DomTree {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    DomTree::new()
}

/// Every parent/sibling link in the subtree agrees with its neighbour
fn assert_links_consistent(tree: &DomTree, root: NodeId) {
    for parent in std::iter::once(root).chain(tree.descendants(root)) {
        let children: Vec<NodeId> = tree.child_nodes(parent).collect();
        assert_eq!(tree.first_child(parent), children.first().copied());
        assert_eq!(tree.last_child(parent), children.last().copied());
        for (i, &c) in children.iter().enumerate() {
            assert_eq!(tree.parent_node(c), Some(parent));
            let prev = if i == 0 { None } else { Some(children[i - 1]) };
            assert_eq!(tree.previous_sibling(c), prev);
            assert_eq!(tree.next_sibling(c), children.get(i + 1).copied());
        }
    }
}

// ============================================================================
// DOCUMENT STRUCTURE
// ============================================================================

#[test]
fn test_build_document() {
    let mut tree = new_tree();
    let doc = tree.create_document();
    let doctype = tree.create_document_type(doc, "html", "", "").unwrap();
    let comment = tree.create_comment(doc, "top").unwrap();
    let html = tree.create_element(doc, "html").unwrap();
    let body = tree.create_element(doc, "body").unwrap();
    let text = tree.create_text_node(doc, "Hello").unwrap();

    tree.append_child(doc, doctype).unwrap();
    tree.append_child(doc, comment).unwrap();
    tree.append_child(doc, html).unwrap();
    tree.append_child(html, body).unwrap();
    tree.append_child(body, text).unwrap();

    assert_eq!(tree.doctype(doc), Some(doctype));
    assert_eq!(tree.document_element(doc), Some(html));
    assert_eq!(tree.child_nodes(doc).collect::<Vec<_>>(), vec![doctype, comment, html]);
    assert_eq!(tree.text_content(html).as_deref(), Some("Hello"));
    assert_eq!(tree.text_content(doc), None);
    assert_eq!(tree.descendants(doc).count(), 5);
    assert_eq!(tree.ancestors(text).collect::<Vec<_>>(), vec![body, html, doc]);
    assert_eq!(tree.root_of(text), doc);
    assert_links_consistent(&tree, doc);
}

#[test]
fn test_document_element_tracks_children() {
    let mut tree = new_tree();
    let doc = tree.create_document();
    assert_eq!(tree.document_element(doc), None);

    let a = tree.create_element(doc, "a").unwrap();
    tree.append_child(doc, a).unwrap();
    assert_eq!(tree.document_element(doc), Some(a));

    let b = tree.create_element(doc, "b").unwrap();
    tree.replace_child(doc, b, a).unwrap();
    assert_eq!(tree.document_element(doc), Some(b));
    assert_eq!(tree.parent_node(a), None);

    tree.remove_child(doc, b).unwrap();
    assert_eq!(tree.document_element(doc), None);
    assert_eq!(tree.doctype(doc), None);
}

#[test]
fn test_create_xml_document() {
    let mut tree = new_tree();
    let scratch = tree.create_document();
    let doctype = tree.create_document_type(scratch, "svg", "-//W3C//DTD SVG 1.1//EN", "").unwrap();
    let doc = tree
        .create_xml_document(Some("http://www.w3.org/2000/svg"), "svg:svg", Some(doctype))
        .unwrap();

    assert_eq!(tree.doctype(doc), Some(doctype));
    assert_eq!(tree.owner_document(doctype), Some(doc));
    assert_eq!(tree.public_id(doctype), Some("-//W3C//DTD SVG 1.1//EN"));
    let root = tree.document_element(doc).unwrap();
    assert_eq!(tree.local_name(root), Some("svg"));
    assert_eq!(tree.prefix(root), Some("svg"));
    assert_eq!(tree.namespace_uri(root), Some("http://www.w3.org/2000/svg"));
    assert_eq!(tree.child_nodes(doc).collect::<Vec<_>>(), vec![doctype, root]);

    let empty = tree.create_xml_document(None, "", None).unwrap();
    assert!(!tree.has_child_nodes(empty));
}

#[test]
fn test_create_xml_document_validates_first() {
    let mut tree = new_tree();
    let before = tree.len();
    let err = tree.create_xml_document(None, "p:root", None).unwrap_err();
    assert_eq!(err.name(), "NamespaceError");
    assert_eq!(tree.len(), before);
}

// ============================================================================
// MOVES
// ============================================================================

#[test]
fn test_append_moves_between_parents() {
    let mut tree = new_tree();
    let doc = tree.create_document();
    let p1 = tree.create_element(doc, "p1").unwrap();
    let p2 = tree.create_element(doc, "p2").unwrap();
    let a = tree.create_element(doc, "a").unwrap();
    let b = tree.create_element(doc, "b").unwrap();
    tree.append_child(p1, a).unwrap();
    tree.append_child(p1, b).unwrap();

    tree.append_child(p2, a).unwrap();
    assert_eq!(tree.child_nodes(p1).collect::<Vec<_>>(), vec![b]);
    assert_eq!(tree.child_nodes(p2).collect::<Vec<_>>(), vec![a]);
    assert_eq!(tree.parent_node(a), Some(p2));
    assert_links_consistent(&tree, p1);
    assert_links_consistent(&tree, p2);
}

#[test]
fn test_reorder_within_parent() {
    let mut tree = new_tree();
    let doc = tree.create_document();
    let parent = tree.create_element(doc, "parent").unwrap();
    let kids: Vec<NodeId> = ["a", "b", "c", "d"]
        .iter()
        .map(|n| tree.create_element(doc, n).unwrap())
        .collect();
    for &k in &kids {
        tree.append_child(parent, k).unwrap();
    }

    tree.insert_before(parent, kids[3], Some(kids[0])).unwrap();
    assert_eq!(
        tree.child_nodes(parent).collect::<Vec<_>>(),
        vec![kids[3], kids[0], kids[1], kids[2]]
    );

    tree.append_child(parent, kids[3]).unwrap();
    assert_eq!(tree.child_nodes(parent).collect::<Vec<_>>(), kids);

    // Inserting a node before itself leaves the order unchanged
    tree.insert_before(parent, kids[1], Some(kids[1])).unwrap();
    assert_eq!(tree.child_nodes(parent).collect::<Vec<_>>(), kids);
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_fragment_insert_empties_fragment() {
    let mut tree = new_tree();
    let doc = tree.create_document();
    let parent = tree.create_element(doc, "parent").unwrap();
    let last = tree.create_element(doc, "last").unwrap();
    tree.append_child(parent, last).unwrap();

    let frag = tree.create_document_fragment(doc).unwrap();
    let x = tree.create_element(doc, "x").unwrap();
    let y = tree.create_text_node(doc, "y").unwrap();
    tree.append_child(frag, x).unwrap();
    tree.append_child(frag, y).unwrap();

    assert_eq!(tree.insert_before(parent, frag, Some(last)), Ok(frag));
    assert!(!tree.has_child_nodes(frag));
    assert_eq!(tree.child_nodes(parent).collect::<Vec<_>>(), vec![x, y, last]);
    assert_eq!(tree.parent_node(frag), None);
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_replace_with_self_keeps_position() {
    let mut tree = new_tree();
    let doc = tree.create_document();
    let parent = tree.create_element(doc, "parent").unwrap();
    let a = tree.create_element(doc, "a").unwrap();
    let b = tree.create_element(doc, "b").unwrap();
    tree.append_child(parent, a).unwrap();
    tree.append_child(parent, b).unwrap();

    assert_eq!(tree.replace_child(parent, a, a), Ok(a));
    assert_eq!(tree.child_nodes(parent).collect::<Vec<_>>(), vec![a, b]);
}

#[test]
fn test_replace_with_following_sibling() {
    let mut tree = new_tree();
    let doc = tree.create_document();
    let parent = tree.create_element(doc, "parent").unwrap();
    let a = tree.create_element(doc, "a").unwrap();
    let b = tree.create_element(doc, "b").unwrap();
    let c = tree.create_element(doc, "c").unwrap();
    for n in [a, b, c] {
        tree.append_child(parent, n).unwrap();
    }

    assert_eq!(tree.replace_child(parent, b, a), Ok(a));
    assert_eq!(tree.child_nodes(parent).collect::<Vec<_>>(), vec![b, c]);
    assert_eq!(tree.parent_node(a), None);
    assert_links_consistent(&tree, parent);
}

#[test]
fn test_replace_processing_instruction_with_element() {
    let mut tree = new_tree();
    let doc = tree.create_document();
    let doctype = tree.create_document_type(doc, "root", "", "").unwrap();
    let pi = tree.create_processing_instruction(doc, "target", "data").unwrap();
    let comment = tree.create_comment(doc, "c").unwrap();
    for n in [doctype, pi, comment] {
        tree.append_child(doc, n).unwrap();
    }

    let root = tree.create_element(doc, "root").unwrap();
    assert_eq!(tree.replace_child(doc, root, pi), Ok(pi));
    assert_eq!(tree.document_element(doc), Some(root));
    assert_eq!(tree.child_nodes(doc).collect::<Vec<_>>(), vec![doctype, root, comment]);
    assert_eq!(tree.target(pi), Some("target"));
}

// ============================================================================
// CROSS-DOCUMENT
// ============================================================================

#[test]
fn test_insert_adopts_from_other_document() {
    let mut tree = new_tree();
    let a = tree.create_document();
    let b = tree.create_document();
    let target = tree.create_element(b, "target").unwrap();
    let moved = tree.create_element(a, "moved").unwrap();
    let inner = tree.create_comment(a, "inner").unwrap();
    tree.append_child(moved, inner).unwrap();

    tree.append_child(target, moved).unwrap();
    assert_eq!(tree.owner_document(moved), Some(b));
    assert_eq!(tree.owner_document(inner), Some(b));
}

#[test]
fn test_clone_document_is_independent() {
    let mut tree = new_tree();
    let doc = tree.create_document();
    let doctype = tree.create_document_type(doc, "html", "", "").unwrap();
    let html = tree.create_element(doc, "html").unwrap();
    let text = tree.create_text_node(doc, "x").unwrap();
    tree.append_child(doc, doctype).unwrap();
    tree.append_child(doc, html).unwrap();
    tree.append_child(html, text).unwrap();
    tree.set_attribute(html, "lang", "en").unwrap();

    let clone = tree.clone_node(doc, true).unwrap();
    assert!(tree.is_equal_node(doc, clone));
    let cloned_html = tree.document_element(clone).unwrap();
    let cloned_doctype = tree.doctype(clone).unwrap();
    assert_ne!(cloned_html, html);
    assert_ne!(cloned_doctype, doctype);
    for n in tree.descendants(clone).collect::<Vec<_>>() {
        assert_eq!(tree.owner_document(n), Some(clone));
    }

    tree.set_attribute(cloned_html, "lang", "fr").unwrap();
    assert_eq!(tree.get_attribute(html, "lang"), Some("en"));
    assert!(!tree.is_equal_node(doc, clone));
}

#[test]
fn test_import_then_insert() {
    let mut tree = new_tree();
    let a = tree.create_document();
    let b = tree.create_document();
    let src = tree.create_element(a, "src").unwrap();
    tree.set_attribute(src, "id", "1").unwrap();
    let root = tree.create_element(b, "root").unwrap();
    tree.append_child(b, root).unwrap();

    let copy = tree.import_node(b, src, true).unwrap();
    tree.append_child(root, copy).unwrap();
    assert_eq!(tree.get_attribute(copy, "id"), Some("1"));
    assert_eq!(tree.owner_document(src), Some(a));
    assert_eq!(tree.parent_node(src), None);
}

// ============================================================================
// NAMESPACES
// ============================================================================

#[test]
fn test_namespaced_attributes() {
    let mut tree = new_tree();
    let doc = tree.create_document();
    let e = tree.create_element(doc, "e").unwrap();
    tree.set_attribute_ns(e, Some("urn:a"), "a:k", "1").unwrap();
    tree.set_attribute_ns(e, Some("urn:b"), "b:k", "2").unwrap();
    tree.set_attribute_ns(e, Some(XML_NAMESPACE), "xml:lang", "en").unwrap();

    assert_eq!(tree.attributes(e).len(), 3);
    assert_eq!(tree.get_attribute_ns(e, Some("urn:a"), "k"), Some("1"));
    assert_eq!(tree.get_attribute_ns(e, Some("urn:b"), "k"), Some("2"));
    assert_eq!(tree.get_attribute(e, "a:k"), Some("1"));
    assert_eq!(tree.lookup_namespace_uri(e, Some("xml")), Some(XML_NAMESPACE));

    // Same namespace and local name replaces the value, keeping the prefix
    tree.set_attribute_ns(e, Some("urn:a"), "other:k", "3").unwrap();
    assert_eq!(tree.attributes(e).len(), 3);
    assert_eq!(tree.get_attribute(e, "a:k"), Some("3"));

    tree.remove_attribute_ns(e, Some("urn:b"), "k").unwrap();
    assert!(!tree.has_attribute_ns(e, Some("urn:b"), "k"));
    assert_eq!(tree.attributes(e).len(), 2);
}

#[test]
fn test_prefix_lookup_through_tree() {
    let mut tree = new_tree();
    let doc = tree.create_xml_document(Some("urn:root"), "r:root", None).unwrap();
    let root = tree.document_element(doc).unwrap();
    let child = tree.create_element(doc, "child").unwrap();
    tree.append_child(root, child).unwrap();

    assert_eq!(tree.lookup_namespace_uri(child, Some("r")), Some("urn:root"));
    assert_eq!(tree.lookup_prefix(child, Some("urn:root")), Some("r"));
    assert_eq!(tree.lookup_namespace_uri(doc, Some("r")), Some("urn:root"));
    assert!(tree.is_default_namespace(child, None));
}

// ============================================================================
// CONFIGURATION
// ============================================================================

#[test]
fn test_doctype_order_is_opt_in() {
    let mut lenient = new_tree();
    let doc = lenient.create_document();
    let root = lenient.create_element(doc, "root").unwrap();
    let doctype = lenient.create_document_type(doc, "root", "", "").unwrap();
    lenient.append_child(doc, root).unwrap();
    assert!(lenient.append_child(doc, doctype).is_ok());

    let mut strict = DomTree::with_config(TreeConfig {
        enforce_doctype_order: true,
        ..TreeConfig::default()
    });
    let doc = strict.create_document();
    let root = strict.create_element(doc, "root").unwrap();
    let doctype = strict.create_document_type(doc, "root", "", "").unwrap();
    strict.append_child(doc, root).unwrap();
    assert!(matches!(
        strict.append_child(doc, doctype),
        Err(DomError::HierarchyRequest(_))
    ));
    assert!(strict.insert_before(doc, doctype, Some(root)).is_ok());

    // An element may not be placed ahead of the doctype
    strict.remove_child(doc, root).unwrap();
    assert!(matches!(
        strict.insert_before(doc, root, Some(doctype)),
        Err(DomError::HierarchyRequest(_))
    ));
    assert!(strict.append_child(doc, root).is_ok());
}

#[test]
fn test_node_types() {
    let mut tree = new_tree();
    let doc = tree.create_document();
    let cases = [
        (tree.create_element(doc, "e").unwrap(), NodeType::Element, "e"),
        (tree.create_attribute(doc, "a").unwrap(), NodeType::Attribute, "a"),
        (tree.create_text_node(doc, "t").unwrap(), NodeType::Text, "#text"),
        (tree.create_cdata_section(doc, "c").unwrap(), NodeType::CDataSection, "#cdata-section"),
        (tree.create_processing_instruction(doc, "pi", "").unwrap(), NodeType::ProcessingInstruction, "pi"),
        (tree.create_comment(doc, "c").unwrap(), NodeType::Comment, "#comment"),
        (tree.create_document_type(doc, "dt", "", "").unwrap(), NodeType::DocumentType, "dt"),
        (tree.create_document_fragment(doc).unwrap(), NodeType::DocumentFragment, "#document-fragment"),
        (doc, NodeType::Document, "#document"),
    ];
    for (id, ty, name) in cases {
        assert_eq!(tree.node_type(id), Ok(ty));
        assert_eq!(tree.node_name(id).unwrap(), name);
    }
}
