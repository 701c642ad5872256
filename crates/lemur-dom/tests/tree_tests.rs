//! Tests for the element tree: builder invariants, traversal, path resolution.

use std::collections::HashMap;

use lemur_dom::{AttributesMap, DomTree, NodeId, TreeBuilder};

/// Build the small fixture tree used throughout:
///
/// ```text
/// <div id="main">
///   <ul class="nav wide">
///     <li>one</li>
///     <li>two</li>
///   </ul>
///   <p>tail</p>
/// </div>
/// ```
fn fixture() -> (DomTree, NodeId, NodeId, NodeId, NodeId, NodeId) {
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("id".to_string(), "main".to_string());
    let mut builder = TreeBuilder::new("div", attrs, None);

    let mut ul_attrs = HashMap::new();
    let _ = ul_attrs.insert("class".to_string(), "nav wide".to_string());
    let ul = builder.append(NodeId::ROOT, "ul", ul_attrs, None);
    let li1 = builder.append(ul, "li", HashMap::new(), Some("one".to_string()));
    let li2 = builder.append(ul, "li", HashMap::new(), Some("two".to_string()));
    let p = builder.append(NodeId::ROOT, "p", HashMap::new(), Some("tail".to_string()));

    (builder.finish(), NodeId::ROOT, ul, li1, li2, p)
}

#[test]
fn test_builder_assigns_sequential_ids() {
    let (tree, root, ul, li1, li2, p) = fixture();
    assert_eq!(tree.len(), 5);
    assert_eq!(root, NodeId(0));
    assert_eq!(ul, NodeId(1));
    assert_eq!(li1, NodeId(2));
    assert_eq!(li2, NodeId(3));
    assert_eq!(p, NodeId(4));
}

#[test]
fn test_builder_computes_depth_and_index() {
    let (tree, root, ul, li1, li2, p) = fixture();

    let root_node = tree.get(root).unwrap();
    assert_eq!(root_node.depth, 0);
    assert_eq!(root_node.index, 0);
    assert_eq!(root_node.parent, None);

    assert_eq!(tree.get(ul).unwrap().depth, 1);
    assert_eq!(tree.get(ul).unwrap().index, 0);
    assert_eq!(tree.get(p).unwrap().index, 1);

    assert_eq!(tree.get(li1).unwrap().depth, 2);
    assert_eq!(tree.get(li1).unwrap().index, 0);
    assert_eq!(tree.get(li2).unwrap().index, 1);
}

#[test]
fn test_children_index_invariant() {
    // children[i].index == i and children[i].depth == parent.depth + 1,
    // for every node in the tree.
    let (tree, ..) = fixture();
    for id in tree.iter() {
        let node = tree.get(id).unwrap();
        for (i, &child) in node.children.iter().enumerate() {
            let child_node = tree.get(child).unwrap();
            assert_eq!(child_node.index, i);
            assert_eq!(child_node.depth, node.depth + 1);
            assert_eq!(child_node.parent, Some(id));
        }
    }
}

#[test]
fn test_tag_name_is_lowercased() {
    let mut builder = TreeBuilder::new("DIV", HashMap::new(), None);
    let child = builder.append(NodeId::ROOT, "SpAn", HashMap::new(), None);
    let tree = builder.finish();

    assert_eq!(tree.get(tree.root()).unwrap().tag_name, "div");
    assert_eq!(tree.get(child).unwrap().tag_name, "span");
}

#[test]
fn test_whitespace_only_text_is_none() {
    let builder = TreeBuilder::new("div", HashMap::new(), Some("   \n\t ".to_string()));
    let tree = builder.finish();
    assert_eq!(tree.get(tree.root()).unwrap().text, None);
}

#[test]
fn test_preorder_iteration_is_document_order() {
    let (tree, root, ul, li1, li2, p) = fixture();
    let visited: Vec<NodeId> = tree.iter().collect();
    assert_eq!(visited, vec![root, ul, li1, li2, p]);
}

#[test]
fn test_ancestors_walk_to_root() {
    let (tree, root, ul, li1, ..) = fixture();
    let chain: Vec<NodeId> = tree.ancestors(li1).collect();
    assert_eq!(chain, vec![ul, root]);
    assert!(tree.ancestors(root).next().is_none());
}

#[test]
fn test_path_root_to_target() {
    let (tree, root, ul, _, li2, _) = fixture();
    assert_eq!(tree.path(li2), vec![root, ul, li2]);
    assert_eq!(tree.path(root), vec![root]);
}

#[test]
fn test_path_for_unknown_id_is_empty() {
    let (tree, ..) = fixture();
    assert!(tree.path(NodeId(999)).is_empty());
}

#[test]
fn test_is_descendant_of() {
    let (tree, root, ul, li1, _, p) = fixture();
    assert!(tree.is_descendant_of(li1, ul));
    assert!(tree.is_descendant_of(li1, root));
    assert!(!tree.is_descendant_of(ul, li1));
    assert!(!tree.is_descendant_of(p, ul));
    assert!(!tree.is_descendant_of(root, root));
}

#[test]
fn test_classes_preserve_document_order() {
    let (tree, _, ul, ..) = fixture();
    let classes: Vec<&str> = tree.get(ul).unwrap().classes().collect();
    assert_eq!(classes, vec!["nav", "wide"]);
    assert!(tree.get(ul).unwrap().has_class("wide"));
    assert!(!tree.get(ul).unwrap().has_class("narrow"));
}

#[test]
fn test_node_id_display_and_parse() {
    let id = NodeId(7);
    assert_eq!(id.to_string(), "node-7");
    assert_eq!("node-7".parse::<NodeId>().unwrap(), id);
    assert_eq!("7".parse::<NodeId>().unwrap(), id);
    assert!("node-x".parse::<NodeId>().is_err());
    assert!("".parse::<NodeId>().is_err());
}

#[test]
fn test_duplicate_attribute_last_wins() {
    // AttributesMap is a plain map: inserting the same key twice keeps the
    // later value, which is the contract parsers rely on.
    let mut attrs = AttributesMap::new();
    let _ = attrs.insert("class".to_string(), "first".to_string());
    let _ = attrs.insert("class".to_string(), "second".to_string());
    let builder = TreeBuilder::new("div", attrs, None);
    let tree = builder.finish();
    assert_eq!(tree.get(tree.root()).unwrap().attr("class"), Some("second"));
}
