//! Integration tests for CSS parsing and matching: grammar coverage,
//! document-order results, and the error/zero-match distinction.

use lemur_dom::{DomTree, NodeId};
use lemur_html::parse;
use lemur_select::{SelectorError, SelectorKind, evaluate, match_selector};

fn tree(html: &str) -> DomTree {
    parse(html).unwrap()
}

/// The page most tests run against:
///
/// ```text
/// 0 <div id="page">
/// 1   <ul class="nav">
/// 2     <li class="item">a
/// 3     <li class="item active">b
/// 4     <li class="item">c
/// 5   <section>
/// 6     <p>first
/// 7     <p class="note">second
/// 8     <input type="text" name="q">
/// ```
fn page() -> DomTree {
    tree(
        r#"<div id="page"><ul class="nav"><li class="item">a</li><li class="item active">b</li><li class="item">c</li></ul><section><p>first</p><p class="note">second</p><input type="text" name="q"></section></div>"#,
    )
}

fn ids(v: Vec<usize>) -> Vec<NodeId> {
    v.into_iter().map(NodeId).collect()
}

#[test]
fn test_type_selector_in_document_order() {
    let t = page();
    let matched = evaluate(&t, "li", SelectorKind::Css).unwrap();
    assert_eq!(matched, ids(vec![2, 3, 4]));
}

#[test]
fn test_universal_selector_matches_everything() {
    let t = page();
    let matched = evaluate(&t, "*", SelectorKind::Css).unwrap();
    assert_eq!(matched.len(), t.len());
    // Pre-order: the root comes first.
    assert_eq!(matched[0], t.root());
}

#[test]
fn test_class_and_id_selectors() {
    let t = page();
    assert_eq!(evaluate(&t, ".item", SelectorKind::Css).unwrap(), ids(vec![2, 3, 4]));
    assert_eq!(evaluate(&t, ".active", SelectorKind::Css).unwrap(), ids(vec![3]));
    assert_eq!(evaluate(&t, "#page", SelectorKind::Css).unwrap(), ids(vec![0]));
    assert_eq!(evaluate(&t, "li.active", SelectorKind::Css).unwrap(), ids(vec![3]));
}

#[test]
fn test_tag_match_is_case_insensitive() {
    let t = page();
    assert_eq!(evaluate(&t, "LI.item", SelectorKind::Css).unwrap(), ids(vec![2, 3, 4]));
}

#[test]
fn test_descendant_combinator() {
    let t = page();
    assert_eq!(evaluate(&t, "div li", SelectorKind::Css).unwrap(), ids(vec![2, 3, 4]));
    assert_eq!(evaluate(&t, "#page p", SelectorKind::Css).unwrap(), ids(vec![6, 7]));
    assert!(evaluate(&t, "p li", SelectorKind::Css).unwrap().is_empty());
}

#[test]
fn test_child_combinator() {
    let t = page();
    assert_eq!(evaluate(&t, "ul > li", SelectorKind::Css).unwrap(), ids(vec![2, 3, 4]));
    // li is a grandchild of div, not a child.
    assert!(evaluate(&t, "div > li", SelectorKind::Css).unwrap().is_empty());
}

#[test]
fn test_sibling_combinators() {
    let t = page();
    assert_eq!(evaluate(&t, "ul + section", SelectorKind::Css).unwrap(), ids(vec![5]));
    assert_eq!(evaluate(&t, "p + p", SelectorKind::Css).unwrap(), ids(vec![7]));
    assert!(evaluate(&t, "section + ul", SelectorKind::Css).unwrap().is_empty());
    assert_eq!(evaluate(&t, "p ~ input", SelectorKind::Css).unwrap(), ids(vec![8]));
    assert_eq!(
        evaluate(&t, ".item ~ li", SelectorKind::Css).unwrap(),
        ids(vec![3, 4])
    );
}

#[test]
fn test_descendant_matching_backtracks() {
    // The nearest `b` ancestor of `c` has no preceding `a` sibling; the
    // outer one does. A greedy nearest-ancestor matcher would miss this.
    let t = tree("<div><a>1</a><b><section><b><c>x</c></b></section></b></div>");
    let matched = evaluate(&t, "a + b c", SelectorKind::Css).unwrap();
    assert_eq!(matched.len(), 1);
    assert_eq!(t.get(matched[0]).unwrap().tag_name, "c");
}

#[test]
fn test_attribute_selectors() {
    let t = page();
    assert_eq!(evaluate(&t, "[type]", SelectorKind::Css).unwrap(), ids(vec![8]));
    assert_eq!(
        evaluate(&t, r#"[type="text"]"#, SelectorKind::Css).unwrap(),
        ids(vec![8])
    );
    assert!(evaluate(&t, r#"[type="password"]"#, SelectorKind::Css).unwrap().is_empty());
    assert_eq!(
        evaluate(&t, r#"[class~="active"]"#, SelectorKind::Css).unwrap(),
        ids(vec![3])
    );
    assert_eq!(
        evaluate(&t, "[name^=q]", SelectorKind::Css).unwrap(),
        ids(vec![8])
    );
    assert_eq!(
        evaluate(&t, r#"[class*="nav"]"#, SelectorKind::Css).unwrap(),
        ids(vec![1])
    );
}

#[test]
fn test_attribute_dash_match() {
    let t = tree(r#"<div><p lang="en">a</p><p lang="en-US">b</p><p lang="fr">c</p></div>"#);
    assert_eq!(
        evaluate(&t, "[lang|=en]", SelectorKind::Css).unwrap(),
        ids(vec![1, 2])
    );
}

#[test]
fn test_structural_pseudo_classes() {
    let t = page();
    assert_eq!(evaluate(&t, ":root", SelectorKind::Css).unwrap(), ids(vec![0]));
    assert_eq!(
        evaluate(&t, "li:first-child", SelectorKind::Css).unwrap(),
        ids(vec![2])
    );
    assert_eq!(
        evaluate(&t, "li:last-child", SelectorKind::Css).unwrap(),
        ids(vec![4])
    );
    assert_eq!(
        evaluate(&t, "p:first-of-type", SelectorKind::Css).unwrap(),
        ids(vec![6])
    );
    assert_eq!(
        evaluate(&t, "p:last-of-type", SelectorKind::Css).unwrap(),
        ids(vec![7])
    );
    // input is the last child of section but not the only one.
    assert!(evaluate(&t, "input:only-child", SelectorKind::Css).unwrap().is_empty());
}

#[test]
fn test_empty_pseudo_class() {
    let t = tree("<div><br><p>text</p><span></span></div>");
    let matched = evaluate(&t, ":empty", SelectorKind::Css).unwrap();
    // br and span; p has text, div has children.
    assert_eq!(matched.len(), 2);
}

#[test]
fn test_nth_child() {
    let t = page();
    assert_eq!(
        evaluate(&t, "li:nth-child(2)", SelectorKind::Css).unwrap(),
        ids(vec![3])
    );
    assert!(evaluate(&t, "li:nth-child(9)", SelectorKind::Css).unwrap().is_empty());
    // :nth-child counts all siblings, so section (second child of div)
    // matches :nth-child(2) as well.
    assert_eq!(
        evaluate(&t, ":nth-child(2)", SelectorKind::Css).unwrap(),
        ids(vec![3, 5, 7])
    );
}

#[test]
fn test_selector_list_unions_in_document_order() {
    let t = page();
    let matched = evaluate(&t, "input, .active, ul", SelectorKind::Css).unwrap();
    // Document order, not list order.
    assert_eq!(matched, ids(vec![1, 3, 8]));
}

#[test]
fn test_zero_matches_is_not_an_error() {
    let t = page();
    let result = match_selector(&t, ".nonexistent", SelectorKind::Css);
    assert_eq!(result.match_count(), 0);
    assert_eq!(result.error, None);
    assert!(!result.is_error());
}

#[test]
fn test_malformed_selector_is_an_error_not_a_crash() {
    let t = page();
    let result = match_selector(&t, "div[[[", SelectorKind::Css);
    assert!(result.is_error());
    assert!(result.matched.is_empty());

    // The two zero-match shapes are distinguishable.
    let empty = match_selector(&t, ".nonexistent", SelectorKind::Css);
    assert!(!empty.is_error());
}

#[test]
fn test_syntax_error_cases() {
    let t = page();
    for bad in ["", "   ", ">", "div >", "div,", ".", "#", "[", "[=x]", "div[attr", "'"] {
        let err = evaluate(&t, bad, SelectorKind::Css).unwrap_err();
        assert!(
            matches!(err, SelectorError::Syntax(_)),
            "{bad:?} should be a syntax error, got {err:?}"
        );
    }
}

#[test]
fn test_unsupported_constructs_are_reported() {
    let t = page();
    for out_of_subset in [
        ":hover",
        "li:nth-child(2n+1)",
        "li:nth-child(odd)",
        ":not(.item)",
        "::before",
        "p::first-line",
    ] {
        let err = evaluate(&t, out_of_subset, SelectorKind::Css).unwrap_err();
        assert!(
            matches!(err, SelectorError::Unsupported(_)),
            "{out_of_subset:?} should be unsupported, got {err:?}"
        );
    }
}

#[test]
fn test_error_message_names_the_construct() {
    let t = page();
    let result = match_selector(&t, "div:hover", SelectorKind::Css);
    assert!(result.error.unwrap().contains("hover"));
}

#[test]
fn test_matching_is_idempotent_and_order_stable() {
    let t = page();
    let first = match_selector(&t, "li.item", SelectorKind::Css);
    let second = match_selector(&t, "li.item", SelectorKind::Css);
    assert_eq!(first, second);
}
