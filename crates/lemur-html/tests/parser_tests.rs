//! Integration tests for the forgiving parser: recovery rules, root
//! selection, attribute and text handling.

use lemur_dom::{DomTree, NodeId};
use lemur_html::{ParseError, parse};

/// Parse or panic; the fixtures here are all parseable.
fn tree(html: &str) -> DomTree {
    parse(html).unwrap()
}

fn tag(tree: &DomTree, id: NodeId) -> String {
    tree.get(id).unwrap().tag_name.clone()
}

#[test]
fn test_single_element() {
    let t = tree("<div></div>");
    assert_eq!(t.len(), 1);
    assert_eq!(tag(&t, t.root()), "div");
}

#[test]
fn test_nested_elements_document_order() {
    let t = tree("<div><ul><li>a</li><li>b</li></ul><p>c</p></div>");
    let tags: Vec<String> = t.iter().map(|id| tag(&t, id)).collect();
    assert_eq!(tags, vec!["div", "ul", "li", "li", "p"]);
}

#[test]
fn test_attributes_parsed() {
    let t = tree(r#"<input type="text" name='q' disabled data-x=7>"#);
    let root = t.get(t.root()).unwrap();
    assert_eq!(root.tag_name, "input");
    assert_eq!(root.attr("type"), Some("text"));
    assert_eq!(root.attr("name"), Some("q"));
    assert_eq!(root.attr("disabled"), Some(""));
    assert_eq!(root.attr("data-x"), Some("7"));
}

#[test]
fn test_duplicate_attribute_last_wins() {
    let t = tree(r#"<div class="first" class="second"></div>"#);
    assert_eq!(t.get(t.root()).unwrap().attr("class"), Some("second"));
}

#[test]
fn test_direct_text_only() {
    // Only the element's own text counts, not descendants'.
    let t = tree("<div>hello <span>inner</span></div>");
    let root = t.get(t.root()).unwrap();
    assert_eq!(root.text.as_deref(), Some("hello"));
    let span = root.children[0];
    assert_eq!(t.get(span).unwrap().text.as_deref(), Some("inner"));
}

#[test]
fn test_whitespace_only_text_is_absent() {
    let t = tree("<div>\n   <p>x</p>\n</div>");
    assert_eq!(t.get(t.root()).unwrap().text, None);
}

#[test]
fn test_void_elements_have_no_children() {
    let t = tree("<div><br><img src=x><p>after</p></div>");
    let tags: Vec<String> = t.iter().map(|id| tag(&t, id)).collect();
    assert_eq!(tags, vec!["div", "br", "img", "p"]);
    // br and img are siblings of p, not ancestors of it.
    let root_children = t.children(t.root());
    assert_eq!(root_children.len(), 3);
}

#[test]
fn test_self_closing_syntax() {
    let t = tree("<div><custom-el/><p>x</p></div>");
    assert_eq!(t.children(t.root()).len(), 2);
}

#[test]
fn test_unclosed_tags_closed_by_ancestors() {
    let t = tree("<div><p>one<p2>two</div>");
    // p and p2 both survive, nested where they were opened.
    let tags: Vec<String> = t.iter().map(|id| tag(&t, id)).collect();
    assert_eq!(tags, vec!["div", "p", "p2"]);
}

#[test]
fn test_stray_end_tag_ignored() {
    let t = tree("<div></span><p>x</p></div>");
    let tags: Vec<String> = t.iter().map(|id| tag(&t, id)).collect();
    assert_eq!(tags, vec!["div", "p"]);
}

#[test]
fn test_mismatched_end_tag_closes_to_match() {
    // </div> closes the still-open <span> as well.
    let t = tree("<div><span>x</div><p>y</p>");
    let tags: Vec<String> = t.iter().map(|id| tag(&t, id)).collect();
    // Two top-level elements → synthetic body root.
    assert_eq!(tags, vec!["body", "div", "span", "p"]);
}

#[test]
fn test_comments_and_doctype_skipped() {
    let t = tree("<!doctype html><!-- hi --><div><!-- inner -->x</div>");
    assert_eq!(t.len(), 1);
    assert_eq!(t.get(t.root()).unwrap().text.as_deref(), Some("x"));
}

#[test]
fn test_html_wrapper_unwraps_to_body() {
    let t = tree("<html><head><title>t</title></head><body><div id=a></div></body></html>");
    assert_eq!(tag(&t, t.root()), "body");
    assert_eq!(t.children(t.root()).len(), 1);
}

#[test]
fn test_multiple_roots_get_synthetic_body() {
    let t = tree("<div>a</div><div>b</div><span>c</span>");
    assert_eq!(tag(&t, t.root()), "body");
    assert_eq!(t.children(t.root()).len(), 3);
}

#[test]
fn test_script_content_is_raw_text() {
    let t = tree("<div><script>if (a < b) { x(); }</script></div>");
    let script = t.children(t.root())[0];
    let node = t.get(script).unwrap();
    assert_eq!(node.tag_name, "script");
    assert!(node.children.is_empty());
    assert_eq!(node.text.as_deref(), Some("if (a < b) { x(); }"));
}

#[test]
fn test_character_references_decoded() {
    let t = tree("<div title=\"a&amp;b\">x &lt;y&gt; &#65;&#x42;</div>");
    let root = t.get(t.root()).unwrap();
    assert_eq!(root.attr("title"), Some("a&b"));
    assert_eq!(root.text.as_deref(), Some("x <y> AB"));
}

#[test]
fn test_unknown_reference_passes_through() {
    let t = tree("<div>a &bogus; b</div>");
    assert_eq!(t.get(t.root()).unwrap().text.as_deref(), Some("a &bogus; b"));
}

#[test]
fn test_tag_names_lowercased() {
    let t = tree("<DIV CLASS=\"x\"><SpAn></SpAn></DIV>");
    assert_eq!(tag(&t, t.root()), "div");
    assert_eq!(t.get(t.root()).unwrap().attr("class"), Some("x"));
}

#[test]
fn test_empty_input_is_error() {
    assert_eq!(parse("").unwrap_err(), ParseError::NoElements);
    assert_eq!(parse("   just text   ").unwrap_err(), ParseError::NoElements);
    assert_eq!(
        parse("<!-- only a comment -->").unwrap_err(),
        ParseError::NoElements
    );
}

#[test]
fn test_lone_angle_bracket_is_text() {
    let t = tree("<div>2 < 3 and 4 > 1</div>");
    // "4 > 1" survives; the stray '<' before a space is character data.
    assert_eq!(t.get(t.root()).unwrap().text.as_deref(), Some("2 < 3 and 4 > 1"));
}

#[test]
fn test_deeply_nested_input() {
    // 2000 unclosed <div>s; assembly and building must not recurse.
    let html = "<div>".repeat(2000);
    let t = tree(&html);
    assert_eq!(t.len(), 2000);
    let deepest = NodeId(t.len() - 1);
    assert_eq!(t.get(deepest).unwrap().depth, 1999);
    assert_eq!(t.path(deepest).len(), 2000);
}
