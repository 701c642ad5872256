//! Candidate selector synthesis.
//!
//! Three strategies, each trading uniqueness against robustness:
//!
//! 1. **Simple CSS** - the node's own features only (`#id`, else
//!    `tag.classes[attr="v"]`). Survives the node moving around the tree.
//! 2. **Hierarchical CSS** - the full ancestor chain joined with `>`,
//!    positionally disambiguated at the target. Precise, brittle.
//! 3. **XPath** - the same chain as a location path with attribute and
//!    position predicates.
//!
//! Candidates are ranked by specificity weight (id 100, class/attribute/
//! position 10, tag 1) descending, ties keeping strategy order. Synthesis
//! is pure: the same `(tree, node)` always yields byte-identical output.
//!
//! An ancestor carrying an id discards everything synthesized above it:
//! the id is *assumed* document-unique, as authors intend, and is never
//! verified against the tree. A wrong assumption still yields a selector
//! that matches the target (just possibly not only the target).

use lemur_dom::{DomTree, NodeId, TreeNode};

use crate::escape::escape_css;
use crate::{GeneratedSelector, SelectorKind, SelectorPart};

/// Attributes worth putting in a simple-CSS predicate, most useful first.
/// Exactly one (the first present) is emitted.
const ATTRIBUTE_PRIORITY: [&str; 6] = ["name", "type", "data-testid", "data-id", "role", "aria-label"];

/// Cap on class suffixes in the simple-CSS candidate.
const MAX_CLASSES: usize = 3;

/// Ranking weight of an id.
const ID_WEIGHT: u32 = 100;
/// Ranking weight of a class, attribute or positional predicate.
const PREDICATE_WEIGHT: u32 = 10;
/// Ranking weight of a bare tag.
const TAG_WEIGHT: u32 = 1;

/// Derive ranked candidate selectors for `target`.
///
/// Returns an empty vector when `target` is not a node of `tree`; a
/// present node always yields at least the simple-CSS candidate.
#[must_use]
pub fn synthesize(tree: &DomTree, target: NodeId) -> Vec<GeneratedSelector> {
    let Some(node) = tree.get(target) else {
        return Vec::new();
    };

    let mut candidates = vec![simple_css(node)];
    let hierarchical = hierarchical_css(tree, target);
    if hierarchical.text != candidates[0].text {
        candidates.push(hierarchical);
    }
    candidates.push(xpath_path(tree, target, node));

    // Stable sort: equal weights keep strategy order.
    candidates.sort_by(|a, b| b.specificity.cmp(&a.specificity));
    candidates
}

/// An attribute that is present *and non-empty*; an empty `id=""` or
/// `name=""` carries no selecting power and is treated as absent.
fn present_attr<'n>(node: &'n TreeNode, name: &str) -> Option<&'n str> {
    node.attr(name).filter(|v| !v.is_empty())
}

/// Strategy 1: the node's own features, no ancestry.
fn simple_css(node: &TreeNode) -> GeneratedSelector {
    if let Some(id) = present_attr(node, "id") {
        // An id is assumed globally unique and sufficient on its own.
        return GeneratedSelector {
            kind: SelectorKind::Css,
            text: format!("#{}", escape_css(id)),
            parts: vec![SelectorPart::Id(format!("#{id}"))],
            specificity: ID_WEIGHT,
        };
    }

    let mut text = node.tag_name.clone();
    let mut parts = vec![SelectorPart::Tag(node.tag_name.clone())];
    let mut specificity = TAG_WEIGHT;

    for class in node.classes().take(MAX_CLASSES) {
        text.push('.');
        text.push_str(&escape_css(class));
        parts.push(SelectorPart::Class(format!(".{class}")));
        specificity += PREDICATE_WEIGHT;
    }

    for attr in ATTRIBUTE_PRIORITY {
        if let Some(value) = present_attr(node, attr) {
            text.push_str(&format!("[{attr}=\"{}\"]", escape_css(value)));
            parts.push(SelectorPart::Attribute(format!("[{attr}=\"{value}\"]")));
            specificity += PREDICATE_WEIGHT;
            break;
        }
    }

    GeneratedSelector {
        kind: SelectorKind::Css,
        text,
        parts,
        specificity,
    }
}

/// Strategy 2: the ancestor chain as a `>`-joined CSS selector.
fn hierarchical_css(tree: &DomTree, target: NodeId) -> GeneratedSelector {
    let path = tree.path(target);
    let last = path.len().saturating_sub(1);

    let mut segments: Vec<String> = Vec::new();
    let mut parts: Vec<SelectorPart> = Vec::new();
    let mut specificity = 0u32;

    for (i, &id) in path.iter().enumerate() {
        let Some(node) = tree.get(id) else { continue };

        if let Some(id_value) = present_attr(node, "id") {
            // The id short-circuits the hierarchy upward: accumulated
            // segments and their accumulated weight are replaced.
            segments.clear();
            parts.clear();
            segments.push(format!("#{}", escape_css(id_value)));
            parts.push(SelectorPart::Id(format!("#{id_value}")));
            specificity = ID_WEIGHT;
        } else {
            let mut segment = node.tag_name.clone();
            parts.push(SelectorPart::Tag(node.tag_name.clone()));
            specificity += TAG_WEIGHT;

            if let Some(class) = node.classes().next() {
                segment.push('.');
                segment.push_str(&escape_css(class));
                parts.push(SelectorPart::Class(format!(".{class}")));
                specificity += PREDICATE_WEIGHT;
            }

            // Only the target itself gets positional disambiguation;
            // ancestors are pinned by the child combinators.
            if i == last && node.index > 0 {
                let position = node.index + 1;
                segment.push_str(&format!(":nth-child({position})"));
                parts.push(SelectorPart::Positional(format!(":nth-child({position})")));
                specificity += PREDICATE_WEIGHT;
            }

            segments.push(segment);
        }

        if i < last {
            parts.push(SelectorPart::Combinator(" > ".to_string()));
        }
    }

    GeneratedSelector {
        kind: SelectorKind::Css,
        text: segments.join(" > "),
        parts,
        specificity,
    }
}

/// Strategy 3: the ancestor chain as an XPath location path.
fn xpath_path(tree: &DomTree, target: NodeId, node: &TreeNode) -> GeneratedSelector {
    if let Some(id) = present_attr(node, "id") {
        return GeneratedSelector {
            kind: SelectorKind::Xpath,
            text: format!("//*[@id={}]", xpath_literal(id)),
            parts: vec![SelectorPart::Attribute(format!("[@id=\"{id}\"]"))],
            specificity: ID_WEIGHT,
        };
    }

    let path = tree.path(target);
    let mut segments: Vec<String> = Vec::new();
    let mut parts: Vec<SelectorPart> = Vec::new();

    for (i, &id) in path.iter().enumerate() {
        let Some(current) = tree.get(id) else { continue };

        let mut segment = current.tag_name.clone();
        parts.push(SelectorPart::Tag(current.tag_name.clone()));

        if let Some(id_value) = present_attr(current, "id") {
            segment.push_str(&format!("[@id={}]", xpath_literal(id_value)));
            parts.push(SelectorPart::Attribute(format!("[@id=\"{id_value}\"]")));
        } else if let Some(class) = current.classes().next() {
            segment.push_str(&format!("[contains(@class, {})]", xpath_literal(class)));
            parts.push(SelectorPart::Attribute(format!(
                "[contains(@class, \"{class}\")]"
            )));
        }

        // Positional predicate independent of the attribute predicate,
        // on every step that is not an only/first child.
        if current.index > 0 {
            let position = current.index + 1;
            segment.push_str(&format!("[{position}]"));
            parts.push(SelectorPart::Positional(format!("[{position}]")));
        }

        segments.push(segment);
        if i + 1 < path.len() {
            parts.push(SelectorPart::Combinator("/".to_string()));
        }
    }

    let specificity =
        u32::try_from(segments.len()).map_or(u32::MAX, |n| n.saturating_mul(PREDICATE_WEIGHT));
    GeneratedSelector {
        kind: SelectorKind::Xpath,
        text: format!("//{}", segments.join("/")),
        parts,
        specificity,
    }
}

/// Quote a value for an XPath literal. XPath 1.0 strings have no escapes,
/// so a value containing `"` switches to single quotes; a value containing
/// both quote kinds is not representable and keeps double quotes.
fn xpath_literal(value: &str) -> String {
    if value.contains('"') {
        format!("'{value}'")
    } else {
        format!("\"{value}\"")
    }
}
