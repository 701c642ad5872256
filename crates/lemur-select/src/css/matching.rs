//! Selector matching against the element tree.
//!
//! [§ 4.1 Selector Matching](https://www.w3.org/TR/selectors-4/#match-a-selector-against-an-element)
//!
//! Matching starts at the subject (rightmost compound) and walks the
//! combinator chain upward/leftward through the tree. For the
//! non-deterministic combinators (descendant, subsequent-sibling) every
//! candidate is tried, so `a b c` matches whenever *some* assignment of
//! ancestors works, not just the nearest one.

use lemur_dom::{DomTree, NodeId, TreeNode};

use crate::css::{
    AttributeSelector, Combinator, ComplexSelector, CompoundSelector, PseudoClass, SimpleSelector,
};

/// Check whether `selector` matches the element `id` in `tree`.
#[must_use]
pub fn matches(selector: &ComplexSelector, tree: &DomTree, id: NodeId) -> bool {
    compound_matches(&selector.subject, tree, id)
        && chain_matches(&selector.combinators, tree, id)
}

/// Walk the right-to-left combinator chain from an already-matched element.
fn chain_matches(chain: &[(Combinator, CompoundSelector)], tree: &DomTree, current: NodeId) -> bool {
    let Some(((combinator, compound), rest)) = chain.split_first() else {
        return true;
    };
    match combinator {
        // [§ 16.1](https://www.w3.org/TR/selectors-4/#descendant-combinators)
        // "an element B that is an arbitrary descendant of some ancestor
        // element A": every ancestor is a candidate, not just the nearest.
        Combinator::Descendant => tree
            .ancestors(current)
            .any(|a| compound_matches(compound, tree, a) && chain_matches(rest, tree, a)),

        // [§ 16.2](https://www.w3.org/TR/selectors-4/#child-combinators)
        Combinator::Child => tree.parent(current).is_some_and(|p| {
            compound_matches(compound, tree, p) && chain_matches(rest, tree, p)
        }),

        // [§ 16.3](https://www.w3.org/TR/selectors-4/#adjacent-sibling-combinators)
        Combinator::NextSibling => previous_sibling(tree, current).is_some_and(|s| {
            compound_matches(compound, tree, s) && chain_matches(rest, tree, s)
        }),

        // [§ 16.4](https://www.w3.org/TR/selectors-4/#general-sibling-combinators)
        Combinator::SubsequentSibling => preceding_siblings(tree, current)
            .into_iter()
            .any(|s| compound_matches(compound, tree, s) && chain_matches(rest, tree, s)),
    }
}

/// All conditions of a compound must hold on the one element.
fn compound_matches(compound: &CompoundSelector, tree: &DomTree, id: NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    compound
        .simple_selectors
        .iter()
        .all(|simple| simple_matches(simple, tree, id, node))
}

fn simple_matches(simple: &SimpleSelector, tree: &DomTree, id: NodeId, node: &TreeNode) -> bool {
    match simple {
        // [§ 5.1](https://www.w3.org/TR/selectors-4/#type-selectors)
        SimpleSelector::Type(name) => node.tag_name.eq_ignore_ascii_case(name),

        // [§ 5.2](https://www.w3.org/TR/selectors-4/#universal-selector)
        SimpleSelector::Universal => true,

        // [§ 6.6](https://www.w3.org/TR/selectors-4/#class-html)
        SimpleSelector::Class(name) => node.has_class(name),

        // [§ 6.7](https://www.w3.org/TR/selectors-4/#id-selectors)
        SimpleSelector::Id(value) => node.id_attr() == Some(value.as_str()),

        // [§ 6.4](https://www.w3.org/TR/selectors-4/#attribute-selectors)
        SimpleSelector::Attribute(attr_sel) => attribute_matches(attr_sel, node),

        SimpleSelector::PseudoClass(pc) => pseudo_matches(*pc, tree, id, node),
    }
}

fn attribute_matches(selector: &AttributeSelector, node: &TreeNode) -> bool {
    match selector {
        AttributeSelector::Exists(name) => node.attr(name).is_some(),
        AttributeSelector::Equals(name, val) => node.attr(name) == Some(val.as_str()),
        AttributeSelector::Includes(name, val) => node
            .attr(name)
            .is_some_and(|v| v.split_ascii_whitespace().any(|w| w == val)),
        AttributeSelector::DashMatch(name, val) => node
            .attr(name)
            .is_some_and(|v| v == val || v.strip_prefix(val.as_str()).is_some_and(|rest| rest.starts_with('-'))),
        AttributeSelector::PrefixMatch(name, val) => {
            node.attr(name).is_some_and(|v| v.starts_with(val.as_str()))
        }
        AttributeSelector::SuffixMatch(name, val) => {
            node.attr(name).is_some_and(|v| v.ends_with(val.as_str()))
        }
        AttributeSelector::SubstringMatch(name, val) => {
            node.attr(name).is_some_and(|v| v.contains(val.as_str()))
        }
    }
}

/// [§ 4 Pseudo-classes](https://www.w3.org/TR/selectors-4/#pseudo-classes)
///
/// The tree stores only elements, so "siblings" means all children of
/// the parent, exactly the population `index` counts. A root element has no
/// siblings, which makes it first, last and only among its inclusive
/// siblings, as in a live document.
fn pseudo_matches(pc: PseudoClass, tree: &DomTree, id: NodeId, node: &TreeNode) -> bool {
    match pc {
        PseudoClass::Root => id == tree.root(),

        PseudoClass::FirstChild => node.index == 0,

        PseudoClass::LastChild => match node.parent {
            Some(parent) => node.index + 1 == tree.children(parent).len(),
            None => true,
        },

        PseudoClass::OnlyChild => match node.parent {
            Some(parent) => tree.children(parent).len() == 1,
            None => true,
        },

        // [§ 4.5 :empty](https://www.w3.org/TR/selectors-4/#the-empty-pseudo)
        // "represents an element that has no children at all"; child
        // elements and text both count.
        PseudoClass::Empty => node.children.is_empty() && node.text.is_none(),

        PseudoClass::FirstOfType => match node.parent {
            Some(parent) => tree.children(parent)[..node.index]
                .iter()
                .all(|&sib| !same_type(tree, sib, node)),
            None => true,
        },

        PseudoClass::LastOfType => match node.parent {
            Some(parent) => tree.children(parent)[node.index + 1..]
                .iter()
                .all(|&sib| !same_type(tree, sib, node)),
            None => true,
        },

        // 1-based position among siblings; `index` is that position
        // 0-based, by tree invariant.
        PseudoClass::NthChild(n) => node.index + 1 == n,
    }
}

fn same_type(tree: &DomTree, sibling: NodeId, node: &TreeNode) -> bool {
    tree.get(sibling)
        .is_some_and(|s| s.tag_name.eq_ignore_ascii_case(&node.tag_name))
}

/// The immediately preceding sibling, if any.
fn previous_sibling(tree: &DomTree, id: NodeId) -> Option<NodeId> {
    let node = tree.get(id)?;
    let parent = node.parent?;
    node.index
        .checked_sub(1)
        .and_then(|i| tree.children(parent).get(i).copied())
}

/// All preceding siblings, nearest first.
fn preceding_siblings(tree: &DomTree, id: NodeId) -> Vec<NodeId> {
    let Some(node) = tree.get(id) else {
        return Vec::new();
    };
    let Some(parent) = node.parent else {
        return Vec::new();
    };
    tree.children(parent)[..node.index]
        .iter()
        .rev()
        .copied()
        .collect()
}
