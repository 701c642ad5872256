//! Selector synthesis and matching over [`lemur_dom`] element trees.
//!
//! Two independent surfaces, both pure with respect to the tree:
//!
//! - [`synthesize`] - given a node, derive ranked candidate selectors
//!   (simple CSS, hierarchical CSS, XPath) from its attributes and its
//!   position in the tree.
//! - [`match_selector`] / [`evaluate`] - given an arbitrary selector string
//!   and its kind, report which nodes it matches, in document order.
//!
//! The matcher implements explicit subsets of
//! [Selectors Level 4](https://www.w3.org/TR/selectors-4/) and
//! [XPath 1.0](https://www.w3.org/TR/xpath-10/); see [`css`] and [`xpath`]
//! for the exact grammars. Every synthesized candidate round-trips: matched
//! against the tree it came from, it always contains its source node.
//! Constructs outside the subsets are rejected with a descriptive
//! [`SelectorError`], never silently approximated.

use lemur_dom::{DomTree, NodeId};
use serde::Serialize;
use strum_macros::{Display, EnumString};
use thiserror::Error;

/// CSS selector grammar subset: parsing and matching.
pub mod css;
/// Reserved-character escaping for CSS fragments.
pub mod escape;
/// Candidate selector synthesis strategies.
pub mod synth;
/// XPath location-path subset: parsing and evaluation.
pub mod xpath;

pub use escape::escape_css;
pub use synth::synthesize;

/// The two selector languages the engine speaks.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SelectorKind {
    /// CSS selector syntax (`div.item:nth-child(2)`).
    Css,
    /// XPath abbreviated location paths (`//div[@id="x"]/p[2]`).
    Xpath,
}

/// A tagged fragment of a synthesized selector.
///
/// Each variant carries the fragment's display text (unescaped), so a host
/// can render candidates piecewise (color the id differently from the
/// positional predicate) without re-parsing the final string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "kebab-case")]
pub enum SelectorPart {
    /// A type step: `div`.
    Tag(String),
    /// An id step: `#main`.
    Id(String),
    /// A class step: `.active`.
    Class(String),
    /// An attribute predicate: `[name="q"]` or `[contains(@class, "a")]`.
    Attribute(String),
    /// A positional predicate: `:nth-child(2)` or `[2]`.
    Positional(String),
    /// A joining combinator: ` > ` or `/`.
    Combinator(String),
}

/// One candidate selector produced by [`synthesize`].
///
/// Immutable value: a fresh vector of these is produced per call, ordered
/// by descending [`specificity`](Self::specificity) with ties kept in
/// strategy order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GeneratedSelector {
    /// Which language the candidate is written in.
    pub kind: SelectorKind,
    /// The full selector string, ready for [`match_selector`].
    pub text: String,
    /// Structured fragments for piecewise display.
    pub parts: Vec<SelectorPart>,
    /// Ranking weight. Not CSS-standard specificity, just the ordering
    /// policy: id 100, class/attribute/positional 10, tag 1.
    pub specificity: u32,
}

/// Error produced when a selector cannot be evaluated.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectorError {
    /// The selector text is malformed for its declared kind.
    #[error("selector syntax error: {0}")]
    Syntax(String),
    /// The selector is well-formed but uses grammar outside the supported
    /// subset. Reported rather than approximated.
    #[error("unsupported selector construct: {0}")]
    Unsupported(String),
}

/// Outcome of matching one selector against one tree.
///
/// Exactly one of two shapes: `error` set and `matched` empty (the selector
/// could not be evaluated), or `error` absent and `matched` holding the
/// matching node ids in document order, possibly none. Zero matches and
/// failure are distinguishable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchResult {
    /// The selector text as given.
    pub selector: String,
    /// The declared selector kind.
    pub kind: SelectorKind,
    /// Ids of matching nodes, document order (pre-order).
    pub matched: Vec<NodeId>,
    /// Present when evaluation failed; implies `matched` is empty.
    pub error: Option<String>,
}

impl MatchResult {
    /// Number of nodes matched.
    #[must_use]
    pub fn match_count(&self) -> usize {
        self.matched.len()
    }

    /// Whether evaluation failed (as opposed to matching nothing).
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Evaluate a selector against a tree, returning matching node ids in
/// document order.
///
/// This is the `Result`-shaped twin of [`match_selector`] for callers that
/// want to branch on [`SelectorError`] directly.
///
/// # Errors
///
/// [`SelectorError::Syntax`] for malformed input, or
/// [`SelectorError::Unsupported`] for grammar outside the documented
/// subset.
pub fn evaluate(
    tree: &DomTree,
    selector: &str,
    kind: SelectorKind,
) -> Result<Vec<NodeId>, SelectorError> {
    match kind {
        SelectorKind::Css => {
            let list = css::parse_selector_list(selector)?;
            Ok(tree
                .iter()
                .filter(|&id| list.iter().any(|sel| css::matches(sel, tree, id)))
                .collect())
        }
        SelectorKind::Xpath => {
            let path = xpath::parse(selector)?;
            Ok(xpath::evaluate(&path, tree))
        }
    }
}

/// Match a selector against a tree, reporting the outcome as a value.
///
/// Never panics and never returns an error through the call: failures land
/// in [`MatchResult::error`]. Repeated calls with identical inputs return
/// identical results.
#[must_use]
pub fn match_selector(tree: &DomTree, selector: &str, kind: SelectorKind) -> MatchResult {
    match evaluate(tree, selector, kind) {
        Ok(matched) => MatchResult {
            selector: selector.to_string(),
            kind,
            matched,
            error: None,
        },
        Err(err) => MatchResult {
            selector: selector.to_string(),
            kind,
            matched: Vec::new(),
            error: Some(err.to_string()),
        },
    }
}
