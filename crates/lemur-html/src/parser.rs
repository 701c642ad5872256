//! Tree construction: token stream in, [`DomTree`] out.
//!
//! A stack-based assembler in the spirit of
//! [WHATWG § 13.2.6](https://html.spec.whatwg.org/multipage/parsing.html#tree-construction),
//! minus insertion modes. Recovery rules:
//!
//! - An end tag with no matching open element is ignored
//! - An end tag for an element deeper in the stack closes everything above it
//! - Elements still open at end of input are closed by their ancestors
//! - Text outside any element is discarded
//!
//! Root selection mirrors what a full parser's `document.body` gives you:
//! a single top-level element is the root; an `<html>` wrapper is unwrapped
//! to its `<body>` when one exists; multiple top-level elements get a
//! synthetic `body` root so the result is always a single tree.

use lemur_dom::{AttributesMap, DomTree, NodeId, TreeBuilder};
use thiserror::Error;

use crate::tokenizer::{Token, tokenize};

/// Error produced by [`parse`].
///
/// Malformed markup is never an error (the assembler recovers). The only
/// unrecoverable input is markup with nothing to build a tree from.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ParseError {
    /// The input contained no elements at all.
    #[error("markup contains no elements")]
    NoElements,
}

/// Parse markup into an element tree.
///
/// # Errors
///
/// Returns [`ParseError::NoElements`] when the input contains no element
/// (empty string, bare text, comments only).
pub fn parse(html: &str) -> Result<DomTree, ParseError> {
    let forest = assemble(tokenize(html));
    let root = select_root(forest)?;
    Ok(build(root))
}

/// [WHATWG § 13.1.2 Void elements](https://html.spec.whatwg.org/multipage/syntax.html#void-elements)
fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area"
            | "base"
            | "br"
            | "col"
            | "embed"
            | "hr"
            | "img"
            | "input"
            | "link"
            | "meta"
            | "param"
            | "source"
            | "track"
            | "wbr"
    )
}

/// Intermediate element used while the open-element stack is live; ids,
/// depths and indices are assigned later by the [`TreeBuilder`] pass.
struct RawElement {
    tag: String,
    attrs: Vec<(String, String)>,
    text_runs: Vec<String>,
    children: Vec<RawElement>,
}

impl RawElement {
    fn new(tag: String, attrs: Vec<(String, String)>) -> Self {
        RawElement {
            tag,
            attrs,
            text_runs: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// Run the open-element stack over the token stream, producing the forest
/// of top-level elements.
fn assemble(tokens: Vec<Token>) -> Vec<RawElement> {
    let mut roots: Vec<RawElement> = Vec::new();
    let mut stack: Vec<RawElement> = Vec::new();

    for token in tokens {
        match token {
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => {
                let elem = RawElement::new(name, attrs);
                if self_closing || is_void_element(&elem.tag) {
                    attach(elem, &mut stack, &mut roots);
                } else {
                    stack.push(elem);
                }
            }
            Token::EndTag { name } => {
                // Close up to the nearest matching open element; a stray
                // end tag closes nothing.
                if let Some(pos) = stack.iter().rposition(|e| e.tag == name) {
                    while stack.len() > pos {
                        let Some(done) = stack.pop() else { break };
                        attach(done, &mut stack, &mut roots);
                    }
                }
            }
            Token::Text(content) => {
                let trimmed = content.trim();
                if !trimmed.is_empty()
                    && let Some(top) = stack.last_mut()
                {
                    top.text_runs.push(trimmed.to_string());
                }
            }
        }
    }

    // End of input closes whatever is still open.
    while let Some(done) = stack.pop() {
        attach(done, &mut stack, &mut roots);
    }
    roots
}

/// Attach a finished element to its parent, or to the forest when the
/// stack is empty.
fn attach(elem: RawElement, stack: &mut Vec<RawElement>, roots: &mut Vec<RawElement>) {
    if let Some(top) = stack.last_mut() {
        top.children.push(elem);
    } else {
        roots.push(elem);
    }
}

/// Pick the tree's root from the top-level forest.
fn select_root(mut forest: Vec<RawElement>) -> Result<RawElement, ParseError> {
    if forest.is_empty() {
        return Err(ParseError::NoElements);
    }
    if forest.len() > 1 {
        let mut wrapper = RawElement::new("body".to_string(), Vec::new());
        wrapper.children = forest;
        return Ok(wrapper);
    }
    let Some(mut root) = forest.pop() else {
        return Err(ParseError::NoElements);
    };
    if root.tag == "html"
        && let Some(pos) = root.children.iter().position(|c| c.tag == "body")
    {
        return Ok(root.children.swap_remove(pos));
    }
    Ok(root)
}

/// Pour the raw forest into a [`TreeBuilder`], which mints ids and computes
/// depth/index. Iterative so pathological nesting depth cannot blow the
/// call stack.
fn build(root: RawElement) -> DomTree {
    let RawElement {
        tag,
        attrs,
        text_runs,
        children,
    } = root;
    let mut builder = TreeBuilder::new(&tag, collapse_attrs(attrs), join_runs(&text_runs));

    let mut work: Vec<(NodeId, RawElement)> = children
        .into_iter()
        .rev()
        .map(|c| (NodeId::ROOT, c))
        .collect();
    while let Some((parent, elem)) = work.pop() {
        let RawElement {
            tag,
            attrs,
            text_runs,
            children,
        } = elem;
        let id = builder.append(parent, &tag, collapse_attrs(attrs), join_runs(&text_runs));
        work.extend(children.into_iter().rev().map(|c| (id, c)));
    }
    builder.finish()
}

/// Collapse the source-order attribute list into a map, last-wins.
fn collapse_attrs(attrs: Vec<(String, String)>) -> AttributesMap {
    let mut map = AttributesMap::new();
    for (name, value) in attrs {
        let _ = map.insert(name, value);
    }
    map
}

/// Join an element's direct text runs into its `text` field.
fn join_runs(runs: &[String]) -> Option<String> {
    if runs.is_empty() {
        None
    } else {
        Some(runs.join(" "))
    }
}
