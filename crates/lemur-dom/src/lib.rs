//! Element tree model for the Lemur selector inspector.
//!
//! This crate provides the arena-based element tree that the selector
//! synthesizer and matcher operate on. It is a deliberately reduced view of
//! the [DOM Living Standard](https://dom.spec.whatwg.org/) tree: elements,
//! their attributes, and their direct text; comments, doctypes and
//! standalone text nodes never appear, because selector work only ever
//! addresses elements.
//!
//! # Design
//!
//! All nodes live in a contiguous arena owned by [`DomTree`], and every
//! relationship (parent, children) is a [`NodeId`] index into that arena.
//! This gives O(1) access in any direction without ownership cycles: the
//! parent link is a plain index, never an owning pointer.
//!
//! A tree is built exactly once through [`TreeBuilder`], which mints node
//! ids sequentially and computes each node's `depth` and `index` at
//! insertion time. After [`TreeBuilder::finish`] the tree is immutable:
//! replacing a document means building a new tree and dropping the old one,
//! along with any host-side state keyed by its ids.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Map of attribute names to values for an element.
///
/// Keys are unique; inserting a duplicate attribute name overwrites the
/// previous value (last-wins, matching how parsers collapse repeats).
pub type AttributesMap = HashMap<String, String>;

/// A type-safe index into the element tree.
///
/// Ids are minted sequentially by [`TreeBuilder`], are unique within their
/// tree, and remain stable for the tree's lifetime. Because the builder is
/// the only id source (no process-wide counter), parsing the same markup
/// twice yields identical ids, so builds are reproducible.
///
/// For host surfaces that want the textual form, a `NodeId` renders as
/// `node-<n>` and parses back from either `node-<n>` or a bare integer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub usize);

impl NodeId {
    /// The root element is always at index 0.
    pub const ROOT: NodeId = NodeId(0);
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "node-{}", self.0)
    }
}

/// Error returned when a string does not name a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseNodeIdError;

impl fmt::Display for ParseNodeIdError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "expected a node id like 'node-3' or '3'")
    }
}

impl std::error::Error for ParseNodeIdError {}

impl FromStr for NodeId {
    type Err = ParseNodeIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix("node-").unwrap_or(s);
        digits
            .parse::<usize>()
            .map(NodeId)
            .map_err(|_| ParseNodeIdError)
    }
}

/// One markup element.
///
/// [§ 4.9 Interface Element](https://dom.spec.whatwg.org/#interface-element)
///
/// "Elements have an associated namespace, namespace prefix, local name..."
/// Here only the local name, attribute list and direct text survive; the
/// structural fields (`parent`, `children`, `depth`, `index`) are what the
/// selector engine keys off.
#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Lower-cased element name. Always non-empty.
    pub tag_name: String,

    /// "An element has an associated attribute list"
    /// ([§ 4.9](https://dom.spec.whatwg.org/#concept-element-attribute)).
    pub attrs: AttributesMap,

    /// Direct (non-descendant) text of this element, or `None` when the
    /// element carries no text or only whitespace.
    pub text: Option<String>,

    /// "A node has an associated list of children"
    /// ([§ 4.4](https://dom.spec.whatwg.org/#concept-tree-child)).
    /// Order is document order.
    pub children: Vec<NodeId>,

    /// "An object that participates in a tree has a parent, which is either
    /// null or an object" ([§ 4.4](https://dom.spec.whatwg.org/#concept-tree-parent)).
    /// `None` for the root.
    pub parent: Option<NodeId>,

    /// Distance from the root: root 0, each child parent + 1.
    pub depth: usize,

    /// 0-based position among siblings; drives positional disambiguation
    /// in synthesized selectors.
    pub index: usize,
}

impl TreeNode {
    /// Look up an attribute value by name.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    /// Returns the element's `id` attribute value if present.
    ///
    /// Per [§ 3.2.6 Global attributes](https://html.spec.whatwg.org/multipage/dom.html#global-attributes):
    /// "The id attribute specifies its element's unique identifier (ID)."
    /// Uniqueness is the document author's promise, not ours; the
    /// synthesizer leans on it without verifying it.
    #[must_use]
    pub fn id_attr(&self) -> Option<&str> {
        self.attr("id")
    }

    /// Iterate the class names from the `class` attribute, in document
    /// order with empty tokens dropped.
    ///
    /// Order matters to the synthesizer (it takes "the first class"), so
    /// this is an ordered iterator rather than a set.
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.attr("class")
            .unwrap_or_default()
            .split_ascii_whitespace()
    }

    /// Check whether the element's class list contains `name`.
    #[must_use]
    pub fn has_class(&self, name: &str) -> bool {
        self.classes().any(|c| c == name)
    }
}

/// Arena-based element tree, immutable after construction.
///
/// [§ 4 Nodes](https://dom.spec.whatwg.org/#nodes)
///
/// "The DOM represents a document as a tree. A tree is a finite hierarchical
/// tree structure."
///
/// All nodes are stored in a contiguous vector indexed by [`NodeId`]; the
/// root element is always [`NodeId::ROOT`]. There is no mutation API: a
/// [`TreeBuilder`] produces the tree in one pass, and every later operation
/// (path resolution, synthesis, matching) is a pure read. That makes the
/// tree safely shareable across threads by reference; the only "write" a
/// host ever performs is swapping in a freshly built tree.
#[derive(Debug, Clone)]
pub struct DomTree {
    /// All nodes in the tree, indexed by `NodeId`.
    nodes: Vec<TreeNode>,
}

impl DomTree {
    /// Get the root element's id.
    #[must_use]
    pub fn root(&self) -> NodeId {
        NodeId::ROOT
    }

    /// Get a node by its id.
    #[must_use]
    pub fn get(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(id.0)
    }

    /// Check whether `id` names a node of this tree.
    #[must_use]
    pub fn contains(&self, id: NodeId) -> bool {
        id.0 < self.nodes.len()
    }

    /// Number of elements in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the tree has no nodes. A built tree always has at least its
    /// root, so this is only `true` for a degenerate hand-rolled value.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Get the parent of a node.
    #[must_use]
    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.get(id).and_then(|n| n.parent)
    }

    /// Get the children of a node, in document order.
    #[must_use]
    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.get(id).map(|n| n.children.as_slice()).unwrap_or(&[])
    }

    /// Iterate over all ancestors of a node, from parent to root.
    #[must_use]
    pub fn ancestors(&self, id: NodeId) -> AncestorIterator<'_> {
        AncestorIterator {
            tree: self,
            current: self.parent(id),
        }
    }

    /// Iterate every node in document order (depth-first, pre-order,
    /// children in stored order).
    ///
    /// This is the traversal order the matcher reports matches in.
    #[must_use]
    pub fn iter(&self) -> PreOrderIterator<'_> {
        let stack = if self.nodes.is_empty() {
            Vec::new()
        } else {
            vec![NodeId::ROOT]
        };
        PreOrderIterator { tree: self, stack }
    }

    /// Resolve the chain of nodes from the root to `target`, inclusive.
    ///
    /// Returns an empty vector when `target` is not a node of this tree.
    /// The arena stores parent links, so the chain is recovered by walking
    /// upward and reversing: O(depth), and deterministic by construction.
    #[must_use]
    pub fn path(&self, target: NodeId) -> Vec<NodeId> {
        if !self.contains(target) {
            return Vec::new();
        }
        let mut chain: Vec<NodeId> = vec![target];
        chain.extend(self.ancestors(target));
        chain.reverse();
        chain
    }

    /// Check if `descendant` is a descendant of `ancestor`.
    ///
    /// [§ 4.2.6 Descendant](https://dom.spec.whatwg.org/#concept-tree-descendant)
    /// "An object A is called a descendant of an object B, if either A is a
    /// child of B or A is a child of an object C that is a descendant of B."
    #[must_use]
    pub fn is_descendant_of(&self, descendant: NodeId, ancestor: NodeId) -> bool {
        self.ancestors(descendant).any(|id| id == ancestor)
    }
}

impl<'a> IntoIterator for &'a DomTree {
    type Item = NodeId;
    type IntoIter = PreOrderIterator<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Iterator over ancestors of a node, nearest first.
pub struct AncestorIterator<'a> {
    tree: &'a DomTree,
    current: Option<NodeId>,
}

impl Iterator for AncestorIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.current?;
        self.current = self.tree.parent(id);
        Some(id)
    }
}

/// Depth-first pre-order iterator over a tree's nodes.
pub struct PreOrderIterator<'a> {
    tree: &'a DomTree,
    stack: Vec<NodeId>,
}

impl Iterator for PreOrderIterator<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;
        // Children are pushed reversed so the first child pops first.
        self.stack
            .extend(self.tree.children(id).iter().rev().copied());
        Some(id)
    }
}

/// One-shot constructor for [`DomTree`].
///
/// The builder is the tree's only id source: ids are minted sequentially
/// from the arena length, and `depth`/`index` are computed as each node is
/// appended, so the §3-style invariants (`children[i].index == i`, child
/// depth = parent depth + 1, acyclicity) hold by construction and can never
/// be violated afterwards; the finished tree has no mutation API.
#[derive(Debug)]
pub struct TreeBuilder {
    nodes: Vec<TreeNode>,
}

impl TreeBuilder {
    /// Start a tree with its root element.
    ///
    /// `tag_name` is lower-cased; whitespace-only `text` collapses to `None`.
    #[must_use]
    pub fn new(tag_name: &str, attrs: AttributesMap, text: Option<String>) -> Self {
        TreeBuilder {
            nodes: vec![TreeNode {
                tag_name: tag_name.to_ascii_lowercase(),
                attrs,
                text: normalize_text(text),
                children: Vec::new(),
                parent: None,
                depth: 0,
                index: 0,
            }],
        }
    }

    /// Append a new element as the last child of `parent` and return its id.
    ///
    /// # Panics
    ///
    /// Panics if `parent` is not an id previously returned by this builder.
    pub fn append(
        &mut self,
        parent: NodeId,
        tag_name: &str,
        attrs: AttributesMap,
        text: Option<String>,
    ) -> NodeId {
        let id = NodeId(self.nodes.len());
        let depth = self.nodes[parent.0].depth + 1;
        let index = self.nodes[parent.0].children.len();
        self.nodes[parent.0].children.push(id);
        self.nodes.push(TreeNode {
            tag_name: tag_name.to_ascii_lowercase(),
            attrs,
            text: normalize_text(text),
            children: Vec::new(),
            parent: Some(parent),
            depth,
            index,
        });
        id
    }

    /// Finish construction and hand over the immutable tree.
    #[must_use]
    pub fn finish(self) -> DomTree {
        DomTree { nodes: self.nodes }
    }
}

/// Collapse empty or whitespace-only text to `None`.
fn normalize_text(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}
