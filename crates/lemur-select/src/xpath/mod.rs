//! XPath location-path subset: parsing and evaluation per
//! [XPath 1.0](https://www.w3.org/TR/xpath-10/), scoped to what selector
//! tooling actually emits.
//!
//! # Supported grammar
//!
//! - Absolute abbreviated paths: `/a/b`, `//a`, `/a//b`
//! - Name tests (`div`) and the wildcard (`*`)
//! - Predicates, several per step:
//!   - `[@attr]` — attribute presence
//!   - `[@attr="value"]` — attribute equality (either quote style)
//!   - `[contains(@attr, "value")]` — substring containment
//!   - `[<integer>]` — position
//!
//! Everything else (relative paths, explicit axes (`ancestor::`),
//! node-type tests (`text()`), other functions) is rejected with
//! [`SelectorError::Unsupported`](crate::SelectorError).
//!
//! # Positional predicates
//!
//! `[n]` tests the element's 1-based position among *all* its siblings
//! (the tree's `index` + 1), not its position within the step's node-set
//! as XPath proper would. This matches what the synthesizer emits (the
//! positional predicate is computed from the sibling index), so a
//! synthesized path always re-matches its source node, which is the
//! contract this engine exists to keep.

pub mod eval;
pub mod parser;

pub use eval::evaluate;
pub use parser::parse;

/// An absolute location path: one or more steps from the document root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocationPath {
    /// The steps, left to right.
    pub steps: Vec<Step>,
}

/// One location step: axis, name test, and zero or more predicates.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    /// How this step relates to the previous one.
    pub axis: Axis,
    /// Which element names the step selects.
    pub test: NameTest,
    /// Filters applied to the selected elements, in order.
    pub predicates: Vec<Predicate>,
}

/// The two axes expressible in abbreviated syntax.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    /// `/` — children of the context node.
    Child,
    /// `//` — the `descendant-or-self::node()/` abbreviation: the step
    /// applies to the context node's descendants at any depth.
    DescendantOrSelf,
}

/// [§ 2.3 Node Tests](https://www.w3.org/TR/xpath-10/#node-tests)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NameTest {
    /// `*` — any element.
    Any,
    /// A literal element name, compared case-insensitively.
    Name(String),
}

/// [§ 2.4 Predicates](https://www.w3.org/TR/xpath-10/#predicates)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    /// `[@attr]` — the attribute exists.
    AttrExists(String),
    /// `[@attr="value"]` — the attribute equals the value exactly.
    AttrEquals(String, String),
    /// `[contains(@attr, "value")]` — the attribute's value contains the
    /// string.
    Contains(String, String),
    /// `[n]` — 1-based sibling position (see the module docs for how this
    /// diverges from node-set position).
    Position(usize),
}
