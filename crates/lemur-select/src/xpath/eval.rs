//! Location-path evaluation over the element tree.
//!
//! [§ 2 Location Paths](https://www.w3.org/TR/xpath-10/#location-paths)
//!
//! Each step maps a context node-set to a new node-set; the sets are kept
//! as hash sets (a node reachable along two routes counts once) and the
//! final answer is read off in document order by one pre-order sweep.

use std::collections::HashSet;

use lemur_dom::{DomTree, NodeId, TreeNode};

use crate::xpath::{Axis, LocationPath, NameTest, Predicate, Step};

/// Evaluate an absolute location path, returning matches in document order.
#[must_use]
pub fn evaluate(path: &LocationPath, tree: &DomTree) -> Vec<NodeId> {
    let mut context: HashSet<NodeId> = HashSet::new();

    for (i, step) in path.steps.iter().enumerate() {
        let candidates: Vec<NodeId> = if i == 0 {
            // The initial context is the (implicit) document above the
            // root element: its child is the root, its descendants are
            // every element.
            match step.axis {
                Axis::Child => vec![tree.root()],
                Axis::DescendantOrSelf => tree.iter().collect(),
            }
        } else {
            match step.axis {
                Axis::Child => context
                    .iter()
                    .flat_map(|&id| tree.children(id).iter().copied())
                    .collect(),
                Axis::DescendantOrSelf => {
                    let mut all = Vec::new();
                    for &id in &context {
                        collect_descendants(tree, id, &mut all);
                    }
                    all
                }
            }
        };

        context = candidates
            .into_iter()
            .filter(|&id| step_matches(step, tree, id))
            .collect();
        if context.is_empty() {
            break;
        }
    }

    tree.iter().filter(|id| context.contains(id)).collect()
}

/// Push every strict descendant of `id` onto `out`.
fn collect_descendants(tree: &DomTree, id: NodeId, out: &mut Vec<NodeId>) {
    let mut stack: Vec<NodeId> = tree.children(id).to_vec();
    while let Some(current) = stack.pop() {
        out.push(current);
        stack.extend_from_slice(tree.children(current));
    }
}

fn step_matches(step: &Step, tree: &DomTree, id: NodeId) -> bool {
    let Some(node) = tree.get(id) else {
        return false;
    };
    name_test_matches(&step.test, node)
        && step
            .predicates
            .iter()
            .all(|predicate| predicate_matches(predicate, node))
}

fn name_test_matches(test: &NameTest, node: &TreeNode) -> bool {
    match test {
        NameTest::Any => true,
        NameTest::Name(name) => node.tag_name.eq_ignore_ascii_case(name),
    }
}

fn predicate_matches(predicate: &Predicate, node: &TreeNode) -> bool {
    match predicate {
        Predicate::AttrExists(attr) => node.attr(attr).is_some(),
        Predicate::AttrEquals(attr, value) => node.attr(attr) == Some(value.as_str()),
        Predicate::Contains(attr, value) => {
            node.attr(attr).is_some_and(|v| v.contains(value.as_str()))
        }
        // Sibling position, not node-set position (see the module docs).
        Predicate::Position(n) => node.index + 1 == *n,
    }
}
