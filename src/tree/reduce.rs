//! Concrete-to-intermediate reduction.
//!
//! Bottom-up. Leaves stay leaves, a tagged node becomes a single-entry branch, and the
//! reduced children of a sequence or repetition collapse by these rules, in order:
//!
//! 1. **Merge**: in a `Sequence` with at least one branch child and no sequence child,
//!    every branch child is merged into one branch (later keys overwrite earlier ones)
//!    and leaf children are dropped.
//! 2. **Flatten**: otherwise, if any child is a branch or a sequence, the result is one
//!    flat sequence of those children in order. Sequence children are spliced in, branch
//!    children stay single elements, leaf children are dropped.
//! 3. **Concatenate**: otherwise every child is a leaf and their texts are joined (null
//!    leaves contribute nothing). An empty repetition therefore reduces to `""`.

use im::OrdMap;

use super::{ConcreteNode, IntermediateNode, Shape};

/// Reduces a concrete tree into its intermediate form.
///
/// # Examples
///
/// ```rust
/// use strata::tree::{reduce, ConcreteNode, IntermediateNode};
/// let tree = ConcreteNode::sequence(vec![
///     ConcreteNode::tagged("a", ConcreteNode::leaf("1")),
///     ConcreteNode::leaf("junk"),
///     ConcreteNode::tagged("b", ConcreteNode::leaf("2")),
/// ]);
/// assert_eq!(
///     reduce(tree),
///     IntermediateNode::branch([
///         ("a", IntermediateNode::leaf("1")),
///         ("b", IntermediateNode::leaf("2")),
///     ])
/// );
/// ```
pub fn reduce(node: ConcreteNode) -> IntermediateNode {
    match node {
        ConcreteNode::Leaf(text) => IntermediateNode::Leaf(text),
        ConcreteNode::Tagged(tag, child) => {
            IntermediateNode::Branch(OrdMap::unit(tag, reduce(*child)))
        }
        ConcreteNode::Sequence(children) => collapse(children, true),
        ConcreteNode::Repetition(children) => collapse(children, false),
    }
}

fn collapse(children: Vec<ConcreteNode>, is_sequence: bool) -> IntermediateNode {
    let reduced: Vec<IntermediateNode> = children.into_iter().map(reduce).collect();
    let has_branch = reduced.iter().any(|c| c.shape() == Shape::Branch);
    let has_sequence = reduced.iter().any(|c| c.shape() == Shape::Sequence);

    if is_sequence && has_branch && !has_sequence {
        merge_branches(reduced)
    } else if has_branch || has_sequence {
        flatten(reduced)
    } else {
        concatenate(reduced)
    }
}

fn merge_branches(children: Vec<IntermediateNode>) -> IntermediateNode {
    let mut merged = OrdMap::new();
    for child in children {
        if let IntermediateNode::Branch(entries) = child {
            // Left-biased union: `entries` (the later child) wins on shared keys.
            merged = entries.union(merged);
        }
    }
    IntermediateNode::Branch(merged)
}

fn flatten(children: Vec<IntermediateNode>) -> IntermediateNode {
    let mut elements = Vec::with_capacity(children.len());
    for child in children {
        match child {
            IntermediateNode::Sequence(inner) => elements.extend(inner),
            branch @ IntermediateNode::Branch(_) => elements.push(branch),
            IntermediateNode::Leaf(_) => {}
        }
    }
    IntermediateNode::Sequence(elements)
}

fn concatenate(children: Vec<IntermediateNode>) -> IntermediateNode {
    let text: String = children
        .iter()
        .filter_map(IntermediateNode::text)
        .collect();
    IntermediateNode::leaf(text)
}
