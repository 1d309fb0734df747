//! Tree module for Strata
//!
//! Two tree shapes live here:
//!
//! - [`ConcreteNode`]: the raw parse tree built by the combinators. It keeps every matched
//!   primitive and is consumed by [`reduce`].
//! - [`IntermediateNode`]: the dense tree produced by [`reduce`], where untagged structure
//!   has been discarded and tagged structure has become keyed [`IntermediateNode::Branch`]
//!   nodes. This is what rewrite rules match against.
//!
//! Nodes are never mutated after construction; every transformation builds new nodes.

// ============================================================================
// IMPORTS
// ============================================================================

use std::fmt;

use im::OrdMap;
use serde::{Deserialize, Serialize};

pub mod reduce;

pub use reduce::reduce;

// ============================================================================
// CONCRETE TREE
// ============================================================================

/// The parse tree built as a side effect of matching.
///
/// `Sequence` always holds at least two children (only `seq` builds it, and `seq` needs
/// two matchers); `Repetition` may be empty.
///
/// # Examples
///
/// ```rust
/// use strata::tree::ConcreteNode;
/// let node = ConcreteNode::tagged("name", ConcreteNode::leaf("x"));
/// assert_eq!(node.to_string(), "(name \"x\")");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConcreteNode {
    Leaf(Option<String>),
    Sequence(Vec<ConcreteNode>),
    Repetition(Vec<ConcreteNode>),
    Tagged(String, Box<ConcreteNode>),
}

impl ConcreteNode {
    pub fn leaf(text: impl Into<String>) -> Self {
        ConcreteNode::Leaf(Some(text.into()))
    }

    /// The output of zero-width matchers (`maybe`, `not`, `end_of_input`).
    pub fn null() -> Self {
        ConcreteNode::Leaf(None)
    }

    pub fn tagged(tag: impl Into<String>, child: ConcreteNode) -> Self {
        ConcreteNode::Tagged(tag.into(), Box::new(child))
    }

    pub fn sequence(children: Vec<ConcreteNode>) -> Self {
        ConcreteNode::Sequence(children)
    }

    pub fn repetition(children: Vec<ConcreteNode>) -> Self {
        ConcreteNode::Repetition(children)
    }
}

impl fmt::Display for ConcreteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConcreteNode::Leaf(Some(text)) => write!(f, "{text:?}"),
            ConcreteNode::Leaf(None) => write!(f, "null"),
            ConcreteNode::Sequence(children) => write_list(f, "seq", children),
            ConcreteNode::Repetition(children) => write_list(f, "many", children),
            ConcreteNode::Tagged(tag, child) => write!(f, "({tag} {child})"),
        }
    }
}

fn write_list(f: &mut fmt::Formatter<'_>, head: &str, children: &[ConcreteNode]) -> fmt::Result {
    write!(f, "({head}")?;
    for child in children {
        write!(f, " {child}")?;
    }
    write!(f, ")")
}

// ============================================================================
// INTERMEDIATE TREE
// ============================================================================

/// Classification of an intermediate node, used by reduction and by binding kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shape {
    Leaf,
    Sequence,
    Branch,
}

/// The reduced tree that rewrite rules operate on.
///
/// Branch keys are unique and unordered: two branches with the same entries are equal
/// regardless of how they were built.
///
/// # Examples
///
/// ```rust
/// use strata::tree::IntermediateNode;
/// let node = IntermediateNode::branch([
///     ("op", IntermediateNode::leaf("+")),
///     ("args", IntermediateNode::sequence(vec![IntermediateNode::leaf("1")])),
/// ]);
/// assert_eq!(node.to_string(), "{args: [\"1\"], op: \"+\"}");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum IntermediateNode {
    Leaf(Option<String>),
    Sequence(Vec<IntermediateNode>),
    Branch(OrdMap<String, IntermediateNode>),
}

impl IntermediateNode {
    pub fn leaf(text: impl Into<String>) -> Self {
        IntermediateNode::Leaf(Some(text.into()))
    }

    pub fn null() -> Self {
        IntermediateNode::Leaf(None)
    }

    pub fn sequence(elements: Vec<IntermediateNode>) -> Self {
        IntermediateNode::Sequence(elements)
    }

    /// Builds a branch; a repeated key keeps its last value.
    pub fn branch<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, IntermediateNode)>,
    {
        IntermediateNode::Branch(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn shape(&self) -> Shape {
        match self {
            IntermediateNode::Leaf(_) => Shape::Leaf,
            IntermediateNode::Sequence(_) => Shape::Sequence,
            IntermediateNode::Branch(_) => Shape::Branch,
        }
    }

    /// Text of a non-null leaf.
    pub fn text(&self) -> Option<&str> {
        match self {
            IntermediateNode::Leaf(text) => text.as_deref(),
            _ => None,
        }
    }

    pub fn elements(&self) -> Option<&[IntermediateNode]> {
        match self {
            IntermediateNode::Sequence(elements) => Some(elements),
            _ => None,
        }
    }

    pub fn entries(&self) -> Option<&OrdMap<String, IntermediateNode>> {
        match self {
            IntermediateNode::Branch(entries) => Some(entries),
            _ => None,
        }
    }

    /// Looks up `key` in a branch.
    pub fn get(&self, key: &str) -> Option<&IntermediateNode> {
        self.entries().and_then(|entries| entries.get(key))
    }

    /// A sequence whose elements are all leaves.
    pub fn is_shallow_sequence(&self) -> bool {
        self.elements()
            .is_some_and(|elements| elements.iter().all(|e| e.shape() == Shape::Leaf))
    }
}

impl fmt::Display for IntermediateNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IntermediateNode::Leaf(Some(text)) => write!(f, "{text:?}"),
            IntermediateNode::Leaf(None) => write!(f, "null"),
            IntermediateNode::Sequence(elements) => {
                write!(f, "[")?;
                for (i, element) in elements.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{element}")?;
                }
                write!(f, "]")
            }
            IntermediateNode::Branch(entries) => {
                write!(f, "{{")?;
                for (i, (key, value)) in entries.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key}: {value}")?;
                }
                write!(f, "}}")
            }
        }
    }
}
