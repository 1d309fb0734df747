//! Structural patterns with named captures.
//!
//! A [`Pattern`] mirrors the shape of an [`IntermediateNode`]. Literal parts must be equal
//! to the value they are compared with; binding placeholders accept a value (subject to
//! their [`BindingKind`]) and record it under their name in a [`Bindings`] table scoped to
//! a single match attempt.

use std::collections::BTreeMap;

use crate::tree::{IntermediateNode, Shape};

// ============================================================================
// BINDINGS
// ============================================================================

/// What a binding placeholder accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindingKind {
    /// Any node.
    Any,
    /// Only leaves.
    Leaf,
    /// Only sequences whose elements are all leaves.
    Sequence,
}

impl BindingKind {
    pub fn accepts(self, value: &IntermediateNode) -> bool {
        match self {
            BindingKind::Any => true,
            BindingKind::Leaf => value.shape() == Shape::Leaf,
            BindingKind::Sequence => value.is_shallow_sequence(),
        }
    }
}

/// Captures recorded while matching one pattern, in the order they were made.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Bindings {
    captures: Vec<(String, IntermediateNode)>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a capture. Binding a name twice keeps the later value in the earlier slot.
    pub fn bind(&mut self, name: impl Into<String>, value: IntermediateNode) {
        let name = name.into();
        match self.captures.iter_mut().find(|(existing, _)| *existing == name) {
            Some((_, slot)) => *slot = value,
            None => self.captures.push((name, value)),
        }
    }

    pub fn get(&self, name: &str) -> Option<&IntermediateNode> {
        self.captures
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, value)| value)
    }

    /// The captured node, or a null leaf when nothing was captured under `name`.
    pub fn cloned(&self, name: &str) -> IntermediateNode {
        self.get(name).cloned().unwrap_or_else(IntermediateNode::null)
    }

    /// Text of a captured non-null leaf.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(IntermediateNode::text)
    }

    /// Elements of a captured sequence.
    pub fn elements(&self, name: &str) -> Option<&[IntermediateNode]> {
        self.get(name).and_then(IntermediateNode::elements)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.captures.iter().map(|(name, _)| name.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &IntermediateNode)> {
        self.captures.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.captures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.captures.is_empty()
    }
}

// ============================================================================
// PATTERNS
// ============================================================================

/// A value shaped like (part of) an intermediate node, possibly containing placeholders.
///
/// # Examples
///
/// ```rust
/// use strata::rewrite::{leaf_binding, Pattern};
/// use strata::tree::IntermediateNode;
///
/// let pattern = Pattern::branch([("op", Pattern::leaf("+")), ("lhs", leaf_binding("x"))]);
/// let value = IntermediateNode::branch([
///     ("op", IntermediateNode::leaf("+")),
///     ("lhs", IntermediateNode::leaf("1")),
/// ]);
/// let bindings = pattern.matches(&value).unwrap();
/// assert_eq!(bindings.text("x"), Some("1"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Pattern {
    /// Requires deep equality.
    Literal(IntermediateNode),
    /// Captures the value under `name` if `kind` accepts it.
    Binding { name: String, kind: BindingKind },
    /// Requires a sequence of the same length, matched element-wise.
    Sequence(Vec<Pattern>),
    /// Requires a branch with exactly these keys, matched value-wise.
    Branch(BTreeMap<String, Pattern>),
}

impl Pattern {
    pub fn leaf(text: impl Into<String>) -> Self {
        Pattern::Literal(IntermediateNode::leaf(text))
    }

    pub fn null() -> Self {
        Pattern::Literal(IntermediateNode::null())
    }

    pub fn sequence(elements: Vec<Pattern>) -> Self {
        Pattern::Sequence(elements)
    }

    pub fn branch<K, I>(entries: I) -> Self
    where
        K: Into<String>,
        I: IntoIterator<Item = (K, Pattern)>,
    {
        Pattern::Branch(
            entries
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        )
    }

    pub fn binding(name: impl Into<String>, kind: BindingKind) -> Self {
        Pattern::Binding {
            name: name.into(),
            kind,
        }
    }

    /// Matches `value` against this pattern, returning the captures on success.
    pub fn matches(&self, value: &IntermediateNode) -> Option<Bindings> {
        let mut bindings = Bindings::new();
        self.collect(value, &mut bindings).then_some(bindings)
    }

    fn collect(&self, value: &IntermediateNode, bindings: &mut Bindings) -> bool {
        match (self, value) {
            (Pattern::Literal(expected), _) => expected == value,
            (Pattern::Binding { name, kind }, _) => {
                if !kind.accepts(value) {
                    return false;
                }
                bindings.bind(name.as_str(), value.clone());
                true
            }
            (Pattern::Sequence(patterns), IntermediateNode::Sequence(elements)) => {
                patterns.len() == elements.len()
                    && patterns
                        .iter()
                        .zip(elements)
                        .all(|(pattern, element)| pattern.collect(element, bindings))
            }
            (Pattern::Branch(patterns), IntermediateNode::Branch(entries)) => {
                patterns.len() == entries.len()
                    && patterns.iter().all(|(key, pattern)| {
                        entries
                            .get(key.as_str())
                            .is_some_and(|entry| pattern.collect(entry, bindings))
                    })
            }
            _ => false,
        }
    }
}

impl From<IntermediateNode> for Pattern {
    fn from(value: IntermediateNode) -> Self {
        Pattern::Literal(value)
    }
}

/// Placeholder accepting any node.
pub fn any_binding(name: impl Into<String>) -> Pattern {
    Pattern::binding(name, BindingKind::Any)
}

/// Placeholder accepting only leaves.
pub fn leaf_binding(name: impl Into<String>) -> Pattern {
    Pattern::binding(name, BindingKind::Leaf)
}

/// Placeholder accepting only sequences of leaves.
pub fn sequence_binding(name: impl Into<String>) -> Pattern {
    Pattern::binding(name, BindingKind::Sequence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(text: &str) -> IntermediateNode {
        IntermediateNode::leaf(text)
    }

    #[test]
    fn test_branch_requires_exact_key_set() {
        let pattern = Pattern::branch([("a", any_binding("x"))]);
        let extra = IntermediateNode::branch([("a", leaf("1")), ("b", leaf("2"))]);
        let missing = IntermediateNode::branch([("b", leaf("2"))]);
        assert!(pattern.matches(&extra).is_none());
        assert!(pattern.matches(&missing).is_none());
        assert!(pattern
            .matches(&IntermediateNode::branch([("a", leaf("1"))]))
            .is_some());
    }

    #[test]
    fn test_sequence_requires_equal_length() {
        let pattern = Pattern::sequence(vec![leaf_binding("a"), leaf_binding("b")]);
        let two = IntermediateNode::sequence(vec![leaf("1"), leaf("2")]);
        let three = IntermediateNode::sequence(vec![leaf("1"), leaf("2"), leaf("3")]);
        let bindings = pattern.matches(&two).unwrap();
        assert_eq!(bindings.names().collect::<Vec<_>>(), vec!["a", "b"]);
        assert!(pattern.matches(&three).is_none());
    }

    #[test]
    fn test_binding_kinds() {
        let seq_of_leaves = IntermediateNode::sequence(vec![leaf("1"), IntermediateNode::null()]);
        let seq_of_branch =
            IntermediateNode::sequence(vec![IntermediateNode::branch([("k", leaf("v"))])]);

        assert!(leaf_binding("x").matches(&leaf("1")).is_some());
        assert!(leaf_binding("x").matches(&IntermediateNode::null()).is_some());
        assert!(leaf_binding("x").matches(&seq_of_leaves).is_none());

        assert!(sequence_binding("x").matches(&seq_of_leaves).is_some());
        assert!(sequence_binding("x").matches(&seq_of_branch).is_none());
        assert!(sequence_binding("x").matches(&leaf("1")).is_none());

        assert!(any_binding("x").matches(&seq_of_branch).is_some());
    }

    #[test]
    fn test_literal_requires_deep_equality() {
        let pattern = Pattern::from(IntermediateNode::sequence(vec![leaf("a")]));
        assert!(pattern
            .matches(&IntermediateNode::sequence(vec![leaf("a")]))
            .is_some());
        assert!(pattern
            .matches(&IntermediateNode::sequence(vec![leaf("b")]))
            .is_none());
    }

    #[test]
    fn test_rebinding_overwrites() {
        let pattern = Pattern::sequence(vec![any_binding("x"), any_binding("x")]);
        let value = IntermediateNode::sequence(vec![leaf("1"), leaf("2")]);
        let bindings = pattern.matches(&value).unwrap();
        assert_eq!(bindings.len(), 1);
        assert_eq!(bindings.text("x"), Some("2"));
    }

    #[test]
    fn test_missing_capture_is_null() {
        assert_eq!(Bindings::new().cloned("nope"), IntermediateNode::null());
    }
}
