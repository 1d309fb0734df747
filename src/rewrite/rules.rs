//! Rewrite rules and the bottom-up rewriter.
//!
//! A [`RuleSet`] is applied in a single bottom-up pass:
//!
//! - children are rewritten before their parent (sequence elements, branch values);
//! - each node is then offered to the rules in order, and the first rule whose pattern
//!   matches replaces the node with its transform's output;
//! - a node no rule matches passes through unchanged;
//! - a rule's output is never offered to the rules again. This is not a fixpoint
//!   system; a rewrite that needs another round must be expressed by a rule matching
//!   the parent.

use std::fmt;
use std::sync::Arc;

use super::pattern::{Bindings, Pattern};
use crate::tree::IntermediateNode;

/// Builds the replacement node from a rule's captures.
pub type Transform = Arc<dyn Fn(&Bindings) -> IntermediateNode + Send + Sync>;

// ============================================================================
// RULES
// ============================================================================

/// A pattern paired with the transform applied when it matches.
#[derive(Clone)]
pub struct Rule {
    pattern: Pattern,
    transform: Transform,
}

/// Creates a rule.
///
/// # Examples
///
/// ```rust
/// use strata::rewrite::{leaf_binding, rule, Pattern};
/// use strata::tree::IntermediateNode;
///
/// let negate = rule(Pattern::branch([("neg", leaf_binding("n"))]), |b| {
///     IntermediateNode::leaf(format!("-{}", b.text("n").unwrap_or_default()))
/// });
/// let node = IntermediateNode::branch([("neg", IntermediateNode::leaf("4"))]);
/// assert_eq!(negate.apply(&node), IntermediateNode::leaf("-4"));
/// ```
pub fn rule<F>(pattern: impl Into<Pattern>, transform: F) -> Rule
where
    F: Fn(&Bindings) -> IntermediateNode + Send + Sync + 'static,
{
    Rule {
        pattern: pattern.into(),
        transform: Arc::new(transform),
    }
}

impl Rule {
    pub fn pattern(&self) -> &Pattern {
        &self.pattern
    }

    /// The transformed node if the pattern matches `value`.
    pub fn try_apply(&self, value: &IntermediateNode) -> Option<IntermediateNode> {
        self.pattern
            .matches(value)
            .map(|bindings| (self.transform)(&bindings))
    }

    /// Replace-or-identity: the transformed node, or a copy of `value` when the pattern
    /// does not match.
    pub fn apply(&self, value: &IntermediateNode) -> IntermediateNode {
        self.try_apply(value).unwrap_or_else(|| value.clone())
    }
}

impl fmt::Debug for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Rule")
            .field("pattern", &self.pattern)
            .finish_non_exhaustive()
    }
}

/// An ordered list of rules; earlier rules take precedence.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<Rule>,
}

impl RuleSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a rule, builder style.
    pub fn with(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn push(&mut self, rule: Rule) {
        self.rules.push(rule);
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    /// Index and output of the first rule matching `value`.
    pub fn first_match(&self, value: &IntermediateNode) -> Option<(usize, IntermediateNode)> {
        self.rules
            .iter()
            .enumerate()
            .find_map(|(index, rule)| rule.try_apply(value).map(|output| (index, output)))
    }

    pub fn rewrite(&self, node: &IntermediateNode) -> IntermediateNode {
        rewrite(self, node)
    }
}

impl From<Vec<Rule>> for RuleSet {
    fn from(rules: Vec<Rule>) -> Self {
        Self { rules }
    }
}

impl FromIterator<Rule> for RuleSet {
    fn from_iter<I: IntoIterator<Item = Rule>>(iter: I) -> Self {
        Self {
            rules: iter.into_iter().collect(),
        }
    }
}

// ============================================================================
// REWRITING
// ============================================================================

/// One rule application, for traceability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteStep {
    /// Index of the winning rule in its rule set.
    pub rule: usize,
    /// The node as offered to the rules, children already rewritten.
    pub input: IntermediateNode,
    /// The transform's output.
    pub output: IntermediateNode,
}

/// Rewrites `node` bottom-up, once per node, first matching rule wins.
///
/// # Examples
///
/// ```rust
/// use strata::rewrite::{rewrite, rule, Pattern, RuleSet};
/// use strata::tree::IntermediateNode;
///
/// let rules = RuleSet::new()
///     .with(rule(Pattern::leaf("a"), |_| IntermediateNode::leaf("1")))
///     .with(rule(Pattern::branch([("foo", Pattern::leaf("1"))]), |_| {
///         IntermediateNode::leaf("2")
///     }));
/// let node = IntermediateNode::branch([("foo", IntermediateNode::leaf("a"))]);
/// assert_eq!(rewrite(&rules, &node), IntermediateNode::leaf("2"));
/// ```
pub fn rewrite(rules: &RuleSet, node: &IntermediateNode) -> IntermediateNode {
    Rewriter { rules, trace: None }.walk(node)
}

/// Like [`rewrite`], also returning every rule application in the order it happened.
pub fn rewrite_traced(
    rules: &RuleSet,
    node: &IntermediateNode,
) -> (IntermediateNode, Vec<RewriteStep>) {
    let mut rewriter = Rewriter {
        rules,
        trace: Some(Vec::new()),
    };
    let output = rewriter.walk(node);
    (output, rewriter.trace.unwrap_or_default())
}

struct Rewriter<'r> {
    rules: &'r RuleSet,
    trace: Option<Vec<RewriteStep>>,
}

impl Rewriter<'_> {
    fn walk(&mut self, node: &IntermediateNode) -> IntermediateNode {
        let rebuilt = match node {
            IntermediateNode::Leaf(_) => node.clone(),
            IntermediateNode::Sequence(elements) => {
                IntermediateNode::Sequence(elements.iter().map(|e| self.walk(e)).collect())
            }
            IntermediateNode::Branch(entries) => IntermediateNode::Branch(
                entries
                    .iter()
                    .map(|(key, value)| (key.clone(), self.walk(value)))
                    .collect(),
            ),
        };
        self.offer(rebuilt)
    }

    fn offer(&mut self, node: IntermediateNode) -> IntermediateNode {
        let Some((rule, output)) = self.rules.first_match(&node) else {
            return node;
        };
        tracing::trace!(rule, from = %node, to = %output, "rewrite rule applied");
        if let Some(trace) = self.trace.as_mut() {
            trace.push(RewriteStep {
                rule,
                input: node,
                output: output.clone(),
            });
        }
        output
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rewrite::{any_binding, leaf_binding};

    fn leaf(text: &str) -> IntermediateNode {
        IntermediateNode::leaf(text)
    }

    #[test]
    fn test_first_rule_wins() {
        let rules = RuleSet::new()
            .with(rule(leaf_binding("x"), |_| leaf("first")))
            .with(rule(Pattern::leaf("a"), |_| leaf("second")));
        assert_eq!(rewrite(&rules, &leaf("a")), leaf("first"));
    }

    #[test]
    fn test_no_fixpoint() {
        // a -> b and b -> c, but the output of the first rule is not offered again.
        let rules: RuleSet = vec![
            rule(Pattern::leaf("a"), |_| leaf("b")),
            rule(Pattern::leaf("b"), |_| leaf("c")),
        ]
        .into();
        assert_eq!(rewrite(&rules, &leaf("a")), leaf("b"));
    }

    #[test]
    fn test_children_rewritten_before_parent() {
        let rules = RuleSet::new()
            .with(rule(Pattern::leaf("1"), |_| leaf("one")))
            .with(rule(
                Pattern::sequence(vec![any_binding("x"), any_binding("y")]),
                |b| {
                    let joined = format!(
                        "{}+{}",
                        b.text("x").unwrap_or_default(),
                        b.text("y").unwrap_or_default()
                    );
                    leaf(&joined)
                },
            ));
        let node = IntermediateNode::sequence(vec![leaf("1"), leaf("1")]);
        assert_eq!(rewrite(&rules, &node), leaf("one+one"));
    }

    #[test]
    fn test_unmatched_passes_through() {
        let rules = RuleSet::new().with(rule(Pattern::leaf("zzz"), |_| leaf("!")));
        let node = IntermediateNode::branch([(
            "k",
            IntermediateNode::sequence(vec![leaf("a"), IntermediateNode::null()]),
        )]);
        assert_eq!(rewrite(&rules, &node), node);
    }

    #[test]
    fn test_trace_records_bottom_up_order() {
        let rules = RuleSet::new()
            .with(rule(Pattern::leaf("a"), |_| leaf("1")))
            .with(rule(Pattern::branch([("foo", Pattern::leaf("1"))]), |_| leaf("2")));
        let node = IntermediateNode::branch([("foo", leaf("a"))]);
        let (output, trace) = rewrite_traced(&rules, &node);
        assert_eq!(output, leaf("2"));
        assert_eq!(
            trace,
            vec![
                RewriteStep {
                    rule: 0,
                    input: leaf("a"),
                    output: leaf("1"),
                },
                RewriteStep {
                    rule: 1,
                    input: IntermediateNode::branch([("foo", leaf("1"))]),
                    output: leaf("2"),
                },
            ]
        );
    }

    #[test]
    fn test_rule_apply_is_identity_on_mismatch() {
        let r = rule(Pattern::leaf("x"), |_| leaf("y"));
        assert_eq!(r.apply(&leaf("q")), leaf("q"));
        assert_eq!(r.try_apply(&leaf("q")), None);
    }
}
