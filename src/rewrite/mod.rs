//! Pattern-directed rewriting of intermediate trees.
//!
//! This is a minimal term-rewriting system: structural patterns with captures
//! ([`pattern`]) and an ordered rule list applied once per node, bottom-up ([`rules`]).
//! Rule sets are how an application turns the generic intermediate tree into its own
//! syntax tree.

pub mod pattern;
pub mod rules;

pub use pattern::{
    any_binding, leaf_binding, sequence_binding, BindingKind, Bindings, Pattern,
};
pub use rules::{rewrite, rewrite_traced, rule, RewriteStep, Rule, RuleSet, Transform};
