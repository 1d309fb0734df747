//! # Strata
//!
//! A parsing toolkit in three layers:
//!
//! 1. [`matcher`]: primitives and combinators that match text and build a concrete parse
//!    tree, with a two-kind failure protocol (backtrack vs. explicit, labeled failures).
//! 2. [`tree`]: the concrete tree and its reduction into a dense intermediate tree.
//! 3. [`rewrite`]: structural patterns with captures and a single-pass, bottom-up rule
//!    engine turning the intermediate tree into an application's syntax tree.
//!
//! [`engine`] strings the layers together and turns failures into located diagnostics.
//!
//! ```rust
//! use strata::prelude::*;
//!
//! let number = pattern("[0-9]+").unwrap();
//! let sum = seq!(number.clone().tag("lhs"), literal("+"), number.tag("rhs"));
//! let rules = RuleSet::new().with(rule(
//!     Pattern::branch([("lhs", leaf_binding("a")), ("rhs", leaf_binding("b"))]),
//!     |b| {
//!         let value = |name| b.text(name).and_then(|t| t.parse::<i64>().ok()).unwrap_or(0);
//!         IntermediateNode::leaf((value("a") + value("b")).to_string())
//!     },
//! ));
//!
//! let output = Engine::new(sum).with_rules(rules).run("1 + 2").unwrap();
//! assert_eq!(output.tree, IntermediateNode::leaf("3"));
//! ```

pub use crate::errors::{ParseError, StrataError};

pub mod engine;
pub mod errors;
pub mod matcher;
pub mod rewrite;
pub mod tree;

/// Everything needed to write a grammar and its rules.
pub mod prelude {
    pub use crate::engine::{Engine, EngineConfig, Output};
    pub use crate::errors::{Location, ParseError, StrataError};
    pub use crate::matcher::{
        any, any_with, end_of_input, end_of_input_with, fail, label_fail, lazy, literal,
        literal_with, many, many1, maybe, not, or_from, pattern, pattern_with, seq_from, tag,
        Label, MatchResult, Matcher, Parser, Whitespace,
    };
    pub use crate::rewrite::{
        any_binding, leaf_binding, rewrite, rewrite_traced, rule, sequence_binding, BindingKind,
        Bindings, Pattern, Rule, RuleSet,
    };
    pub use crate::tree::{reduce, ConcreteNode, IntermediateNode, Shape};
    pub use crate::{or, seq};
}
