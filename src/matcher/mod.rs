//! Matchers and combinators.
//!
//! A matcher is a pure function from an input string to a [`MatchResult`]. Grammars are
//! assembled from the primitives in [`primitives`] with the combinators in
//! [`combinators`]; matching builds a [`ConcreteNode`] tree as a side effect.
//!
//! ## Ownership
//!
//! - [`Parser`] is an `Arc` around the matching function, so clones are cheap and a
//!   grammar can be shared between threads.
//! - Nothing a matcher produces borrows from the matcher; `rest` borrows from the input.
//!
//! ## Example
//!
//! ```rust
//! use strata::prelude::*;
//! let greeting = seq!(literal("hello"), literal("world").tag("who"));
//! let result = greeting.apply("  hello   world!");
//! assert_eq!(result.rest(), "!");
//! ```

use std::fmt;
use std::sync::Arc;

use crate::tree::ConcreteNode;

pub mod combinators;
pub mod primitives;
pub mod recursive;
pub mod result;

pub use combinators::{
    fail, label_fail, many, many1, maybe, not, or, or_from, seq, seq_from, tag,
};
pub use primitives::{
    any, any_with, end_of_input, end_of_input_with, literal, literal_with, pattern,
    pattern_with, Whitespace,
};
pub use recursive::lazy;
pub use result::{Label, MatchResult};

// ============================================================================
// MATCHER CONTRACT
// ============================================================================

/// The matcher contract: `Input -> MatchResult<Output>`.
///
/// Implementations must be stateless: applying the same matcher to the same input always
/// yields the same result.
pub trait Matcher {
    type Output;

    fn apply<'a>(&self, input: &'a str) -> MatchResult<'a, Self::Output>;
}

type MatchFn = dyn for<'a> Fn(&'a str) -> MatchResult<'a> + Send + Sync;

/// A grammar building block producing concrete tree nodes.
#[derive(Clone)]
pub struct Parser {
    kind: &'static str,
    run: Arc<MatchFn>,
}

impl Parser {
    /// Wraps a matching function. `kind` only shows up in `Debug` output.
    pub fn new<F>(kind: &'static str, run: F) -> Self
    where
        F: for<'a> Fn(&'a str) -> MatchResult<'a> + Send + Sync + 'static,
    {
        Self {
            kind,
            run: Arc::new(run),
        }
    }

    /// Lifts any matcher producing concrete nodes into a `Parser`.
    pub fn from_matcher<M>(matcher: M) -> Self
    where
        M: Matcher<Output = ConcreteNode> + Send + Sync + 'static,
    {
        Self::new("custom", move |input| matcher.apply(input))
    }

    pub fn kind(&self) -> &'static str {
        self.kind
    }

    pub fn tag(self, name: impl Into<String>) -> Parser {
        tag(name, self)
    }

    pub fn many(self) -> Parser {
        many(self)
    }

    pub fn many1(self) -> Parser {
        many1(self)
    }

    pub fn maybe(self) -> Parser {
        maybe(self)
    }

    pub fn not(self) -> Parser {
        not(self)
    }

    pub fn label_fail(self, label: impl Into<Label>) -> Parser {
        label_fail(self, label)
    }
}

impl Matcher for Parser {
    type Output = ConcreteNode;

    #[inline]
    fn apply<'a>(&self, input: &'a str) -> MatchResult<'a> {
        (self.run)(input)
    }
}

impl fmt::Debug for Parser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser").field("kind", &self.kind).finish()
    }
}
