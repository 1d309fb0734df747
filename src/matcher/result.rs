//! The two-case outcome of running a matcher.
//!
//! A failure without a label is a *backtrack* failure: recoverable, and silently replaced
//! by whatever alternative a combinator tries next. A failure carrying a label is an
//! *explicit* failure: every combinator passes it through unchanged (same `rest`, same
//! label), so it behaves like an exception scoped to the whole parse. No combinator
//! downgrades an explicit failure to a backtrack failure.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::tree::ConcreteNode;

/// Identifier attached to an explicit failure.
///
/// Applications keep a closed set of these, usually as `&'static str` constants or an
/// enum converted with `From`, and map them to messages when reporting.
///
/// # Examples
///
/// ```rust
/// use strata::matcher::Label;
/// const MISSING_PAREN: &str = "missing-paren";
/// let label = Label::from(MISSING_PAREN);
/// assert_eq!(label.as_str(), "missing-paren");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Label(Cow<'static, str>);

impl Label {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&'static str> for Label {
    fn from(value: &'static str) -> Self {
        Label(Cow::Borrowed(value))
    }
}

impl From<String> for Label {
    fn from(value: String) -> Self {
        Label(Cow::Owned(value))
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Result of applying a matcher to an input.
///
/// `rest` is always a suffix of the input the outermost matcher was given. For failures it
/// is the suffix at the point of failure, which may lie deeper than the input of the
/// matcher that reports it.
#[derive(Debug, Clone, PartialEq)]
pub enum MatchResult<'a, T = ConcreteNode> {
    Success { output: T, rest: &'a str },
    Failure { rest: &'a str, label: Option<Label> },
}

impl<'a, T> MatchResult<'a, T> {
    pub fn success(output: T, rest: &'a str) -> Self {
        MatchResult::Success { output, rest }
    }

    /// A recoverable, label-less failure.
    pub fn backtrack(rest: &'a str) -> Self {
        MatchResult::Failure { rest, label: None }
    }

    /// A labeled failure that short-circuits every enclosing combinator.
    pub fn explicit(rest: &'a str, label: Label) -> Self {
        MatchResult::Failure {
            rest,
            label: Some(label),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, MatchResult::Success { .. })
    }

    pub fn is_backtrack(&self) -> bool {
        matches!(self, MatchResult::Failure { label: None, .. })
    }

    pub fn is_explicit(&self) -> bool {
        matches!(self, MatchResult::Failure { label: Some(_), .. })
    }

    pub fn rest(&self) -> &'a str {
        match self {
            MatchResult::Success { rest, .. } | MatchResult::Failure { rest, .. } => *rest,
        }
    }

    pub fn label(&self) -> Option<&Label> {
        match self {
            MatchResult::Failure { label, .. } => label.as_ref(),
            MatchResult::Success { .. } => None,
        }
    }

    pub fn output(&self) -> Option<&T> {
        match self {
            MatchResult::Success { output, .. } => Some(output),
            MatchResult::Failure { .. } => None,
        }
    }

    pub fn into_output(self) -> Option<T> {
        match self {
            MatchResult::Success { output, .. } => Some(output),
            MatchResult::Failure { .. } => None,
        }
    }

    /// Transforms the output of a success; failures are carried over untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> MatchResult<'a, U> {
        match self {
            MatchResult::Success { output, rest } => MatchResult::Success {
                output: f(output),
                rest,
            },
            MatchResult::Failure { rest, label } => MatchResult::Failure { rest, label },
        }
    }
}
