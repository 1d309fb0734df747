//! Primitive matchers: `any`, `literal`, `pattern`, `end_of_input`.
//!
//! Every primitive trims leading whitespace before matching unless built with
//! [`Whitespace::Keep`]. When they fail, the failure's `rest` is the original, untrimmed
//! input. `any` consumes exactly one character after the trimmed whitespace.

use regex::Regex;

use super::{MatchResult, Parser};
use crate::errors::StrataError;
use crate::tree::ConcreteNode;

/// Leading-whitespace policy of a primitive matcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Whitespace {
    /// Skip leading whitespace before matching.
    #[default]
    Trim,
    /// Match at the exact input position.
    Keep,
}

impl Whitespace {
    fn apply(self, input: &str) -> &str {
        match self {
            Whitespace::Trim => input.trim_start(),
            Whitespace::Keep => input,
        }
    }
}

/// Matches any single character after skipping leading whitespace.
///
/// # Examples
///
/// ```rust
/// use strata::prelude::*;
/// let result = any().apply("  xyz");
/// assert_eq!(result.output(), Some(&ConcreteNode::leaf("x")));
/// assert_eq!(result.rest(), "yz");
/// assert!(any().apply("   ").is_backtrack());
/// ```
pub fn any() -> Parser {
    any_with(Whitespace::Trim)
}

/// Matches any single character, with an explicit whitespace policy.
pub fn any_with(whitespace: Whitespace) -> Parser {
    Parser::new("any", move |input| {
        let trimmed = whitespace.apply(input);
        match trimmed.chars().next() {
            Some(c) => {
                let rest = &trimmed[c.len_utf8()..];
                MatchResult::success(ConcreteNode::leaf(c.to_string()), rest)
            }
            None => MatchResult::backtrack(input),
        }
    })
}

/// Matches `text` after skipping leading whitespace.
///
/// The empty literal always succeeds, consuming only the whitespace.
///
/// # Examples
///
/// ```rust
/// use strata::prelude::*;
/// let result = literal("abc").apply("  abcdef");
/// assert_eq!(result.output(), Some(&ConcreteNode::leaf("abc")));
/// assert_eq!(result.rest(), "def");
/// ```
pub fn literal(text: impl Into<String>) -> Parser {
    literal_with(text, Whitespace::Trim)
}

/// Matches `text` with an explicit whitespace policy.
pub fn literal_with(text: impl Into<String>, whitespace: Whitespace) -> Parser {
    let text = text.into();
    Parser::new("literal", move |input| {
        let trimmed = whitespace.apply(input);
        match trimmed.strip_prefix(text.as_str()) {
            Some(rest) => MatchResult::success(ConcreteNode::leaf(text.as_str()), rest),
            None => MatchResult::backtrack(input),
        }
    })
}

/// Matches the regular expression `source` at the start of the (trimmed) input.
///
/// The expression is anchored: a match further into the input does not count.
///
/// # Errors
///
/// Returns [`StrataError::InvalidPattern`] if `source` is not a valid expression.
///
/// # Examples
///
/// ```rust
/// use strata::prelude::*;
/// let number = pattern(r"[0-9]+").unwrap();
/// assert_eq!(number.apply(" 42 apples").rest(), " apples");
/// assert!(number.apply("apples 42").is_backtrack());
/// ```
pub fn pattern(source: &str) -> Result<Parser, StrataError> {
    pattern_with(source, Whitespace::Trim)
}

/// Matches a regular expression with an explicit whitespace policy.
pub fn pattern_with(source: &str, whitespace: Whitespace) -> Result<Parser, StrataError> {
    let regex = Regex::new(&format!("^(?:{source})")).map_err(|err| {
        StrataError::InvalidPattern {
            pattern: source.to_string(),
            source: err,
        }
    })?;
    Ok(Parser::new("pattern", move |input| {
        let trimmed = whitespace.apply(input);
        match regex.find(trimmed) {
            Some(found) => MatchResult::success(
                ConcreteNode::leaf(found.as_str()),
                &trimmed[found.end()..],
            ),
            None => MatchResult::backtrack(input),
        }
    }))
}

/// Zero-width success when only whitespace remains.
pub fn end_of_input() -> Parser {
    end_of_input_with(Whitespace::Trim)
}

/// Zero-width success when no input remains under the given whitespace policy.
pub fn end_of_input_with(whitespace: Whitespace) -> Parser {
    Parser::new("end_of_input", move |input| {
        let trimmed = whitespace.apply(input);
        if trimmed.is_empty() {
            MatchResult::success(ConcreteNode::null(), trimmed)
        } else {
            MatchResult::backtrack(input)
        }
    })
}
