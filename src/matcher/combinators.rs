//! Combinators composing matchers into grammars.
//!
//! Failure protocol shared by every combinator here:
//!
//! - a backtrack failure (no label) may be swallowed by `or`, `maybe`, `not` and `many`;
//! - an explicit failure (with a label) is returned unchanged by all of them, with its
//!   original `rest`, and stops `or` from trying further alternatives;
//! - only `label_fail` turns a backtrack failure into an explicit one. Nothing goes the
//!   other way.
//!
//! `seq` and `or` need at least two matchers. The [`seq!`](crate::seq) and
//! [`or!`](crate::or) macros enforce that at compile time; the `Vec` constructors check it
//! at runtime.

use super::{Label, MatchResult, Matcher, Parser};
use crate::errors::StrataError;
use crate::tree::ConcreteNode;

// ============================================================================
// ORDERED CHOICE
// ============================================================================

/// Ordered choice over `alternatives`, checked to contain at least two matchers.
pub fn or(alternatives: Vec<Parser>) -> Result<Parser, StrataError> {
    if alternatives.len() < 2 {
        return Err(StrataError::TooFewMatchers {
            combinator: "or",
            count: alternatives.len(),
        });
    }
    Ok(choice(alternatives))
}

/// Ordered choice over `first`, `second` and then `rest`.
pub fn or_from(first: Parser, second: Parser, rest: Vec<Parser>) -> Parser {
    let mut alternatives = Vec::with_capacity(rest.len() + 2);
    alternatives.push(first);
    alternatives.push(second);
    alternatives.extend(rest);
    choice(alternatives)
}

fn choice(alternatives: Vec<Parser>) -> Parser {
    Parser::new("or", move |input| {
        // Furthest backtrack failure so far. Strict `<`: ties keep the earliest alternative.
        let mut furthest: Option<&str> = None;
        for alternative in &alternatives {
            match alternative.apply(input) {
                MatchResult::Failure { rest, label: None } => {
                    if furthest.map_or(true, |best| rest.len() < best.len()) {
                        furthest = Some(rest);
                    }
                }
                decided => return decided,
            }
        }
        MatchResult::backtrack(furthest.unwrap_or(input))
    })
}

// ============================================================================
// SEQUENCE
// ============================================================================

/// Sequence of `parsers`, checked to contain at least two matchers.
pub fn seq(parsers: Vec<Parser>) -> Result<Parser, StrataError> {
    if parsers.len() < 2 {
        return Err(StrataError::TooFewMatchers {
            combinator: "seq",
            count: parsers.len(),
        });
    }
    Ok(sequence(parsers))
}

/// Sequence of `first`, `second` and then `rest`.
pub fn seq_from(first: Parser, second: Parser, rest: Vec<Parser>) -> Parser {
    let mut parsers = Vec::with_capacity(rest.len() + 2);
    parsers.push(first);
    parsers.push(second);
    parsers.extend(rest);
    sequence(parsers)
}

fn sequence(parsers: Vec<Parser>) -> Parser {
    Parser::new("seq", move |input| {
        let mut children = Vec::with_capacity(parsers.len());
        let mut position = input;
        for parser in &parsers {
            match parser.apply(position) {
                MatchResult::Success { output, rest } => {
                    children.push(output);
                    position = rest;
                }
                failure @ MatchResult::Failure { .. } => return failure,
            }
        }
        MatchResult::success(ConcreteNode::Sequence(children), position)
    })
}

// ============================================================================
// REPETITION
// ============================================================================

/// Zero or more repetitions of `parser`.
///
/// Stops quietly at the first backtrack failure; an explicit failure is returned as is.
/// A success that consumes nothing is recorded once and ends the loop.
pub fn many(parser: Parser) -> Parser {
    Parser::new("many", move |input| repeat(&parser, input))
}

/// One or more repetitions of `parser`.
///
/// With nothing collected, backtrack-fails at the original input.
pub fn many1(parser: Parser) -> Parser {
    Parser::new("many1", move |input| match repeat(&parser, input) {
        MatchResult::Success {
            output: ConcreteNode::Repetition(children),
            ..
        } if children.is_empty() => MatchResult::backtrack(input),
        other => other,
    })
}

fn repeat<'a>(parser: &Parser, input: &'a str) -> MatchResult<'a> {
    let mut children = Vec::new();
    let mut position = input;
    loop {
        match parser.apply(position) {
            MatchResult::Success { output, rest } => {
                children.push(output);
                if rest.len() == position.len() {
                    break;
                }
                position = rest;
            }
            MatchResult::Failure { label: None, .. } => break,
            explicit @ MatchResult::Failure { .. } => return explicit,
        }
    }
    MatchResult::success(ConcreteNode::Repetition(children), position)
}

// ============================================================================
// OPTIONAL AND LOOKAHEAD
// ============================================================================

/// Optional `parser`: a backtrack failure becomes a zero-width success with a null leaf.
pub fn maybe(parser: Parser) -> Parser {
    Parser::new("maybe", move |input| match parser.apply(input) {
        MatchResult::Failure { label: None, .. } => {
            MatchResult::success(ConcreteNode::null(), input)
        }
        decided => decided,
    })
}

/// Negative lookahead. Never consumes input and never exposes what `parser` matched.
pub fn not(parser: Parser) -> Parser {
    Parser::new("not", move |input| match parser.apply(input) {
        MatchResult::Success { .. } => MatchResult::backtrack(input),
        MatchResult::Failure { label: None, .. } => {
            MatchResult::success(ConcreteNode::null(), input)
        }
        explicit @ MatchResult::Failure { .. } => explicit,
    })
}

// ============================================================================
// TAGGING AND EXPLICIT FAILURE
// ============================================================================

/// Wraps the output of `parser` in a tagged node. Failures pass through untagged.
pub fn tag(name: impl Into<String>, parser: Parser) -> Parser {
    let name = name.into();
    Parser::new("tag", move |input| {
        parser
            .apply(input)
            .map(|child| ConcreteNode::tagged(name.as_str(), child))
    })
}

/// Zero-width matcher that always fails explicitly with `label`.
pub fn fail(label: impl Into<Label>) -> Parser {
    let label = label.into();
    Parser::new("fail", move |input| MatchResult::explicit(input, label.clone()))
}

/// Turns a backtrack failure of `parser` into an explicit failure labeled `label`.
///
/// The `rest` of the backtrack failure is kept, so the error points at the deepest place
/// `parser` reached rather than where it started. Existing labels win.
pub fn label_fail(parser: Parser, label: impl Into<Label>) -> Parser {
    let label = label.into();
    Parser::new("label_fail", move |input| match parser.apply(input) {
        MatchResult::Failure { rest, label: None } => MatchResult::explicit(rest, label.clone()),
        decided => decided,
    })
}

// ============================================================================
// MACROS
// ============================================================================

/// Sequence of two or more matchers.
///
/// # Examples
///
/// ```rust
/// use strata::prelude::*;
/// let pair = seq!(literal("("), literal(")"));
/// assert!(pair.apply(" ( )").is_success());
/// ```
#[macro_export]
macro_rules! seq {
    ($first:expr, $second:expr $(, $rest:expr)* $(,)?) => {
        $crate::matcher::seq_from($first, $second, vec![$($rest),*])
    };
}

/// Ordered choice between two or more matchers.
///
/// # Examples
///
/// ```rust
/// use strata::prelude::*;
/// let sign = or!(literal("+"), literal("-"));
/// assert_eq!(sign.apply("-1").rest(), "1");
/// ```
#[macro_export]
macro_rules! or {
    ($first:expr, $second:expr $(, $rest:expr)* $(,)?) => {
        $crate::matcher::or_from($first, $second, vec![$($rest),*])
    };
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use super::*;
    use crate::matcher::literal;

    fn counting(counter: Arc<AtomicUsize>) -> Parser {
        Parser::new("counting", move |input| {
            counter.fetch_add(1, Ordering::SeqCst);
            MatchResult::success(ConcreteNode::null(), input)
        })
    }

    #[test]
    fn test_or_stops_at_explicit_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let choice = or_from(fail("x"), counting(Arc::clone(&calls)), vec![]);
        assert_eq!(choice.apply("abc"), MatchResult::explicit("abc", Label::from("x")));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_or_prefers_furthest_failure() {
        let shallow = literal("x");
        let deep = crate::seq!(literal("a"), literal("b"), literal("z"));
        let choice = or_from(shallow, deep, vec![]);
        assert_eq!(choice.apply("abc"), MatchResult::backtrack("c"));
    }

    #[test]
    fn test_or_all_backtrack_without_progress() {
        let choice = or_from(literal("x"), literal("y"), vec![literal("z")]);
        assert_eq!(choice.apply(" abc"), MatchResult::backtrack(" abc"));
    }

    #[test]
    fn test_or_returns_first_success() {
        let choice = crate::or!(tag("short", literal("a")), tag("long", literal("ab")));
        assert_eq!(
            choice.apply("ab"),
            MatchResult::success(ConcreteNode::tagged("short", ConcreteNode::leaf("a")), "b")
        );
    }

    #[test]
    fn test_or_runtime_arity() {
        assert!(matches!(
            or(vec![literal("a")]),
            Err(StrataError::TooFewMatchers { combinator: "or", count: 1 })
        ));
        assert!(matches!(
            seq(vec![]),
            Err(StrataError::TooFewMatchers { combinator: "seq", count: 0 })
        ));
    }

    #[test]
    fn test_seq_returns_failure_verbatim() {
        let s = crate::seq!(literal("a"), label_fail(literal("b"), "need-b"));
        assert_eq!(s.apply("a c"), MatchResult::explicit(" c", Label::from("need-b")));
        assert_eq!(s.apply("x"), MatchResult::backtrack("x"));
    }

    #[test]
    fn test_many_propagates_explicit_failure() {
        let item = crate::or!(literal("a"), crate::seq!(literal("!"), fail("bang")));
        let result = many(item).apply("aa!b");
        assert_eq!(result, MatchResult::explicit("b", Label::from("bang")));
    }

    #[test]
    fn test_many_zero_width_terminates() {
        let result = many(maybe(literal("q"))).apply("abc");
        assert_eq!(
            result,
            MatchResult::success(ConcreteNode::Repetition(vec![ConcreteNode::null()]), "abc")
        );
    }

    #[test]
    fn test_many1_propagates_explicit_failure() {
        let item = crate::or!(literal("a"), crate::seq!(literal("!"), fail("bang")));
        assert_eq!(
            many1(item).apply("a!z"),
            MatchResult::explicit("z", Label::from("bang"))
        );
    }

    #[test]
    fn test_many1_collects_every_repetition() {
        assert_eq!(
            many1(literal("ab")).apply("ab ab!"),
            MatchResult::success(
                ConcreteNode::repetition(vec![ConcreteNode::leaf("ab"), ConcreteNode::leaf("ab")]),
                "!"
            )
        );
    }

    #[test]
    fn test_many1_fails_at_original_input() {
        assert_eq!(many1(literal("a")).apply("  b"), MatchResult::backtrack("  b"));
    }

    #[test]
    fn test_maybe_and_not_are_zero_width() {
        assert_eq!(
            maybe(literal("a")).apply(" b"),
            MatchResult::success(ConcreteNode::null(), " b")
        );
        assert_eq!(
            not(literal("b")).apply(" a"),
            MatchResult::success(ConcreteNode::null(), " a")
        );
        assert_eq!(not(literal("a")).apply(" a"), MatchResult::backtrack(" a"));
    }

    #[test]
    fn test_not_propagates_explicit() {
        let result = not(fail("deep")).apply("abc");
        assert_eq!(result, MatchResult::explicit("abc", Label::from("deep")));
    }

    #[test]
    fn test_label_fail_keeps_deepest_rest() {
        let p = label_fail(crate::seq!(literal("a"), literal("b")), "ab");
        assert_eq!(p.apply("a c"), MatchResult::explicit(" c", Label::from("ab")));
        let already = label_fail(fail("inner"), "outer");
        assert_eq!(already.apply("z"), MatchResult::explicit("z", Label::from("inner")));
        assert_eq!(
            p.apply("ab!"),
            MatchResult::success(
                ConcreteNode::sequence(vec![ConcreteNode::leaf("a"), ConcreteNode::leaf("b")]),
                "!"
            )
        );
    }

    #[test]
    fn test_tag_wraps_only_success() {
        let p = tag("word", literal("hi"));
        assert_eq!(
            p.apply("hi"),
            MatchResult::success(ConcreteNode::tagged("word", ConcreteNode::leaf("hi")), "")
        );
        assert_eq!(p.apply("no"), MatchResult::backtrack("no"));
    }
}
