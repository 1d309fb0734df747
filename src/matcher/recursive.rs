//! Deferred construction for self-referential grammars.

use once_cell::sync::OnceCell;

use super::{Matcher, Parser};

/// Defers building a sub-grammar until it is first applied, then reuses it.
///
/// Rule functions can refer to themselves (directly or through other rules) by wrapping
/// the recursive reference in `lazy`. A rule that reaches itself again without consuming
/// input recurses until the stack is exhausted; that is not detected.
///
/// # Examples
///
/// ```rust
/// use strata::prelude::*;
/// fn nested() -> Parser {
///     or!(
///         seq!(literal("("), lazy(nested), literal(")")),
///         literal("x"),
///     )
/// }
/// assert!(nested().apply("((x))").is_success());
/// assert!(nested().apply("((x)").is_backtrack());
/// ```
pub fn lazy(build: fn() -> Parser) -> Parser {
    let cell: OnceCell<Parser> = OnceCell::new();
    Parser::new("lazy", move |input| cell.get_or_init(build).apply(input))
}
