//! Strata Error Handling
//!
//! Match failures are ordinary values (`MatchResult::Failure`) and never reach this module
//! on their own. Errors here cover the edges of the toolkit:
//!
//! - grammar construction mistakes (bad regular expressions, too few matchers),
//! - configuration loading,
//! - a failed top-level parse, turned into a `miette` diagnostic with a line/column location.
//!
//! The reducer and the rewriter are total and have no error type at all.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceCode, SourceSpan};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::matcher::Label;

// ============================================================================
// SOURCE CONTEXT
// ============================================================================

/// The original input of a parse together with a display name.
///
/// Failures only report the unconsumed suffix (`rest`) of the input; the source context
/// is what turns that suffix back into an offset and a line/column.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    pub fn new(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Convert to NamedSource for use with miette error reporting
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }

    /// Byte offset of `rest` inside the content, assuming `rest` is a suffix of it.
    pub fn offset_of(&self, rest: &str) -> usize {
        offset_of(&self.content, rest)
    }

    /// Line/column of `rest` inside the content.
    pub fn locate(&self, rest: &str) -> Location {
        Location::of(&self.content, rest)
    }
}

/// Byte offset at which the suffix `rest` starts inside `source`.
///
/// Lengths that do not line up with a character boundary (a `rest` that is not really a
/// suffix of `source`) are clamped down to the previous boundary.
pub fn offset_of(source: &str, rest: &str) -> usize {
    let mut offset = source.len().saturating_sub(rest.len());
    while !source.is_char_boundary(offset) {
        offset -= 1;
    }
    offset
}

// ============================================================================
// LOCATION
// ============================================================================

/// A 1-based line/column position. Columns count characters, not bytes.
///
/// # Examples
///
/// ```rust
/// use strata::errors::Location;
/// let source = "ab\ncde";
/// let loc = Location::of(source, &source[4..]);
/// assert_eq!(loc, Location { line: 2, column: 2 });
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    pub line: usize,
    pub column: usize,
}

impl Location {
    /// Locates the start of `rest`, a suffix of `source`.
    pub fn of(source: &str, rest: &str) -> Self {
        let consumed = &source[..offset_of(source, rest)];
        let line = consumed.matches('\n').count() + 1;
        let line_start = consumed.rfind('\n').map_or(0, |i| i + 1);
        let column = consumed[line_start..].chars().count() + 1;
        Self { line, column }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

// ============================================================================
// PARSE ERRORS
// ============================================================================

/// Why a top-level parse was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The grammar raised an explicit failure with this label.
    Labeled { label: Label },
    /// Every alternative backtracked; the location is the furthest point reached.
    NoMatch,
    /// The grammar matched, but left unconsumed input behind.
    TrailingInput,
}

impl ErrorKind {
    pub fn code_suffix(&self) -> &'static str {
        match self {
            ErrorKind::Labeled { .. } => "labeled",
            ErrorKind::NoMatch => "no_match",
            ErrorKind::TrailingInput => "trailing_input",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Labeled { label } => write!(f, "{label}"),
            ErrorKind::NoMatch => write!(f, "no alternative matched"),
            ErrorKind::TrailingInput => write!(f, "unexpected trailing input"),
        }
    }
}

/// A failed parse, located in its source.
#[derive(Debug, Error)]
#[error("parse error at {location}: {kind}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub offset: usize,
    pub location: Location,
    pub help: Option<String>,
    source_code: Arc<NamedSource<String>>,
}

impl ParseError {
    /// Builds an error for a failure whose unconsumed input is `rest`.
    pub fn at(source: &SourceContext, rest: &str, kind: ErrorKind) -> Self {
        Self {
            kind,
            offset: source.offset_of(rest),
            location: source.locate(rest),
            help: None,
            source_code: source.to_named_source(),
        }
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    /// The label of an explicit failure, if this error came from one.
    pub fn label(&self) -> Option<&Label> {
        match &self.kind {
            ErrorKind::Labeled { label } => Some(label),
            _ => None,
        }
    }

    pub fn span(&self) -> SourceSpan {
        SourceSpan::new(self.offset.into(), 1)
    }
}

impl Diagnostic for ParseError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(format!("strata::parse::{}", self.kind.code_suffix())))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display + 'a>)
    }

    fn source_code(&self) -> Option<&dyn SourceCode> {
        Some(self.source_code.as_ref() as &dyn SourceCode)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let label = LabeledSpan::new(Some(self.kind.to_string()), self.offset, 1);
        Some(Box::new(std::iter::once(label)))
    }
}

// ============================================================================
// CRATE ERROR
// ============================================================================

/// The single error type of the crate.
#[derive(Debug, Error, Diagnostic)]
pub enum StrataError {
    #[error("invalid regular expression `{pattern}`")]
    #[diagnostic(code(strata::grammar::invalid_pattern))]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("`{combinator}` needs at least two matchers, got {count}")]
    #[diagnostic(
        code(strata::grammar::arity),
        help("use the `seq!`/`or!` macros to have the arity checked at compile time")
    )]
    TooFewMatchers {
        combinator: &'static str,
        count: usize,
    },

    #[error("invalid engine configuration")]
    #[diagnostic(code(strata::config))]
    InvalidConfig {
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    #[diagnostic(transparent)]
    Parse(#[from] ParseError),
}

impl StrataError {
    /// The located parse error, if this is one.
    pub fn as_parse(&self) -> Option<&ParseError> {
        match self {
            StrataError::Parse(err) => Some(err),
            _ => None,
        }
    }
}
