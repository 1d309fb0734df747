//! Strata Engine - parse, reduce, rewrite.
//!
//! The engine ties a grammar and a rule set into one pipeline and is the only place where
//! match failures become located, human-readable errors.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{debug, trace};

use crate::errors::{ErrorKind, ParseError, SourceContext, StrataError};
use crate::matcher::{Label, MatchResult, Matcher, Parser};
use crate::rewrite::{rewrite, rewrite_traced, RewriteStep, RuleSet};
use crate::tree::{reduce, ConcreteNode, IntermediateNode};

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Engine settings.
///
/// # Examples
///
/// ```rust
/// use strata::engine::EngineConfig;
/// let config = EngineConfig::from_json(r#"{ "trace_rewrites": true }"#).unwrap();
/// assert!(config.trace_rewrites);
/// assert!(config.require_full_input);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name shown for the input in diagnostics.
    pub source_name: String,
    /// Reject a successful match that leaves non-whitespace input behind.
    pub require_full_input: bool,
    /// Record every rule application in [`Output::trace`].
    pub trace_rewrites: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            source_name: "input".to_string(),
            require_full_input: true,
            trace_rewrites: false,
        }
    }
}

impl EngineConfig {
    pub fn from_json(text: &str) -> Result<Self, StrataError> {
        serde_json::from_str(text).map_err(|source| StrataError::InvalidConfig { source })
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// The result of a full run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Output {
    pub tree: IntermediateNode,
    /// Empty unless `trace_rewrites` is set.
    pub trace: Vec<RewriteStep>,
}

/// A grammar, its rewrite rules, and the messages for its failure labels.
#[derive(Debug, Clone)]
pub struct Engine {
    grammar: Parser,
    rules: RuleSet,
    config: EngineConfig,
    messages: HashMap<Label, String>,
}

impl Engine {
    pub fn new(grammar: Parser) -> Self {
        Self {
            grammar,
            rules: RuleSet::new(),
            config: EngineConfig::default(),
            messages: HashMap::new(),
        }
    }

    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    pub fn with_config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    /// Registers the help message reported for failures labeled `label`.
    pub fn describe(mut self, label: impl Into<Label>, message: impl Into<String>) -> Self {
        self.messages.insert(label.into(), message.into());
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Runs the grammar over `source`, returning the concrete tree.
    pub fn parse(&self, source: &str) -> Result<ConcreteNode, StrataError> {
        debug!(source_name = %self.config.source_name, len = source.len(), "parsing");
        match self.grammar.apply(source) {
            MatchResult::Success { output, rest } => {
                if self.config.require_full_input && !rest.trim_start().is_empty() {
                    let leftover = rest.trim_start();
                    return Err(self.error(source, leftover, ErrorKind::TrailingInput));
                }
                Ok(output)
            }
            MatchResult::Failure { rest, label } => {
                trace!(?label, remaining = rest.len(), "grammar failed");
                let kind = match label {
                    Some(label) => ErrorKind::Labeled { label },
                    None => ErrorKind::NoMatch,
                };
                Err(self.error(source, rest, kind))
            }
        }
    }

    /// Parses `source`, reduces the concrete tree and rewrites the result.
    pub fn run(&self, source: &str) -> Result<Output, StrataError> {
        let concrete = self.parse(source)?;
        debug!("reducing concrete tree");
        let reduced = reduce(concrete);
        debug!(rules = self.rules.len(), "rewriting");
        let output = if self.config.trace_rewrites {
            let (tree, trace) = rewrite_traced(&self.rules, &reduced);
            Output { tree, trace }
        } else {
            Output {
                tree: rewrite(&self.rules, &reduced),
                trace: Vec::new(),
            }
        };
        Ok(output)
    }

    fn error(&self, source: &str, rest: &str, kind: ErrorKind) -> StrataError {
        let context = SourceContext::new(self.config.source_name.as_str(), source);
        let help = match &kind {
            ErrorKind::Labeled { label } => self.messages.get(label).cloned(),
            _ => None,
        };
        let error = ParseError::at(&context, rest, kind);
        match help {
            Some(help) => error.with_help(help).into(),
            None => error.into(),
        }
    }
}
