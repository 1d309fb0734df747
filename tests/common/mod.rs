//! # Shared test fixtures
//!
//! Node shorthands and a small arithmetic language used across the integration tests.
//! The arithmetic grammar is evaluated purely by rewrite rules: numbers, parenthesised
//! groups and operator chains all reduce to `{first, rest}` branches, which a single rule
//! folds into a number leaf bottom-up.

#![allow(dead_code)]

use strata::prelude::*;

pub const MISSING_PAREN: &str = "missing-paren";
pub const MISSING_OPERAND: &str = "missing-operand";

pub fn leaf(text: &str) -> IntermediateNode {
    IntermediateNode::leaf(text)
}

pub fn branch(entries: Vec<(&str, IntermediateNode)>) -> IntermediateNode {
    IntermediateNode::branch(entries)
}

pub fn seq_node(elements: Vec<IntermediateNode>) -> IntermediateNode {
    IntermediateNode::sequence(elements)
}

pub fn cleaf(text: &str) -> ConcreteNode {
    ConcreteNode::leaf(text)
}

// ============================================================================
// ARITHMETIC
// ============================================================================

fn number() -> Parser {
    pattern("[0-9]+")
        .expect("number pattern is valid")
        .tag("num")
}

fn factor() -> Parser {
    or!(
        number(),
        seq!(
            literal("("),
            lazy(expr),
            label_fail(literal(")"), MISSING_PAREN),
        ),
    )
}

fn chain(operand: fn() -> Parser, operators: Parser) -> Parser {
    seq!(
        lazy(operand).tag("first"),
        seq!(
            operators.tag("op"),
            label_fail(lazy(operand), MISSING_OPERAND).tag("operand"),
        )
        .many()
        .tag("rest"),
    )
}

fn term() -> Parser {
    chain(factor, or!(literal("*"), literal("/")))
}

pub fn expr() -> Parser {
    chain(term, or!(literal("+"), literal("-")))
}

fn value_of(node: Option<&IntermediateNode>) -> i64 {
    node.and_then(IntermediateNode::text)
        .and_then(|text| text.parse().ok())
        .unwrap_or(0)
}

fn fold_chain(bindings: &Bindings) -> IntermediateNode {
    let mut acc = value_of(bindings.get("first"));
    for step in bindings.elements("rest").unwrap_or_default() {
        let rhs = value_of(step.get("operand"));
        acc = match step.get("op").and_then(IntermediateNode::text) {
            Some("+") => acc + rhs,
            Some("-") => acc - rhs,
            Some("*") => acc * rhs,
            Some("/") => acc.checked_div(rhs).unwrap_or(0),
            _ => acc,
        };
    }
    IntermediateNode::leaf(acc.to_string())
}

pub fn arithmetic_rules() -> RuleSet {
    RuleSet::new()
        .with(rule(
            Pattern::branch([("num", leaf_binding("n"))]),
            |b| b.cloned("n"),
        ))
        .with(rule(
            Pattern::branch([("first", leaf_binding("first")), ("rest", any_binding("rest"))]),
            fold_chain,
        ))
}

pub fn arithmetic() -> Engine {
    Engine::new(expr())
        .with_rules(arithmetic_rules())
        .describe(MISSING_PAREN, "add a closing `)`")
        .describe(MISSING_OPERAND, "an operator must be followed by an operand")
}
