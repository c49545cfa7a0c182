//! Compiled-table surface: lookups, dumps, validation errors, and
//! (with the `serde` feature) serialization round-trips.

#[path = "helpers/mod.rs"]
mod helpers;

use helpers::grammars::expr_grammar;
use trellis::{GlaBuilder, GrammarBuilder, GrammarError};

#[test]
fn test_rule_lookup_by_name() {
    let grammar = expr_grammar();
    let expr = grammar.rule_named("expr").expect("expr exists");
    let term = grammar.rule_named("term").expect("term exists");
    assert_eq!(grammar.start_rule(), expr);
    assert_ne!(expr, term);
    assert!(grammar.rule_named("factor").is_none());
    assert_eq!(grammar.rule(term).name(), "term");
}

#[test]
fn test_table_counts() {
    let grammar = expr_grammar();
    assert_eq!(grammar.rule_count(), 2);
    assert_eq!(grammar.gla_count(), 1);
    // NUM + ( ) WS
    assert_eq!(grammar.terminal_count(), 5);
}

#[test]
fn test_dump_is_readable() {
    let grammar = expr_grammar();
    let mut out = Vec::new();
    grammar.dump(&mut out).expect("dump to a vec");
    let text = String::from_utf8(out).expect("dump is utf-8");
    assert!(text.contains("expr <- start"));
    assert!(text.contains("NUM"));
    assert!(text.contains("call term"));
    assert!(text.contains("(skip)"));
}

#[test]
fn test_unknown_gla_reference_rejected() {
    let mut b = GrammarBuilder::new();
    let t = b.terminal("a");
    let mut g = GlaBuilder::new();
    g.literal(t, b"a", 0);
    b.gla(g);
    let root = b.rule("root");
    // GLA id 3 was never registered
    b.state(root, trellis::GlaId::new(3), true);
    b.start_rule(root);
    assert!(matches!(
        b.finish().unwrap_err(),
        GrammarError::UnknownGla { gla: 3, .. }
    ));
}

#[test]
fn test_duplicate_transition_rejected() {
    let mut b = GrammarBuilder::new();
    let t = b.terminal("a");
    let mut g = GlaBuilder::new();
    g.literal(t, b"a", 0);
    let gla = b.gla(g);
    let root = b.rule("root");
    let s0 = b.state(root, gla, false);
    let s1 = b.state(root, gla, true);
    b.shift(root, s0, t, s1);
    b.shift(root, s0, t, s0);
    b.start_rule(root);
    assert!(matches!(
        b.finish().unwrap_err(),
        GrammarError::AmbiguousTransition { .. }
    ));
}

#[test]
fn test_shift_target_out_of_range_rejected() {
    let mut b = GrammarBuilder::new();
    let t = b.terminal("a");
    let mut g = GlaBuilder::new();
    g.literal(t, b"a", 0);
    let gla = b.gla(g);
    let root = b.rule("root");
    let s0 = b.state(root, gla, true);
    b.shift(root, s0, t, trellis::RtnStateId::new(9));
    b.start_rule(root);
    assert!(matches!(
        b.finish().unwrap_err(),
        GrammarError::InvalidStateRef { target: 9, .. }
    ));
}

#[test]
fn test_empty_rule_rejected() {
    let mut b = GrammarBuilder::new();
    let t = b.terminal("a");
    let mut g = GlaBuilder::new();
    g.literal(t, b"a", 0);
    let gla = b.gla(g);
    let root = b.rule("root");
    b.state(root, gla, true);
    b.rule("hollow");
    b.start_rule(root);
    assert!(matches!(
        b.finish().unwrap_err(),
        GrammarError::EmptyRule(name) if name == "hollow"
    ));
}

#[test]
fn test_error_messages_name_the_offender() {
    let mut b = GrammarBuilder::new();
    let t = b.terminal("a");
    let mut g = GlaBuilder::new();
    g.literal(t, b"a", 0);
    let gla = b.gla(g);
    let root = b.rule("root");
    b.state(root, gla, false);
    b.start_rule(root);
    let err = b.finish().unwrap_err();
    assert_eq!(err.to_string(), "rule `root` has no accepting state");
}

#[cfg(feature = "serde")]
#[test]
fn test_grammar_serializes_round_trip() {
    use std::sync::Arc;
    use trellis::{CompiledGrammar, ParseSession, Status};

    let grammar = expr_grammar();
    let json = serde_json::to_string(&*grammar).expect("serialize");
    let back: CompiledGrammar = serde_json::from_str(&json).expect("deserialize");
    assert_eq!(*grammar, back);

    // the deserialized tables drive a parse just the same
    let mut session = ParseSession::new(Arc::new(back), ());
    assert_eq!(session.parse(b"1+(2+3)", true), Status::Ok);
}
