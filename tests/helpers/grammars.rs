//! Hand-assembled grammar tables used across the integration tests.

use std::sync::Arc;

use trellis::{CompiledGrammar, GlaBuilder, GrammarBuilder};

/// `root: "a" "b"` - the lookahead automaton also knows a stray
/// terminal `x` so syntactic faults are reachable.
pub fn ab_grammar() -> Arc<CompiledGrammar> {
    let mut b = GrammarBuilder::new();
    let t_a = b.terminal("a");
    let t_b = b.terminal("b");
    let t_x = b.terminal("x");

    let mut g = GlaBuilder::new();
    g.literal(t_a, b"a", 0);
    g.literal(t_b, b"b", 0);
    g.literal(t_x, b"x", 0);
    let gla = b.gla(g);

    let root = b.rule("root");
    let s0 = b.state(root, gla, false);
    let s1 = b.state(root, gla, false);
    let s2 = b.state(root, gla, true);
    b.shift(root, s0, t_a, s1);
    b.shift(root, s1, t_b, s2);
    b.start_rule(root);

    Arc::new(b.finish().expect("ab grammar is well-formed"))
}

/// A small arithmetic grammar with nested rules and skipped whitespace:
///
/// ```text
/// expr: term ("+" term)*
/// term: NUM | "(" expr ")"
/// NUM:  [0-9]+        WS: " "+ (skip)
/// ```
///
/// Every state shares one union lookahead automaton; multi-digit
/// numbers exercise maximal munch across chunk boundaries.
pub fn expr_grammar() -> Arc<CompiledGrammar> {
    let mut b = GrammarBuilder::new();
    let t_num = b.terminal("NUM");
    let t_plus = b.terminal("+");
    let t_lparen = b.terminal("(");
    let t_rparen = b.terminal(")");
    let t_ws = b.skip_terminal("WS");

    let mut g = GlaBuilder::new();
    let digits = g.state();
    g.arc(g.start(), b'0', b'9', digits);
    g.arc(digits, b'0', b'9', digits);
    g.accept(digits, t_num, 0);
    let spaces = g.state();
    g.byte_arc(g.start(), b' ', spaces);
    g.byte_arc(spaces, b' ', spaces);
    g.accept(spaces, t_ws, 0);
    g.literal(t_plus, b"+", 0);
    g.literal(t_lparen, b"(", 0);
    g.literal(t_rparen, b")", 0);
    let gla = b.gla(g);

    let expr = b.rule("expr");
    let term = b.rule("term");

    // expr: e0 -term-> e1 [accepting] -"+"-> e2 -term-> e1
    let e0 = b.state(expr, gla, false);
    let e1 = b.state(expr, gla, true);
    let e2 = b.state(expr, gla, false);
    b.call(expr, e0, t_num, term, e1);
    b.call(expr, e0, t_lparen, term, e1);
    b.shift(expr, e1, t_plus, e2);
    b.call(expr, e2, t_num, term, e1);
    b.call(expr, e2, t_lparen, term, e1);

    // term: t0 -NUM-> t3 [accepting] | t0 -"("-> t1 -expr-> t2 -")"-> t3
    let t0 = b.state(term, gla, false);
    let t1 = b.state(term, gla, false);
    let t2 = b.state(term, gla, false);
    let t3 = b.state(term, gla, true);
    b.shift(term, t0, t_num, t3);
    b.shift(term, t0, t_lparen, t1);
    b.call(term, t1, t_num, expr, t2);
    b.call(term, t1, t_lparen, expr, t2);
    b.shift(term, t2, t_rparen, t3);

    b.start_rule(expr);
    Arc::new(b.finish().expect("expr grammar is well-formed"))
}

/// Terminals `=` and `==` plus an identifier class, for longest-match
/// and priority checks: `in` is both a keyword and an identifier
/// (equal length), with the keyword declared at higher priority.
pub fn keyword_grammar() -> Arc<CompiledGrammar> {
    let mut b = GrammarBuilder::new();
    let t_eq = b.terminal("=");
    let t_eqeq = b.terminal("==");
    let t_in = b.terminal("in");
    let t_ident = b.terminal("IDENT");

    let mut g = GlaBuilder::new();
    g.literal(t_eq, b"=", 0);
    g.literal(t_eqeq, b"==", 0);
    // identifier: [a-z]+, with the "in" path split out so the arcs out
    // of each state stay disjoint
    let ident = g.state();
    let s_i = g.state();
    let s_in = g.state();
    g.arc(ident, b'a', b'z', ident);
    g.accept(ident, t_ident, 5);
    g.arc(g.start(), b'a', b'h', ident);
    g.byte_arc(g.start(), b'i', s_i);
    g.arc(g.start(), b'j', b'z', ident);
    g.accept(s_i, t_ident, 5);
    g.arc(s_i, b'a', b'm', ident);
    g.byte_arc(s_i, b'n', s_in);
    g.arc(s_i, b'o', b'z', ident);
    // keyword "in" wins the equal-length tie against IDENT
    g.accept(s_in, t_in, 1);
    g.accept(s_in, t_ident, 5);
    g.arc(s_in, b'a', b'z', ident);
    let gla = b.gla(g);

    let root = b.rule("root");
    let s0 = b.state(root, gla, true);
    b.shift(root, s0, t_eq, s0);
    b.shift(root, s0, t_eqeq, s0);
    b.shift(root, s0, t_in, s0);
    b.shift(root, s0, t_ident, s0);
    b.start_rule(root);

    Arc::new(b.finish().expect("keyword grammar is well-formed"))
}
