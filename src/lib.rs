//! # trellis
//!
//! Incremental, event-driven parsing engine interpreting compiled
//! transition-network grammars.
//!
//! A grammar is compiled (externally, or assembled with
//! [`GrammarBuilder`]) into two automaton levels: recursive transition
//! networks for syntax and byte-level lookahead automata for
//! tokenization. A [`ParseSession`] interprets those tables over input
//! supplied in arbitrary-sized chunks - a token or rule may span any
//! number of chunk boundaries - and reports rule entries/exits,
//! recognized terminals, and faults through a caller-supplied
//! [`EventSink`], without ever buffering the whole input.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! engine    → lookahead matcher, RTN delivery, parse stack, session driver
//!   ↓
//! grammar   → compiled RTN/GLA tables, builder + validation
//!   ↓
//! base      → primitives (table ids, byte offsets/ranges)
//! ```
//!
//! ## Feeding input incrementally
//!
//! ```
//! use std::sync::Arc;
//! use trellis::{GlaBuilder, GrammarBuilder, ParseSession, Status};
//!
//! // root: "a" "b"
//! let mut b = GrammarBuilder::new();
//! let t_a = b.terminal("a");
//! let t_b = b.terminal("b");
//! let mut g = GlaBuilder::new();
//! g.literal(t_a, b"a", 0);
//! g.literal(t_b, b"b", 0);
//! let gla = b.gla(g);
//! let root = b.rule("root");
//! let s0 = b.state(root, gla, false);
//! let s1 = b.state(root, gla, false);
//! let s2 = b.state(root, gla, true);
//! b.shift(root, s0, t_a, s1);
//! b.shift(root, s1, t_b, s2);
//! b.start_rule(root);
//! let grammar = Arc::new(b.finish().unwrap());
//!
//! // () is the no-op sink; chunk boundaries can fall anywhere.
//! let mut session = ParseSession::new(grammar, ());
//! assert_eq!(session.parse(b"a", false), Status::Ok);
//! assert_eq!(session.parse(b"b", true), Status::Ok);
//! ```

// ============================================================================
// MODULES (dependency order: base → grammar → engine)
// ============================================================================

/// Foundation types: table ids, byte offsets and ranges
pub mod base;

/// Compiled grammar tables and their builder
pub mod grammar;

/// The incremental engine: sessions, events, interpretation
pub mod engine;

// Re-export the caller-facing surface
pub use base::{GlaId, GlaStateId, RtnStateId, RuleId, TerminalId, TextRange, TextSize};
pub use engine::{
    EngineState, ErrorRecovery, EventSink, FaultKind, ParseSession, Status, TerminalMatch,
};
pub use grammar::{CompiledGrammar, GlaBuilder, GrammarBuilder, GrammarError};
