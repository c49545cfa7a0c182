//! Programmatic construction of compiled grammar tables.
//!
//! [`GrammarBuilder`] assembles terminal, rule, and automaton tables
//! directly; [`GrammarBuilder::finish`] validates the cross-references
//! and freezes them into a [`CompiledGrammar`]. This is table
//! construction, not grammar-language compilation - a grammar compiler
//! is expected to drive this API (tests and demos drive it by hand).

use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use smol_str::SmolStr;
use thiserror::Error;
use tracing::debug;

use crate::base::{GlaId, GlaStateId, RtnStateId, RuleId, TerminalId};

use super::gla::{Gla, GlaAccept, GlaArc, GlaState};
use super::rtn::{Rtn, RtnAction, RtnState, RtnTransition};
use super::{CompiledGrammar, TerminalDef};

/// A malformed table detected by [`GrammarBuilder::finish`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GrammarError {
    #[error("no start rule was designated")]
    MissingStartRule,
    #[error("rule `{0}` has no states")]
    EmptyRule(SmolStr),
    #[error("rule `{0}` has no accepting state")]
    NoAcceptingState(SmolStr),
    #[error("rule `{rule}` state {state} has two transitions on terminal `{terminal}`")]
    AmbiguousTransition {
        rule: SmolStr,
        state: u32,
        terminal: SmolStr,
    },
    #[error("rule `{rule}` state {state} references lookahead automaton {gla} which does not exist")]
    UnknownGla { rule: SmolStr, state: u32, gla: u32 },
    #[error("rule `{rule}` state {state} targets state {target}, past the end of the rule")]
    InvalidStateRef {
        rule: SmolStr,
        state: u32,
        target: u32,
    },
    #[error("terminal {terminal} is referenced but was never declared")]
    UnknownTerminal { terminal: u32 },
    #[error("rule `{rule}` state {state} calls rule {callee}, which was never declared")]
    UnknownRule { rule: SmolStr, state: u32, callee: u32 },
    #[error("lookahead automaton {gla} state {state} targets state {target}, past the end of the automaton")]
    InvalidGlaStateRef { gla: u32, state: u32, target: u32 },
    #[error("lookahead automaton {gla} state {state} has overlapping byte ranges")]
    OverlappingArcs { gla: u32, state: u32 },
    #[error("lookahead automaton {gla} accepts on its start state (zero-length match)")]
    EmptyTokenMatch { gla: u32 },
    #[error("lookahead automaton {gla} state {state} can neither accept nor continue")]
    DeadState { gla: u32, state: u32 },
    #[error("delivering `{terminal}` to rule `{rule}` would recurse through its calls without consuming input")]
    CallCycle { rule: SmolStr, terminal: SmolStr },
}

/// Builds one lookahead automaton. State 0 is the start state.
#[derive(Debug, Clone)]
pub struct GlaBuilder {
    states: Vec<GlaState>,
}

impl Default for GlaBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl GlaBuilder {
    pub fn new() -> Self {
        Self {
            states: vec![GlaState::default()],
        }
    }

    pub fn start(&self) -> GlaStateId {
        GlaStateId::new(0)
    }

    /// Add a fresh state.
    pub fn state(&mut self) -> GlaStateId {
        let id = GlaStateId::new(self.states.len() as u32);
        self.states.push(GlaState::default());
        id
    }

    /// Add an arc for the inclusive byte range `lo..=hi`.
    pub fn arc(&mut self, from: GlaStateId, lo: u8, hi: u8, to: GlaStateId) -> &mut Self {
        self.states[from.index()].arcs.push(GlaArc { lo, hi, target: to });
        self
    }

    /// Add an arc for a single byte.
    pub fn byte_arc(&mut self, from: GlaStateId, byte: u8, to: GlaStateId) -> &mut Self {
        self.arc(from, byte, byte, to)
    }

    /// Mark `state` as deciding `terminal` with the given tie-break
    /// priority (lower wins among equal-length matches).
    pub fn accept(&mut self, state: GlaStateId, terminal: TerminalId, priority: u16) -> &mut Self {
        self.states[state.index()]
            .accepts
            .push(GlaAccept { terminal, priority });
        self
    }

    /// Thread a literal byte string into the automaton as a trie path
    /// from the start state, accepting `terminal` at its end. Shared
    /// prefixes reuse existing single-byte arcs.
    pub fn literal(&mut self, terminal: TerminalId, bytes: &[u8], priority: u16) -> &mut Self {
        let mut at = self.start();
        for &b in bytes {
            let existing = self.states[at.index()]
                .arcs
                .iter()
                .find(|a| a.lo == b && a.hi == b)
                .map(|a| a.target);
            at = match existing {
                Some(next) => next,
                None => {
                    let next = self.state();
                    self.byte_arc(at, b, next);
                    next
                }
            };
        }
        self.accept(at, terminal, priority)
    }

    fn build(self) -> Gla {
        Gla {
            start: GlaStateId::new(0),
            states: self.states,
        }
    }
}

struct RuleTable {
    name: SmolStr,
    states: Vec<RtnState>,
}

/// Assembles and validates the tables of a [`CompiledGrammar`].
#[derive(Default)]
pub struct GrammarBuilder {
    terminals: Vec<TerminalDef>,
    terminal_ids: FxHashMap<SmolStr, TerminalId>,
    rules: Vec<RuleTable>,
    rule_ids: FxHashMap<SmolStr, RuleId>,
    glas: Vec<Gla>,
    start_rule: Option<RuleId>,
}

impl GrammarBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare a terminal, or fetch the id of an already-declared one.
    pub fn terminal(&mut self, name: &str) -> TerminalId {
        self.intern_terminal(name, false)
    }

    /// Declare a terminal that is recognized and reported but never
    /// delivered to the syntax level (whitespace, comments).
    pub fn skip_terminal(&mut self, name: &str) -> TerminalId {
        self.intern_terminal(name, true)
    }

    fn intern_terminal(&mut self, name: &str, skip: bool) -> TerminalId {
        if let Some(&id) = self.terminal_ids.get(name) {
            return id;
        }
        let id = TerminalId::new(self.terminals.len() as u32);
        self.terminals.push(TerminalDef {
            name: SmolStr::new(name),
            skip,
        });
        self.terminal_ids.insert(SmolStr::new(name), id);
        id
    }

    /// Declare a rule, or fetch the id of an already-declared one.
    /// Forward references are fine; states are added separately.
    pub fn rule(&mut self, name: &str) -> RuleId {
        if let Some(&id) = self.rule_ids.get(name) {
            return id;
        }
        let id = RuleId::new(self.rules.len() as u32);
        self.rules.push(RuleTable {
            name: SmolStr::new(name),
            states: Vec::new(),
        });
        self.rule_ids.insert(SmolStr::new(name), id);
        id
    }

    /// Add a state to `rule`. The first state added is the rule's start
    /// state.
    pub fn state(&mut self, rule: RuleId, lookahead: GlaId, accepting: bool) -> RtnStateId {
        let states = &mut self.rules[rule.index()].states;
        let id = RtnStateId::new(states.len() as u32);
        states.push(RtnState {
            lookahead,
            accepting,
            transitions: Vec::new(),
        });
        id
    }

    /// On `terminal` at `from`, consume it and move to `to`.
    pub fn shift(&mut self, rule: RuleId, from: RtnStateId, terminal: TerminalId, to: RtnStateId) {
        self.rules[rule.index()].states[from.index()]
            .transitions
            .push(RtnTransition {
                terminal,
                action: RtnAction::Shift(to),
            });
    }

    /// On `terminal` at `from`, push an activation of `callee` (the
    /// terminal is re-delivered to it) and park this rule at `resume_at`.
    pub fn call(
        &mut self,
        rule: RuleId,
        from: RtnStateId,
        terminal: TerminalId,
        callee: RuleId,
        resume_at: RtnStateId,
    ) {
        self.rules[rule.index()].states[from.index()]
            .transitions
            .push(RtnTransition {
                terminal,
                action: RtnAction::Call {
                    rule: callee,
                    resume_at,
                },
            });
    }

    /// Register a lookahead automaton.
    pub fn gla(&mut self, gla: GlaBuilder) -> GlaId {
        let id = GlaId::new(self.glas.len() as u32);
        self.glas.push(gla.build());
        id
    }

    /// Designate the rule every session starts in.
    pub fn start_rule(&mut self, rule: RuleId) {
        self.start_rule = Some(rule);
    }

    /// Validate the tables and freeze them.
    pub fn finish(self) -> Result<CompiledGrammar, GrammarError> {
        let start_rule = self.start_rule.ok_or(GrammarError::MissingStartRule)?;
        if start_rule.index() >= self.rules.len() {
            return Err(GrammarError::MissingStartRule);
        }

        for table in &self.rules {
            self.check_rule(table)?;
        }
        for (i, gla) in self.glas.iter().enumerate() {
            self.check_gla(i as u32, gla)?;
        }
        self.check_call_cycles()?;

        let mut rule_ids = IndexMap::with_capacity(self.rules.len());
        let mut rules = Vec::with_capacity(self.rules.len());
        for (i, table) in self.rules.into_iter().enumerate() {
            rule_ids.insert(table.name.clone(), RuleId::new(i as u32));
            rules.push(Rtn {
                name: table.name,
                start: RtnStateId::new(0),
                states: table.states,
            });
        }

        debug!(
            terminals = self.terminals.len(),
            rules = rules.len(),
            glas = self.glas.len(),
            start = %rules[start_rule.index()].name,
            "grammar tables frozen"
        );

        Ok(CompiledGrammar {
            terminals: self.terminals,
            rule_ids,
            rules,
            glas: self.glas,
            start_rule,
        })
    }

    fn terminal_display(&self, id: TerminalId) -> SmolStr {
        self.terminals
            .get(id.index())
            .map(|t| t.name.clone())
            .unwrap_or_else(|| SmolStr::new("?"))
    }

    fn check_rule(&self, table: &RuleTable) -> Result<(), GrammarError> {
        if table.states.is_empty() {
            return Err(GrammarError::EmptyRule(table.name.clone()));
        }
        if !table.states.iter().any(|s| s.accepting) {
            return Err(GrammarError::NoAcceptingState(table.name.clone()));
        }
        for (sid, state) in table.states.iter().enumerate() {
            let sid = sid as u32;
            if state.lookahead.index() >= self.glas.len() {
                return Err(GrammarError::UnknownGla {
                    rule: table.name.clone(),
                    state: sid,
                    gla: state.lookahead.index() as u32,
                });
            }
            let mut seen = Vec::with_capacity(state.transitions.len());
            for t in &state.transitions {
                if t.terminal.index() >= self.terminals.len() {
                    return Err(GrammarError::UnknownTerminal {
                        terminal: t.terminal.index() as u32,
                    });
                }
                if seen.contains(&t.terminal) {
                    return Err(GrammarError::AmbiguousTransition {
                        rule: table.name.clone(),
                        state: sid,
                        terminal: self.terminal_display(t.terminal),
                    });
                }
                seen.push(t.terminal);
                let local_target = match &t.action {
                    RtnAction::Shift(next) => Some(*next),
                    RtnAction::Call { rule, resume_at } => {
                        if rule.index() >= self.rules.len() {
                            return Err(GrammarError::UnknownRule {
                                rule: table.name.clone(),
                                state: sid,
                                callee: rule.index() as u32,
                            });
                        }
                        Some(*resume_at)
                    }
                };
                if let Some(target) = local_target {
                    if target.index() >= table.states.len() {
                        return Err(GrammarError::InvalidStateRef {
                            rule: table.name.clone(),
                            state: sid,
                            target: target.index() as u32,
                        });
                    }
                }
            }
        }
        Ok(())
    }

    fn check_gla(&self, id: u32, gla: &Gla) -> Result<(), GrammarError> {
        if !gla.states[0].accepts.is_empty() {
            return Err(GrammarError::EmptyTokenMatch { gla: id });
        }
        for (sid, state) in gla.states.iter().enumerate() {
            let sid = sid as u32;
            if state.arcs.is_empty() && state.accepts.is_empty() {
                return Err(GrammarError::DeadState { gla: id, state: sid });
            }
            for acc in &state.accepts {
                if acc.terminal.index() >= self.terminals.len() {
                    return Err(GrammarError::UnknownTerminal {
                        terminal: acc.terminal.index() as u32,
                    });
                }
            }
            for (i, a) in state.arcs.iter().enumerate() {
                if a.target.index() >= gla.states.len() {
                    return Err(GrammarError::InvalidGlaStateRef {
                        gla: id,
                        state: sid,
                        target: a.target.index() as u32,
                    });
                }
                for b in &state.arcs[i + 1..] {
                    if a.lo <= b.hi && b.lo <= a.hi {
                        return Err(GrammarError::OverlappingArcs { gla: id, state: sid });
                    }
                }
            }
        }
        Ok(())
    }

    /// A `Call` transition re-delivers its terminal to the callee, so a
    /// chain of calls that returns to an already-pushed rule would grow
    /// the stack forever on one terminal. Each start state has at most
    /// one transition per terminal, so following the chain with a
    /// visited set is enough.
    fn check_call_cycles(&self) -> Result<(), GrammarError> {
        for tid in 0..self.terminals.len() {
            let terminal = TerminalId::new(tid as u32);
            for start in 0..self.rules.len() {
                let mut visited = vec![false; self.rules.len()];
                let mut at = start;
                loop {
                    if visited[at] {
                        return Err(GrammarError::CallCycle {
                            rule: self.rules[at].name.clone(),
                            terminal: self.terminal_display(terminal),
                        });
                    }
                    visited[at] = true;
                    let Some(first) = self.rules[at].states.first() else {
                        break;
                    };
                    match first.transition_on(terminal) {
                        Some(RtnAction::Call { rule, .. }) if rule.index() < self.rules.len() => {
                            at = rule.index();
                        }
                        _ => break,
                    }
                }
            }
        }
        Ok(())
    }
}
