//! Compiled grammar tables consumed read-only by the engine.
//!
//! A [`CompiledGrammar`] bundles the two automaton levels the engine
//! interprets:
//! - **RTNs** ([`Rtn`]) - one transition network per rule, driving
//!   terminal consumption and sub-rule calls
//! - **GLAs** ([`Gla`]) - byte-level lookahead automata that recognize
//!   terminals, one designated per RTN state
//!
//! Grammars are produced by an external compiler or assembled directly
//! through [`GrammarBuilder`]; after [`GrammarBuilder::finish`] the
//! tables are immutable and may be shared by any number of concurrent
//! parse sessions (`Arc<CompiledGrammar>` is `Send + Sync`).

mod builder;
mod gla;
mod rtn;

pub use builder::{GlaBuilder, GrammarBuilder, GrammarError};
pub use gla::{Gla, GlaAccept, GlaArc, GlaState};
pub use rtn::{Rtn, RtnAction, RtnState, RtnTransition};

use std::io;

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::base::{GlaId, RuleId, TerminalId};

/// A terminal (token kind) declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerminalDef {
    pub(crate) name: SmolStr,
    /// Recognized and reported, but never delivered to the syntax level
    /// (whitespace, comments).
    pub(crate) skip: bool,
}

impl TerminalDef {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_skip(&self) -> bool {
        self.skip
    }
}

/// Immutable RTN/GLA tables for one grammar.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CompiledGrammar {
    pub(crate) terminals: Vec<TerminalDef>,
    /// Rule name -> id, in declaration order.
    pub(crate) rule_ids: IndexMap<SmolStr, RuleId>,
    pub(crate) rules: Vec<Rtn>,
    pub(crate) glas: Vec<Gla>,
    pub(crate) start_rule: RuleId,
}

impl CompiledGrammar {
    pub fn terminal(&self, id: TerminalId) -> &TerminalDef {
        &self.terminals[id.index()]
    }

    pub fn terminal_name(&self, id: TerminalId) -> &str {
        &self.terminals[id.index()].name
    }

    pub fn rule(&self, id: RuleId) -> &Rtn {
        &self.rules[id.index()]
    }

    /// Look a rule up by name.
    pub fn rule_named(&self, name: &str) -> Option<RuleId> {
        self.rule_ids.get(name).copied()
    }

    pub fn gla(&self, id: GlaId) -> &Gla {
        &self.glas[id.index()]
    }

    /// The rule every session starts in.
    pub fn start_rule(&self) -> RuleId {
        self.start_rule
    }

    pub fn terminal_count(&self) -> usize {
        self.terminals.len()
    }

    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    pub fn gla_count(&self) -> usize {
        self.glas.len()
    }

    pub fn rules(&self) -> impl Iterator<Item = (RuleId, &Rtn)> {
        self.rules
            .iter()
            .enumerate()
            .map(|(i, r)| (RuleId::new(i as u32), r))
    }

    /// Write a human-readable listing of the tables, for debugging
    /// grammar construction.
    pub fn dump(&self, out: &mut dyn io::Write) -> io::Result<()> {
        writeln!(out, "{:=^60}", " grammar tables ")?;

        writeln!(out, "\n--- terminals ({}) ---", self.terminals.len())?;
        for (i, t) in self.terminals.iter().enumerate() {
            let skip = if t.skip { " (skip)" } else { "" };
            writeln!(out, "  [{i:3}] {}{skip}", t.name)?;
        }

        writeln!(out, "\n--- rules ({}) ---", self.rules.len())?;
        for (id, rtn) in self.rules() {
            let start_marker = if id == self.start_rule { " <- start" } else { "" };
            writeln!(out, "  {}{start_marker}", rtn.name)?;
            for (sid, state) in rtn.states() {
                let acc = if state.accepting { " accepting" } else { "" };
                writeln!(
                    out,
                    "    s{} gla={}{acc}",
                    sid.index(),
                    state.lookahead.index()
                )?;
                for t in state.transitions() {
                    match &t.action {
                        RtnAction::Shift(next) => writeln!(
                            out,
                            "      {} -> shift s{}",
                            self.terminal_name(t.terminal),
                            next.index()
                        )?,
                        RtnAction::Call { rule, resume_at } => writeln!(
                            out,
                            "      {} -> call {} resume s{}",
                            self.terminal_name(t.terminal),
                            self.rules[rule.index()].name,
                            resume_at.index()
                        )?,
                    }
                }
            }
        }

        writeln!(out, "\n--- lookahead automata ({}) ---", self.glas.len())?;
        for (i, gla) in self.glas.iter().enumerate() {
            writeln!(out, "  gla {i} ({} states)", gla.state_count())?;
            for (j, state) in gla.states.iter().enumerate() {
                for arc in &state.arcs {
                    if arc.lo == arc.hi {
                        writeln!(out, "    s{j} {:?} -> s{}", arc.lo as char, arc.target.index())?;
                    } else {
                        writeln!(
                            out,
                            "    s{j} {:?}-{:?} -> s{}",
                            arc.lo as char,
                            arc.hi as char,
                            arc.target.index()
                        )?;
                    }
                }
                for acc in &state.accepts {
                    writeln!(
                        out,
                        "    s{j} accepts {} (priority {})",
                        self.terminal_name(acc.terminal),
                        acc.priority
                    )?;
                }
            }
        }
        Ok(())
    }
}
