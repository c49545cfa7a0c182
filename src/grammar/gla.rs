//! Lookahead automata: the tokenization half of a compiled grammar.
//!
//! A [`Gla`] is a small finite automaton over raw input bytes. Accepting
//! states name the terminal they decide; a state that both accepts and
//! has outgoing arcs is still extensible (longest match wins, ties go to
//! the lowest declared priority).

use crate::base::{GlaStateId, TerminalId};

/// A compiled lookahead automaton.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Gla {
    pub(crate) start: GlaStateId,
    pub(crate) states: Vec<GlaState>,
}

impl Gla {
    pub fn start(&self) -> GlaStateId {
        self.start
    }

    pub fn state(&self, id: GlaStateId) -> &GlaState {
        &self.states[id.index()]
    }

    pub fn state_count(&self) -> usize {
        self.states.len()
    }
}

/// One automaton state: byte-range arcs plus the terminals decided here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlaState {
    pub(crate) arcs: Vec<GlaArc>,
    pub(crate) accepts: Vec<GlaAccept>,
}

impl GlaState {
    /// The arc taken for `byte`, if any. Arcs are disjoint by
    /// construction, so the first hit is the only hit.
    pub fn arc_for(&self, byte: u8) -> Option<GlaStateId> {
        self.arcs
            .iter()
            .find(|a| a.lo <= byte && byte <= a.hi)
            .map(|a| a.target)
    }

    /// The decision recorded when the match reaches this state: among
    /// equal-length candidates, the lowest declared priority wins.
    pub fn best_accept(&self) -> Option<&GlaAccept> {
        self.accepts.iter().min_by_key(|a| a.priority)
    }

    /// No arc leaves this state: any match ending here is committed.
    pub fn is_dead_end(&self) -> bool {
        self.arcs.is_empty()
    }
}

/// An inclusive byte-range edge between automaton states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlaArc {
    pub lo: u8,
    pub hi: u8,
    pub target: GlaStateId,
}

/// A terminal decided by an accepting state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlaAccept {
    pub terminal: TerminalId,
    pub priority: u16,
}
