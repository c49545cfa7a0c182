//! Recursive transition networks: the syntax half of a compiled grammar.
//!
//! One [`Rtn`] per grammar rule. Each state carries the lookahead
//! automaton that tokenizes at that position, an accepting flag, and
//! transitions keyed by terminal.

use smol_str::SmolStr;

use crate::base::{GlaId, RtnStateId, RuleId, TerminalId};

/// A compiled rule: a named network of states.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Rtn {
    pub(crate) name: SmolStr,
    pub(crate) start: RtnStateId,
    pub(crate) states: Vec<RtnState>,
}

impl Rtn {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn start(&self) -> RtnStateId {
        self.start
    }

    pub fn state(&self, id: RtnStateId) -> &RtnState {
        &self.states[id.index()]
    }

    pub fn states(&self) -> impl Iterator<Item = (RtnStateId, &RtnState)> {
        self.states
            .iter()
            .enumerate()
            .map(|(i, s)| (RtnStateId::new(i as u32), s))
    }
}

/// One position inside a rule.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RtnState {
    /// The automaton that recognizes the next terminal at this position.
    /// It covers the terminals consumable here, the ones selecting
    /// sub-rule calls, and the follow terminals that complete the rule.
    pub(crate) lookahead: GlaId,
    /// The rule may legally end at this state.
    pub(crate) accepting: bool,
    pub(crate) transitions: Vec<RtnTransition>,
}

impl RtnState {
    pub fn lookahead(&self) -> GlaId {
        self.lookahead
    }

    pub fn is_accepting(&self) -> bool {
        self.accepting
    }

    /// The action for `terminal` at this state, if any.
    pub fn transition_on(&self, terminal: TerminalId) -> Option<&RtnAction> {
        self.transitions
            .iter()
            .find(|t| t.terminal == terminal)
            .map(|t| &t.action)
    }

    pub fn transitions(&self) -> &[RtnTransition] {
        &self.transitions
    }
}

/// A labeled edge out of an RTN state.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RtnTransition {
    pub terminal: TerminalId,
    pub action: RtnAction,
}

/// What taking a transition does.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RtnAction {
    /// Consume the terminal and move to the target state.
    Shift(RtnStateId),
    /// Push an activation of `rule`. The terminal is not consumed; it is
    /// re-delivered to the callee. The calling frame is parked at
    /// `resume_at` until the callee completes.
    Call {
        rule: RuleId,
        resume_at: RtnStateId,
    },
}
