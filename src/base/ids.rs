//! Index newtypes for the compiled grammar tables.
//!
//! All tables are dense vectors; these wrappers keep the different
//! index spaces (terminals, rules, automata, states) from mixing.

/// Identifies a terminal (token kind) in a grammar's terminal table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TerminalId(u32);

/// Identifies a rule (RTN) in a grammar's rule table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleId(u32);

/// Identifies a lookahead automaton in a grammar's GLA table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlaId(u32);

/// Identifies a state within one rule's transition network.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RtnStateId(u32);

/// Identifies a state within one lookahead automaton.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlaStateId(u32);

macro_rules! impl_index_id {
    ($($ty:ident),+) => {
        $(
            impl $ty {
                pub fn new(index: u32) -> Self {
                    Self(index)
                }

                /// Position in the owning table.
                pub fn index(self) -> usize {
                    self.0 as usize
                }
            }

            impl From<u32> for $ty {
                fn from(index: u32) -> Self {
                    Self(index)
                }
            }
        )+
    };
}

impl_index_id!(TerminalId, RuleId, GlaId, RtnStateId, GlaStateId);
