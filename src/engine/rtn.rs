//! The RTN interpreter: delivering one terminal to the parse stack.
//!
//! Delivery drives the innermost rule activation: shift, enter
//! sub-rules (the terminal is re-delivered to each callee), or complete
//! rules whose accepting state cannot consume the terminal, retrying it
//! in the resumed parent.

use tracing::{trace, warn};

use crate::base::TerminalId;
use crate::grammar::{CompiledGrammar, RtnAction};

use super::events::EventSink;
use super::stack::{ParseStack, RtnFrame};

/// What delivering a terminal did to the stack.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum StepOutcome {
    /// The terminal was consumed by some activation.
    Consumed,
    /// Every activation completed; the stack is empty and the terminal
    /// was not consumed - input continues past the grammar's language.
    Completed,
    /// The innermost non-completable activation has no transition for
    /// the terminal.
    NoTransition,
}

pub(crate) fn deliver<S: EventSink>(
    grammar: &CompiledGrammar,
    stack: &mut ParseStack,
    terminal: TerminalId,
    sink: &mut S,
) -> StepOutcome {
    let mut pushes = 0usize;
    loop {
        let Some(frame) = stack.top_rtn_mut() else {
            return StepOutcome::Completed;
        };
        let rtn = grammar.rule(frame.rule);
        let state = rtn.state(frame.state);

        match state.transition_on(terminal) {
            Some(RtnAction::Shift(next)) => {
                trace!(
                    rule = rtn.name(),
                    terminal = grammar.terminal_name(terminal),
                    to = next.index(),
                    "shift"
                );
                frame.state = *next;
                return StepOutcome::Consumed;
            }
            Some(&RtnAction::Call { rule, resume_at }) => {
                // More pushes than rules on one terminal means a rule
                // repeated without consuming input; validated tables
                // cannot reach this.
                pushes += 1;
                if pushes > grammar.rule_count() {
                    warn!(
                        rule = rtn.name(),
                        terminal = grammar.terminal_name(terminal),
                        "call chain exceeded rule count; treating as unexpected terminal"
                    );
                    return StepOutcome::NoTransition;
                }
                frame.state = resume_at;
                let callee = grammar.rule(rule);
                trace!(
                    from = rtn.name(),
                    to = callee.name(),
                    terminal = grammar.terminal_name(terminal),
                    "enter rule"
                );
                stack.push_rtn(RtnFrame {
                    rule,
                    state: callee.start(),
                });
                sink.on_start_rule(callee.name());
                // terminal re-delivered to the callee
            }
            None => {
                if !state.is_accepting() {
                    return StepOutcome::NoTransition;
                }
                trace!(rule = rtn.name(), "complete rule");
                sink.on_end_rule(rtn.name());
                stack.pop_rtn();
                if stack.is_empty() {
                    return StepOutcome::Completed;
                }
                // parent is already parked at its resume state; retry
            }
        }
    }
}
