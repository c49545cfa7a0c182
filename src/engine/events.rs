//! The event sink: the caller's view of a running parse.
//!
//! A [`ParseSession`](super::ParseSession) invokes its sink
//! synchronously while consuming input. All methods have default
//! implementations, so a sink overrides only what it cares about; the
//! error hooks default to halting the parse.

use crate::base::{TerminalId, TextRange, TextSize};

/// One recognized token, as handed to [`EventSink::on_terminal`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalMatch<'a> {
    pub terminal: TerminalId,
    /// Declared name of the terminal.
    pub name: &'a str,
    /// The matched bytes, possibly assembled across chunk boundaries.
    pub text: &'a [u8],
    /// Absolute byte range of the match in the overall input stream.
    pub range: TextRange,
}

/// What an error hook tells the engine to do next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ErrorRecovery {
    /// Stop the parse; the session enters its error state.
    #[default]
    Halt,
    /// Drop the offending input and keep going.
    Resume,
}

/// Receives parse events. Implemented by the caller.
pub trait EventSink {
    /// A rule activation was pushed. Precedes every event produced
    /// within the rule.
    fn on_start_rule(&mut self, _rule: &str) {}

    /// A rule activation completed and was popped. Follows every event
    /// produced within the rule.
    fn on_end_rule(&mut self, _rule: &str) {}

    /// A terminal was recognized. Fires after the lookahead decision and
    /// before any events the terminal's syntax transition produces.
    fn on_terminal(&mut self, _terminal: &TerminalMatch<'_>) {}

    /// No terminal can match at `offset`; `byte` is the input byte that
    /// ended every candidate. [`ErrorRecovery::Resume`] discards the
    /// offending byte together with any buffered partial match.
    fn on_unknown_transition(&mut self, _byte: u8, _offset: TextSize) -> ErrorRecovery {
        ErrorRecovery::Halt
    }

    /// A terminal was recognized but the current rule state has no
    /// transition for it. [`ErrorRecovery::Resume`] discards the
    /// terminal.
    fn on_unexpected_terminal(&mut self, _terminal: &TerminalMatch<'_>) -> ErrorRecovery {
        ErrorRecovery::Halt
    }
}

/// A sink that ignores everything. Useful for validation-only parses.
impl EventSink for () {}

/// Result of feeding a chunk to [`ParseSession::parse`](super::ParseSession::parse).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Chunk consumed; the parse remains open.
    Ok,
    /// The grammar's start rule completed; any further input lies
    /// outside the grammar.
    HardEndOfFile,
    /// Finalize was requested but the stack is not in an accepting
    /// configuration - the input ended too early.
    PrematureEndOfInput,
    /// A fault was reported through an error hook and not recovered.
    Error,
    /// A read failed inside one of the file/stream conveniences.
    IoError,
}

impl Status {
    pub fn is_ok(self) -> bool {
        matches!(self, Status::Ok | Status::HardEndOfFile)
    }
}
