//! The lookahead interpreter: resumable terminal recognition.
//!
//! A [`GlaFrame`] runs one compiled automaton over a window of input
//! bytes and applies maximal munch: keep extending while any candidate
//! is alive, remember the best decision seen so far, and commit only
//! when no further byte could change it. The frame owns every byte it
//! has consumed, which is what lets a match resume across chunk
//! boundaries with no caller-visible difference.

use crate::base::{GlaId, GlaStateId, TerminalId};
use crate::grammar::Gla;

/// What one feeding pass concluded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum GlaOutcome {
    /// Decision committed: `len` bytes of the frame's buffer form the
    /// terminal. Any buffered bytes past `len` are overrun to be
    /// re-examined for the next token.
    Recognized { terminal: TerminalId, len: u32 },
    /// The window is a strict prefix of a possible longer match; feed
    /// more bytes (or declare end of input) to decide.
    NeedMoreInput,
    /// No terminal can match here; `byte` ended every candidate and was
    /// not consumed.
    NoViableTerminal { byte: u8 },
    /// End of input, bytes buffered, and no candidate has matched yet.
    IncompleteToken,
}

/// An in-progress terminal recognition. Lives on the parse stack only
/// while the next terminal is being resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct GlaFrame {
    pub(crate) gla: GlaId,
    state: GlaStateId,
    /// Bytes consumed by this match attempt, in stream order.
    buf: Vec<u8>,
    /// Longest decision seen so far: terminal and match length.
    matched: Option<(TerminalId, u32)>,
}

impl GlaFrame {
    pub(crate) fn new(gla: GlaId, start: GlaStateId) -> Self {
        Self {
            gla,
            state: start,
            buf: Vec::new(),
            matched: None,
        }
    }

    pub(crate) fn buffered(&self) -> &[u8] {
        &self.buf
    }

    /// Feed bytes from `window`, consuming as many as the automaton can
    /// use. Returns the outcome and the number of window bytes consumed.
    ///
    /// Feeding `w1` then `w2` reaches the same decision as feeding
    /// `w1 ++ w2` once: the only state here is the automaton state and
    /// the bytes already seen.
    pub(crate) fn feed(&mut self, gla: &Gla, window: &[u8], at_eof: bool) -> (GlaOutcome, usize) {
        let mut consumed = 0;
        loop {
            let state = gla.state(self.state);
            if state.is_dead_end() {
                return (self.commit_or_fail(), consumed);
            }
            let Some(&byte) = window.get(consumed) else {
                if at_eof {
                    return (self.commit_or_incomplete(), consumed);
                }
                return (GlaOutcome::NeedMoreInput, consumed);
            };
            match state.arc_for(byte) {
                Some(target) => {
                    self.state = target;
                    self.buf.push(byte);
                    consumed += 1;
                    if let Some(acc) = gla.state(target).best_accept() {
                        self.matched = Some((acc.terminal, self.buf.len() as u32));
                    }
                }
                None => {
                    let outcome = match self.matched {
                        Some((terminal, len)) => GlaOutcome::Recognized { terminal, len },
                        None => GlaOutcome::NoViableTerminal { byte },
                    };
                    return (outcome, consumed);
                }
            }
        }
    }

    fn commit_or_fail(&self) -> GlaOutcome {
        match self.matched {
            Some((terminal, len)) => GlaOutcome::Recognized { terminal, len },
            // Unreachable for validated tables: a dead-end state always
            // accepts. The last consumed byte is the best blame we have.
            None => GlaOutcome::NoViableTerminal {
                byte: self.buf.last().copied().unwrap_or(0),
            },
        }
    }

    fn commit_or_incomplete(&self) -> GlaOutcome {
        match self.matched {
            Some((terminal, len)) => GlaOutcome::Recognized { terminal, len },
            None => GlaOutcome::IncompleteToken,
        }
    }

    /// Split the buffer into the recognized token text and the overrun
    /// bytes consumed past it.
    pub(crate) fn into_parts(self, len: u32) -> (Vec<u8>, Vec<u8>) {
        let mut token = self.buf;
        let overrun = token.split_off(len as usize);
        (token, overrun)
    }

    /// Give up on this match attempt, surrendering the buffered bytes.
    pub(crate) fn into_buffer(self) -> Vec<u8> {
        self.buf
    }
}
