//! The parse stack: active rule activations plus, transiently, the
//! lookahead frame resolving the next terminal.
//!
//! Frame kinds are a closed set, so they are a tagged variant rather
//! than a trait object. The lookahead frame only ever sits on top, and
//! only while a terminal is unresolved - though that can span any
//! number of chunk boundaries.

use crate::base::{RtnStateId, RuleId};

use super::lookahead::GlaFrame;

/// An active rule activation. The parent frame is parked at its resume
/// state when a child is pushed, so no return-state is stored here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RtnFrame {
    pub(crate) rule: RuleId,
    pub(crate) state: RtnStateId,
}

/// One entry of the parse stack.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Frame {
    Rtn(RtnFrame),
    Lookahead(GlaFrame),
}

/// Bottom = start rule activation; top = innermost active rule.
#[derive(Debug, Default)]
pub(crate) struct ParseStack {
    frames: Vec<Frame>,
}

impl ParseStack {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    /// Number of active rule activations (the lookahead frame does not
    /// count).
    pub(crate) fn depth(&self) -> usize {
        self.frames
            .iter()
            .filter(|f| matches!(f, Frame::Rtn(_)))
            .count()
    }

    pub(crate) fn clear(&mut self) {
        self.frames.clear();
    }

    pub(crate) fn push_rtn(&mut self, frame: RtnFrame) {
        debug_assert!(
            !self.top_is_lookahead(),
            "rule pushed while a terminal is unresolved"
        );
        self.frames.push(Frame::Rtn(frame));
    }

    pub(crate) fn push_lookahead(&mut self, frame: GlaFrame) {
        debug_assert!(!self.top_is_lookahead(), "lookahead frame already present");
        self.frames.push(Frame::Lookahead(frame));
    }

    pub(crate) fn top_is_lookahead(&self) -> bool {
        matches!(self.frames.last(), Some(Frame::Lookahead(_)))
    }

    pub(crate) fn lookahead_mut(&mut self) -> Option<&mut GlaFrame> {
        match self.frames.last_mut() {
            Some(Frame::Lookahead(frame)) => Some(frame),
            _ => None,
        }
    }

    pub(crate) fn lookahead(&self) -> Option<&GlaFrame> {
        match self.frames.last() {
            Some(Frame::Lookahead(frame)) => Some(frame),
            _ => None,
        }
    }

    /// Remove and return the lookahead frame, if present.
    pub(crate) fn take_lookahead(&mut self) -> Option<GlaFrame> {
        if self.top_is_lookahead() {
            match self.frames.pop() {
                Some(Frame::Lookahead(frame)) => Some(frame),
                _ => None,
            }
        } else {
            None
        }
    }

    /// The innermost rule activation.
    pub(crate) fn top_rtn(&self) -> Option<&RtnFrame> {
        self.frames.iter().rev().find_map(|f| match f {
            Frame::Rtn(frame) => Some(frame),
            Frame::Lookahead(_) => None,
        })
    }

    pub(crate) fn top_rtn_mut(&mut self) -> Option<&mut RtnFrame> {
        self.frames.iter_mut().rev().find_map(|f| match f {
            Frame::Rtn(frame) => Some(frame),
            Frame::Lookahead(_) => None,
        })
    }

    /// Pop the innermost rule activation. Callers check the accepting
    /// invariant first; no lookahead frame may be present.
    pub(crate) fn pop_rtn(&mut self) -> Option<RtnFrame> {
        debug_assert!(!self.top_is_lookahead(), "pop under a lookahead frame");
        match self.frames.pop() {
            Some(Frame::Rtn(frame)) => Some(frame),
            Some(other) => {
                self.frames.push(other);
                None
            }
            None => None,
        }
    }

    /// Rule activations, bottom to top.
    pub(crate) fn rtn_frames(&self) -> impl Iterator<Item = &RtnFrame> {
        self.frames.iter().filter_map(|f| match f {
            Frame::Rtn(frame) => Some(frame),
            Frame::Lookahead(_) => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::base::{GlaId, GlaStateId};

    fn frame(rule: u32) -> RtnFrame {
        RtnFrame {
            rule: RuleId::new(rule),
            state: RtnStateId::new(0),
        }
    }

    #[test]
    fn test_lifo_discipline() {
        let mut stack = ParseStack::new();
        stack.push_rtn(frame(0));
        stack.push_rtn(frame(1));
        assert_eq!(stack.depth(), 2);
        assert_eq!(stack.pop_rtn().map(|f| f.rule), Some(RuleId::new(1)));
        assert_eq!(stack.pop_rtn().map(|f| f.rule), Some(RuleId::new(0)));
        assert!(stack.is_empty());
    }

    #[test]
    fn test_lookahead_is_transparent_to_top_rtn() {
        let mut stack = ParseStack::new();
        stack.push_rtn(frame(7));
        stack.push_lookahead(GlaFrame::new(GlaId::new(0), GlaStateId::new(0)));
        assert!(stack.top_is_lookahead());
        assert_eq!(stack.top_rtn().map(|f| f.rule), Some(RuleId::new(7)));
        assert_eq!(stack.depth(), 1);
        assert!(stack.take_lookahead().is_some());
        assert!(stack.take_lookahead().is_none());
    }
}
