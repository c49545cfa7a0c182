//! The engine driver: one [`ParseSession`] per logical input stream.
//!
//! A session owns the parse stack, the buffered partial match, and the
//! absolute input cursor; the grammar is a shared read-only handle. All
//! processing for one [`ParseSession::parse`] call runs to completion
//! (or to awaiting-input / error) before returning - there is no
//! background work, and resuming after a chunk boundary is driven
//! entirely by the lookahead frame's buffered bytes.

use std::fs;
use std::io::{self, Read};
use std::path::Path;
use std::sync::Arc;

use tracing::{debug, error, trace};

use crate::base::{TerminalId, TextRange, TextSize};
use crate::grammar::CompiledGrammar;

use super::events::{ErrorRecovery, EventSink, Status, TerminalMatch};
use super::lookahead::{GlaFrame, GlaOutcome};
use super::rtn::{self, StepOutcome};
use super::stack::{ParseStack, RtnFrame};

/// Where the driver state machine currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// Between tokens; more input or finalize are both fine.
    Ready,
    /// A partial match is buffered; the next chunk resumes it.
    AwaitingMoreInput,
    /// The start rule completed; the session accepts no more input.
    Complete,
    /// A fault was reported and not recovered.
    Error(FaultKind),
}

/// The two fault kinds at the terminal-recognition boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// Lexical: no terminal matches the input at all.
    UnknownTransition,
    /// Syntactic: a recognized terminal has no transition in the
    /// current rule state.
    UnexpectedTerminal,
}

/// An incremental parse over one logical input stream.
///
/// Feed input in chunks of any size with [`parse`](Self::parse); the
/// bound [`EventSink`] receives rule and terminal events synchronously.
/// The grammar handle is shared and read-only - any number of sessions
/// may run against one `Arc<CompiledGrammar>`.
pub struct ParseSession<S: EventSink> {
    grammar: Arc<CompiledGrammar>,
    stack: ParseStack,
    /// Bytes consumed from past chunks but not yet attributed to a
    /// token (maximal-munch overrun). Re-examined before new input.
    replay: Vec<u8>,
    /// Absolute offset of the first byte not yet attributed to a token.
    cursor: TextSize,
    state: EngineState,
    started: bool,
    sink: S,
}

impl<S: EventSink> ParseSession<S> {
    pub fn new(grammar: Arc<CompiledGrammar>, sink: S) -> Self {
        Self {
            grammar,
            stack: ParseStack::new(),
            replay: Vec::new(),
            cursor: TextSize::new(0),
            state: EngineState::Ready,
            started: false,
            sink,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    /// Absolute byte offset of the next unattributed input byte.
    pub fn offset(&self) -> TextSize {
        self.cursor
    }

    pub fn grammar(&self) -> &CompiledGrammar {
        &self.grammar
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    pub fn sink_mut(&mut self) -> &mut S {
        &mut self.sink
    }

    pub fn into_sink(self) -> S {
        self.sink
    }

    /// Return the session to its initial configuration so it can parse
    /// a fresh input against the same grammar.
    pub fn reset(&mut self) {
        self.stack.clear();
        self.replay.clear();
        self.cursor = TextSize::new(0);
        self.state = EngineState::Ready;
        self.started = false;
    }

    /// Feed one chunk. With `finalize`, a fully consumed chunk is
    /// immediately followed by the finalize protocol and its result is
    /// folded into the returned status.
    pub fn parse(&mut self, chunk: &[u8], finalize: bool) -> Status {
        match self.state {
            EngineState::Complete => return Status::HardEndOfFile,
            EngineState::Error(_) => return Status::Error,
            _ => {}
        }
        self.ensure_started();
        let mut input = chunk;
        let mut status = self.run(&mut input, false);
        if finalize && status.is_ok() && !self.finish() {
            status = match self.state {
                EngineState::Error(_) => Status::Error,
                _ => Status::PrematureEndOfInput,
            };
        }
        status
    }

    /// Close out the parse: no more input will ever come. True iff the
    /// pending partial match (if any) resolves at end of input and every
    /// frame then sits at an accepting state; the frames are popped with
    /// their end-rule events down to an empty stack. On failure the
    /// stack is left exactly as it was.
    pub fn finish(&mut self) -> bool {
        match self.state {
            EngineState::Complete => return true,
            EngineState::Error(_) => return false,
            _ => {}
        }
        self.ensure_started();

        // Resolve whatever is still buffered under the no-more-extension
        // rule; this can emit any number of terminals.
        let mut empty: &[u8] = &[];
        match self.run(&mut empty, true) {
            Status::Ok => {}
            Status::HardEndOfFile => return true,
            _ => return false,
        }
        // whatever is left of the lookahead frame is empty now
        self.stack.take_lookahead();

        if !self.stack.rtn_frames().all(|frame| {
            self.grammar
                .rule(frame.rule)
                .state(frame.state)
                .is_accepting()
        }) {
            debug!("finalize refused: stack not in an accepting configuration");
            return false;
        }

        while let Some(frame) = self.stack.pop_rtn() {
            self.sink.on_end_rule(self.grammar.rule(frame.rule).name());
        }
        self.state = EngineState::Complete;
        true
    }

    /// Read `reader` to end in chunks, finalizing at EOF. Read failures
    /// map to [`Status::IoError`].
    pub fn parse_reader<R: Read>(&mut self, mut reader: R) -> Status {
        let mut buf = [0u8; 8192];
        loop {
            match reader.read(&mut buf) {
                Ok(0) => return self.parse(&[], true),
                Ok(n) => {
                    let status = self.parse(&buf[..n], false);
                    if status != Status::Ok {
                        return status;
                    }
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => {
                    error!(error = %e, "read failed mid-parse");
                    return Status::IoError;
                }
            }
        }
    }

    /// Parse the complete file at `path`.
    pub fn parse_file(&mut self, path: impl AsRef<Path>) -> Status {
        match fs::File::open(path.as_ref()) {
            Ok(file) => self.parse_reader(io::BufReader::new(file)),
            Err(e) => {
                error!(path = %path.as_ref().display(), error = %e, "cannot open input");
                Status::IoError
            }
        }
    }

    /// Push the start rule activation on first use.
    fn ensure_started(&mut self) {
        if self.started {
            return;
        }
        self.started = true;
        let rule = self.grammar.start_rule();
        let rtn = self.grammar.rule(rule);
        self.stack.push_rtn(RtnFrame {
            rule,
            state: rtn.start(),
        });
        trace!(rule = rtn.name(), "parse started");
        self.sink.on_start_rule(rtn.name());
    }

    /// The token loop: recognize terminals at the cursor and deliver
    /// them until input runs dry, the parse completes, or a fault halts
    /// it.
    fn run(&mut self, input: &mut &[u8], at_eof: bool) -> Status {
        loop {
            if self.stack.is_empty() {
                self.state = EngineState::Complete;
                return Status::HardEndOfFile;
            }
            self.ensure_lookahead();

            match self.pump(input, at_eof) {
                GlaOutcome::NeedMoreInput => {
                    let pending = self
                        .stack
                        .lookahead()
                        .is_some_and(|f| !f.buffered().is_empty());
                    self.state = if pending {
                        EngineState::AwaitingMoreInput
                    } else {
                        EngineState::Ready
                    };
                    return Status::Ok;
                }
                GlaOutcome::IncompleteToken => {
                    let pending = self
                        .stack
                        .lookahead()
                        .is_some_and(|f| !f.buffered().is_empty());
                    if pending {
                        debug!("end of input inside an unresolved token");
                        return Status::PrematureEndOfInput;
                    }
                    return Status::Ok;
                }
                GlaOutcome::Recognized { terminal, len } => {
                    if let Some(status) = self.accept_terminal(terminal, len) {
                        return status;
                    }
                }
                GlaOutcome::NoViableTerminal { byte } => {
                    if let Some(status) = self.lexical_fault(byte, input) {
                        return status;
                    }
                }
            }
        }
    }

    /// Create the lookahead frame designated by the innermost rule
    /// state, if none is in progress.
    fn ensure_lookahead(&mut self) {
        if self.stack.top_is_lookahead() {
            return;
        }
        let frame = self
            .stack
            .top_rtn()
            .expect("token resolution on an empty stack");
        let gla = self
            .grammar
            .rule(frame.rule)
            .state(frame.state)
            .lookahead();
        let start = self.grammar.gla(gla).start();
        self.stack.push_lookahead(GlaFrame::new(gla, start));
    }

    /// Feed the replay buffer, then the caller's chunk, into the
    /// lookahead frame. `input` is advanced past consumed bytes.
    fn pump(&mut self, input: &mut &[u8], at_eof: bool) -> GlaOutcome {
        loop {
            let frame = self
                .stack
                .lookahead_mut()
                .expect("pump without a lookahead frame");
            let gla = self.grammar.gla(frame.gla);
            if self.replay.is_empty() {
                let window: &[u8] = *input;
                let (outcome, used) = frame.feed(gla, window, at_eof);
                *input = &window[used..];
                return outcome;
            }
            let eof_here = at_eof && input.is_empty();
            let (outcome, used) = frame.feed(gla, &self.replay, eof_here);
            self.replay.drain(..used);
            match outcome {
                // replay drained; continue with the chunk
                GlaOutcome::NeedMoreInput if !eof_here => {}
                other => return other,
            }
        }
    }

    /// Emit the recognized terminal and drive the syntax level. Returns
    /// a status only when the parse must stop here.
    fn accept_terminal(&mut self, terminal: TerminalId, len: u32) -> Option<Status> {
        let frame = self
            .stack
            .take_lookahead()
            .expect("recognized terminal without a lookahead frame");
        let (text, overrun) = frame.into_parts(len);
        if !overrun.is_empty() {
            self.replay.splice(0..0, overrun);
        }

        let def = self.grammar.terminal(terminal);
        let range = TextRange::at(self.cursor, TextSize::new(len));
        let matched = TerminalMatch {
            terminal,
            name: def.name(),
            text: &text,
            range,
        };
        trace!(
            terminal = def.name(),
            ?range,
            depth = self.stack.depth(),
            "terminal recognized"
        );
        self.sink.on_terminal(&matched);
        self.cursor += TextSize::new(len);

        if def.is_skip() {
            return None;
        }
        match rtn::deliver(&self.grammar, &mut self.stack, terminal, &mut self.sink) {
            StepOutcome::Consumed | StepOutcome::Completed => None,
            StepOutcome::NoTransition => match self.sink.on_unexpected_terminal(&matched) {
                ErrorRecovery::Halt => {
                    debug!(terminal = def.name(), "unexpected terminal; halting");
                    self.state = EngineState::Error(FaultKind::UnexpectedTerminal);
                    Some(Status::Error)
                }
                // terminal discarded
                ErrorRecovery::Resume => None,
            },
        }
    }

    /// Report a lexical fault; on recovery the offending byte and the
    /// failed match attempt's buffered bytes are discarded.
    fn lexical_fault(&mut self, byte: u8, input: &mut &[u8]) -> Option<Status> {
        let buffered = self
            .stack
            .lookahead()
            .map(|f| f.buffered().len())
            .unwrap_or(0);
        let offset = self.cursor + TextSize::new(buffered as u32);
        match self.sink.on_unknown_transition(byte, offset) {
            ErrorRecovery::Halt => {
                debug!(byte, offset = u32::from(offset), "no viable terminal; halting");
                self.state = EngineState::Error(FaultKind::UnknownTransition);
                Some(Status::Error)
            }
            ErrorRecovery::Resume => {
                let frame = self
                    .stack
                    .take_lookahead()
                    .expect("lexical fault without a lookahead frame");
                let mut dropped = frame.into_buffer().len() as u32;
                if !self.replay.is_empty() {
                    self.replay.remove(0);
                    dropped += 1;
                } else if !input.is_empty() {
                    let window: &[u8] = *input;
                    *input = &window[1..];
                    dropped += 1;
                }
                self.cursor += TextSize::new(dropped);
                None
            }
        }
    }
}
