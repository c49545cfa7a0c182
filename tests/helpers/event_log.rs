//! An event sink that records everything it sees as readable strings,
//! so tests can compare whole event sequences.

use trellis::{ErrorRecovery, EventSink, TerminalMatch, TextSize};

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub events: Vec<String>,
    /// When set, both error hooks ask the engine to keep going.
    pub recover: bool,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn recovering() -> Self {
        Self {
            events: Vec::new(),
            recover: true,
        }
    }

    fn decision(&self) -> ErrorRecovery {
        if self.recover {
            ErrorRecovery::Resume
        } else {
            ErrorRecovery::Halt
        }
    }
}

impl EventSink for RecordingSink {
    fn on_start_rule(&mut self, rule: &str) {
        self.events.push(format!("start:{rule}"));
    }

    fn on_end_rule(&mut self, rule: &str) {
        self.events.push(format!("end:{rule}"));
    }

    fn on_terminal(&mut self, t: &TerminalMatch<'_>) {
        self.events.push(format!(
            "terminal:{}:{}@{:?}",
            t.name,
            String::from_utf8_lossy(t.text),
            t.range
        ));
    }

    fn on_unknown_transition(&mut self, byte: u8, offset: TextSize) -> ErrorRecovery {
        self.events
            .push(format!("unknown-byte:{}@{}", byte as char, u32::from(offset)));
        self.decision()
    }

    fn on_unexpected_terminal(&mut self, t: &TerminalMatch<'_>) -> ErrorRecovery {
        self.events.push(format!("unexpected:{}", t.name));
        self.decision()
    }
}

/// Assert that start/end rule events form a well-nested sequence.
#[allow(dead_code)]
pub fn assert_well_nested(events: &[String]) {
    let mut open: Vec<&str> = Vec::new();
    for event in events {
        if let Some(rule) = event.strip_prefix("start:") {
            open.push(rule);
        } else if let Some(rule) = event.strip_prefix("end:") {
            match open.pop() {
                Some(top) => assert_eq!(top, rule, "end:{rule} closes start:{top}"),
                None => panic!("end:{rule} without a matching start"),
            }
        }
    }
}
