//! The parsing engine: incremental interpretation of compiled tables.
//!
//! ## Data flow
//!
//! ```text
//! caller chunk (any size, any boundary)
//!     ↓
//! ParseSession::parse
//!     ↓
//! lookahead frame (GlaFrame) → recognizes the next terminal,
//!     ↓                        buffering partial matches across chunks
//! RTN delivery → shift / enter sub-rule / complete rule
//!     ↓
//! EventSink → on_start_rule / on_terminal / on_end_rule / error hooks
//! ```
//!
//! One [`ParseSession`] per logical input stream; sessions share their
//! grammar read-only and own all mutable parse state, so independent
//! streams parse concurrently with one session each.

mod events;
mod lookahead;
mod rtn;
mod session;
mod stack;

pub use events::{ErrorRecovery, EventSink, Status, TerminalMatch};
pub use session::{EngineState, FaultKind, ParseSession};
