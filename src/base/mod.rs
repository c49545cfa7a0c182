//! Foundation types for the trellis engine.
//!
//! This module provides the primitives used throughout the crate:
//! - [`TerminalId`], [`RuleId`], [`GlaId`], [`RtnStateId`], [`GlaStateId`] -
//!   typed indexes into the compiled grammar tables
//! - [`TextRange`], [`TextSize`] - byte offsets into the input stream
//!
//! This module has NO dependencies on other trellis modules.

mod ids;

pub use ids::{GlaId, GlaStateId, RtnStateId, RuleId, TerminalId};

/// Re-export text-size types for convenience
pub use text_size::{TextRange, TextSize};
