//! Foundation types shared by the parser and its users.
//!
//! - [`TextRange`], [`TextSize`] - Source positions (byte offsets)
//! - [`LineIndex`] - Byte offset to line/column conversion
//! - [`Position`], [`Span`] - Line/column positions
//!
//! This module has NO dependencies on other crate modules.

mod position;

pub use position::{LineIndex, Position, Span};

// Re-export text-size types for convenience
pub use text_size;
pub use text_size::{TextRange, TextSize};
