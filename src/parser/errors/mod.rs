//! Parser error handling module
//!
//! Diagnostics produced while lexing and parsing ClickHouse SQL:
//! - Categorized error codes for filtering and documentation
//! - Hints for common mistakes
//! - Related span tracking (e.g., "opened here" for unclosed parentheses)
//!
//! Parsing never fails; every anomaly is recorded as a [`SyntaxError`] next to
//! the `ERROR`/`MISSING`/`UNKNOWN` element it describes.

mod codes;
mod error;

pub use codes::ErrorCode;
pub use error::{RelatedInfo, SyntaxError, SyntaxErrorBuilder};
