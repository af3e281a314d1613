//! Diagnostics attached to a parse
//!
//! Every diagnostic is an error: the tree is still complete, but the text is
//! not valid ClickHouse SQL at `range`.

use rowan::{TextRange, TextSize};

use super::codes::ErrorCode;

/// A second location that explains a diagnostic, e.g. where an unclosed
/// parenthesis was opened
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelatedInfo {
    pub message: String,
    pub range: TextRange,
}

impl RelatedInfo {
    pub fn new(message: impl Into<String>, range: TextRange) -> Self {
        Self {
            message: message.into(),
            range,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxError {
    pub message: String,
    /// Offending text; empty where something is missing
    pub range: TextRange,
    pub code: ErrorCode,
    /// How the input could be fixed
    pub hint: Option<String>,
    pub related: Vec<RelatedInfo>,
}

impl SyntaxError {
    pub fn new(message: impl Into<String>, range: TextRange, code: ErrorCode) -> Self {
        Self {
            message: message.into(),
            range,
            code,
            hint: None,
            related: Vec::new(),
        }
    }

    /// Zero-width error at `offset`
    pub fn at_offset(message: impl Into<String>, offset: TextSize, code: ErrorCode) -> Self {
        Self::new(message, TextRange::empty(offset), code)
    }

    pub fn builder(code: ErrorCode) -> SyntaxErrorBuilder {
        SyntaxErrorBuilder::new(code)
    }

    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn has_related(&self) -> bool {
        !self.related.is_empty()
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(hint) = &self.hint {
            write!(f, " ({hint})")?;
        }
        Ok(())
    }
}

/// Step-by-step construction for diagnostics with related locations
pub struct SyntaxErrorBuilder {
    code: ErrorCode,
    message: Option<String>,
    offset: TextSize,
    hint: Option<String>,
    related: Vec<RelatedInfo>,
}

impl SyntaxErrorBuilder {
    pub fn new(code: ErrorCode) -> Self {
        Self {
            code,
            message: None,
            offset: TextSize::new(0),
            hint: None,
            related: Vec::new(),
        }
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn at_offset(mut self, offset: TextSize) -> Self {
        self.offset = offset;
        self
    }

    pub fn hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }

    pub fn related(mut self, message: impl Into<String>, range: TextRange) -> Self {
        self.related.push(RelatedInfo::new(message, range));
        self
    }

    /// Without a message the code's default message is used.
    pub fn build(self) -> SyntaxError {
        let message = self
            .message
            .unwrap_or_else(|| self.code.default_message().to_string());
        SyntaxError {
            message,
            range: TextRange::empty(self.offset),
            code: self.code,
            hint: self.hint,
            related: self.related,
        }
    }
}
