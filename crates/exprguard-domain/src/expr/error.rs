use thiserror::Error;

/// Why an expression could not be parsed. `Display` is the user-facing diagnostic.
///
/// Offsets are byte positions in the expression text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SyntaxError {
    #[error("empty expression")]
    EmptyExpression,

    #[error("unexpected end of expression")]
    UnexpectedEof,

    #[error("unexpected character '{ch}' at position {offset}")]
    UnexpectedChar { ch: char, offset: usize },

    #[error("unexpected token '{token}' at position {offset}")]
    UnexpectedToken { token: String, offset: usize },

    #[error("'{open}' at position {offset} is never closed")]
    Unclosed { open: char, offset: usize },

    #[error("unterminated string literal starting at position {offset}")]
    UnterminatedString { offset: usize },

    #[error("'@' at position {offset} must be followed by a reference name")]
    MissingReferenceName { offset: usize },

    #[error("more data after a complete expression: '{token}' at position {offset}")]
    TrailingInput { token: String, offset: usize },

    #[error("expression nested too deeply at position {offset}")]
    TooDeep { offset: usize },
}

impl SyntaxError {
    /// Byte offset the diagnostic points at, when there is one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            SyntaxError::EmptyExpression | SyntaxError::UnexpectedEof => None,
            SyntaxError::UnexpectedChar { offset, .. }
            | SyntaxError::UnexpectedToken { offset, .. }
            | SyntaxError::Unclosed { offset, .. }
            | SyntaxError::UnterminatedString { offset }
            | SyntaxError::MissingReferenceName { offset }
            | SyntaxError::TrailingInput { offset, .. }
            | SyntaxError::TooDeep { offset } => Some(*offset),
        }
    }
}
