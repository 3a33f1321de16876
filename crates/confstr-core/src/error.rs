use thiserror::Error;

/// Syntax errors raised while scanning a config or check string.
///
/// Each variant carries the byte offset of the offending character in the
/// scanned scope.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// A double-quoted string with no closing quote.
    #[error("unterminated quoted string at byte {0}")]
    UnterminatedString(usize),
    /// A nested list with no closing bracket.
    #[error("unbalanced brackets at byte {0}")]
    UnbalancedBrackets(usize),
    /// A character that cannot start a token, such as a stray closer.
    #[error("unexpected character '{ch}' at byte {pos}")]
    UnexpectedCharacter { ch: char, pos: usize },
    /// A numeric token that does not fit in an i64.
    #[error("number out of range at byte {0}")]
    NumberOutOfRange(usize),
}

/// Convenience alias for results returned by the scanner.
pub type Result<T> = std::result::Result<T, ParseError>;
