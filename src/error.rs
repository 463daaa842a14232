use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while compiling a pattern.
///
/// Matching never fails with an error, so every variant here comes out of
/// [`crate::compile`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("trailing backslash")]
    TrailingBackslash,

    #[error("invalid escape sequence: \\{0}")]
    InvalidEscape(char),

    #[error("invalid utf-8 sequence in pattern")]
    InvalidEncoding,

    #[error("missing operand for quantifier")]
    MissingQuantifierOperand,

    #[error("unmatched parenthesis")]
    UnmatchedParen,

    #[error("unterminated character class")]
    UnterminatedCharacterClass,

    #[error("empty character class")]
    EmptyCharacterClass,

    #[error("invalid character range: {from}-{to}")]
    InvalidRange { from: char, to: char },

    #[error("unterminated repetition")]
    UnterminatedRepetition,

    #[error("invalid repetition count: {0}")]
    InvalidRepetitionCount(String),

    /// The expression tree would be deeper than
    /// [`MAX_NESTING_DEPTH`](crate::parser::MAX_NESTING_DEPTH) levels.
    #[error("pattern nested too deeply")]
    NestingTooDeep,
}
