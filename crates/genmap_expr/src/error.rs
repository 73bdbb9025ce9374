//! Errors raised while parsing or compiling an equation.

/// Errors produced by the equation lexer, parser, and compiler.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ExprError {
    /// A character that cannot start any token.
    #[error("unexpected character '{ch}' at offset {pos}")]
    UnexpectedChar {
        /// The offending character.
        ch: char,
        /// Byte offset in the equation.
        pos: usize,
    },

    /// A numeric literal that does not parse as `f64`.
    #[error("invalid number '{text}' at offset {pos}")]
    InvalidNumber {
        /// The literal text.
        text: String,
        /// Byte offset in the equation.
        pos: usize,
    },

    /// A token that cannot appear where it was found.
    #[error("unexpected {found} at offset {pos}")]
    UnexpectedToken {
        /// Description of the token found.
        found: String,
        /// Byte offset in the equation.
        pos: usize,
    },

    /// The equation is empty.
    #[error("empty equation")]
    Empty,

    /// A variable that is neither a bound parameter nor a declared slot.
    #[error("unbound variable '{0}'")]
    UnboundVariable(String),
}
