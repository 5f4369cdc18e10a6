//! Error types for the OpenQASM front end.

use thiserror::Error;

/// Errors produced while lexing, parsing, analyzing, or lowering OpenQASM
/// source.
///
/// Every variant that refers to a place in the source carries the byte
/// offset of the offending token or statement.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QasmError {
    /// The lexer hit an unrecognized or malformed character sequence.
    #[error("Unrecognized input '{lexeme}' at byte {offset}")]
    Character {
        /// Byte offset of the offending input.
        offset: usize,
        /// The source slice that failed to lex.
        lexeme: String,
    },

    /// The parser hit a token that does not fit the grammar.
    #[error("Syntax error at byte {offset}: expected {expected}, found {found}")]
    Syntax {
        /// Byte offset of the offending token.
        offset: usize,
        /// What the grammar required here.
        expected: String,
        /// The token actually present.
        found: String,
    },

    /// An `include` directive could not be resolved.
    ///
    /// Failures inside an included file are wrapped here with the outer
    /// directive's offset, keeping the chain traceable through `source()`.
    #[error("Include \"{path}\" at byte {offset}: {reason}")]
    Include {
        /// Byte offset of the `include` directive.
        offset: usize,
        /// The requested include path.
        path: String,
        /// Why resolution or nested parsing failed.
        reason: String,
        /// The nested failure, when the included file itself was invalid.
        #[source]
        cause: Option<Box<QasmError>>,
    },

    /// A scope, arity, or argument-kind rule was violated.
    #[error("Semantic error at byte {offset}: {message}")]
    Semantic {
        /// Byte offset of the offending statement.
        offset: usize,
        /// Description of the violated rule.
        message: String,
    },
}

impl QasmError {
    /// Build a syntax error at `offset`.
    pub fn syntax(offset: usize, expected: impl Into<String>, found: impl Into<String>) -> Self {
        QasmError::Syntax {
            offset,
            expected: expected.into(),
            found: found.into(),
        }
    }

    /// Build a syntax error for running out of input.
    pub fn eof(offset: usize, expected: impl Into<String>) -> Self {
        QasmError::Syntax {
            offset,
            expected: expected.into(),
            found: "end of input".into(),
        }
    }

    /// Build a semantic error at `offset`.
    pub fn semantic(offset: usize, message: impl Into<String>) -> Self {
        QasmError::Semantic {
            offset,
            message: message.into(),
        }
    }

    /// The source byte offset this error points at.
    pub fn offset(&self) -> usize {
        match self {
            QasmError::Character { offset, .. }
            | QasmError::Syntax { offset, .. }
            | QasmError::Include { offset, .. }
            | QasmError::Semantic { offset, .. } => *offset,
        }
    }
}

/// Result type for front-end operations.
pub type QasmResult<T> = Result<T, QasmError>;
