//! Lexer for `OpenQASM` 2.0.

use logos::Logos;

use crate::error::{QasmError, QasmResult};

/// Tokens for `OpenQASM` 2.0.
///
/// The keyword table is fixed: anything matching the identifier pattern
/// that is not listed here lexes as [`Token::Identifier`].
#[derive(Logos, Debug, Clone, PartialEq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
pub enum Token {
    // Keywords
    #[token("OPENQASM")]
    OpenQasm,

    #[token("include")]
    Include,

    #[token("qreg")]
    Qreg,

    #[token("creg")]
    Creg,

    #[token("gate")]
    Gate,

    #[token("opaque")]
    Opaque,

    #[token("barrier")]
    Barrier,

    #[token("if")]
    If,

    #[token("measure")]
    Measure,

    #[token("reset")]
    Reset,

    // Built-in gates (higher priority than identifier)
    #[token("U", priority = 3)]
    GateU,

    #[token("CX", priority = 3)]
    GateCX,

    // Constants and unary functions
    #[token("pi")]
    Pi,

    #[token("sin")]
    Sin,

    #[token("cos")]
    Cos,

    #[token("tan")]
    Tan,

    #[token("exp")]
    Exp,

    #[token("ln")]
    Ln,

    #[token("sqrt")]
    Sqrt,

    // Literals
    #[regex(r"[0-9]+\.[0-9]*([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().parse::<f64>().ok())]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().parse::<f64>().ok())]
    Real(f64),

    #[regex(r"[0-9]+", |lex| lex.slice().parse::<u64>().ok())]
    Integer(u64),

    #[regex(r#""[^"]*""#, |lex| {
        let s = lex.slice();
        Some(s[1..s.len()-1].to_string())
    })]
    Str(String),

    // Identifiers
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),

    // Operators and punctuation
    #[token("+")]
    Plus,

    #[token("-")]
    Minus,

    #[token("*")]
    Star,

    #[token("/")]
    Slash,

    #[token("^")]
    Caret,

    #[token("==")]
    EqEq,

    #[token("->")]
    Arrow,

    #[token("(")]
    LParen,

    #[token(")")]
    RParen,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("{")]
    LBrace,

    #[token("}")]
    RBrace,

    #[token(";")]
    Semicolon,

    #[token(",")]
    Comma,
}

impl std::fmt::Display for Token {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Token::OpenQasm => write!(f, "OPENQASM"),
            Token::Include => write!(f, "include"),
            Token::Qreg => write!(f, "qreg"),
            Token::Creg => write!(f, "creg"),
            Token::Gate => write!(f, "gate"),
            Token::Opaque => write!(f, "opaque"),
            Token::Barrier => write!(f, "barrier"),
            Token::If => write!(f, "if"),
            Token::Measure => write!(f, "measure"),
            Token::Reset => write!(f, "reset"),
            Token::GateU => write!(f, "U"),
            Token::GateCX => write!(f, "CX"),
            Token::Pi => write!(f, "pi"),
            Token::Sin => write!(f, "sin"),
            Token::Cos => write!(f, "cos"),
            Token::Tan => write!(f, "tan"),
            Token::Exp => write!(f, "exp"),
            Token::Ln => write!(f, "ln"),
            Token::Sqrt => write!(f, "sqrt"),
            // Integral reals print with a trailing .0 so they re-lex as reals.
            Token::Real(v) if v.fract() == 0.0 && v.is_finite() => write!(f, "{v:.1}"),
            Token::Real(v) => write!(f, "{v}"),
            Token::Integer(v) => write!(f, "{v}"),
            Token::Str(s) => write!(f, "\"{s}\""),
            Token::Identifier(s) => write!(f, "{s}"),
            Token::Plus => write!(f, "+"),
            Token::Minus => write!(f, "-"),
            Token::Star => write!(f, "*"),
            Token::Slash => write!(f, "/"),
            Token::Caret => write!(f, "^"),
            Token::EqEq => write!(f, "=="),
            Token::Arrow => write!(f, "->"),
            Token::LParen => write!(f, "("),
            Token::RParen => write!(f, ")"),
            Token::LBracket => write!(f, "["),
            Token::RBracket => write!(f, "]"),
            Token::LBrace => write!(f, "{{"),
            Token::RBrace => write!(f, "}}"),
            Token::Semicolon => write!(f, ";"),
            Token::Comma => write!(f, ","),
        }
    }
}

/// A token with its source span.
#[derive(Debug, Clone)]
pub struct SpannedToken {
    /// The token itself.
    pub token: Token,
    /// Byte range in the source.
    pub span: std::ops::Range<usize>,
}

/// Tokenize an `OpenQASM` 2.0 source string.
///
/// Stops at the first unrecognized character sequence. A lone `=` (the
/// only prefix of `==`) and any byte outside the language alphabet land
/// here with the offending offset.
pub fn tokenize(source: &str) -> QasmResult<Vec<SpannedToken>> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        let span = lexer.span();
        match result {
            Ok(token) => tokens.push(SpannedToken { token, span }),
            Err(()) => {
                return Err(QasmError::Character {
                    offset: span.start,
                    lexeme: source[span].to_string(),
                });
            }
        }
    }

    Ok(tokens)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_header_tokens() {
        let tokens = tokenize("OPENQASM 2.0;").unwrap();
        assert_eq!(tokens.len(), 3);
        assert_eq!(tokens[0].token, Token::OpenQasm);
        assert!(matches!(tokens[1].token, Token::Real(v) if (v - 2.0).abs() < 1e-9));
        assert_eq!(tokens[2].token, Token::Semicolon);
    }

    #[test]
    fn test_register_declaration() {
        let tokens = tokenize("qreg q[2];").unwrap();
        assert_eq!(tokens[0].token, Token::Qreg);
        assert!(matches!(tokens[1].token, Token::Identifier(ref s) if s == "q"));
        assert_eq!(tokens[2].token, Token::LBracket);
        assert!(matches!(tokens[3].token, Token::Integer(2)));
        assert_eq!(tokens[4].token, Token::RBracket);
        assert_eq!(tokens[5].token, Token::Semicolon);
    }

    #[test]
    fn test_builtin_vs_identifier() {
        let tokens = tokenize("U CX u cx Ux").unwrap();
        assert_eq!(tokens[0].token, Token::GateU);
        assert_eq!(tokens[1].token, Token::GateCX);
        assert!(matches!(tokens[2].token, Token::Identifier(ref s) if s == "u"));
        assert!(matches!(tokens[3].token, Token::Identifier(ref s) if s == "cx"));
        assert!(matches!(tokens[4].token, Token::Identifier(ref s) if s == "Ux"));
    }

    #[test]
    fn test_function_keywords() {
        let tokens = tokenize("sin sinister").unwrap();
        assert_eq!(tokens[0].token, Token::Sin);
        assert!(matches!(tokens[1].token, Token::Identifier(ref s) if s == "sinister"));
    }

    #[test]
    fn test_real_forms() {
        let tokens = tokenize("1.5 .25 3. 2e3 1.0e-2").unwrap();
        let values: Vec<f64> = tokens
            .iter()
            .map(|t| match t.token {
                Token::Real(v) => v,
                ref other => panic!("expected real, got {other:?}"),
            })
            .collect();
        assert_eq!(values, vec![1.5, 0.25, 3.0, 2000.0, 0.01]);
    }

    #[test]
    fn test_comments_and_whitespace() {
        let source = "qreg q[1]; // trailing comment\n  creg c[1];";
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens.len(), 12);
        assert_eq!(tokens[6].token, Token::Creg);
    }

    #[test]
    fn test_arrow_and_equality() {
        let tokens = tokenize("-> == - >").unwrap_err();
        // '>' alone is not in the alphabet.
        match tokens {
            QasmError::Character { offset, lexeme } => {
                assert_eq!(lexeme, ">");
                assert_eq!(offset, 8);
            }
            other => panic!("expected character error, got {other:?}"),
        }
    }

    #[test]
    fn test_lone_equals_rejected() {
        let err = tokenize("if (c = 1)").unwrap_err();
        match err {
            QasmError::Character { offset, .. } => assert_eq!(offset, 6),
            other => panic!("expected character error, got {other:?}"),
        }
    }

    #[test]
    fn test_offsets_track_bytes() {
        let tokens = tokenize("qreg q[3];").unwrap();
        assert_eq!(tokens[0].span, 0..4);
        assert_eq!(tokens[1].span, 5..6);
        assert_eq!(tokens[3].span, 7..8);
    }
}
