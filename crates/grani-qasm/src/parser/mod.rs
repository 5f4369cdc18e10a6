//! Recursive-descent parser for `OpenQASM` 2.0.
//!
//! The parser holds a single read cursor over the token list and never
//! looks ahead more than one token. `include` directives are resolved
//! through a [`SourceResolver`] and their statements spliced in place,
//! so the produced [`Program`] is already include-free.

mod expression;
mod statement;

use crate::ast::Program;
use crate::error::{QasmError, QasmResult};
use crate::include::SourceResolver;
use crate::lexer::{SpannedToken, Token, tokenize};

/// Parse a source string without include support.
///
/// Any `include` directive fails with an include error.
pub fn parse(source: &str) -> QasmResult<Program> {
    Parser::new(source, None, 0)?.parse_program()
}

/// Parse a source string, resolving `include` directives through `resolver`.
pub fn parse_with_resolver(source: &str, resolver: &dyn SourceResolver) -> QasmResult<Program> {
    Parser::new(source, Some(resolver), 0)?.parse_program()
}

/// Nesting limit for includes; a cycle of include files hits this.
const MAX_INCLUDE_DEPTH: usize = 64;

/// Parser state.
pub(super) struct Parser<'a> {
    /// Original source, for slicing lexemes such as the version number.
    pub(super) source: &'a str,
    pub(super) tokens: Vec<SpannedToken>,
    pub(super) pos: usize,
    /// Include resolution capability, when configured.
    pub(super) resolver: Option<&'a dyn SourceResolver>,
    /// Current include nesting depth.
    pub(super) depth: usize,
}

impl<'a> Parser<'a> {
    /// Create a parser over `source` at the given include depth.
    pub(super) fn new(
        source: &'a str,
        resolver: Option<&'a dyn SourceResolver>,
        depth: usize,
    ) -> QasmResult<Self> {
        let tokens = tokenize(source)?;
        Ok(Parser {
            source,
            tokens,
            pos: 0,
            resolver,
            depth,
        })
    }

    /// Check if we've reached the end.
    pub(super) fn is_eof(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    /// Byte offset of the current token, or of the end of input.
    pub(super) fn offset(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map_or(self.source.len(), |t| t.span.start)
    }

    /// Peek at the current token.
    pub(super) fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos).map(|t| &t.token)
    }

    /// Advance and return the current token.
    pub(super) fn advance(&mut self) -> Option<Token> {
        if self.is_eof() {
            return None;
        }
        let token = self.tokens[self.pos].token.clone();
        self.pos += 1;
        Some(token)
    }

    /// Expect a specific token, comparing by variant.
    #[allow(clippy::needless_pass_by_value)]
    pub(super) fn expect(&mut self, expected: Token) -> QasmResult<()> {
        let offset = self.offset();
        let found = self
            .advance()
            .ok_or_else(|| QasmError::eof(offset, format!("`{expected}`")))?;

        if std::mem::discriminant(&found) != std::mem::discriminant(&expected) {
            return Err(QasmError::syntax(
                offset,
                format!("`{expected}`"),
                format!("`{found}`"),
            ));
        }
        Ok(())
    }

    /// Check if the current token matches, comparing by variant.
    pub(super) fn check(&self, token: &Token) -> bool {
        self.peek()
            .is_some_and(|t| std::mem::discriminant(t) == std::mem::discriminant(token))
    }

    /// Consume the current token if it matches.
    pub(super) fn consume(&mut self, token: &Token) -> bool {
        if self.check(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Parse an entire program: header plus statements.
    fn parse_program(&mut self) -> QasmResult<Program> {
        self.expect(Token::OpenQasm)?;
        let version = self.parse_version()?;
        self.expect(Token::Semicolon)?;

        let mut statements = Vec::new();
        self.parse_statements_into(&mut statements, None)?;

        Ok(Program {
            version,
            statements,
        })
    }

    /// Parse the version real, keeping its source spelling.
    fn parse_version(&mut self) -> QasmResult<String> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Real(_)) => {
                let span = &self.tokens[self.pos - 1].span;
                Ok(self.source[span.clone()].to_string())
            }
            Some(other) => Err(QasmError::syntax(
                offset,
                "version number",
                format!("`{other}`"),
            )),
            None => Err(QasmError::eof(offset, "version number")),
        }
    }

    /// Parse a comma-separated identifier list.
    pub(super) fn parse_identifier_list(&mut self) -> QasmResult<Vec<String>> {
        let mut ids = vec![self.parse_identifier()?];
        while self.consume(&Token::Comma) {
            ids.push(self.parse_identifier()?);
        }
        Ok(ids)
    }

    /// Parse an identifier.
    pub(super) fn parse_identifier(&mut self) -> QasmResult<String> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Identifier(s)) => Ok(s),
            Some(other) => Err(QasmError::syntax(offset, "identifier", format!("`{other}`"))),
            None => Err(QasmError::eof(offset, "identifier")),
        }
    }

    /// Parse an integer literal.
    pub(super) fn parse_integer(&mut self) -> QasmResult<u64> {
        let offset = self.offset();
        match self.advance() {
            Some(Token::Integer(v)) => Ok(v),
            Some(other) => Err(QasmError::syntax(offset, "integer", format!("`{other}`"))),
            None => Err(QasmError::eof(offset, "integer")),
        }
    }

    /// Parse a bracketed index: `[n]`.
    ///
    /// The grammar admits any non-negative integer, but indices are
    /// 32-bit; an oversized literal is an error, not a truncation.
    pub(super) fn parse_index(&mut self) -> QasmResult<u32> {
        self.expect(Token::LBracket)?;
        let offset = self.offset();
        let value = self.parse_integer()?;
        self.expect(Token::RBracket)?;
        u32::try_from(value)
            .map_err(|_| QasmError::syntax(offset, "index below 2^32", format!("`{value}`")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::StatementKind;
    use crate::include::MemoryResolver;

    #[test]
    fn test_parse_bell_program() {
        let source = "\
            OPENQASM 2.0;\n\
            qreg q[2];\n\
            creg c[2];\n\
            h q[0];\n\
            cx q[0],q[1];\n\
            measure q[0] -> c[0];\n\
            measure q[1] -> c[1];\n";

        let program = parse(source).unwrap();
        assert_eq!(program.version, "2.0");
        assert_eq!(program.statements.len(), 6);
        assert!(matches!(
            program.statements[0].kind,
            StatementKind::QregDecl { ref name, size: 2 } if name == "q"
        ));
        assert!(matches!(
            program.statements[3].kind,
            StatementKind::Unitary(ref op) if op.name == "cx" && op.args.len() == 2
        ));
    }

    #[test]
    fn test_version_keeps_spelling() {
        let program = parse("OPENQASM 2.0;").unwrap();
        assert_eq!(program.version, "2.0");
    }

    #[test]
    fn test_missing_header() {
        let err = parse("qreg q[1];").unwrap_err();
        match err {
            QasmError::Syntax { offset, .. } => assert_eq!(offset, 0),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_oversized_index_is_syntax_error() {
        let err = parse("OPENQASM 2.0; qreg q[5000000000];").unwrap_err();
        match err {
            QasmError::Syntax { found, .. } => assert!(found.contains("5000000000")),
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse("OPENQASM 2.0; qreg q[1]").unwrap_err();
        match err {
            QasmError::Syntax {
                offset, expected, ..
            } => {
                assert_eq!(offset, 23);
                assert!(expected.contains(';'));
            }
            other => panic!("expected syntax error, got {other:?}"),
        }
    }

    #[test]
    fn test_gate_definition_parses() {
        let source = "\
            OPENQASM 2.0;\n\
            gate majority a,b,c {\n\
              cx c,b;\n\
              cx c,a;\n\
              ccx a,b,c;\n\
            }\n";

        let program = parse(source).unwrap();
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0].kind {
            StatementKind::GateDecl(decl) => {
                assert_eq!(decl.name, "majority");
                assert!(decl.params.is_empty());
                assert_eq!(decl.qubits, vec!["a", "b", "c"]);
                assert_eq!(decl.body.len(), 3);
            }
            other => panic!("expected gate declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_conditional_parses() {
        let program = parse("OPENQASM 2.0; qreg q[1]; creg c[1]; if (c == 1) x q[0];").unwrap();
        match &program.statements[2].kind {
            StatementKind::If {
                register,
                value,
                body,
            } => {
                assert_eq!(register, "c");
                assert_eq!(*value, 1);
                assert!(matches!(body.kind, StatementKind::Unitary(_)));
            }
            other => panic!("expected conditional, got {other:?}"),
        }
    }

    #[test]
    fn test_include_without_resolver() {
        let err = parse("OPENQASM 2.0; include \"qelib1.inc\";").unwrap_err();
        match err {
            QasmError::Include { offset, path, .. } => {
                assert_eq!(offset, 14);
                assert_eq!(path, "qelib1.inc");
            }
            other => panic!("expected include error, got {other:?}"),
        }
    }

    #[test]
    fn test_include_unresolved() {
        let resolver = MemoryResolver::new();
        let err =
            parse_with_resolver("OPENQASM 2.0; include \"missing.inc\";", &resolver).unwrap_err();
        assert!(matches!(err, QasmError::Include { ref path, .. } if path == "missing.inc"));
    }

    #[test]
    fn test_include_splices_statements() {
        let resolver = MemoryResolver::new().with_file("defs.inc", "qreg q[3]; creg c[3];");
        let program =
            parse_with_resolver("OPENQASM 2.0; include \"defs.inc\"; h q[0];", &resolver).unwrap();
        assert_eq!(program.statements.len(), 3);
        assert!(matches!(
            program.statements[0].kind,
            StatementKind::QregDecl { size: 3, .. }
        ));
        assert!(matches!(
            program.statements[2].kind,
            StatementKind::Unitary(_)
        ));
    }

    #[test]
    fn test_include_cycle_bounded() {
        let resolver = MemoryResolver::new().with_file("a.inc", "include \"a.inc\";");
        let err = parse_with_resolver("OPENQASM 2.0; include \"a.inc\";", &resolver).unwrap_err();
        let mut depth = 0;
        let mut cursor: &(dyn std::error::Error) = &err;
        while let Some(next) = cursor.source() {
            depth += 1;
            cursor = next;
        }
        assert!(depth >= 1, "cycle should surface as a wrapped include error");
    }

    #[test]
    fn test_standard_library_parses() {
        let resolver = MemoryResolver::with_standard_library();
        let program =
            parse_with_resolver("OPENQASM 2.0; include \"qelib1.inc\";", &resolver).unwrap();
        // Every spliced statement is a gate declaration.
        assert!(
            program
                .statements
                .iter()
                .all(|s| matches!(s.kind, StatementKind::GateDecl(_)))
        );
        assert_eq!(program.statements.len(), 24);
    }
}
