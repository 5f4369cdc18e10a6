//! Statement parsing.

use super::{MAX_INCLUDE_DEPTH, Parser};
use crate::ast::{Argument, GateDecl, Statement, StatementKind, UnitaryOp};
use crate::error::{QasmError, QasmResult};
use crate::lexer::Token;

impl<'a> Parser<'a> {
    /// Parse statements into `out` until end of input or `terminator`.
    ///
    /// `include` directives are expanded here, splicing the included
    /// file's statements in place of the directive.
    pub(super) fn parse_statements_into(
        &mut self,
        out: &mut Vec<Statement>,
        terminator: Option<&Token>,
    ) -> QasmResult<()> {
        loop {
            if self.is_eof() {
                return Ok(());
            }
            if let Some(t) = terminator {
                if self.check(t) {
                    return Ok(());
                }
            }
            if self.check(&Token::Include) {
                self.parse_include_into(out)?;
            } else {
                let statement = self.parse_statement()?;
                out.push(statement);
            }
        }
    }

    /// Parse one statement (anything but `include`).
    pub(super) fn parse_statement(&mut self) -> QasmResult<Statement> {
        let pos = self.offset();
        let token = self
            .peek()
            .cloned()
            .ok_or_else(|| QasmError::eof(pos, "statement"))?;

        let kind = match token {
            Token::Qreg => self.parse_qreg_decl()?,
            Token::Creg => self.parse_creg_decl()?,
            Token::Gate => self.parse_gate_decl()?,
            Token::Opaque => self.parse_opaque_decl()?,
            Token::If => self.parse_if()?,
            Token::Barrier => self.parse_barrier()?,
            Token::Measure => self.parse_measure()?,
            Token::Reset => self.parse_reset()?,
            Token::GateU => self.parse_builtin("U")?,
            Token::GateCX => self.parse_builtin("CX")?,
            Token::Identifier(_) => {
                let name = self.parse_identifier()?;
                self.parse_unitary(name)?
            }
            other => {
                return Err(QasmError::syntax(pos, "statement", format!("`{other}`")));
            }
        };

        Ok(Statement { pos, kind })
    }

    /// Expand an `include "file";` directive in place.
    fn parse_include_into(&mut self, out: &mut Vec<Statement>) -> QasmResult<()> {
        let pos = self.offset();
        self.expect(Token::Include)?;

        let path_offset = self.offset();
        let path = match self.advance() {
            Some(Token::Str(s)) => s,
            Some(other) => {
                return Err(QasmError::syntax(
                    path_offset,
                    "quoted filename",
                    format!("`{other}`"),
                ));
            }
            None => return Err(QasmError::eof(path_offset, "quoted filename")),
        };
        self.expect(Token::Semicolon)?;

        let Some(resolver) = self.resolver else {
            return Err(QasmError::Include {
                offset: pos,
                path,
                reason: "no include search path configured".into(),
                cause: None,
            });
        };
        if self.depth >= MAX_INCLUDE_DEPTH {
            return Err(QasmError::Include {
                offset: pos,
                path,
                reason: format!("include nesting exceeds {MAX_INCLUDE_DEPTH} levels"),
                cause: None,
            });
        }
        let Some(text) = resolver.resolve(&path) else {
            return Err(QasmError::Include {
                offset: pos,
                path,
                reason: "file not found in search path".into(),
                cause: None,
            });
        };

        // Included text is a bare statement sequence, no header.
        let mut spliced = Vec::new();
        let nested = Parser::new(&text, self.resolver, self.depth + 1)
            .and_then(|mut sub| sub.parse_statements_into(&mut spliced, None));
        match nested {
            Ok(()) => {
                out.append(&mut spliced);
                Ok(())
            }
            Err(cause) => Err(QasmError::Include {
                offset: pos,
                path,
                reason: "included file failed to parse".into(),
                cause: Some(Box::new(cause)),
            }),
        }
    }

    /// Parse `qreg name[n];`.
    fn parse_qreg_decl(&mut self) -> QasmResult<StatementKind> {
        self.expect(Token::Qreg)?;
        let name = self.parse_identifier()?;
        let size = self.parse_index()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::QregDecl { name, size })
    }

    /// Parse `creg name[n];`.
    fn parse_creg_decl(&mut self) -> QasmResult<StatementKind> {
        self.expect(Token::Creg)?;
        let name = self.parse_identifier()?;
        let size = self.parse_index()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::CregDecl { name, size })
    }

    /// Parse `gate name(params) qubits { body }`.
    ///
    /// The body grammar is deliberately loose (any statement parses);
    /// restricting it to unitaries and barriers over the formal
    /// arguments is the analyzer's job.
    fn parse_gate_decl(&mut self) -> QasmResult<StatementKind> {
        self.expect(Token::Gate)?;
        let name = self.parse_identifier()?;
        let params = self.parse_formal_params()?;
        let qubits = self.parse_identifier_list()?;

        self.expect(Token::LBrace)?;
        let mut body = Vec::new();
        self.parse_statements_into(&mut body, Some(&Token::RBrace))?;
        self.expect(Token::RBrace)?;

        Ok(StatementKind::GateDecl(GateDecl {
            name,
            params,
            qubits,
            body,
        }))
    }

    /// Parse `opaque name(params) qubits;`.
    fn parse_opaque_decl(&mut self) -> QasmResult<StatementKind> {
        self.expect(Token::Opaque)?;
        let name = self.parse_identifier()?;
        let params = self.parse_formal_params()?;
        let qubits = self.parse_identifier_list()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::OpaqueDecl {
            name,
            params,
            qubits,
        })
    }

    /// Parse an optional parenthesized formal parameter list.
    fn parse_formal_params(&mut self) -> QasmResult<Vec<String>> {
        if !self.consume(&Token::LParen) {
            return Ok(vec![]);
        }
        if self.consume(&Token::RParen) {
            return Ok(vec![]);
        }
        let params = self.parse_identifier_list()?;
        self.expect(Token::RParen)?;
        Ok(params)
    }

    /// Parse `if (register == value) statement`.
    fn parse_if(&mut self) -> QasmResult<StatementKind> {
        self.expect(Token::If)?;
        self.expect(Token::LParen)?;
        let register = self.parse_identifier()?;
        self.expect(Token::EqEq)?;
        let value = self.parse_integer()?;
        self.expect(Token::RParen)?;

        let body = Box::new(self.parse_statement()?);
        Ok(StatementKind::If {
            register,
            value,
            body,
        })
    }

    /// Parse `barrier args;`.
    fn parse_barrier(&mut self) -> QasmResult<StatementKind> {
        self.expect(Token::Barrier)?;
        let qubits = self.parse_argument_list()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Barrier { qubits })
    }

    /// Parse `measure qarg -> carg;`.
    fn parse_measure(&mut self) -> QasmResult<StatementKind> {
        self.expect(Token::Measure)?;
        let qubit = self.parse_argument()?;
        self.expect(Token::Arrow)?;
        let target = self.parse_argument()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Measure { qubit, target })
    }

    /// Parse `reset qarg;`.
    fn parse_reset(&mut self) -> QasmResult<StatementKind> {
        self.expect(Token::Reset)?;
        let qubit = self.parse_argument()?;
        self.expect(Token::Semicolon)?;
        Ok(StatementKind::Reset { qubit })
    }

    /// Parse a built-in `U` or `CX` application; the keyword token is
    /// still current.
    fn parse_builtin(&mut self, name: &str) -> QasmResult<StatementKind> {
        self.advance();
        self.parse_unitary(name.to_string())
    }

    /// Parse the tail of a gate application, the name already consumed:
    /// `(params) args;` or `args;`.
    ///
    /// Parameter and argument counts are not checked here; arity is an
    /// analyzer concern, shared between built-ins and declared gates.
    fn parse_unitary(&mut self, name: String) -> QasmResult<StatementKind> {
        let params = if self.consume(&Token::LParen) {
            let params = self.parse_expression_list()?;
            self.expect(Token::RParen)?;
            params
        } else {
            vec![]
        };

        let args = self.parse_argument_list()?;
        self.expect(Token::Semicolon)?;

        Ok(StatementKind::Unitary(UnitaryOp { name, params, args }))
    }

    /// Parse a comma-separated argument list.
    fn parse_argument_list(&mut self) -> QasmResult<Vec<Argument>> {
        let mut args = vec![self.parse_argument()?];
        while self.consume(&Token::Comma) {
            args.push(self.parse_argument()?);
        }
        Ok(args)
    }

    /// Parse `name` or `name[i]`.
    fn parse_argument(&mut self) -> QasmResult<Argument> {
        let register = self.parse_identifier()?;
        if self.check(&Token::LBracket) {
            let index = self.parse_index()?;
            Ok(Argument::single(register, index))
        } else {
            Ok(Argument::whole(register))
        }
    }
}
