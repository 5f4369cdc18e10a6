//! Semantic analysis.
//!
//! A single sequential walk over the parsed program against one flat
//! symbol table. The table is seeded from the injected [`GateRegistry`],
//! so a pre-declared gate is callable but not re-declarable. The walk
//! also accumulates [`ProgramStats`] counters as a diagnostic side
//! channel; later compiler stages never read them.

use rustc_hash::FxHashMap;

use crate::ast::{Argument, Expression, GateDecl, Program, Statement, StatementKind, UnitaryOp};
use crate::error::{QasmError, QasmResult};
use crate::registry::GateRegistry;

/// What a declared name refers to.
#[derive(Debug, Clone)]
enum Symbol {
    /// Quantum register with its size.
    Qreg(u32),
    /// Classical register with its size.
    Creg(u32),
    /// A callable gate: parameter count, qubit count, whether it has a
    /// body (opaque gates do not and cannot be called).
    Gate {
        params: usize,
        qubits: usize,
        has_body: bool,
    },
}

/// Monotone counters collected during analysis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProgramStats {
    /// Total statements, gate bodies excluded; a conditional and its
    /// body count once.
    pub statements: usize,
    /// Gate applications, built-ins included.
    pub gate_uses: usize,
    /// Measurement statements.
    pub measurements: usize,
    /// Reset statements.
    pub resets: usize,
    /// Barrier statements.
    pub barriers: usize,
    /// Conditional statements.
    pub conditionals: usize,
}

/// Validate `program` against the scoping and arity rules.
///
/// Rules enforced here: no identifier is declared twice, every called
/// gate was declared earlier (or sits in the registry) and has a body,
/// argument counts match declarations, gate bodies reference only their
/// own formals (unindexed), `measure` maps quantum onto classical, and
/// `reset`/`barrier` arguments are quantum.
pub fn analyze(program: &Program, registry: &GateRegistry) -> QasmResult<ProgramStats> {
    let mut analyzer = Analyzer::new(registry);
    for statement in &program.statements {
        analyzer.check_statement(statement)?;
    }
    Ok(analyzer.stats)
}

struct Analyzer {
    symbols: FxHashMap<String, Symbol>,
    stats: ProgramStats,
}

impl Analyzer {
    fn new(registry: &GateRegistry) -> Self {
        let mut symbols = FxHashMap::default();
        for (name, spec) in registry.iter() {
            symbols.insert(
                name.to_string(),
                Symbol::Gate {
                    params: spec.params,
                    qubits: spec.qubits,
                    has_body: true,
                },
            );
        }
        Analyzer {
            symbols,
            stats: ProgramStats::default(),
        }
    }

    fn declare(&mut self, pos: usize, name: &str, symbol: Symbol) -> QasmResult<()> {
        if self.symbols.contains_key(name) {
            return Err(QasmError::semantic(
                pos,
                format!("identifier `{name}` is already declared"),
            ));
        }
        self.symbols.insert(name.to_string(), symbol);
        Ok(())
    }

    fn check_statement(&mut self, statement: &Statement) -> QasmResult<()> {
        self.stats.statements += 1;
        self.check_statement_kind(statement)
    }

    /// Statement dispatch without the statement counter, so a
    /// conditional and its body count as one statement.
    fn check_statement_kind(&mut self, statement: &Statement) -> QasmResult<()> {
        let pos = statement.pos;
        match &statement.kind {
            StatementKind::QregDecl { name, size } => self.declare(pos, name, Symbol::Qreg(*size)),
            StatementKind::CregDecl { name, size } => self.declare(pos, name, Symbol::Creg(*size)),
            StatementKind::GateDecl(decl) => {
                self.check_gate_body(decl)?;
                self.declare(
                    pos,
                    &decl.name,
                    Symbol::Gate {
                        params: decl.params.len(),
                        qubits: decl.qubits.len(),
                        has_body: true,
                    },
                )
            }
            StatementKind::OpaqueDecl {
                name,
                params,
                qubits,
            } => self.declare(
                pos,
                name,
                Symbol::Gate {
                    params: params.len(),
                    qubits: qubits.len(),
                    has_body: false,
                },
            ),
            StatementKind::Unitary(op) => {
                self.stats.gate_uses += 1;
                self.check_call_shape(pos, op)?;
                for arg in &op.args {
                    self.check_quantum_arg(pos, arg)?;
                }
                self.check_toplevel_params(op)
            }
            StatementKind::Measure { qubit, target } => {
                self.stats.measurements += 1;
                self.check_quantum_arg(pos, qubit)?;
                self.check_classical_arg(pos, target)
            }
            StatementKind::Reset { qubit } => {
                self.stats.resets += 1;
                self.check_quantum_arg(pos, qubit)
            }
            StatementKind::Barrier { qubits } => {
                self.stats.barriers += 1;
                for arg in qubits {
                    self.check_quantum_arg(pos, arg)?;
                }
                Ok(())
            }
            StatementKind::If {
                register, body, ..
            } => {
                self.stats.conditionals += 1;
                match self.symbols.get(register) {
                    Some(Symbol::Creg(_)) => {}
                    Some(_) => {
                        return Err(QasmError::semantic(
                            pos,
                            format!("condition register `{register}` is not classical"),
                        ));
                    }
                    None => {
                        return Err(QasmError::semantic(
                            pos,
                            format!("condition register `{register}` is not declared"),
                        ));
                    }
                }
                if !matches!(
                    body.kind,
                    StatementKind::Unitary(_)
                        | StatementKind::Measure { .. }
                        | StatementKind::Reset { .. }
                ) {
                    return Err(QasmError::semantic(
                        body.pos,
                        "conditional body must be a quantum operation",
                    ));
                }
                self.check_statement_kind(body)
            }
        }
    }

    /// Validate a gate call's shape: callee exists, has a body, and the
    /// parameter and argument counts match the declaration.
    ///
    /// The built-ins keep their reserved spellings: `U` takes 3 angles
    /// and 1 qubit, `CX` takes no angles and 2 qubits.
    fn check_call_shape(&self, pos: usize, op: &UnitaryOp) -> QasmResult<()> {
        let (params, qubits) = match op.name.as_str() {
            "U" => (3, 1),
            "CX" => (0, 2),
            name => match self.symbols.get(name) {
                Some(Symbol::Gate {
                    params,
                    qubits,
                    has_body: true,
                }) => (*params, *qubits),
                Some(Symbol::Gate {
                    has_body: false, ..
                }) => {
                    return Err(QasmError::semantic(
                        pos,
                        format!("opaque gate `{name}` has no body and cannot be applied"),
                    ));
                }
                Some(_) => {
                    return Err(QasmError::semantic(
                        pos,
                        format!("`{name}` is a register, not a gate"),
                    ));
                }
                None => {
                    return Err(QasmError::semantic(
                        pos,
                        format!("gate `{name}` is not declared"),
                    ));
                }
            },
        };
        if op.params.len() != params {
            return Err(QasmError::semantic(
                pos,
                format!(
                    "gate `{}` takes {params} parameter(s), got {}",
                    op.name,
                    op.params.len()
                ),
            ));
        }
        if op.args.len() != qubits {
            return Err(QasmError::semantic(
                pos,
                format!(
                    "gate `{}` takes {qubits} qubit argument(s), got {}",
                    op.name,
                    op.args.len()
                ),
            ));
        }
        Ok(())
    }

    /// A top-level argument must name a declared quantum register, with
    /// any index in bounds.
    fn check_quantum_arg(&self, pos: usize, arg: &Argument) -> QasmResult<()> {
        match self.symbols.get(&arg.register) {
            Some(Symbol::Qreg(size)) => self.check_index(pos, arg, *size),
            Some(_) => Err(QasmError::semantic(
                pos,
                format!("`{}` is not a quantum register", arg.register),
            )),
            None => Err(QasmError::semantic(
                pos,
                format!("quantum register `{}` is not declared", arg.register),
            )),
        }
    }

    /// A measure target must name a declared classical register.
    fn check_classical_arg(&self, pos: usize, arg: &Argument) -> QasmResult<()> {
        match self.symbols.get(&arg.register) {
            Some(Symbol::Creg(size)) => self.check_index(pos, arg, *size),
            Some(_) => Err(QasmError::semantic(
                pos,
                format!("`{}` is not a classical register", arg.register),
            )),
            None => Err(QasmError::semantic(
                pos,
                format!("classical register `{}` is not declared", arg.register),
            )),
        }
    }

    fn check_index(&self, pos: usize, arg: &Argument, size: u32) -> QasmResult<()> {
        match arg.index {
            Some(index) if index >= size => Err(QasmError::semantic(
                pos,
                format!(
                    "index {index} is out of bounds for `{}` of size {size}",
                    arg.register
                ),
            )),
            _ => Ok(()),
        }
    }

    /// Top-level parameter expressions are closed: any identifier inside
    /// one would be unbound at lowering, so it is rejected here.
    fn check_toplevel_params(&self, op: &UnitaryOp) -> QasmResult<()> {
        for expr in &op.params {
            if let Some((name, pos)) = find_variable(expr) {
                return Err(QasmError::semantic(
                    pos,
                    format!("unbound parameter `{name}` outside a gate body"),
                ));
            }
        }
        Ok(())
    }

    /// Validate a gate body: only barriers and unitary operations, and
    /// every referenced name is one of the gate's own formals.
    fn check_gate_body(&self, decl: &GateDecl) -> QasmResult<()> {
        for statement in &decl.body {
            match &statement.kind {
                StatementKind::Barrier { qubits } => {
                    for arg in qubits {
                        self.check_formal_qubit(statement.pos, decl, arg)?;
                    }
                }
                StatementKind::Unitary(op) => {
                    self.check_call_shape(statement.pos, op)?;
                    for arg in &op.args {
                        self.check_formal_qubit(statement.pos, decl, arg)?;
                    }
                    for expr in &op.params {
                        self.check_formal_params(decl, expr)?;
                    }
                }
                _ => {
                    return Err(QasmError::semantic(
                        statement.pos,
                        format!(
                            "gate `{}` body may only contain unitary operations and barriers",
                            decl.name
                        ),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Inside a body, a qubit argument must be an unindexed formal.
    fn check_formal_qubit(&self, pos: usize, decl: &GateDecl, arg: &Argument) -> QasmResult<()> {
        if arg.index.is_some() {
            return Err(QasmError::semantic(
                pos,
                format!(
                    "formal argument `{}` cannot be indexed inside gate `{}`",
                    arg.register, decl.name
                ),
            ));
        }
        if !decl.qubits.contains(&arg.register) {
            return Err(QasmError::semantic(
                pos,
                format!(
                    "`{}` is not a formal argument of gate `{}`",
                    arg.register, decl.name
                ),
            ));
        }
        Ok(())
    }

    /// Inside a body, expression variables must be formal parameters.
    fn check_formal_params(&self, decl: &GateDecl, expr: &Expression) -> QasmResult<()> {
        if let Some((name, pos)) = find_unknown_variable(expr, &decl.params) {
            return Err(QasmError::semantic(
                pos,
                format!("`{name}` is not a formal parameter of gate `{}`", decl.name),
            ));
        }
        Ok(())
    }
}

/// First variable reference in an expression, if any.
fn find_variable(expr: &Expression) -> Option<(&str, usize)> {
    find_unknown_variable::<&str>(expr, &[])
}

/// First variable reference not contained in `known`, if any.
fn find_unknown_variable<'a, S: AsRef<str>>(
    expr: &'a Expression,
    known: &[S],
) -> Option<(&'a str, usize)> {
    match expr {
        Expression::Variable { name, pos } => {
            if known.iter().any(|k| k.as_ref() == name) {
                None
            } else {
                Some((name, *pos))
            }
        }
        Expression::Binary { left, right, .. } => {
            find_unknown_variable(left, known).or_else(|| find_unknown_variable(right, known))
        }
        Expression::Neg(inner) => find_unknown_variable(inner, known),
        Expression::Call { arg, .. } => find_unknown_variable(arg, known),
        Expression::Real(_) | Expression::Int(_) | Expression::Pi => None,
    }
}
