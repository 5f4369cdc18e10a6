//! Abstract syntax tree for `OpenQASM` 2.0.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::error::{QasmError, QasmResult};

/// A complete QASM program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Program {
    /// QASM version (e.g., "2.0").
    pub version: String,
    /// Statements in the program, includes already spliced in.
    pub statements: Vec<Statement>,
}

/// A statement with its source position.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Statement {
    /// Byte offset of the first token of the statement.
    pub pos: usize,
    /// What the statement does.
    pub kind: StatementKind,
}

/// Statement payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum StatementKind {
    /// Quantum register declaration: `qreg q[n];`
    QregDecl { name: String, size: u32 },

    /// Classical register declaration: `creg c[n];`
    CregDecl { name: String, size: u32 },

    /// Gate definition.
    GateDecl(GateDecl),

    /// Opaque gate declaration: `opaque name(params) qubits;`
    OpaqueDecl {
        name: String,
        params: Vec<String>,
        qubits: Vec<String>,
    },

    /// Application of a built-in or named gate.
    Unitary(UnitaryOp),

    /// Measurement: `measure q -> c;`
    Measure { qubit: Argument, target: Argument },

    /// Reset: `reset q;`
    Reset { qubit: Argument },

    /// Barrier: `barrier q, r;`
    Barrier { qubits: Vec<Argument> },

    /// Conditional: `if (c == n) qop;`
    If {
        register: String,
        value: u64,
        body: Box<Statement>,
    },
}

/// A gate definition: `gate name(params) qubits { body }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateDecl {
    /// Gate name.
    pub name: String,
    /// Formal parameter names.
    pub params: Vec<String>,
    /// Formal qubit argument names.
    pub qubits: Vec<String>,
    /// Body statements (unitaries and barriers only).
    pub body: Vec<Statement>,
}

/// A gate application.
///
/// The built-in gates parse with the reserved names `"U"` and `"CX"`,
/// which no declaration can shadow.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnitaryOp {
    /// Gate name.
    pub name: String,
    /// Parameter expressions (angles).
    pub params: Vec<Expression>,
    /// Qubit arguments.
    pub args: Vec<Argument>,
}

/// Reference to a register or one of its elements.
///
/// Arguments name quantum registers in unitary positions and classical
/// registers in measure targets; which one is legal where is a scope
/// check, not a grammatical one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argument {
    /// Register name (or formal argument name inside a gate body).
    pub register: String,
    /// Element index; `None` refers to the whole register.
    pub index: Option<u32>,
}

impl Argument {
    /// Reference a single element: `q[i]`.
    pub fn single(register: impl Into<String>, index: u32) -> Self {
        Argument {
            register: register.into(),
            index: Some(index),
        }
    }

    /// Reference an entire register: `q`.
    pub fn whole(register: impl Into<String>) -> Self {
        Argument {
            register: register.into(),
            index: None,
        }
    }
}

impl std::fmt::Display for Argument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.index {
            Some(i) => write!(f, "{}[{}]", self.register, i),
            None => write!(f, "{}", self.register),
        }
    }
}

/// A parameter expression.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum Expression {
    /// Real literal.
    Real(f64),
    /// Integer literal.
    Int(u64),
    /// Pi constant.
    Pi,
    /// Reference to a formal gate parameter.
    Variable { name: String, pos: usize },
    /// Binary operation.
    Binary {
        op: BinOp,
        left: Box<Expression>,
        right: Box<Expression>,
    },
    /// Unary negation.
    Neg(Box<Expression>),
    /// Built-in function call.
    Call { func: UnaryFn, arg: Box<Expression> },
}

impl Expression {
    /// Evaluate against a set of parameter bindings.
    ///
    /// Fails with a semantic error when a variable has no binding; at
    /// the top level of a program the binding map is empty, so any
    /// identifier in an expression is rejected here.
    #[allow(clippy::cast_precision_loss)]
    pub fn eval(&self, bindings: &FxHashMap<String, f64>) -> QasmResult<f64> {
        match self {
            Expression::Real(v) => Ok(*v),
            Expression::Int(v) => Ok(*v as f64),
            Expression::Pi => Ok(std::f64::consts::PI),
            Expression::Variable { name, pos } => {
                bindings.get(name).copied().ok_or_else(|| {
                    QasmError::semantic(*pos, format!("unbound parameter `{name}`"))
                })
            }
            Expression::Binary { op, left, right } => {
                let l = left.eval(bindings)?;
                let r = right.eval(bindings)?;
                Ok(match op {
                    BinOp::Add => l + r,
                    BinOp::Sub => l - r,
                    BinOp::Mul => l * r,
                    BinOp::Div => l / r,
                    BinOp::Pow => l.powf(r),
                })
            }
            Expression::Neg(e) => Ok(-e.eval(bindings)?),
            Expression::Call { func, arg } => {
                let v = arg.eval(bindings)?;
                Ok(match func {
                    UnaryFn::Sin => v.sin(),
                    UnaryFn::Cos => v.cos(),
                    UnaryFn::Tan => v.tan(),
                    UnaryFn::Exp => v.exp(),
                    UnaryFn::Ln => v.ln(),
                    UnaryFn::Sqrt => v.sqrt(),
                })
            }
        }
    }
}

/// Binary operators, loosest to tightest: `+ -`, `* /`, `^`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    Div,
    Pow,
}

/// Built-in unary functions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum UnaryFn {
    Sin,
    Cos,
    Tan,
    Exp,
    Ln,
    Sqrt,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_expression_eval() {
        let expr = Expression::Binary {
            op: BinOp::Div,
            left: Box::new(Expression::Pi),
            right: Box::new(Expression::Int(2)),
        };
        let result = expr.eval(&FxHashMap::default()).unwrap();
        assert!((result - PI / 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_expression_eval_with_bindings() {
        let mut bindings = FxHashMap::default();
        bindings.insert("theta".to_string(), PI);

        let expr = Expression::Call {
            func: UnaryFn::Cos,
            arg: Box::new(Expression::Variable {
                name: "theta".to_string(),
                pos: 0,
            }),
        };
        let result = expr.eval(&bindings).unwrap();
        assert!((result + 1.0).abs() < 1e-10);
    }

    #[test]
    fn test_unbound_parameter() {
        let expr = Expression::Variable {
            name: "theta".to_string(),
            pos: 17,
        };
        let err = expr.eval(&FxHashMap::default()).unwrap_err();
        assert_eq!(err.offset(), 17);
    }

    #[test]
    fn test_argument_display() {
        assert_eq!(Argument::single("q", 2).to_string(), "q[2]");
        assert_eq!(Argument::whole("q").to_string(), "q");
    }
}
