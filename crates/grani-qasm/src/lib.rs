//! Grani `OpenQASM` 2.0 Front End
//!
//! This crate turns `OpenQASM` 2.0 source text into a [`grani_ir::Circuit`]:
//! lexing, recursive-descent parsing with include splicing, semantic
//! validation, and lowering with recursive gate inlining.
//!
//! # Pipeline
//!
//! - **Lexer**: [`lexer::tokenize`] produces spanned tokens.
//! - **Parser**: [`parse`] / [`parse_with_resolver`] build a [`Program`],
//!   resolving `include` directives through a [`SourceResolver`].
//! - **Semantic analysis**: [`analyze`] checks scoping and arity rules
//!   against a [`GateRegistry`] and reports [`ProgramStats`].
//! - **Lowering**: [`lower`] emits IR events onto a circuit, expanding
//!   user-defined gates under formal→actual substitution.
//!
//! # Example
//!
//! ```rust
//! use grani_qasm::{GateRegistry, analyze, lower, parse};
//!
//! let source = "OPENQASM 2.0; qreg q[2]; creg c[2]; \
//!               h q[0]; cx q[0],q[1]; measure q -> c;";
//! let registry = GateRegistry::standard();
//!
//! let program = parse(source).unwrap();
//! analyze(&program, &registry).unwrap();
//! let circuit = lower(&program, &registry).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 2);
//! assert_eq!(circuit.schedule().len(), 4);
//! ```

pub mod ast;
pub mod error;
pub mod include;
pub mod lexer;
pub mod lowering;
pub mod parser;
pub mod registry;
pub mod semantic;

pub use ast::{
    Argument, BinOp, Expression, GateDecl, Program, Statement, StatementKind, UnaryFn, UnitaryOp,
};
pub use error::{QasmError, QasmResult};
pub use include::{DirResolver, MemoryResolver, QELIB1, SourceResolver};
pub use lexer::{SpannedToken, Token, tokenize};
pub use lowering::lower;
pub use parser::{parse, parse_with_resolver};
pub use registry::{GateBehavior, GateRegistry, GateSpec};
pub use semantic::{ProgramStats, analyze};
