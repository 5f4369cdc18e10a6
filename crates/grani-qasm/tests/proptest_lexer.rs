//! Property-based tests for the `OpenQASM` front end.
//!
//! Re-lexing the space-joined lexemes of a valid program must reproduce
//! the original token stream, and lowering must be a pure function of
//! the program.

use grani_qasm::{GateRegistry, Token, analyze, lower, parse, tokenize};
use proptest::prelude::*;

/// Generate a small syntactically valid program.
fn arb_program() -> impl Strategy<Value = String> {
    (1_u32..=4, prop::collection::vec(arb_statement(), 0..=12)).prop_map(|(size, stmts)| {
        let mut source = format!("OPENQASM 2.0;\nqreg q[{size}];\ncreg c[{size}];\n");
        for stmt in stmts {
            source.push_str(&stmt.render(size));
            source.push('\n');
        }
        source
    })
}

#[derive(Debug, Clone)]
enum Stmt {
    H(u32),
    Rz(u32, u32),
    Cx(u32, u32),
    Measure(u32),
    Reset(u32),
    Barrier,
    Cond(u32, u64),
}

impl Stmt {
    fn render(&self, size: u32) -> String {
        let q = |i: u32| i % size;
        match *self {
            Stmt::H(a) => format!("h q[{}];", q(a)),
            Stmt::Rz(num, a) => format!("rz(pi/{}) q[{}];", num.max(1), q(a)),
            Stmt::Cx(a, b) => {
                let (a, b) = (q(a), q(b));
                if a == b {
                    format!("h q[{a}];")
                } else {
                    format!("cx q[{a}],q[{b}];")
                }
            }
            Stmt::Measure(a) => format!("measure q[{0}] -> c[{0}];", q(a)),
            Stmt::Reset(a) => format!("reset q[{}];", q(a)),
            Stmt::Barrier => "barrier q;".to_string(),
            Stmt::Cond(a, v) => format!("if (c == {v}) x q[{}];", q(a)),
        }
    }
}

fn arb_statement() -> impl Strategy<Value = Stmt> {
    prop_oneof![
        (0u32..8).prop_map(Stmt::H),
        (1u32..7, 0u32..8).prop_map(|(n, a)| Stmt::Rz(n, a)),
        (0u32..8, 0u32..8).prop_map(|(a, b)| Stmt::Cx(a, b)),
        (0u32..8).prop_map(Stmt::Measure),
        (0u32..8).prop_map(Stmt::Reset),
        Just(Stmt::Barrier),
        (0u32..8, 0u64..4).prop_map(|(a, v)| Stmt::Cond(a, v)),
    ]
}

/// Token kinds and payloads must survive a lex → join → lex cycle.
fn same_stream(a: &[Token], b: &[Token]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x == y)
}

proptest! {
    /// Round-trip tokenization: re-lexing the space-joined lexemes
    /// yields the same kinds in the same order.
    #[test]
    fn test_tokenize_roundtrip(source in arb_program()) {
        let tokens: Vec<Token> = tokenize(&source)
            .expect("generated program must lex")
            .into_iter()
            .map(|t| t.token)
            .collect();

        let joined = tokens
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(" ");
        let relexed: Vec<Token> = tokenize(&joined)
            .expect("joined lexemes must lex")
            .into_iter()
            .map(|t| t.token)
            .collect();

        prop_assert!(same_stream(&tokens, &relexed));
    }

    /// Generated programs parse, validate, and lower cleanly.
    #[test]
    fn test_generated_programs_compile(source in arb_program()) {
        let registry = GateRegistry::standard();
        let program = parse(&source).expect("generated program must parse");
        analyze(&program, &registry).expect("generated program must validate");
        lower(&program, &registry).expect("generated program must lower");
    }

    /// Lowering the same program twice yields identical schedules.
    #[test]
    fn test_lowering_determinism(source in arb_program()) {
        let registry = GateRegistry::standard();
        let program = parse(&source).expect("generated program must parse");
        let first = lower(&program, &registry).expect("first lowering");
        let second = lower(&program, &registry).expect("second lowering");
        prop_assert_eq!(first.schedule(), second.schedule());
    }
}
