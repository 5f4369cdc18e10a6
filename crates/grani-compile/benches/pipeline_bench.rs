//! Benchmarks for the full compilation pipeline
//!
//! Run with: cargo bench -p grani-compile

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use grani_compile::{Compiler, LogicalDataPrecedenceGraph, resolve};
use grani_hal::{ConnectivityGraph, ConstantLatency, HardwareConfiguration, PerKindLatency};
use grani_qasm::{GateRegistry, MemoryResolver};

/// A GHZ-style program entangling `n` qubits, then measuring them all.
fn ghz_source(n: u32) -> String {
    let mut source = String::from("OPENQASM 2.0;\ninclude \"qelib1.inc\";\n");
    source.push_str(&format!("qreg q[{n}];\ncreg c[{n}];\nh q[0];\n"));
    for i in 1..n {
        source.push_str(&format!("cx q[{}],q[{i}];\n", i - 1));
    }
    source.push_str("measure q -> c;\n");
    source
}

fn line_compiler(n: u32) -> Compiler {
    Compiler::new(
        GateRegistry::minimal(),
        HardwareConfiguration::new("bench-line", ConnectivityGraph::linear(n)),
        PerKindLatency::default(),
    )
    .with_resolver(MemoryResolver::with_standard_library())
}

/// Benchmark the whole pipeline on growing GHZ programs.
fn bench_full_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_pipeline");

    for num_qubits in &[2u32, 4, 8, 16] {
        let source = ghz_source(*num_qubits);
        let compiler = line_compiler(*num_qubits);
        group.bench_with_input(
            BenchmarkId::new("ghz_line", num_qubits),
            &source,
            |b, source| {
                b.iter(|| compiler.compile(black_box(source)).unwrap());
            },
        );
    }

    group.finish();
}

/// Benchmark the front end alone: lex, parse, analyze, lower.
fn bench_front_end(c: &mut Criterion) {
    let mut group = c.benchmark_group("front_end");
    let registry = GateRegistry::minimal();
    let resolver = MemoryResolver::with_standard_library();
    let source = ghz_source(16);

    group.bench_function("parse", |b| {
        b.iter(|| grani_qasm::parse_with_resolver(black_box(&source), &resolver).unwrap());
    });

    let program = grani_qasm::parse_with_resolver(&source, &resolver).unwrap();
    group.bench_function("lower", |b| {
        b.iter(|| grani_qasm::lower(black_box(&program), &registry).unwrap());
    });

    group.finish();
}

/// Benchmark precedence analysis and resolution on a lowered circuit.
fn bench_scheduling(c: &mut Criterion) {
    let mut group = c.benchmark_group("scheduling");
    let registry = GateRegistry::minimal();
    let resolver = MemoryResolver::with_standard_library();
    let program = grani_qasm::parse_with_resolver(&ghz_source(16), &resolver).unwrap();
    let circuit = grani_qasm::lower(&program, &registry).unwrap();

    group.bench_function("ldpg_build", |b| {
        b.iter(|| {
            LogicalDataPrecedenceGraph::build(black_box(circuit.schedule()), &ConstantLatency(1))
        });
    });

    let ldpg = LogicalDataPrecedenceGraph::build(circuit.schedule(), &ConstantLatency(1));
    group.bench_function("resolve", |b| {
        b.iter(|| resolve(black_box(&ldpg)));
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_full_pipeline,
    bench_front_end,
    bench_scheduling
);
criterion_main!(benches);
