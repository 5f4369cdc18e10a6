//! End-to-end compilation driver.
//!
//! Wires the front end and the scheduling passes into one call:
//! lex → parse → analyze → lower → precedence graph → ambiguity
//! resolution → routing → flatten. Every stage remains independently
//! callable; the driver only sequences them and carries the shared
//! configuration.

use grani_hal::{HardwareConfiguration, LatencyModel};
use grani_ir::{Circuit, LinearSchedule};
use grani_qasm::{GateRegistry, ProgramStats, SourceResolver};

use crate::error::CompileResult;
use crate::ldpg::LogicalDataPrecedenceGraph;
use crate::pdpt::PhysicalDataPrecedenceTable;
use crate::resolve::resolve;
use crate::route::Router;

/// Everything one compilation produces.
#[derive(Debug)]
pub struct CompiledProgram {
    /// The lowered logical circuit.
    pub circuit: Circuit,
    /// Statement counts from semantic analysis.
    pub stats: ProgramStats,
    /// The logical precedence graph.
    pub ldpg: LogicalDataPrecedenceGraph,
    /// The filled placement table.
    pub pdpt: PhysicalDataPrecedenceTable,
    /// The flattened schedule on physical qubits.
    pub schedule: LinearSchedule,
}

/// Compiles OpenQASM source for one target device.
///
/// Construction takes the gate vocabulary, the device description, and a
/// latency estimator; an include resolver is optional and absent by
/// default (a program with `include` then fails with an Include error).
pub struct Compiler {
    registry: GateRegistry,
    hardware: HardwareConfiguration,
    latency: Box<dyn LatencyModel>,
    resolver: Option<Box<dyn SourceResolver>>,
}

impl Compiler {
    /// A compiler for `hardware` with the given gate vocabulary and
    /// latency estimator.
    pub fn new(
        registry: GateRegistry,
        hardware: HardwareConfiguration,
        latency: impl LatencyModel + 'static,
    ) -> Self {
        Compiler {
            registry,
            hardware,
            latency: Box::new(latency),
            resolver: None,
        }
    }

    /// Attach an include resolver.
    pub fn with_resolver(mut self, resolver: impl SourceResolver + 'static) -> Self {
        self.resolver = Some(Box::new(resolver));
        self
    }

    /// Compile `source` down to a physical schedule.
    pub fn compile(&self, source: &str) -> CompileResult<CompiledProgram> {
        let program = match &self.resolver {
            Some(resolver) => grani_qasm::parse_with_resolver(source, resolver.as_ref())?,
            None => grani_qasm::parse(source)?,
        };
        tracing::info!(statements = program.statements.len(), "parsed program");

        let stats = grani_qasm::analyze(&program, &self.registry)?;
        let circuit = grani_qasm::lower(&program, &self.registry)?;
        tracing::info!(
            qubits = circuit.num_qubits(),
            events = circuit.schedule().len(),
            "lowered circuit"
        );

        let ldpg = LogicalDataPrecedenceGraph::build(circuit.schedule(), self.latency.as_ref());
        let sub_groups = resolve(&ldpg);
        tracing::info!(
            nodes = ldpg.len(),
            sub_groups = sub_groups.len(),
            "resolved precedence graph"
        );

        let pdpt = Router::new(&circuit, &ldpg, &self.hardware)?.run(&sub_groups)?;
        let schedule = pdpt.flatten();
        tracing::info!(
            device = %self.hardware.name,
            columns = pdpt.num_columns(),
            events = schedule.len(),
            "routed onto device"
        );

        Ok(CompiledProgram {
            circuit,
            stats,
            ldpg,
            pdpt,
            schedule,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grani_hal::{ConnectivityGraph, ConstantLatency};
    use grani_qasm::MemoryResolver;

    fn compiler(num_physical: u32) -> Compiler {
        Compiler::new(
            GateRegistry::standard(),
            HardwareConfiguration::new("test-line", ConnectivityGraph::linear(num_physical)),
            ConstantLatency(1),
        )
        .with_resolver(MemoryResolver::with_standard_library())
    }

    #[test]
    fn test_bell_pipeline() {
        let source = "OPENQASM 2.0;
qreg q[2];
creg c[2];
U(pi/2,0,pi) q[0];
CX q[0],q[1];
measure q -> c;
";
        let compiled = compiler(2).compile(source).unwrap();
        assert_eq!(compiled.circuit.num_qubits(), 2);
        assert_eq!(compiled.stats.measurements, 1);
        assert_eq!(compiled.ldpg.len(), 4);
        assert_eq!(compiled.schedule.len(), 4);
    }

    #[test]
    fn test_front_end_errors_propagate() {
        let result = compiler(2).compile("OPENQASM 2.0; qreg q[1]; foo q[0];");
        assert!(matches!(
            result,
            Err(crate::error::CompileError::Qasm(_))
        ));
    }

    #[test]
    fn test_capacity_propagates() {
        let result = compiler(1).compile("OPENQASM 2.0; qreg q[3];");
        assert!(matches!(
            result,
            Err(crate::error::CompileError::Schedule(_))
        ));
    }
}
