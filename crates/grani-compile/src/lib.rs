//! Grani Scheduling and Routing Back End
//!
//! This crate turns a lowered logical circuit into a schedule a real
//! device can execute. The passes run in a fixed order and each one is
//! independently callable:
//!
//! 1. **Precedence analysis** ([`ldpg`]): replace program order with data
//!    dependencies, weight nodes by latency, compute priorities.
//! 2. **Ambiguity resolution** ([`resolve`]): split equal-priority groups
//!    into qubit-disjoint sub-groups by greedy edge colouring.
//! 3. **Routing** ([`route`]): insert SWAPs (found with A*) so every
//!    interaction acts on adjacent physical qubits, filling a
//!    [`PhysicalDataPrecedenceTable`].
//! 4. **Flattening**: read the table columns-outer into the final
//!    [`LinearSchedule`](grani_ir::LinearSchedule).
//!
//! The [`Compiler`] driver runs the front end and all passes in one call.
//!
//! # Example
//!
//! ```rust
//! use grani_compile::Compiler;
//! use grani_hal::{ConnectivityGraph, ConstantLatency, HardwareConfiguration};
//! use grani_qasm::GateRegistry;
//!
//! let compiler = Compiler::new(
//!     GateRegistry::standard(),
//!     HardwareConfiguration::new("line-3", ConnectivityGraph::linear(3)),
//!     ConstantLatency(1),
//! );
//! let compiled = compiler
//!     .compile("OPENQASM 2.0; qreg q[3]; CX q[0],q[2];")
//!     .unwrap();
//! // Routing on a line inserts at least one SWAP before the interaction.
//! assert!(compiled.schedule.len() > 1);
//! ```

pub mod dump;
pub mod error;
pub mod ldpg;
pub mod pdpt;
pub mod pipeline;
pub mod resolve;
pub mod route;
pub mod search;

pub use dump::{dump_ldpg, dump_pdpt};
pub use error::{CompileError, CompileResult, ScheduleError, ScheduleResult};
pub use ldpg::{DataPrecedenceNode, LogicalDataPrecedenceGraph};
pub use pdpt::{PhysicalDataPrecedenceTable, Placement};
pub use pipeline::{CompiledProgram, Compiler};
pub use resolve::{InteractionEdge, InteractionGraph, SubGroup, resolve};
pub use route::{QubitMap, Router};
pub use search::{SearchPath, SearchState, astar};
