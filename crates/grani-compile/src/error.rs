//! Error types for the scheduling back end.

use thiserror::Error;

/// Errors raised by the scheduling and routing passes.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ScheduleError {
    /// The router exhausted its search space without finding a swap
    /// sequence that makes a group's interactions adjacent. Fatal for the
    /// compilation; never retried.
    #[error("routing failed for priority group {priority}: no swap sequence reaches adjacency")]
    Routing {
        /// Priority of the group that could not be routed.
        priority: u64,
    },

    /// The circuit uses more logical qubits than the device provides.
    #[error("circuit requires {logical} qubits but device '{hardware}' only has {physical}")]
    Capacity {
        /// Logical qubits the circuit declares.
        logical: u32,
        /// Physical qubits available.
        physical: u32,
        /// Device name, for diagnostics.
        hardware: String,
    },
}

/// Result type for scheduling operations.
pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Aggregate error for the pipeline driver.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Front-end failure: lexing, parsing, analysis, or lowering.
    #[error(transparent)]
    Qasm(#[from] grani_qasm::QasmError),

    /// Back-end failure: scheduling or routing.
    #[error(transparent)]
    Schedule(#[from] ScheduleError),
}

/// Result type for whole-pipeline operations.
pub type CompileResult<T> = Result<T, CompileError>;
