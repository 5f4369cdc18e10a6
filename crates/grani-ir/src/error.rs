//! Error types for the IR crate.

use thiserror::Error;

/// Errors that can occur while building circuits and events.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A register with this name already exists in the circuit.
    #[error("Register '{name}' is already declared")]
    DuplicateRegister {
        /// The colliding register name.
        name: String,
    },

    /// No register with this name exists in the circuit.
    #[error("Register '{name}' is not declared")]
    UnknownRegister {
        /// The name that failed to resolve.
        name: String,
    },

    /// An index fell outside its register.
    #[error("Index {index} is out of bounds for register '{register}' of size {size}")]
    IndexOutOfBounds {
        /// The register being indexed.
        register: String,
        /// The offending index.
        index: u32,
        /// The register's declared size.
        size: u32,
    },

    /// Measurement qubit and bit lists differ in length.
    #[error("Measurement maps {qubits} qubits onto {cbits} classical bits")]
    MeasureArityMismatch {
        /// Number of measured qubits.
        qubits: usize,
        /// Number of destination bits.
        cbits: usize,
    },
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
