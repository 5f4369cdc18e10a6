//! Error type for hardware descriptions.

use thiserror::Error;

/// Errors raised while loading or validating a hardware description.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The JSON device description could not be parsed.
    #[error("invalid hardware description: {0}")]
    Description(#[from] serde_json::Error),

    /// A channel references a qubit outside the device.
    #[error("channel endpoint p{qubit} out of range for a {num_qubits}-qubit device")]
    QubitOutOfRange {
        /// The offending physical qubit index.
        qubit: u32,
        /// Device size.
        num_qubits: u32,
    },
}

/// Convenience alias used throughout the crate.
pub type HalResult<T> = Result<T, HalError>;
