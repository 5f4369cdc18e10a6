//! Qubit, classical bit, and register identity types.
//!
//! A circuit stores its registers in flat vectors; a qubit or classical bit
//! is addressed by a circuit-global running index wrapped in [`QubitId`] /
//! [`CbitId`]. Register membership is recovered by range lookup through the
//! owning [`Circuit`](crate::Circuit), never through back-pointers.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unique identifier for a qubit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QubitId(pub u32);

impl fmt::Display for QubitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

impl From<u32> for QubitId {
    fn from(id: u32) -> Self {
        QubitId(id)
    }
}

impl From<usize> for QubitId {
    fn from(id: usize) -> Self {
        QubitId(u32::try_from(id).expect("QubitId overflow: exceeds u32::MAX"))
    }
}

/// Unique identifier for a classical bit within a circuit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CbitId(pub u32);

impl fmt::Display for CbitId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "c{}", self.0)
    }
}

impl From<u32> for CbitId {
    fn from(id: u32) -> Self {
        CbitId(id)
    }
}

impl From<usize> for CbitId {
    fn from(id: usize) -> Self {
        CbitId(u32::try_from(id).expect("CbitId overflow: exceeds u32::MAX"))
    }
}

/// Identifier of a register within its owning circuit.
///
/// Quantum and classical registers are numbered independently, in
/// declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RegisterId(pub u32);

impl fmt::Display for RegisterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// A named block of qubits occupying a contiguous range of global indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantumRegister {
    /// Register identifier, in declaration order.
    pub id: RegisterId,
    /// Declared register name.
    pub name: String,
    /// Global index of the first qubit.
    pub offset: u32,
    /// Number of qubits in the register.
    pub size: u32,
}

impl QuantumRegister {
    /// The qubit at `index` within this register, if in range.
    pub fn qubit(&self, index: u32) -> Option<QubitId> {
        (index < self.size).then(|| QubitId(self.offset + index))
    }

    /// All qubits of this register in index order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        (self.offset..self.offset + self.size).map(QubitId)
    }

    /// Whether `qubit` falls inside this register's range.
    pub fn contains(&self, qubit: QubitId) -> bool {
        qubit.0 >= self.offset && qubit.0 < self.offset + self.size
    }
}

impl fmt::Display for QuantumRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.size)
    }
}

/// A named block of classical bits occupying a contiguous range of global
/// indices.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClassicalRegister {
    /// Register identifier, in declaration order.
    pub id: RegisterId,
    /// Declared register name.
    pub name: String,
    /// Global index of the first bit.
    pub offset: u32,
    /// Number of bits in the register.
    pub size: u32,
}

impl ClassicalRegister {
    /// The bit at `index` within this register, if in range.
    pub fn cbit(&self, index: u32) -> Option<CbitId> {
        (index < self.size).then(|| CbitId(self.offset + index))
    }

    /// All bits of this register in index order.
    pub fn cbits(&self) -> impl Iterator<Item = CbitId> + '_ {
        (self.offset..self.offset + self.size).map(CbitId)
    }

    /// Whether `cbit` falls inside this register's range.
    pub fn contains(&self, cbit: CbitId) -> bool {
        cbit.0 >= self.offset && cbit.0 < self.offset + self.size
    }
}

impl fmt::Display for ClassicalRegister {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}[{}]", self.name, self.size)
    }
}
