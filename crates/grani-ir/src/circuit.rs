//! Circuit container: registers plus the linear event schedule.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::event::Event;
use crate::register::{CbitId, ClassicalRegister, QuantumRegister, QubitId, RegisterId};

/// An append-only ordered sequence of IR events.
///
/// The order of a schedule produced by lowering is the program's textual
/// sequential order and is the ground truth every later pass must respect
/// per qubit and per classical bit.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LinearSchedule {
    events: Vec<Event>,
}

impl LinearSchedule {
    /// An empty schedule.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one event.
    pub fn push(&mut self, event: Event) {
        self.events.push(event);
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// Whether the schedule holds no events.
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// The events in schedule order.
    pub fn events(&self) -> &[Event] {
        &self.events
    }

    /// Iterate events in schedule order.
    pub fn iter(&self) -> impl Iterator<Item = &Event> {
        self.events.iter()
    }
}

impl FromIterator<Event> for LinearSchedule {
    fn from_iter<T: IntoIterator<Item = Event>>(iter: T) -> Self {
        Self {
            events: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a LinearSchedule {
    type Item = &'a Event;
    type IntoIter = std::slice::Iter<'a, Event>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}

impl fmt::Display for LinearSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for event in &self.events {
            writeln!(f, "{event}")?;
        }
        Ok(())
    }
}

/// A quantum circuit: named registers and one [`LinearSchedule`].
///
/// Registers are stored arena-style in declaration order; qubits and
/// classical bits are addressed by circuit-global indices handed out
/// contiguously as registers are added.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    name: String,
    qregs: Vec<QuantumRegister>,
    cregs: Vec<ClassicalRegister>,
    qreg_index: FxHashMap<String, usize>,
    creg_index: FxHashMap<String, usize>,
    num_qubits: u32,
    num_cbits: u32,
    schedule: LinearSchedule,
}

impl Circuit {
    /// An empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qregs: Vec::new(),
            cregs: Vec::new(),
            qreg_index: FxHashMap::default(),
            creg_index: FxHashMap::default(),
            num_qubits: 0,
            num_cbits: 0,
            schedule: LinearSchedule::new(),
        }
    }

    /// The circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Declare a quantum register of `size` qubits.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> IrResult<RegisterId> {
        let name = name.into();
        if self.qreg_index.contains_key(&name) || self.creg_index.contains_key(&name) {
            return Err(IrError::DuplicateRegister { name });
        }
        let id = RegisterId(u32::try_from(self.qregs.len()).expect("register count exceeds u32"));
        let reg = QuantumRegister {
            id,
            name: name.clone(),
            offset: self.num_qubits,
            size,
        };
        self.num_qubits += size;
        self.qreg_index.insert(name, self.qregs.len());
        self.qregs.push(reg);
        Ok(id)
    }

    /// Declare a classical register of `size` bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> IrResult<RegisterId> {
        let name = name.into();
        if self.qreg_index.contains_key(&name) || self.creg_index.contains_key(&name) {
            return Err(IrError::DuplicateRegister { name });
        }
        let id = RegisterId(u32::try_from(self.cregs.len()).expect("register count exceeds u32"));
        let reg = ClassicalRegister {
            id,
            name: name.clone(),
            offset: self.num_cbits,
            size,
        };
        self.num_cbits += size;
        self.creg_index.insert(name, self.cregs.len());
        self.cregs.push(reg);
        Ok(id)
    }

    /// Quantum registers in declaration order.
    pub fn qregs(&self) -> &[QuantumRegister] {
        &self.qregs
    }

    /// Classical registers in declaration order.
    pub fn cregs(&self) -> &[ClassicalRegister] {
        &self.cregs
    }

    /// Look up a quantum register by name.
    pub fn qreg(&self, name: &str) -> Option<&QuantumRegister> {
        self.qreg_index.get(name).map(|&i| &self.qregs[i])
    }

    /// Look up a classical register by name.
    pub fn creg(&self, name: &str) -> Option<&ClassicalRegister> {
        self.creg_index.get(name).map(|&i| &self.cregs[i])
    }

    /// Total qubit count across all registers.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Total classical bit count across all registers.
    pub fn num_cbits(&self) -> u32 {
        self.num_cbits
    }

    /// Resolve `name[index]` to a qubit id.
    pub fn qubit(&self, name: &str, index: u32) -> IrResult<QubitId> {
        let reg = self.qreg(name).ok_or_else(|| IrError::UnknownRegister {
            name: name.to_string(),
        })?;
        reg.qubit(index).ok_or_else(|| IrError::IndexOutOfBounds {
            register: name.to_string(),
            index,
            size: reg.size,
        })
    }

    /// Resolve `name[index]` to a classical bit id.
    pub fn cbit(&self, name: &str, index: u32) -> IrResult<CbitId> {
        let reg = self.creg(name).ok_or_else(|| IrError::UnknownRegister {
            name: name.to_string(),
        })?;
        reg.cbit(index).ok_or_else(|| IrError::IndexOutOfBounds {
            register: name.to_string(),
            index,
            size: reg.size,
        })
    }

    /// The register and in-register index a qubit belongs to.
    pub fn locate_qubit(&self, qubit: QubitId) -> Option<(&QuantumRegister, u32)> {
        self.qregs
            .iter()
            .find(|r| r.contains(qubit))
            .map(|r| (r, qubit.0 - r.offset))
    }

    /// The register and in-register index a classical bit belongs to.
    pub fn locate_cbit(&self, cbit: CbitId) -> Option<(&ClassicalRegister, u32)> {
        self.cregs
            .iter()
            .find(|r| r.contains(cbit))
            .map(|r| (r, cbit.0 - r.offset))
    }

    /// Append an event to the schedule.
    pub fn append(&mut self, event: Event) {
        self.schedule.push(event);
    }

    /// The circuit's event schedule.
    pub fn schedule(&self) -> &LinearSchedule {
        &self.schedule
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::GateOp;

    #[test]
    fn test_register_allocation_is_contiguous() {
        let mut circuit = Circuit::new("alloc");
        circuit.add_qreg("q", 3).unwrap();
        circuit.add_qreg("anc", 2).unwrap();
        circuit.add_creg("c", 3).unwrap();

        assert_eq!(circuit.num_qubits(), 5);
        assert_eq!(circuit.num_cbits(), 3);
        assert_eq!(circuit.qubit("q", 2).unwrap(), QubitId(2));
        assert_eq!(circuit.qubit("anc", 0).unwrap(), QubitId(3));
        assert_eq!(circuit.cbit("c", 1).unwrap(), CbitId(1));
    }

    #[test]
    fn test_duplicate_register_rejected() {
        let mut circuit = Circuit::new("dup");
        circuit.add_qreg("q", 1).unwrap();
        assert!(matches!(
            circuit.add_qreg("q", 2),
            Err(IrError::DuplicateRegister { .. })
        ));
        // Quantum and classical registers share one namespace.
        assert!(matches!(
            circuit.add_creg("q", 2),
            Err(IrError::DuplicateRegister { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds_index() {
        let mut circuit = Circuit::new("oob");
        circuit.add_qreg("q", 2).unwrap();
        assert!(matches!(
            circuit.qubit("q", 2),
            Err(IrError::IndexOutOfBounds { .. })
        ));
        assert!(matches!(
            circuit.qubit("nope", 0),
            Err(IrError::UnknownRegister { .. })
        ));
    }

    #[test]
    fn test_locate_qubit() {
        let mut circuit = Circuit::new("locate");
        circuit.add_qreg("q", 2).unwrap();
        circuit.add_qreg("anc", 1).unwrap();
        let (reg, idx) = circuit.locate_qubit(QubitId(2)).unwrap();
        assert_eq!(reg.name, "anc");
        assert_eq!(idx, 0);
        assert!(circuit.locate_qubit(QubitId(3)).is_none());
    }

    #[test]
    fn test_schedule_preserves_append_order() {
        let mut circuit = Circuit::new("order");
        circuit.add_qreg("q", 2).unwrap();
        circuit.append(Event::gate(GateOp::named("h"), [QubitId(0)]));
        circuit.append(Event::controlled(
            GateOp::named("x"),
            QubitId(0),
            [QubitId(1)],
        ));

        let labels: Vec<_> = circuit.schedule().iter().map(Event::label).collect();
        assert_eq!(labels, vec!["h", "cx"]);
    }
}
