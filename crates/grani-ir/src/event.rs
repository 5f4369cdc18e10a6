//! Scheduled IR events and gate payloads.
//!
//! An [`Event`] is one entry of a circuit's linear schedule: a gate
//! application, a controlled gate, a measurement, a reset, a barrier, or a
//! classically conditioned wrapper around another event. Events are
//! immutable once emitted; scheduling passes build new schedules instead of
//! editing events in place.

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};
use crate::register::{CbitId, QubitId};

/// A gate operation payload: name, evaluated parameters, and (for the
/// built-in `U`) the synthesized single-qubit unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateOp {
    /// Operation name, lowercase (`h`, `x`, `rz`, `u`, `swap`, ...).
    pub name: String,
    /// Classical parameters, already evaluated to concrete values.
    pub params: Vec<f64>,
    /// Row-major 2x2 unitary, present only for synthesized `U` gates.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matrix: Option<[Complex64; 4]>,
}

impl GateOp {
    /// A parameterless named operation.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: vec![],
            matrix: None,
        }
    }

    /// A named operation with evaluated parameters.
    pub fn with_params(name: impl Into<String>, params: Vec<f64>) -> Self {
        Self {
            name: name.into(),
            params,
            matrix: None,
        }
    }

    /// The built-in `U(theta, phi, lambda)` gate with its 2x2 unitary
    /// synthesized from the three angles.
    pub fn unitary(theta: f64, phi: f64, lambda: f64) -> Self {
        let half = theta / 2.0;
        let (sin, cos) = (half.sin(), half.cos());
        let matrix = [
            Complex64::new(cos, 0.0),
            -Complex64::cis(lambda) * sin,
            Complex64::cis(phi) * sin,
            Complex64::cis(phi + lambda) * cos,
        ];
        Self {
            name: "u".into(),
            params: vec![theta, phi, lambda],
            matrix: Some(matrix),
        }
    }

    /// The symmetric two-qubit `swap` operation.
    pub fn swap() -> Self {
        Self::named("swap")
    }
}

impl fmt::Display for GateOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.params.is_empty() {
            write!(f, "{}", self.name)
        } else {
            let params: Vec<String> = self.params.iter().map(|p| format!("{p}")).collect();
            write!(f, "{}({})", self.name, params.join(","))
        }
    }
}

/// One scheduled operation in a circuit.
///
/// The quantum and classical dependency sets of an event are exposed by
/// [`Event::qubits`] and [`Event::cbits`]; the model is coarse-grained and
/// does not distinguish reads from writes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    /// A gate applied to one or more qubits.
    Gate {
        /// The operation payload.
        op: GateOp,
        /// Operand qubits.
        qubits: Vec<QubitId>,
    },
    /// A controlled gate: one control qubit, one or more targets.
    ControlledGate {
        /// The base operation applied to the targets.
        op: GateOp,
        /// Control qubit.
        control: QubitId,
        /// Target qubits.
        targets: Vec<QubitId>,
    },
    /// Measurement of qubits into classical bits, position by position.
    Measurement {
        /// Measured qubits.
        qubits: Vec<QubitId>,
        /// Destination bits, same length as `qubits`.
        cbits: Vec<CbitId>,
    },
    /// Reset of qubits to the ground state.
    Reset {
        /// Qubits to reset.
        qubits: Vec<QubitId>,
    },
    /// Synchronization barrier across qubits.
    Barrier {
        /// Qubits held at the barrier.
        qubits: Vec<QubitId>,
    },
    /// Classically conditioned event: executes `inner` when the named
    /// classical register equals `value`.
    If {
        /// Name of the condition register, for diagnostics.
        register: String,
        /// The bits of the condition register.
        cbits: Vec<CbitId>,
        /// Literal the register is compared against.
        value: u64,
        /// The guarded event.
        inner: Box<Event>,
    },
}

impl Event {
    /// Create a gate event.
    pub fn gate(op: GateOp, qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Event::Gate {
            op,
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a controlled-gate event.
    pub fn controlled(
        op: GateOp,
        control: QubitId,
        targets: impl IntoIterator<Item = QubitId>,
    ) -> Self {
        Event::ControlledGate {
            op,
            control,
            targets: targets.into_iter().collect(),
        }
    }

    /// Create a measurement event.
    ///
    /// Returns an error when the qubit and bit counts differ.
    pub fn measurement(
        qubits: impl IntoIterator<Item = QubitId>,
        cbits: impl IntoIterator<Item = CbitId>,
    ) -> IrResult<Self> {
        let qubits: Vec<_> = qubits.into_iter().collect();
        let cbits: Vec<_> = cbits.into_iter().collect();
        if qubits.len() != cbits.len() {
            return Err(IrError::MeasureArityMismatch {
                qubits: qubits.len(),
                cbits: cbits.len(),
            });
        }
        Ok(Event::Measurement { qubits, cbits })
    }

    /// Create a reset event.
    pub fn reset(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Event::Reset {
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Create a barrier event.
    pub fn barrier(qubits: impl IntoIterator<Item = QubitId>) -> Self {
        Event::Barrier {
            qubits: qubits.into_iter().collect(),
        }
    }

    /// Wrap `inner` in a classical condition on `register == value`.
    pub fn conditional(
        register: impl Into<String>,
        cbits: impl IntoIterator<Item = CbitId>,
        value: u64,
        inner: Event,
    ) -> Self {
        Event::If {
            register: register.into(),
            cbits: cbits.into_iter().collect(),
            value,
            inner: Box::new(inner),
        }
    }

    /// A SWAP event between two qubits, as inserted by routing.
    pub fn swap(a: QubitId, b: QubitId) -> Self {
        Event::gate(GateOp::swap(), [a, b])
    }

    /// All qubits this event touches, in operand order.
    pub fn qubits(&self) -> Vec<QubitId> {
        match self {
            Event::Gate { qubits, .. }
            | Event::Measurement { qubits, .. }
            | Event::Reset { qubits }
            | Event::Barrier { qubits } => qubits.clone(),
            Event::ControlledGate {
                control, targets, ..
            } => {
                let mut qubits = vec![*control];
                qubits.extend_from_slice(targets);
                qubits
            }
            Event::If { inner, .. } => inner.qubits(),
        }
    }

    /// All classical bits this event touches.
    pub fn cbits(&self) -> Vec<CbitId> {
        match self {
            Event::Measurement { cbits, .. } => cbits.clone(),
            Event::If { cbits, inner, .. } => {
                let mut all = cbits.clone();
                all.extend(inner.cbits());
                all
            }
            _ => vec![],
        }
    }

    /// Qubits that must be mutually adjacent on hardware for this event,
    /// or `None` when the event imposes no adjacency constraint.
    ///
    /// Controlled gates and multi-qubit gate applications are hardware
    /// interactions; barriers, measurements, and resets are not.
    pub fn interaction_qubits(&self) -> Option<Vec<QubitId>> {
        match self {
            Event::ControlledGate { .. } => Some(self.qubits()),
            Event::Gate { qubits, .. } if qubits.len() > 1 => Some(qubits.clone()),
            Event::If { inner, .. } => inner.interaction_qubits(),
            _ => None,
        }
    }

    /// Whether this event is (or wraps) a hardware interaction.
    pub fn is_interaction(&self) -> bool {
        self.interaction_qubits().is_some()
    }

    /// A copy of this event with every qubit id rewritten through `f`.
    pub fn map_qubits(&self, f: &dyn Fn(QubitId) -> QubitId) -> Event {
        match self {
            Event::Gate { op, qubits } => Event::Gate {
                op: op.clone(),
                qubits: qubits.iter().map(|q| f(*q)).collect(),
            },
            Event::ControlledGate {
                op,
                control,
                targets,
            } => Event::ControlledGate {
                op: op.clone(),
                control: f(*control),
                targets: targets.iter().map(|q| f(*q)).collect(),
            },
            Event::Measurement { qubits, cbits } => Event::Measurement {
                qubits: qubits.iter().map(|q| f(*q)).collect(),
                cbits: cbits.clone(),
            },
            Event::Reset { qubits } => Event::Reset {
                qubits: qubits.iter().map(|q| f(*q)).collect(),
            },
            Event::Barrier { qubits } => Event::Barrier {
                qubits: qubits.iter().map(|q| f(*q)).collect(),
            },
            Event::If {
                register,
                cbits,
                value,
                inner,
            } => Event::If {
                register: register.clone(),
                cbits: cbits.clone(),
                value: *value,
                inner: Box::new(inner.map_qubits(f)),
            },
        }
    }

    /// Short name for diagnostics (`h`, `cx`, `measure`, `if[...]`, ...).
    pub fn label(&self) -> String {
        match self {
            Event::Gate { op, .. } => op.name.clone(),
            Event::ControlledGate { op, .. } => format!("c{}", op.name),
            Event::Measurement { .. } => "measure".into(),
            Event::Reset { .. } => "reset".into(),
            Event::Barrier { .. } => "barrier".into(),
            Event::If { inner, .. } => format!("if[{}]", inner.label()),
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn join<T: fmt::Display>(items: &[T]) -> String {
            items
                .iter()
                .map(|q| format!("{q}"))
                .collect::<Vec<_>>()
                .join(" ")
        }
        match self {
            Event::Gate { op, qubits } => write!(f, "{op} {}", join(qubits)),
            Event::ControlledGate {
                op,
                control,
                targets,
            } => write!(f, "c{op} {control} {}", join(targets)),
            Event::Measurement { qubits, cbits } => {
                write!(f, "measure {} -> {}", join(qubits), join(cbits))
            }
            Event::Reset { qubits } => write!(f, "reset {}", join(qubits)),
            Event::Barrier { qubits } => write!(f, "barrier {}", join(qubits)),
            Event::If {
                register,
                value,
                inner,
                ..
            } => write!(f, "if ({register} == {value}) {inner}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unitary_synthesis() {
        // U(0, 0, 0) is the identity.
        let op = GateOp::unitary(0.0, 0.0, 0.0);
        let m = op.matrix.unwrap();
        assert!((m[0] - Complex64::new(1.0, 0.0)).norm() < 1e-12);
        assert!(m[1].norm() < 1e-12);
        assert!(m[2].norm() < 1e-12);
        assert!((m[3] - Complex64::new(1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_unitary_is_unitary() {
        let op = GateOp::unitary(1.2, 0.4, -0.7);
        let m = op.matrix.unwrap();
        // Columns are orthonormal.
        let n0 = m[0].norm_sqr() + m[2].norm_sqr();
        let n1 = m[1].norm_sqr() + m[3].norm_sqr();
        let dot = m[0].conj() * m[1] + m[2].conj() * m[3];
        assert!((n0 - 1.0).abs() < 1e-12);
        assert!((n1 - 1.0).abs() < 1e-12);
        assert!(dot.norm() < 1e-12);
    }

    #[test]
    fn test_event_deps() {
        let cx = Event::controlled(GateOp::named("x"), QubitId(0), [QubitId(1)]);
        assert_eq!(cx.qubits(), vec![QubitId(0), QubitId(1)]);
        assert!(cx.cbits().is_empty());
        assert!(cx.is_interaction());

        let m = Event::measurement([QubitId(2)], [CbitId(0)]).unwrap();
        assert_eq!(m.qubits(), vec![QubitId(2)]);
        assert_eq!(m.cbits(), vec![CbitId(0)]);
        assert!(!m.is_interaction());
    }

    #[test]
    fn test_measurement_arity_checked() {
        let err = Event::measurement([QubitId(0), QubitId(1)], [CbitId(0)]);
        assert!(err.is_err());
    }

    #[test]
    fn test_conditional_deps_include_condition_bits() {
        let x = Event::gate(GateOp::named("x"), [QubitId(1)]);
        let cond = Event::conditional("c", [CbitId(0), CbitId(1)], 3, x);
        assert_eq!(cond.qubits(), vec![QubitId(1)]);
        assert_eq!(cond.cbits(), vec![CbitId(0), CbitId(1)]);
        assert!(!cond.is_interaction());
    }

    #[test]
    fn test_map_qubits() {
        let cx = Event::controlled(GateOp::named("x"), QubitId(0), [QubitId(2)]);
        let mapped = cx.map_qubits(&|q| QubitId(q.0 + 10));
        assert_eq!(mapped.qubits(), vec![QubitId(10), QubitId(12)]);
    }

    #[test]
    fn test_display() {
        let h = Event::gate(GateOp::named("h"), [QubitId(0)]);
        assert_eq!(format!("{h}"), "h q0");
        let cx = Event::controlled(GateOp::named("x"), QubitId(0), [QubitId(1)]);
        assert_eq!(format!("{cx}"), "cx q0 q1");
        let m = Event::measurement([QubitId(0)], [CbitId(0)]).unwrap();
        assert_eq!(format!("{m}"), "measure q0 -> c0");
        let rz = Event::gate(GateOp::with_params("rz", vec![0.5]), [QubitId(1)]);
        assert_eq!(format!("{rz}"), "rz(0.5) q1");
    }
}
