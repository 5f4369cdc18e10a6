//! Event duration estimation.
//!
//! Schedulers weight dependency chains by how long each event takes on the
//! target device. The estimate is a coarse per-event duration in abstract
//! time units; calibration-level detail is out of scope.

use grani_ir::Event;

/// Estimates how long an event occupies its operands.
///
/// Implementations must return a duration of at least 1 so that every event
/// advances time; schedulers clamp to 1 defensively regardless.
pub trait LatencyModel {
    /// Duration of `event` in abstract time units.
    fn time_of(&self, event: &Event) -> u64;
}

/// Every event takes the same fixed duration.
#[derive(Debug, Clone, Copy)]
pub struct ConstantLatency(pub u64);

impl Default for ConstantLatency {
    fn default() -> Self {
        ConstantLatency(1)
    }
}

impl LatencyModel for ConstantLatency {
    fn time_of(&self, _event: &Event) -> u64 {
        self.0.max(1)
    }
}

/// Fixed duration per event kind.
///
/// Reflects the usual device profile: single-qubit gates are fast,
/// two-qubit interactions slower, measurement and reset slower still. A
/// conditioned event costs its guarded event.
#[derive(Debug, Clone, Copy)]
pub struct PerKindLatency {
    /// Uncontrolled gate applications.
    pub gate: u64,
    /// Controlled gates and other multi-qubit interactions.
    pub interaction: u64,
    /// Measurement into classical bits.
    pub measurement: u64,
    /// Reset to the ground state.
    pub reset: u64,
    /// Synchronization barriers.
    pub barrier: u64,
}

impl Default for PerKindLatency {
    fn default() -> Self {
        PerKindLatency {
            gate: 1,
            interaction: 2,
            measurement: 5,
            reset: 5,
            barrier: 1,
        }
    }
}

impl LatencyModel for PerKindLatency {
    fn time_of(&self, event: &Event) -> u64 {
        let duration = match event {
            Event::Gate { qubits, .. } if qubits.len() > 1 => self.interaction,
            Event::Gate { .. } => self.gate,
            Event::ControlledGate { .. } => self.interaction,
            Event::Measurement { .. } => self.measurement,
            Event::Reset { .. } => self.reset,
            Event::Barrier { .. } => self.barrier,
            Event::If { inner, .. } => self.time_of(inner),
        };
        duration.max(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grani_ir::{CbitId, GateOp, QubitId};

    #[test]
    fn test_constant_latency() {
        let model = ConstantLatency(3);
        let event = Event::gate(GateOp::named("h"), [QubitId(0)]);
        assert_eq!(model.time_of(&event), 3);
    }

    #[test]
    fn test_constant_latency_floor() {
        let model = ConstantLatency(0);
        let event = Event::gate(GateOp::named("h"), [QubitId(0)]);
        assert_eq!(model.time_of(&event), 1);
    }

    #[test]
    fn test_per_kind_latency() {
        let model = PerKindLatency::default();
        let single = Event::gate(GateOp::named("h"), [QubitId(0)]);
        let cx = Event::controlled(GateOp::named("x"), QubitId(0), [QubitId(1)]);
        let measure = Event::measurement([QubitId(0)], [CbitId(0)]).unwrap();
        assert_eq!(model.time_of(&single), 1);
        assert_eq!(model.time_of(&cx), 2);
        assert_eq!(model.time_of(&measure), 5);
    }

    #[test]
    fn test_conditional_costs_its_inner_event() {
        let model = PerKindLatency::default();
        let inner = Event::controlled(GateOp::named("x"), QubitId(0), [QubitId(1)]);
        let guarded = Event::conditional("c", [CbitId(0)], 1, inner.clone());
        assert_eq!(model.time_of(&guarded), model.time_of(&inner));
    }
}
