//! Property tests over generated event schedules.

use grani_compile::{LogicalDataPrecedenceGraph, Router, resolve};
use grani_hal::{ConnectivityGraph, ConstantLatency, HardwareConfiguration, PerKindLatency};
use grani_ir::{CbitId, Circuit, Event, GateOp, LinearSchedule, QubitId};
use proptest::prelude::*;
use rustc_hash::FxHashSet;

const QUBITS: u32 = 5;

fn arb_event() -> impl Strategy<Value = Event> {
    let qubit = 0..QUBITS;
    prop_oneof![
        (prop_oneof!["h", "x", "z", "t"], qubit.clone())
            .prop_map(|(name, q)| Event::gate(GateOp::named(name), [QubitId(q)])),
        (qubit.clone(), qubit.clone())
            .prop_filter("control and target distinct", |(c, t)| c != t)
            .prop_map(|(c, t)| {
                Event::controlled(GateOp::named("x"), QubitId(c), [QubitId(t)])
            }),
        qubit.clone().prop_map(|q| {
            Event::measurement([QubitId(q)], [CbitId(q)]).expect("arity matches")
        }),
        qubit.clone().prop_map(|q| Event::reset([QubitId(q)])),
        (qubit.clone(), qubit)
            .prop_filter("barrier spans distinct qubits", |(a, b)| a != b)
            .prop_map(|(a, b)| Event::barrier([QubitId(a), QubitId(b)])),
    ]
}

fn arb_schedule() -> impl Strategy<Value = LinearSchedule> {
    prop::collection::vec(arb_event(), 0..40).prop_map(|events| events.into_iter().collect())
}

proptest! {
    #[test]
    fn ldpg_is_acyclic(schedule in arb_schedule()) {
        let ldpg = LogicalDataPrecedenceGraph::build(&schedule, &ConstantLatency(1));
        prop_assert!(!petgraph::algo::is_cyclic_directed(ldpg.graph()));
    }

    #[test]
    fn priority_strictly_decreases_along_edges(schedule in arb_schedule()) {
        let ldpg = LogicalDataPrecedenceGraph::build(&schedule, &PerKindLatency::default());
        for edge in ldpg.graph().edge_indices() {
            let (from, to) = ldpg.graph().edge_endpoints(edge).unwrap();
            prop_assert!(ldpg.node(from).priority > ldpg.node(to).priority);
        }
    }

    #[test]
    fn depth_never_exceeds_schedule_position(schedule in arb_schedule()) {
        let ldpg = LogicalDataPrecedenceGraph::build(&schedule, &ConstantLatency(1));
        for (position, &node) in ldpg.order().iter().enumerate() {
            prop_assert!(ldpg.node(node).depth as usize <= position + 1);
        }
    }

    #[test]
    fn sub_groups_are_qubit_disjoint(schedule in arb_schedule()) {
        let ldpg = LogicalDataPrecedenceGraph::build(&schedule, &ConstantLatency(1));
        for sub_group in resolve(&ldpg) {
            let mut seen = FxHashSet::default();
            for &node in &sub_group.nodes {
                for qubit in ldpg.node(node).event.qubits() {
                    prop_assert!(seen.insert(qubit.0));
                }
            }
        }
    }

    #[test]
    fn full_connectivity_needs_no_swaps(schedule in arb_schedule()) {
        let mut circuit = Circuit::new("generated");
        circuit.add_qreg("q", QUBITS).unwrap();
        circuit.add_creg("c", QUBITS).unwrap();
        for event in schedule.iter() {
            circuit.append(event.clone());
        }

        let config = HardwareConfiguration::new("full", ConnectivityGraph::full(QUBITS));
        let ldpg = LogicalDataPrecedenceGraph::build(circuit.schedule(), &ConstantLatency(1));
        let sub_groups = resolve(&ldpg);
        let pdpt = Router::new(&circuit, &ldpg, &config)
            .unwrap()
            .run(&sub_groups)
            .unwrap();

        // Everything is adjacent, so routing adds nothing and drops
        // nothing.
        let flattened = pdpt.flatten();
        prop_assert_eq!(flattened.len(), schedule.len());
    }
}
