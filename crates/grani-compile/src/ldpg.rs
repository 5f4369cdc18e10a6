//! Logical data precedence graph.
//!
//! The LDPG replaces a circuit's program order with its actual data
//! dependencies: an edge A→B says B reads or writes something A last
//! wrote, so B cannot start before A finishes. Events at equal priority
//! are mutually independent and become candidates for the same time step.

use grani_hal::LatencyModel;
use grani_ir::{Event, LinearSchedule};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::Direction;
use rustc_hash::FxHashMap;

/// One scheduled event annotated with its precedence metrics.
#[derive(Debug, Clone)]
pub struct DataPrecedenceNode {
    /// The wrapped IR event.
    pub event: Event,
    /// Longest dependency chain from any root to this node, roots are 1.
    pub depth: u64,
    /// Estimated duration in abstract time units, at least 1.
    pub latency: u64,
    /// Latency-weighted longest path from this node to any terminal node.
    /// Higher priority means more work remains downstream.
    pub priority: u64,
    /// Number of distinct direct dependencies.
    pub dependency_count: usize,
}

/// Directed graph of [`DataPrecedenceNode`]s over one linear schedule.
///
/// Edges run dependency → dependent and only ever point from an earlier
/// schedule position to a later one, so the graph is acyclic by
/// construction.
#[derive(Debug, Clone)]
pub struct LogicalDataPrecedenceGraph {
    graph: DiGraph<DataPrecedenceNode, ()>,
    /// Node indices in original schedule order.
    order: Vec<NodeIndex>,
}

impl LogicalDataPrecedenceGraph {
    /// Build the precedence graph for `schedule`, weighting nodes with
    /// `latency`.
    pub fn build(schedule: &LinearSchedule, latency: &dyn LatencyModel) -> Self {
        let mut graph: DiGraph<DataPrecedenceNode, ()> = DiGraph::new();
        let mut order = Vec::with_capacity(schedule.len());

        // Last event to touch each qubit / classical bit, in schedule
        // order. The dependency model is coarse: any touch counts as a
        // write.
        let mut last_writer_q: FxHashMap<u32, NodeIndex> = FxHashMap::default();
        let mut last_writer_c: FxHashMap<u32, NodeIndex> = FxHashMap::default();

        for event in schedule.iter() {
            let mut deps: Vec<NodeIndex> = Vec::new();
            for qubit in event.qubits() {
                if let Some(&writer) = last_writer_q.get(&qubit.0) {
                    if !deps.contains(&writer) {
                        deps.push(writer);
                    }
                }
            }
            for cbit in event.cbits() {
                if let Some(&writer) = last_writer_c.get(&cbit.0) {
                    if !deps.contains(&writer) {
                        deps.push(writer);
                    }
                }
            }

            let depth = 1 + deps
                .iter()
                .map(|&dep| graph[dep].depth)
                .max()
                .unwrap_or(0);
            let node = graph.add_node(DataPrecedenceNode {
                event: event.clone(),
                depth,
                latency: latency.time_of(event).max(1),
                priority: 0,
                dependency_count: deps.len(),
            });
            for dep in deps {
                graph.add_edge(dep, node, ());
            }

            for qubit in graph[node].event.qubits() {
                last_writer_q.insert(qubit.0, node);
            }
            for cbit in graph[node].event.cbits() {
                last_writer_c.insert(cbit.0, node);
            }
            order.push(node);
        }

        // One reverse sweep suffices: every successor appears later in
        // the schedule, so its priority is already final.
        for &node in order.iter().rev() {
            let downstream = graph
                .neighbors_directed(node, Direction::Outgoing)
                .map(|succ| graph[succ].priority)
                .max()
                .unwrap_or(0);
            graph[node].priority = graph[node].latency + downstream;
        }

        tracing::debug!(
            nodes = order.len(),
            edges = graph.edge_count(),
            "built precedence graph"
        );
        LogicalDataPrecedenceGraph { graph, order }
    }

    /// The underlying petgraph storage.
    pub fn graph(&self) -> &DiGraph<DataPrecedenceNode, ()> {
        &self.graph
    }

    /// Node indices in original schedule order.
    pub fn order(&self) -> &[NodeIndex] {
        &self.order
    }

    /// The node payload at `index`.
    pub fn node(&self, index: NodeIndex) -> &DataPrecedenceNode {
        &self.graph[index]
    }

    /// Number of events.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the graph holds no events.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Direct dependencies of `index`.
    pub fn dependencies(&self, index: NodeIndex) -> impl Iterator<Item = NodeIndex> + '_ {
        self.graph.neighbors_directed(index, Direction::Incoming)
    }

    /// Nodes grouped by priority, groups in descending priority order,
    /// members in schedule order.
    pub fn priority_groups(&self) -> Vec<(u64, Vec<NodeIndex>)> {
        let mut groups: Vec<(u64, Vec<NodeIndex>)> = Vec::new();
        let mut by_priority: FxHashMap<u64, usize> = FxHashMap::default();
        for &node in &self.order {
            let priority = self.graph[node].priority;
            match by_priority.get(&priority) {
                Some(&slot) => groups[slot].1.push(node),
                None => {
                    by_priority.insert(priority, groups.len());
                    groups.push((priority, vec![node]));
                }
            }
        }
        groups.sort_by(|a, b| b.0.cmp(&a.0));
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use grani_hal::{ConstantLatency, PerKindLatency};
    use grani_ir::{CbitId, GateOp, QubitId};
    use petgraph::algo::is_cyclic_directed;

    fn bell_schedule() -> LinearSchedule {
        [
            Event::gate(GateOp::named("h"), [QubitId(0)]),
            Event::controlled(GateOp::named("x"), QubitId(0), [QubitId(1)]),
            Event::measurement([QubitId(0)], [CbitId(0)]).unwrap(),
            Event::measurement([QubitId(1)], [CbitId(1)]).unwrap(),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_bell_edges() {
        let ldpg = LogicalDataPrecedenceGraph::build(&bell_schedule(), &ConstantLatency(1));
        assert_eq!(ldpg.len(), 4);
        let order = ldpg.order();

        // h → cx, cx → both measurements.
        assert!(ldpg.graph().contains_edge(order[0], order[1]));
        assert!(ldpg.graph().contains_edge(order[1], order[2]));
        assert!(ldpg.graph().contains_edge(order[1], order[3]));
        assert!(!ldpg.graph().contains_edge(order[2], order[3]));
    }

    #[test]
    fn test_depth_counts_longest_chain() {
        let ldpg = LogicalDataPrecedenceGraph::build(&bell_schedule(), &ConstantLatency(1));
        let order = ldpg.order();
        assert_eq!(ldpg.node(order[0]).depth, 1);
        assert_eq!(ldpg.node(order[1]).depth, 2);
        assert_eq!(ldpg.node(order[2]).depth, 3);
        assert_eq!(ldpg.node(order[3]).depth, 3);
    }

    #[test]
    fn test_priority_decreases_along_edges() {
        let ldpg = LogicalDataPrecedenceGraph::build(&bell_schedule(), &PerKindLatency::default());
        for edge in ldpg.graph().edge_indices() {
            let (a, b) = ldpg.graph().edge_endpoints(edge).unwrap();
            assert!(ldpg.node(a).priority > ldpg.node(b).priority);
        }
    }

    #[test]
    fn test_acyclic() {
        let ldpg = LogicalDataPrecedenceGraph::build(&bell_schedule(), &ConstantLatency(1));
        assert!(!is_cyclic_directed(ldpg.graph()));
    }

    #[test]
    fn test_dependency_dedup() {
        // cx touches q0 twice through the same dependency; the edge must
        // appear once.
        let schedule: LinearSchedule = [
            Event::barrier([QubitId(0), QubitId(1)]),
            Event::controlled(GateOp::named("x"), QubitId(0), [QubitId(1)]),
        ]
        .into_iter()
        .collect();
        let ldpg = LogicalDataPrecedenceGraph::build(&schedule, &ConstantLatency(1));
        let order = ldpg.order();
        assert_eq!(ldpg.node(order[1]).dependency_count, 1);
        assert_eq!(ldpg.graph().edge_count(), 1);
    }

    #[test]
    fn test_classical_dependency() {
        // A conditioned gate depends on the measurement that wrote its
        // condition bit, though they share no qubit.
        let schedule: LinearSchedule = [
            Event::measurement([QubitId(0)], [CbitId(0)]).unwrap(),
            Event::conditional(
                "c",
                [CbitId(0)],
                1,
                Event::gate(GateOp::named("x"), [QubitId(1)]),
            ),
        ]
        .into_iter()
        .collect();
        let ldpg = LogicalDataPrecedenceGraph::build(&schedule, &ConstantLatency(1));
        let order = ldpg.order();
        assert!(ldpg.graph().contains_edge(order[0], order[1]));
    }

    #[test]
    fn test_priority_groups_descending() {
        let ldpg = LogicalDataPrecedenceGraph::build(&bell_schedule(), &ConstantLatency(1));
        let groups = ldpg.priority_groups();
        for pair in groups.windows(2) {
            assert!(pair[0].0 > pair[1].0);
        }
        // The two measurements are independent and share a priority.
        assert_eq!(groups.last().unwrap().1.len(), 2);
    }

    #[test]
    fn test_empty_schedule() {
        let ldpg = LogicalDataPrecedenceGraph::build(&LinearSchedule::new(), &ConstantLatency(1));
        assert!(ldpg.is_empty());
        assert!(ldpg.priority_groups().is_empty());
    }
}
