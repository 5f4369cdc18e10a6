//! Ambiguity resolution over equal-priority groups.
//!
//! The priority pass leaves groups of events that could all start at the
//! same time. When two such events touch a common logical qubit only one
//! of them actually can; the resolver splits the group into sub-groups of
//! mutually disjoint events via greedy edge colouring of an interaction
//! graph. Events sharing a colour form one sub-group.

use grani_ir::QubitId;
use petgraph::graph::{NodeIndex, UnGraph};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::ldpg::LogicalDataPrecedenceGraph;

/// Edge payload of an [`InteractionGraph`]: which precedence node the edge
/// came from and, once resolved, its colour.
#[derive(Debug, Clone)]
pub struct InteractionEdge {
    /// The originating node of the precedence graph.
    pub node: NodeIndex,
    /// Assigned colour, positive once colouring has run.
    pub colour: Option<u32>,
}

/// Qubit-interaction graph of one equal-priority group.
///
/// Vertices are the logical qubits the group touches; each event
/// contributes an edge control→target per target, or a self-loop for a
/// single-qubit event. Colouring assigns every event the smallest positive
/// colour unused at any vertex it touches; an event with several edges
/// gets one colour for all of them.
#[derive(Debug)]
pub struct InteractionGraph {
    graph: UnGraph<QubitId, InteractionEdge>,
    vertex_of: FxHashMap<u32, NodeIndex>,
    /// Group members in schedule order with their touched qubits.
    members: Vec<(NodeIndex, Vec<QubitId>)>,
}

impl InteractionGraph {
    /// Build the interaction graph for the given precedence nodes.
    pub fn build(ldpg: &LogicalDataPrecedenceGraph, group: &[NodeIndex]) -> Self {
        let mut graph = UnGraph::new_undirected();
        let mut vertex_of: FxHashMap<u32, NodeIndex> = FxHashMap::default();
        let mut members = Vec::with_capacity(group.len());

        for &node in group {
            let qubits = ldpg.node(node).event.qubits();
            let vertices: Vec<NodeIndex> = qubits
                .iter()
                .map(|q| {
                    *vertex_of
                        .entry(q.0)
                        .or_insert_with(|| graph.add_node(*q))
                })
                .collect();
            match vertices.as_slice() {
                [] => {}
                [only] => {
                    graph.add_edge(*only, *only, InteractionEdge { node, colour: None });
                }
                [first, rest @ ..] => {
                    for target in rest {
                        graph.add_edge(
                            *first,
                            *target,
                            InteractionEdge { node, colour: None },
                        );
                    }
                }
            }
            members.push((node, qubits));
        }
        InteractionGraph {
            graph,
            vertex_of,
            members,
        }
    }

    /// Greedily colour every event, biased toward colour 1.
    ///
    /// Events are visited in schedule order; each receives the smallest
    /// positive colour not already used at any qubit it touches, and all
    /// its edges are painted with that colour atomically.
    pub fn colour(&mut self) -> FxHashMap<NodeIndex, u32> {
        let mut used_at: FxHashMap<u32, FxHashSet<u32>> = FxHashMap::default();
        let mut colour_of: FxHashMap<NodeIndex, u32> = FxHashMap::default();

        for (node, qubits) in &self.members {
            let mut colour = 1u32;
            loop {
                let taken = qubits
                    .iter()
                    .any(|q| used_at.get(&q.0).is_some_and(|set| set.contains(&colour)));
                if !taken {
                    break;
                }
                colour += 1;
            }
            for qubit in qubits {
                used_at.entry(qubit.0).or_default().insert(colour);
            }
            colour_of.insert(*node, colour);
        }

        for edge in self.graph.edge_weights_mut() {
            edge.colour = colour_of.get(&edge.node).copied();
        }
        colour_of
    }

    /// The vertex holding `qubit`, if the group touches it.
    pub fn vertex(&self, qubit: QubitId) -> Option<NodeIndex> {
        self.vertex_of.get(&qubit.0).copied()
    }

    /// The underlying petgraph storage.
    pub fn graph(&self) -> &UnGraph<QubitId, InteractionEdge> {
        &self.graph
    }
}

/// A resolved scheduling unit: events of one priority that share no
/// logical qubit.
#[derive(Debug, Clone)]
pub struct SubGroup {
    /// Priority inherited from the originating group.
    pub priority: u64,
    /// Colour the sub-group was carved out with; 1 for unambiguous groups.
    pub colour: u32,
    /// Member nodes in schedule order.
    pub nodes: Vec<NodeIndex>,
}

/// Split every equal-priority group of `ldpg` into qubit-disjoint
/// sub-groups, returned in scheduling order: priority descending, colour
/// ascending within one priority.
pub fn resolve(ldpg: &LogicalDataPrecedenceGraph) -> Vec<SubGroup> {
    let mut resolved = Vec::new();
    for (priority, group) in ldpg.priority_groups() {
        if !is_ambiguous(ldpg, &group) {
            resolved.push(SubGroup {
                priority,
                colour: 1,
                nodes: group,
            });
            continue;
        }

        let mut interactions = InteractionGraph::build(ldpg, &group);
        let colour_of = interactions.colour();
        let mut sub_groups: Vec<SubGroup> = Vec::new();
        for node in group {
            let colour = colour_of[&node];
            match sub_groups.iter_mut().find(|sg| sg.colour == colour) {
                Some(sub_group) => sub_group.nodes.push(node),
                None => sub_groups.push(SubGroup {
                    priority,
                    colour,
                    nodes: vec![node],
                }),
            }
        }
        sub_groups.sort_by_key(|sg| sg.colour);
        tracing::debug!(
            priority,
            sub_groups = sub_groups.len(),
            "resolved ambiguous group"
        );
        resolved.extend(sub_groups);
    }
    resolved
}

/// Whether two events of the group touch a common qubit. Classical-bit
/// overlap does not count; equal-priority events are already
/// dependency-independent.
fn is_ambiguous(ldpg: &LogicalDataPrecedenceGraph, group: &[NodeIndex]) -> bool {
    let mut seen: FxHashSet<u32> = FxHashSet::default();
    for &node in group {
        for qubit in ldpg.node(node).event.qubits() {
            if !seen.insert(qubit.0) {
                return true;
            }
        }
    }
    false
}
