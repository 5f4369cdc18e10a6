//! Hardware routing: mapping logical qubits onto a device.
//!
//! Sub-groups arrive in scheduling order. For each one the router paints
//! the physical qubits of every hardware interaction with a per-event
//! merge colour, then searches for the shortest SWAP sequence that makes
//! all same-coloured qubits adjacent. Swaps permanently update the
//! logical→physical bijection; the group's events are then written into
//! the table on their current physical positions.

use grani_hal::{ConnectivityGraph, HardwareConfiguration};
use grani_ir::{Circuit, Event, QubitId};
use petgraph::graph::NodeIndex;
use rustc_hash::{FxHashMap, FxHashSet};
use std::hash::{Hash, Hasher};

use crate::error::{ScheduleError, ScheduleResult};
use crate::ldpg::LogicalDataPrecedenceGraph;
use crate::pdpt::PhysicalDataPrecedenceTable;
use crate::resolve::SubGroup;
use crate::search::{SearchState, astar};

/// Bijection between logical qubits and physical positions.
///
/// Initialized 1:1 by index; mutated only by explicit swap application
/// while routing.
#[derive(Debug, Clone)]
pub struct QubitMap {
    logical_to_physical: Vec<u32>,
    physical_to_logical: Vec<u32>,
}

impl QubitMap {
    /// The identity map over `num_physical` positions.
    pub fn identity(num_physical: u32) -> Self {
        let idents: Vec<u32> = (0..num_physical).collect();
        QubitMap {
            logical_to_physical: idents.clone(),
            physical_to_logical: idents,
        }
    }

    /// Physical position currently holding `logical`.
    pub fn physical_of(&self, logical: QubitId) -> u32 {
        self.logical_to_physical[logical.0 as usize]
    }

    /// Logical qubit currently held at `physical`.
    pub fn logical_at(&self, physical: u32) -> u32 {
        self.physical_to_logical[physical as usize]
    }

    /// Exchange the logical qubits held at two physical positions.
    pub fn swap_physical(&mut self, a: u32, b: u32) {
        let la = self.physical_to_logical[a as usize];
        let lb = self.physical_to_logical[b as usize];
        self.physical_to_logical[a as usize] = lb;
        self.physical_to_logical[b as usize] = la;
        self.logical_to_physical[la as usize] = b;
        self.logical_to_physical[lb as usize] = a;
    }
}

/// A* state: one merge-colour assignment over the physical qubits.
///
/// Identity is the colour vector alone; the connectivity reference is
/// shared context and excluded from equality and hashing.
#[derive(Debug, Clone)]
struct ColourState<'a> {
    graph: &'a ConnectivityGraph,
    /// Colour per physical qubit, 0 for unconstrained.
    colours: Vec<u32>,
}

impl PartialEq for ColourState<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.colours == other.colours
    }
}

impl Eq for ColourState<'_> {}

impl Hash for ColourState<'_> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.colours.hash(state);
    }
}

impl ColourState<'_> {
    /// Same-coloured pairs not yet adjacent on hardware.
    fn violations(&self) -> u64 {
        let mut by_colour: FxHashMap<u32, Vec<u32>> = FxHashMap::default();
        for (qubit, &colour) in self.colours.iter().enumerate() {
            if colour != 0 {
                by_colour.entry(colour).or_default().push(qubit as u32);
            }
        }
        let mut count = 0;
        for members in by_colour.values() {
            for (i, &a) in members.iter().enumerate() {
                for &b in &members[i + 1..] {
                    if !self
                        .graph
                        .is_adjacent(grani_hal::PhysicalQubit(a), grani_hal::PhysicalQubit(b))
                    {
                        count += 1;
                    }
                }
            }
        }
        count
    }
}

impl SearchState for ColourState<'_> {
    fn neighbors(&self) -> Vec<(Self, u64)> {
        let mut states = Vec::new();
        for channel in self.graph.channels() {
            let (a, b) = (channel.a.0 as usize, channel.b.0 as usize);
            if self.colours[a] == self.colours[b] {
                continue;
            }
            let mut next = self.clone();
            next.colours.swap(a, b);
            states.push((next, 1));
        }
        states
    }

    fn is_goal(&self) -> bool {
        self.violations() == 0
    }

    fn heuristic(&self) -> u64 {
        self.violations()
    }
}

/// Routes resolved sub-groups onto one device.
pub struct Router<'a> {
    ldpg: &'a LogicalDataPrecedenceGraph,
    connectivity: &'a ConnectivityGraph,
    map: QubitMap,
    pdpt: PhysicalDataPrecedenceTable,
    /// Column each placed precedence node landed in.
    node_columns: FxHashMap<NodeIndex, usize>,
    /// Column and qubit set of the most recent swap column, for sharing.
    last_swap_column: Option<(usize, FxHashSet<usize>)>,
}

impl<'a> Router<'a> {
    /// Set up routing of `circuit` onto `config`.
    ///
    /// Fails with the Capacity error kind when the circuit declares more
    /// logical qubits than the device has physical ones.
    pub fn new(
        circuit: &Circuit,
        ldpg: &'a LogicalDataPrecedenceGraph,
        config: &'a HardwareConfiguration,
    ) -> ScheduleResult<Self> {
        let logical = circuit.num_qubits();
        let physical = config.num_qubits();
        if logical > physical {
            return Err(ScheduleError::Capacity {
                logical,
                physical,
                hardware: config.name.clone(),
            });
        }
        Ok(Router {
            ldpg,
            connectivity: &config.connectivity,
            map: QubitMap::identity(physical),
            pdpt: PhysicalDataPrecedenceTable::new(physical),
            node_columns: FxHashMap::default(),
            last_swap_column: None,
        })
    }

    /// Route every sub-group in order and return the filled table.
    pub fn run(mut self, sub_groups: &[SubGroup]) -> ScheduleResult<PhysicalDataPrecedenceTable> {
        for sub_group in sub_groups {
            self.route_sub_group(sub_group)?;
        }
        Ok(self.pdpt)
    }

    /// The current logical→physical bijection.
    pub fn map(&self) -> &QubitMap {
        &self.map
    }

    fn route_sub_group(&mut self, sub_group: &SubGroup) -> ScheduleResult<()> {
        let start = self.colour_interactions(sub_group);
        if let Some(start) = start {
            let path = astar(start).ok_or(ScheduleError::Routing {
                priority: sub_group.priority,
            })?;
            tracing::debug!(
                priority = sub_group.priority,
                swaps = path.cost,
                "routed sub-group"
            );
            self.apply_swaps(&path.states);
        }
        self.commit(sub_group);
        Ok(())
    }

    /// Paint the physical qubits of each hardware interaction with a
    /// distinct merge colour. Returns `None` when the sub-group demands
    /// no adjacency.
    fn colour_interactions(&self, sub_group: &SubGroup) -> Option<ColourState<'a>> {
        let mut colours = vec![0u32; self.pdpt.num_rows()];
        let mut next_colour = 1u32;
        for &node in &sub_group.nodes {
            let Some(qubits) = self.ldpg.node(node).event.interaction_qubits() else {
                continue;
            };
            for qubit in qubits {
                colours[self.map.physical_of(qubit) as usize] = next_colour;
            }
            next_colour += 1;
        }
        if next_colour == 1 {
            return None;
        }
        Some(ColourState {
            graph: self.connectivity,
            colours,
        })
    }

    /// Materialize the swap sequence of an A* path: each consecutive
    /// state pair differs by one hardware-edge swap. Independent swaps
    /// share a column when the preceding swap column touches none of
    /// their qubits.
    fn apply_swaps(&mut self, states: &[ColourState<'_>]) {
        for pair in states.windows(2) {
            let changed: Vec<usize> = (0..pair[0].colours.len())
                .filter(|&q| pair[0].colours[q] != pair[1].colours[q])
                .collect();
            let [a, b] = changed[..] else {
                continue;
            };

            let needed = self.pdpt.row_len(a).max(self.pdpt.row_len(b));
            let column = match &mut self.last_swap_column {
                Some((column, qubits))
                    if *column >= needed && !qubits.contains(&a) && !qubits.contains(&b) =>
                {
                    qubits.insert(a);
                    qubits.insert(b);
                    *column
                }
                _ => {
                    let mut qubits = FxHashSet::default();
                    qubits.insert(a);
                    qubits.insert(b);
                    self.last_swap_column = Some((needed, qubits));
                    needed
                }
            };

            self.pdpt.place(
                Event::swap(QubitId(a as u32), QubitId(b as u32)),
                &[a, b],
                column,
                true,
            );
            self.map.swap_physical(a as u32, b as u32);
        }
    }

    /// Write the sub-group's events into the table on their physical
    /// positions, honouring both per-row order and cross-row dependency
    /// columns.
    fn commit(&mut self, sub_group: &SubGroup) {
        for &node in &sub_group.nodes {
            let physical = self
                .ldpg
                .node(node)
                .event
                .map_qubits(&|q| QubitId(self.map.physical_of(q)));
            let rows: Vec<usize> = physical.qubits().iter().map(|q| q.0 as usize).collect();

            let mut column = rows
                .iter()
                .map(|&row| self.pdpt.row_len(row))
                .max()
                .unwrap_or(0);
            for dep in self.ldpg.dependencies(node) {
                if let Some(&dep_column) = self.node_columns.get(&dep) {
                    column = column.max(dep_column + 1);
                }
            }

            self.pdpt.place(physical, &rows, column, false);
            self.node_columns.insert(node, column);
        }
        // A swap column never extends past committed events.
        self.last_swap_column = None;
    }
}
