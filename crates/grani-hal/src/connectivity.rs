//! Physical qubit connectivity.
//!
//! A [`ConnectivityGraph`] describes which pairs of physical qubits can
//! interact directly. It is loaded once per target device and read-only
//! during scheduling. Edges are undirected: a channel `(a, b)` permits
//! interactions in both directions.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// A position on the target device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PhysicalQubit(pub u32);

impl fmt::Display for PhysicalQubit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "p{}", self.0)
    }
}

impl From<u32> for PhysicalQubit {
    fn from(id: u32) -> Self {
        PhysicalQubit(id)
    }
}

/// A direct interaction channel between two physical qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    /// One endpoint.
    pub a: PhysicalQubit,
    /// The other endpoint.
    pub b: PhysicalQubit,
}

/// Undirected adjacency over physical qubits.
///
/// The adjacency sets are a derived cache: they are skipped during
/// serialization and must be restored with
/// [`rebuild_caches`](Self::rebuild_caches) after deserializing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConnectivityGraph {
    /// Number of physical qubits on the device.
    num_qubits: u32,
    /// Channel list, one entry per undirected edge.
    channels: Vec<Channel>,
    /// Adjacency cache rebuilt from the channel list.
    #[serde(skip)]
    adjacency: FxHashMap<u32, FxHashSet<u32>>,
}

impl ConnectivityGraph {
    /// An edgeless device of `num_qubits` positions.
    pub fn new(num_qubits: u32) -> Self {
        ConnectivityGraph {
            num_qubits,
            channels: Vec::new(),
            adjacency: FxHashMap::default(),
        }
    }

    /// Add an undirected channel; duplicates (either orientation) are
    /// ignored.
    pub fn add_channel(&mut self, a: PhysicalQubit, b: PhysicalQubit) {
        if a == b || self.is_adjacent(a, b) {
            return;
        }
        self.channels.push(Channel { a, b });
        self.adjacency.entry(a.0).or_default().insert(b.0);
        self.adjacency.entry(b.0).or_default().insert(a.0);
    }

    /// Rebuild the adjacency cache from the channel list.
    ///
    /// Required after deserialization; adjacency queries on a stale
    /// cache would report every pair disconnected.
    pub fn rebuild_caches(&mut self) {
        self.adjacency.clear();
        for channel in &self.channels {
            self.adjacency
                .entry(channel.a.0)
                .or_default()
                .insert(channel.b.0);
            self.adjacency
                .entry(channel.b.0)
                .or_default()
                .insert(channel.a.0);
        }
    }

    /// Whether `a` and `b` share a channel.
    pub fn is_adjacent(&self, a: PhysicalQubit, b: PhysicalQubit) -> bool {
        self.adjacency
            .get(&a.0)
            .is_some_and(|set| set.contains(&b.0))
    }

    /// Number of physical qubits.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// The channel list.
    pub fn channels(&self) -> &[Channel] {
        &self.channels
    }

    /// All physical qubits, in index order.
    pub fn qubits(&self) -> impl Iterator<Item = PhysicalQubit> + '_ {
        (0..self.num_qubits).map(PhysicalQubit)
    }

    /// Neighbours of `qubit`.
    pub fn neighbors(&self, qubit: PhysicalQubit) -> impl Iterator<Item = PhysicalQubit> + '_ {
        self.adjacency
            .get(&qubit.0)
            .into_iter()
            .flatten()
            .map(|&id| PhysicalQubit(id))
    }

    /// BFS hop distance between two positions, `None` when disconnected.
    pub fn distance(&self, from: PhysicalQubit, to: PhysicalQubit) -> Option<u32> {
        if from == to {
            return Some(0);
        }
        let mut visited = FxHashSet::default();
        let mut queue = VecDeque::new();
        visited.insert(from);
        queue.push_back((from, 0u32));

        while let Some((current, dist)) = queue.pop_front() {
            for neighbor in self.neighbors(current) {
                if neighbor == to {
                    return Some(dist + 1);
                }
                if visited.insert(neighbor) {
                    queue.push_back((neighbor, dist + 1));
                }
            }
        }
        None
    }

    /// A line: 0-1-2-...-(n-1).
    pub fn linear(n: u32) -> Self {
        let mut graph = Self::new(n);
        for i in 0..n.saturating_sub(1) {
            graph.add_channel(PhysicalQubit(i), PhysicalQubit(i + 1));
        }
        graph
    }

    /// A cycle: the line closed back from n-1 to 0.
    pub fn ring(n: u32) -> Self {
        let mut graph = Self::linear(n);
        if n > 2 {
            graph.add_channel(PhysicalQubit(n - 1), PhysicalQubit(0));
        }
        graph
    }

    /// A `rows` × `cols` lattice with horizontal and vertical channels.
    pub fn grid(rows: u32, cols: u32) -> Self {
        let mut graph = Self::new(rows * cols);
        for r in 0..rows {
            for c in 0..cols {
                let here = r * cols + c;
                if c + 1 < cols {
                    graph.add_channel(PhysicalQubit(here), PhysicalQubit(here + 1));
                }
                if r + 1 < rows {
                    graph.add_channel(PhysicalQubit(here), PhysicalQubit(here + cols));
                }
            }
        }
        graph
    }

    /// Every pair connected.
    pub fn full(n: u32) -> Self {
        let mut graph = Self::new(n);
        for i in 0..n {
            for j in (i + 1)..n {
                graph.add_channel(PhysicalQubit(i), PhysicalQubit(j));
            }
        }
        graph
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_linear_adjacency() {
        let graph = ConnectivityGraph::linear(3);
        assert!(graph.is_adjacent(PhysicalQubit(0), PhysicalQubit(1)));
        assert!(graph.is_adjacent(PhysicalQubit(2), PhysicalQubit(1)));
        assert!(!graph.is_adjacent(PhysicalQubit(0), PhysicalQubit(2)));
        assert_eq!(graph.channels().len(), 2);
    }

    #[test]
    fn test_ring_closes() {
        let graph = ConnectivityGraph::ring(4);
        assert!(graph.is_adjacent(PhysicalQubit(3), PhysicalQubit(0)));
        assert_eq!(graph.channels().len(), 4);
    }

    #[test]
    fn test_grid_shape() {
        let graph = ConnectivityGraph::grid(2, 3);
        assert_eq!(graph.num_qubits(), 6);
        assert!(graph.is_adjacent(PhysicalQubit(0), PhysicalQubit(1)));
        assert!(graph.is_adjacent(PhysicalQubit(0), PhysicalQubit(3)));
        assert!(!graph.is_adjacent(PhysicalQubit(0), PhysicalQubit(4)));
        // 2*(3-1) horizontal + 3*(2-1) vertical
        assert_eq!(graph.channels().len(), 7);
    }

    #[test]
    fn test_duplicate_channels_ignored() {
        let mut graph = ConnectivityGraph::new(2);
        graph.add_channel(PhysicalQubit(0), PhysicalQubit(1));
        graph.add_channel(PhysicalQubit(1), PhysicalQubit(0));
        graph.add_channel(PhysicalQubit(0), PhysicalQubit(0));
        assert_eq!(graph.channels().len(), 1);
    }

    #[test]
    fn test_distance() {
        let graph = ConnectivityGraph::linear(5);
        assert_eq!(graph.distance(PhysicalQubit(0), PhysicalQubit(4)), Some(4));
        assert_eq!(graph.distance(PhysicalQubit(2), PhysicalQubit(2)), Some(0));

        let split = ConnectivityGraph::new(2);
        assert_eq!(split.distance(PhysicalQubit(0), PhysicalQubit(1)), None);
    }

    #[test]
    fn test_serde_rebuilds_cache() {
        let graph = ConnectivityGraph::ring(3);
        let json = serde_json::to_string(&graph).unwrap();
        let mut back: ConnectivityGraph = serde_json::from_str(&json).unwrap();
        assert!(!back.is_adjacent(PhysicalQubit(0), PhysicalQubit(1)));
        back.rebuild_caches();
        assert!(back.is_adjacent(PhysicalQubit(0), PhysicalQubit(1)));
        assert!(back.is_adjacent(PhysicalQubit(2), PhysicalQubit(0)));
    }
}
