//! Generic A* search over an explicit state type.
//!
//! The router's swap search is phrased as a shortest path over colouring
//! states, but nothing here knows about qubits: any type implementing
//! [`SearchState`] can be searched. Determinism matters more than raw
//! speed, so ties on f-score break by insertion order (FIFO), never by
//! state hash order.

use rustc_hash::FxHashMap;
use std::cmp::Reverse;
use std::collections::BinaryHeap;
use std::hash::Hash;

/// A node of an implicitly defined search space.
pub trait SearchState: Clone + Eq + Hash {
    /// Successor states with the cost of reaching each.
    fn neighbors(&self) -> Vec<(Self, u64)>;

    /// Whether this state satisfies the goal.
    fn is_goal(&self) -> bool;

    /// Estimated remaining cost to a goal. Best-effort; an inadmissible
    /// estimate trades optimality for speed, which callers accept.
    fn heuristic(&self) -> u64;
}

/// A solved search: the state sequence from start to goal, inclusive, and
/// the summed edge cost.
#[derive(Debug, Clone)]
pub struct SearchPath<S> {
    /// Visited states, `path[0]` is the start and the last is a goal.
    pub states: Vec<S>,
    /// Total cost along the path.
    pub cost: u64,
}

/// One open-set entry; ordered by f-score, then insertion order.
#[derive(Debug, PartialEq, Eq)]
struct OpenEntry {
    f_score: u64,
    insertion: u64,
    state_idx: usize,
}

impl Ord for OpenEntry {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.f_score
            .cmp(&other.f_score)
            .then(self.insertion.cmp(&other.insertion))
    }
}

impl PartialOrd for OpenEntry {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// A* from `start` to the nearest goal state.
///
/// Returns `None` when the reachable space is exhausted without meeting
/// the goal. Expansion count is traced for diagnosing slow searches.
pub fn astar<S: SearchState>(start: S) -> Option<SearchPath<S>> {
    if start.is_goal() {
        return Some(SearchPath {
            states: vec![start],
            cost: 0,
        });
    }

    // States are interned to indices so the heap and maps stay cheap.
    let mut states: Vec<S> = vec![start.clone()];
    let mut index_of: FxHashMap<S, usize> = FxHashMap::default();
    index_of.insert(start.clone(), 0);

    let mut g_score: FxHashMap<usize, u64> = FxHashMap::default();
    g_score.insert(0, 0);
    let mut came_from: FxHashMap<usize, usize> = FxHashMap::default();

    let mut open = BinaryHeap::new();
    let mut insertion: u64 = 0;
    open.push(Reverse(OpenEntry {
        f_score: start.heuristic(),
        insertion,
        state_idx: 0,
    }));

    let mut expanded: u64 = 0;
    while let Some(Reverse(entry)) = open.pop() {
        let current = entry.state_idx;
        let current_g = g_score[&current];

        // A popped entry may be stale if a cheaper route was found after
        // it was pushed.
        if entry.f_score > current_g + states[current].heuristic() {
            continue;
        }

        if states[current].is_goal() {
            tracing::trace!(expanded, cost = current_g, "search reached goal");
            return Some(reconstruct(&states, &came_from, current, current_g));
        }
        expanded += 1;

        for (neighbor, step_cost) in states[current].neighbors() {
            let tentative = current_g + step_cost;
            let idx = match index_of.get(&neighbor) {
                Some(&idx) => idx,
                None => {
                    let idx = states.len();
                    states.push(neighbor.clone());
                    index_of.insert(neighbor, idx);
                    idx
                }
            };
            if g_score.get(&idx).is_none_or(|&g| tentative < g) {
                g_score.insert(idx, tentative);
                came_from.insert(idx, current);
                insertion += 1;
                open.push(Reverse(OpenEntry {
                    f_score: tentative + states[idx].heuristic(),
                    insertion,
                    state_idx: idx,
                }));
            }
        }
    }

    tracing::trace!(expanded, "search exhausted without reaching goal");
    None
}

fn reconstruct<S: SearchState>(
    states: &[S],
    came_from: &FxHashMap<usize, usize>,
    goal: usize,
    cost: u64,
) -> SearchPath<S> {
    let mut path = vec![goal];
    let mut current = goal;
    while let Some(&parent) = came_from.get(&current) {
        path.push(parent);
        current = parent;
    }
    path.reverse();
    SearchPath {
        states: path.into_iter().map(|idx| states[idx].clone()).collect(),
        cost,
    }
}
