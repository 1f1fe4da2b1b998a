//! A generic A* search in the style of
//! [pathfinding's astar function](https://docs.rs/pathfinding/latest/pathfinding/directed/astar/index.html).
//!
//! Nodes are stored once in an insertion-ordered map which doubles as the score table and the
//! predecessor table, so a node that was never discovered simply has no entry (infinite score).
//! The frontier is a binary heap with lazy deletion. Among entries with equal estimated cost
//! the one that entered the frontier first is expanded first, matching a frontier kept as a
//! list and scanned front to back for the first strict minimum.
use fxhash::FxBuildHasher;
use indexmap::map::Entry::{Occupied, Vacant};
use indexmap::IndexMap;
use log::warn;
use num_traits::Zero;
use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::hash::Hash;

type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;

/// Parent index of the start node.
const NO_PARENT: usize = usize::MAX;

struct FrontierEntry<K> {
    estimated_cost: K,
    order: usize,
    index: usize,
}

impl<K: PartialEq> Eq for FrontierEntry<K> {}

impl<K: PartialEq> PartialEq for FrontierEntry<K> {
    fn eq(&self, other: &Self) -> bool {
        self.estimated_cost.eq(&other.estimated_cost) && self.order == other.order
    }
}

impl<K: Ord> PartialOrd for FrontierEntry<K> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<K: Ord> Ord for FrontierEntry<K> {
    fn cmp(&self, other: &Self) -> Ordering {
        // BinaryHeap is a max-heap: lowest estimate first, then earliest frontier arrival
        match other.estimated_cost.cmp(&self.estimated_cost) {
            Ordering::Equal => other.order.cmp(&self.order),
            s => s,
        }
    }
}

/// Per-node search state: predecessor index, gScore, fScore and frontier bookkeeping.
struct NodeState<C> {
    parent: usize,
    cost: C,
    estimated_cost: C,
    order: usize,
    open: bool,
}

fn reverse_path<N, C>(nodes: &FxIndexMap<N, NodeState<C>>, goal: usize) -> Vec<N>
where
    N: Eq + Hash + Clone,
{
    let mut path: Vec<N> = std::iter::successors(Some(goal), |&i| {
        nodes
            .get_index(i)
            .map(|(_, state)| state.parent)
            .filter(|&p| p != NO_PARENT)
    })
    .filter_map(|i| nodes.get_index(i).map(|(node, _)| node.clone()))
    .collect();
    path.reverse();
    path
}

/// Searches from `start` until a node satisfying `success` is selected for expansion.
///
/// Returns the path from `start` to that node (both inclusive) along with its cost, or [None]
/// if the frontier runs dry. A node's scores are only replaced on strict improvement, and a
/// node that is improved after being finalized re-enters the frontier at the back.
pub fn astar<N, C, FN, IN, FH, FS>(
    start: &N,
    mut successors: FN,
    mut heuristic: FH,
    mut success: FS,
) -> Option<(Vec<N>, C)>
where
    N: Eq + Hash + Clone,
    C: Zero + Ord + Copy,
    FN: FnMut(&N) -> IN,
    IN: IntoIterator<Item = (N, C)>,
    FH: FnMut(&N) -> C,
    FS: FnMut(&N) -> bool,
{
    let start_estimate = heuristic(start);
    let mut frontier = BinaryHeap::new();
    frontier.push(FrontierEntry {
        estimated_cost: start_estimate,
        order: 0,
        index: 0,
    });
    let mut next_order = 1;
    let mut nodes: FxIndexMap<N, NodeState<C>> = FxIndexMap::default();
    nodes.insert(
        start.clone(),
        NodeState {
            parent: NO_PARENT,
            cost: Zero::zero(),
            estimated_cost: start_estimate,
            order: 0,
            open: true,
        },
    );
    while let Some(FrontierEntry {
        estimated_cost,
        order,
        index,
    }) = frontier.pop()
    {
        let (cost, successors) = {
            let Some((node, state)) = nodes.get_index(index) else {
                continue;
            };
            // Entries superseded by a better score, or whose node was already
            // finalized, are skipped here instead of being removed from the heap.
            if !state.open || state.order != order || state.estimated_cost != estimated_cost {
                continue;
            }
            if success(node) {
                let cost = state.cost;
                return Some((reverse_path(&nodes, index), cost));
            }
            (state.cost, successors(node))
        };
        if let Some((_, state)) = nodes.get_index_mut(index) {
            state.open = false;
        }
        for (successor, move_cost) in successors {
            let new_cost = cost + move_cost;
            let entry = match nodes.entry(successor) {
                Vacant(e) => {
                    let estimated_cost = new_cost + heuristic(e.key());
                    let n = e.index();
                    e.insert(NodeState {
                        parent: index,
                        cost: new_cost,
                        estimated_cost,
                        order: next_order,
                        open: true,
                    });
                    next_order += 1;
                    FrontierEntry {
                        estimated_cost,
                        order: next_order - 1,
                        index: n,
                    }
                }
                Occupied(mut e) => {
                    if e.get().cost <= new_cost {
                        continue;
                    }
                    let estimated_cost = new_cost + heuristic(e.key());
                    let n = e.index();
                    let state = e.get_mut();
                    state.parent = index;
                    state.cost = new_cost;
                    state.estimated_cost = estimated_cost;
                    if !state.open {
                        state.open = true;
                        state.order = next_order;
                        next_order += 1;
                    }
                    FrontierEntry {
                        estimated_cost,
                        order: state.order,
                        index: n,
                    }
                }
            };
            frontier.push(entry);
        }
    }
    warn!(
        "Frontier exhausted after discovering {} nodes without reaching the goal",
        nodes.len()
    );
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Nodes on a line, each connected to its neighbours with unit cost.
    fn line_successors(n: &i32) -> Vec<(i32, i32)> {
        vec![(n - 1, 1), (n + 1, 1)]
    }

    #[test]
    fn start_is_goal() {
        let (path, cost) = astar(&3, line_successors, |_| 0, |&n| n == 3).unwrap();
        assert_eq!(path, vec![3]);
        assert_eq!(cost, 0);
    }

    #[test]
    fn finds_path_on_line() {
        let (path, cost) =
            astar(&0, line_successors, |&n| (5 - n).abs(), |&n| n == 5).unwrap();
        assert_eq!(path, vec![0, 1, 2, 3, 4, 5]);
        assert_eq!(cost, 5);
    }

    #[test]
    fn exhausted_frontier_returns_none() {
        let successors = |&n: &i32| {
            if n < 3 {
                vec![(n + 1, 1)]
            } else {
                vec![]
            }
        };
        assert!(astar(&0, successors, |_| 0, |&n| n == 10).is_none());
    }

    /// A cheaper detour discovered later replaces the direct but expensive edge.
    #[test]
    fn strict_improvement_replaces_parent() {
        // 0 -> 2 costs 5, 0 -> 1 -> 2 costs 2
        let successors = |&n: &u32| match n {
            0 => vec![(2, 5u32), (1, 1)],
            1 => vec![(2, 1)],
            _ => vec![],
        };
        let (path, cost) = astar(&0u32, successors, |_| 0, |&n| n == 2).unwrap();
        assert_eq!(path, vec![0, 1, 2]);
        assert_eq!(cost, 2);
    }

    /// With equal estimates the node discovered first is expanded first.
    #[test]
    fn ties_favour_first_discovered() {
        // Both 1 and 2 reach the goal 3 at the same cost; 1 is listed first.
        let successors = |&n: &u8| match n {
            0 => vec![(1, 1u8), (2, 1)],
            1 | 2 => vec![(3, 1)],
            _ => vec![],
        };
        let (path, _) = astar(&0u8, successors, |_| 0, |&n| n == 3).unwrap();
        assert_eq!(path, vec![0, 1, 3]);

        let successors = |&n: &u8| match n {
            0 => vec![(2, 1u8), (1, 1)],
            1 | 2 => vec![(3, 1)],
            _ => vec![],
        };
        let (path, _) = astar(&0u8, successors, |_| 0, |&n| n == 3).unwrap();
        assert_eq!(path, vec![0, 2, 3]);
    }
}
