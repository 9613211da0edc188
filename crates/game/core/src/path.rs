//! A* pathfinding over the battle grid.
//!
//! Respects terrain costs and occupancy. Read-only: a path computed this
//! tick can be invalidated by a later move in the same tick, so the command
//! pipeline re-validates every step at execution time.

use std::cmp::Ordering;
use std::collections::{BinaryHeap, HashMap};

use crate::state::{Facing, GridState, Position};

/// Node in the A* open set.
///
/// Ordered as a min-heap on f-cost; ties resolve by insertion sequence so
/// exploration order — and therefore the returned path — is deterministic
/// regardless of heap internals.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathNode {
    position: Position,
    f_cost: u32,
    seq: u64,
}

impl Ord for PathNode {
    fn cmp(&self, other: &Self) -> Ordering {
        // Reverse order for min-heap; earlier insertion wins ties.
        other
            .f_cost
            .cmp(&self.f_cost)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for PathNode {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Finds a minimum-cost path from `start` to `goal` using A*.
///
/// Movement is 4-connected; the Manhattan heuristic is admissible for it.
/// Cells that are impassable or occupied cannot be entered — the goal
/// included — so a fully boxed-in goal yields `None`.
///
/// The returned path includes `start` as its first cell. `start == goal`
/// returns a single-cell path.
pub fn find_path(grid: &GridState, start: Position, goal: Position) -> Option<Vec<Position>> {
    if start == goal {
        return Some(vec![start]);
    }
    if !grid.contains(start) || !grid.contains(goal) {
        return None;
    }

    let mut open_set = BinaryHeap::new();
    let mut came_from: HashMap<Position, Position> = HashMap::new();
    let mut g_scores: HashMap<Position, u32> = HashMap::new();
    let mut seq: u64 = 0;

    g_scores.insert(start, 0);
    open_set.push(PathNode {
        position: start,
        f_cost: start.manhattan(goal),
        seq,
    });

    while let Some(current) = open_set.pop() {
        if current.position == goal {
            return Some(reconstruct_path(&came_from, current.position));
        }

        let current_g = *g_scores.get(&current.position).unwrap_or(&u32::MAX);

        for direction in Facing::all() {
            let (dx, dy) = direction.offset();
            let neighbor = Position::new(current.position.x + dx, current.position.y + dy);

            let Some(move_cost) = grid.move_cost(neighbor) else {
                continue;
            };
            if grid.occupant(neighbor).is_some() {
                continue;
            }

            let tentative_g = current_g + move_cost;
            let neighbor_g = *g_scores.get(&neighbor).unwrap_or(&u32::MAX);

            if tentative_g < neighbor_g {
                came_from.insert(neighbor, current.position);
                g_scores.insert(neighbor, tentative_g);

                seq += 1;
                open_set.push(PathNode {
                    position: neighbor,
                    f_cost: tentative_g + neighbor.manhattan(goal),
                    seq,
                });
            }
        }
    }

    None // No path found
}

/// Reconstruct the path by walking `came_from` back to the start.
fn reconstruct_path(came_from: &HashMap<Position, Position>, mut current: Position) -> Vec<Position> {
    let mut path = vec![current];
    while let Some(&prev) = came_from.get(&current) {
        path.push(prev);
        current = prev;
    }
    path.reverse();
    path
}

/// Total terrain cost of walking `path` (start cell free, entry costs after).
pub fn path_cost(grid: &GridState, path: &[Position]) -> u32 {
    path.iter()
        .skip(1)
        .filter_map(|&p| grid.move_cost(p))
        .sum()
}
