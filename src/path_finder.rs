use grid_util::point::Point;
use log::{debug, info};

use crate::astar::astar;
use crate::error::{PathError, Result};
use crate::grid::Grid;
use crate::{manhattan_distance, STEP_COST};

/// Whether wall cells take part in the search.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum WallPolicy {
    /// Walls are never entered, including when the end itself is a wall. The start is the
    /// origin of the search and is expanded even if it is a wall.
    #[default]
    Block,
    /// Walls are inert markers and every in-bounds cell can be crossed.
    Ignore,
}

/// Finds shortest 4-connected, unit-cost paths on a [Grid] using A* with the
/// [Manhattan distance](https://en.wikipedia.org/wiki/Taxicab_geometry) as heuristic.
///
/// A [PathFinder] holds configuration only; every search builds its own frontier and score
/// tables, so one instance can serve any number of grids and callers.
#[derive(Clone, Debug)]
pub struct PathFinder {
    pub wall_policy: WallPolicy,
    /// Rejects goals on a different connected component before searching. Only applies with
    /// [WallPolicy::Block], a passable start and up-to-date grid components.
    pub use_components: bool,
}

impl Default for PathFinder {
    fn default() -> PathFinder {
        PathFinder::new()
    }
}

impl PathFinder {
    pub fn new() -> PathFinder {
        PathFinder {
            wall_policy: WallPolicy::Block,
            use_components: true,
        }
    }

    pub fn with_wall_policy(wall_policy: WallPolicy) -> PathFinder {
        PathFinder {
            wall_policy,
            ..PathFinder::new()
        }
    }

    /// Computes the shortest path from `start` to `end`, both inclusive, ordered from start to
    /// end. Returns an empty path if `end` cannot be reached and `[start]` if both are equal.
    ///
    /// Among equally short paths the result is deterministic: the frontier expands the lowest
    /// estimate first and, on ties, the cell that was discovered first, with neighbours
    /// discovered in up, down, left, right order.
    pub fn find_optimal_path(&self, grid: &Grid, start: Point, end: Point) -> Result<Vec<Point>> {
        grid.check_bounds(start)?;
        grid.check_bounds(end)?;
        debug!("Searching path from {} to {}", start, end);
        if self.skip_unreachable(grid, start, end) {
            info!("{} is not reachable from {}", end, start);
            return Ok(Vec::new());
        }
        let result = astar(
            &start,
            |point| self.successors(grid, point),
            |point| manhattan_distance(point, &end),
            |point| *point == end,
        );
        match result {
            Some((path, cost)) => {
                info!("Found path from {} to {} with {} moves", start, end, cost);
                Ok(path)
            }
            None => {
                info!("No path from {} to {}", start, end);
                Ok(Vec::new())
            }
        }
    }

    /// Computes the path between the cells marked as start and end on `grid`.
    pub fn find_marked_path(&self, grid: &Grid) -> Result<Vec<Point>> {
        let start = grid.start().ok_or(PathError::MissingEndpoint("start"))?;
        let end = grid.end().ok_or(PathError::MissingEndpoint("end"))?;
        self.find_optimal_path(grid, start, end)
    }

    /// Number of unit moves along `path`.
    pub fn path_cost(&self, path: &[Point]) -> i32 {
        path.len().saturating_sub(1) as i32 * STEP_COST
    }

    fn successors(&self, grid: &Grid, point: &Point) -> Vec<(Point, i32)> {
        match self.wall_policy {
            WallPolicy::Block => grid
                .passable_neighbours(*point)
                .map(|p| (p, STEP_COST))
                .collect(),
            WallPolicy::Ignore => grid.neighbours(*point).map(|p| (p, STEP_COST)).collect(),
        }
    }

    fn skip_unreachable(&self, grid: &Grid, start: Point, end: Point) -> bool {
        if self.wall_policy != WallPolicy::Block || start == end {
            return false;
        }
        if grid.is_wall(end) {
            return true;
        }
        if !self.use_components || grid.is_wall(start) {
            return false;
        }
        if grid.components_dirty() {
            debug!("Components are dirty, searching without reachability check");
            return false;
        }
        !grid.reachable(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(row: i32, col: i32) -> Point {
        Point::new(col, row)
    }

    /// Asserts that the case in which start and goal are equal is handled correctly.
    #[test]
    fn equal_start_goal() {
        for policy in [WallPolicy::Block, WallPolicy::Ignore] {
            let grid = Grid::new(1, 1).unwrap();
            let solver = PathFinder::with_wall_policy(policy);
            let start = Point::new(0, 0);
            let path = solver.find_optimal_path(&grid, start, start).unwrap();
            assert_eq!(path, vec![start]);
        }
    }

    /// Equal start and goal holds even when that cell is a wall.
    #[test]
    fn equal_start_goal_on_wall() {
        let grid: Grid = "#".parse().unwrap();
        let solver = PathFinder::new();
        let path = solver
            .find_optimal_path(&grid, Point::new(0, 0), Point::new(0, 0))
            .unwrap();
        assert_eq!(path.len(), 1);
    }

    /// Asserts that the optimal 4 step solution is found around a central wall.
    #[test]
    fn solve_simple_problem() {
        let grid: Grid = "...\n.#.\n...".parse().unwrap();
        let solver = PathFinder::new();
        let path = solver
            .find_optimal_path(&grid, p(0, 0), p(2, 2))
            .unwrap();
        assert_eq!(path, vec![p(0, 0), p(1, 0), p(2, 0), p(2, 1), p(2, 2)]);
        assert_eq!(solver.path_cost(&path), 4);
    }

    #[test]
    fn out_of_bounds_endpoints() {
        let grid = Grid::new(3, 3).unwrap();
        let solver = PathFinder::new();
        assert!(matches!(
            solver.find_optimal_path(&grid, p(0, 0), p(3, 0)),
            Err(PathError::OutOfBounds { .. })
        ));
        assert!(matches!(
            solver.find_optimal_path(&grid, p(0, -1), p(2, 2)),
            Err(PathError::OutOfBounds { .. })
        ));
    }

    #[test]
    fn wall_policy_decides_corner_scenario() {
        // start (0,0) and end (2,2) separated by walls on every edge midpoint
        let grid: Grid = "S#.\n#.#\n.#E".parse().unwrap();
        let blocked = PathFinder::new().find_marked_path(&grid).unwrap();
        assert!(blocked.is_empty());

        let ignored = PathFinder::with_wall_policy(WallPolicy::Ignore)
            .find_marked_path(&grid)
            .unwrap();
        assert_eq!(ignored, vec![p(0, 0), p(1, 0), p(2, 0), p(2, 1), p(2, 2)]);
    }

    /// The enclosed case is rejected by exhausting the frontier when components are unused.
    #[test]
    fn enclosed_start_without_components() {
        let grid: Grid = "S#.\n#..\n..E".parse().unwrap();
        let mut solver = PathFinder::new();
        solver.use_components = false;
        assert!(solver.find_marked_path(&grid).unwrap().is_empty());
    }

    #[test]
    fn wall_end_is_unreachable_when_blocking() {
        let grid: Grid = "...\n...\n..#".parse().unwrap();
        let solver = PathFinder::new();
        assert!(solver
            .find_optimal_path(&grid, p(0, 0), p(2, 2))
            .unwrap()
            .is_empty());
        let ignoring = PathFinder::with_wall_policy(WallPolicy::Ignore);
        assert_eq!(
            ignoring
                .find_optimal_path(&grid, p(0, 0), p(2, 2))
                .unwrap()
                .len(),
            5
        );
    }

    #[test]
    fn search_leaves_a_wall_start() {
        let grid: Grid = "#..\n...\n...".parse().unwrap();
        let solver = PathFinder::new();
        let path = solver.find_optimal_path(&grid, p(0, 0), p(0, 2)).unwrap();
        assert_eq!(path, vec![p(0, 0), p(0, 1), p(0, 2)]);
    }

    /// Stale components are ignored rather than trusted.
    #[test]
    fn dirty_components_fall_back_to_search() {
        let mut grid = Grid::new(1, 3).unwrap();
        grid.set_wall(p(0, 1), true).unwrap();
        grid.set_wall(p(0, 1), false).unwrap();
        assert!(grid.components_dirty());
        let path = PathFinder::new()
            .find_optimal_path(&grid, p(0, 0), p(0, 2))
            .unwrap();
        assert_eq!(path.len(), 3);
    }

    #[test]
    fn missing_markers() {
        let mut grid = Grid::new(2, 2).unwrap();
        let solver = PathFinder::new();
        assert_eq!(
            solver.find_marked_path(&grid),
            Err(PathError::MissingEndpoint("start"))
        );
        grid.set_start(p(0, 0)).unwrap();
        assert_eq!(
            solver.find_marked_path(&grid),
            Err(PathError::MissingEndpoint("end"))
        );
        grid.set_end(p(1, 1)).unwrap();
        assert_eq!(solver.find_marked_path(&grid).unwrap().len(), 3);
    }

    #[test]
    fn path_cost_of_empty_path() {
        assert_eq!(PathFinder::new().path_cost(&[]), 0);
    }
}
