use crate::error::{PathError, Result};
use crate::{DEFAULT_COLS, DEFAULT_ROWS};
use core::fmt;
use grid_util::point::Point;
use itertools::{iproduct, Itertools};
use log::info;
use petgraph::unionfind::UnionFind;
use std::str::FromStr;

/// A single square of the [Grid]. A cell's position is implied by where it is stored.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Cell {
    pub is_wall: bool,
    pub is_start: bool,
    pub is_end: bool,
}

impl Cell {
    fn tile(&self) -> char {
        if self.is_start {
            'S'
        } else if self.is_end {
            'E'
        } else if self.is_wall {
            '#'
        } else {
            '.'
        }
    }
}

/// Rectangular, row-major grid of [Cell]s with fixed dimensions.
///
/// Points address cells with `x` as the column and `y` as the row. At most one cell carries
/// the start marker and at most one the end marker. Besides the cells, the grid maintains
/// the connected components of its passable cells (4-neighbourhood) in a [UnionFind]
/// structure so that unreachable goals can be rejected without searching.
#[derive(Clone, Debug)]
pub struct Grid {
    rows: usize,
    cols: usize,
    cells: Vec<Cell>,
    start: Option<Point>,
    end: Option<Point>,
    components: UnionFind<usize>,
    components_dirty: bool,
}

impl Default for Grid {
    /// The 10x10 layout with the start in the top-left and the end in the bottom-right corner.
    fn default() -> Grid {
        let mut grid = Grid::open(DEFAULT_ROWS, DEFAULT_COLS);
        let start = Point::new(0, 0);
        let end = Point::new(DEFAULT_COLS as i32 - 1, DEFAULT_ROWS as i32 - 1);
        grid.mark_start(start);
        grid.mark_end(end);
        grid
    }
}

impl Grid {
    /// Creates a grid of open cells without start or end markers.
    pub fn new(rows: usize, cols: usize) -> Result<Grid> {
        if rows == 0 || cols == 0 {
            return Err(PathError::InvalidGrid(format!(
                "dimensions must be non-zero, got {rows}x{cols}"
            )));
        }
        Ok(Grid::open(rows, cols))
    }

    /// Creates a grid from rows of wall flags (`true` is a wall).
    pub fn from_walls(walls: Vec<Vec<bool>>) -> Result<Grid> {
        let cols = validate_rows(walls.iter().map(|row| row.len()))?;
        let mut grid = Grid::open(walls.len(), cols);
        for (cell, is_wall) in grid.cells.iter_mut().zip(walls.into_iter().flatten()) {
            cell.is_wall = is_wall;
        }
        grid.generate_components();
        Ok(grid)
    }

    fn open(rows: usize, cols: usize) -> Grid {
        let mut grid = Grid {
            rows,
            cols,
            cells: vec![Cell::default(); rows * cols],
            start: None,
            end: None,
            components: UnionFind::new(rows * cols),
            components_dirty: false,
        };
        grid.generate_components();
        grid
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn in_bounds(&self, point: Point) -> bool {
        point.x >= 0
            && point.y >= 0
            && (point.x as usize) < self.cols
            && (point.y as usize) < self.rows
    }

    /// Fails with [PathError::OutOfBounds] if `point` is not a cell of this grid.
    pub fn check_bounds(&self, point: Point) -> Result<()> {
        if self.in_bounds(point) {
            Ok(())
        } else {
            Err(PathError::OutOfBounds {
                point,
                rows: self.rows,
                cols: self.cols,
            })
        }
    }

    /// Row-major index; only meaningful for in-bounds points.
    fn get_ix(&self, point: Point) -> usize {
        point.y as usize * self.cols + point.x as usize
    }

    fn get_point(&self, ix: usize) -> Point {
        Point::new((ix % self.cols) as i32, (ix / self.cols) as i32)
    }

    pub fn cell(&self, point: Point) -> Option<&Cell> {
        if self.in_bounds(point) {
            self.cells.get(self.get_ix(point))
        } else {
            None
        }
    }

    fn cell_mut(&mut self, point: Point) -> Result<&mut Cell> {
        self.check_bounds(point)?;
        let ix = self.get_ix(point);
        Ok(&mut self.cells[ix])
    }

    /// Out-of-bounds points are reported as non-walls; callers bound-check first.
    pub fn is_wall(&self, point: Point) -> bool {
        self.cell(point).map_or(false, |c| c.is_wall)
    }

    fn is_passable(&self, point: Point) -> bool {
        self.cell(point).map_or(false, |c| !c.is_wall)
    }

    pub fn start(&self) -> Option<Point> {
        self.start
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// The in-bounds 4-neighbours of `point`, ordered up, down, left, right.
    pub fn neighbours(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        [
            Point::new(point.x, point.y - 1),
            Point::new(point.x, point.y + 1),
            Point::new(point.x - 1, point.y),
            Point::new(point.x + 1, point.y),
        ]
        .into_iter()
        .filter(move |p| self.in_bounds(*p))
    }

    /// The in-bounds 4-neighbours of `point` which are not walls, in [neighbours](Self::neighbours) order.
    pub fn passable_neighbours(&self, point: Point) -> impl Iterator<Item = Point> + '_ {
        self.neighbours(point).filter(move |p| self.is_passable(*p))
    }

    /// Updates the wall flag of a cell. Joins newly connected components and flags the
    /// components as dirty if they are (potentially) broken apart into multiple.
    pub fn set_wall(&mut self, point: Point, blocked: bool) -> Result<()> {
        let cell = self.cell_mut(point)?;
        let was_blocked = cell.is_wall;
        cell.is_wall = blocked;
        if blocked {
            if !was_blocked {
                self.components_dirty = true;
            }
        } else {
            let ix = self.get_ix(point);
            let joined = self
                .passable_neighbours(point)
                .map(|n| self.get_ix(n))
                .collect::<Vec<_>>();
            for n_ix in joined {
                self.components.union(ix, n_ix);
            }
        }
        Ok(())
    }

    /// Flips the wall flag of a cell and returns the new value.
    pub fn toggle_wall(&mut self, point: Point) -> Result<bool> {
        let blocked = !self.cell_mut(point)?.is_wall;
        self.set_wall(point, blocked)?;
        Ok(blocked)
    }

    /// Moves the start marker to `point`, clearing it from its previous cell.
    pub fn set_start(&mut self, point: Point) -> Result<()> {
        self.check_bounds(point)?;
        self.mark_start(point);
        Ok(())
    }

    /// Moves the end marker to `point`, clearing it from its previous cell.
    pub fn set_end(&mut self, point: Point) -> Result<()> {
        self.check_bounds(point)?;
        self.mark_end(point);
        Ok(())
    }

    pub fn clear_start(&mut self) {
        if let Some(old) = self.start.take() {
            let ix = self.get_ix(old);
            self.cells[ix].is_start = false;
        }
    }

    pub fn clear_end(&mut self) {
        if let Some(old) = self.end.take() {
            let ix = self.get_ix(old);
            self.cells[ix].is_end = false;
        }
    }

    fn mark_start(&mut self, point: Point) {
        self.clear_start();
        let ix = self.get_ix(point);
        self.cells[ix].is_start = true;
        self.start = Some(point);
    }

    fn mark_end(&mut self, point: Point) {
        self.clear_end();
        let ix = self.get_ix(point);
        self.cells[ix].is_end = true;
        self.end = Some(point);
    }

    pub fn components_dirty(&self) -> bool {
        self.components_dirty
    }

    /// Regenerates the components if they are marked as dirty.
    pub fn update(&mut self) {
        if self.components_dirty {
            info!("Components are dirty: regenerating components");
            self.generate_components();
        }
    }

    /// Generates a new [UnionFind] structure and links up passable neighbours to the same
    /// components. Walls each end up in a component of their own.
    pub fn generate_components(&mut self) {
        self.components = UnionFind::new(self.rows * self.cols);
        self.components_dirty = false;
        for (y, x) in iproduct!(0..self.rows as i32, 0..self.cols as i32) {
            let point = Point::new(x, y);
            if !self.is_passable(point) {
                continue;
            }
            let parent_ix = self.get_ix(point);
            // Linking down and right covers every edge once
            for n in [Point::new(x, y + 1), Point::new(x + 1, y)] {
                if self.is_passable(n) {
                    let ix = self.get_ix(n);
                    self.components.union(parent_ix, ix);
                }
            }
        }
    }

    /// Checks if `start` and `goal` are passable cells on the same component.
    ///
    /// Only reliable when [components_dirty](Self::components_dirty) is `false`.
    pub fn reachable(&self, start: Point, goal: Point) -> bool {
        self.is_passable(start)
            && self.is_passable(goal)
            && self
                .components
                .equiv(self.get_ix(start), self.get_ix(goal))
    }

    /// Renders the grid like [Display](fmt::Display) but with the cells of `path` drawn as `*`.
    /// Start and end markers keep their letters.
    pub fn render_path(&self, path: &[Point]) -> String {
        let mut tiles = self.cells.iter().map(Cell::tile).collect::<Vec<char>>();
        for &p in path.iter().filter(|p| self.in_bounds(**p)) {
            let ix = self.get_ix(p);
            if !self.cells[ix].is_start && !self.cells[ix].is_end {
                tiles[ix] = '*';
            }
        }
        tiles
            .chunks(self.cols)
            .map(|row| row.iter().collect::<String>())
            .join("\n")
    }

    /// Iterates over all cells with their position in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, &Cell)> + '_ {
        self.cells
            .iter()
            .enumerate()
            .map(move |(ix, cell)| (self.get_point(ix), cell))
    }
}

/// Returns the common row length, rejecting empty and ragged input.
fn validate_rows(lengths: impl Iterator<Item = usize>) -> Result<usize> {
    let mut cols = None;
    for (row, len) in lengths.enumerate() {
        match cols {
            None => cols = Some(len),
            Some(expected) if expected != len => {
                return Err(PathError::InvalidGrid(format!(
                    "row {row} has {len} cells, expected {expected}"
                )));
            }
            Some(_) => {}
        }
    }
    match cols {
        None => Err(PathError::InvalidGrid("grid has no rows".to_owned())),
        Some(0) => Err(PathError::InvalidGrid("grid has no columns".to_owned())),
        Some(cols) => Ok(cols),
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for (i, row) in self.cells.chunks(self.cols).enumerate() {
            if i > 0 {
                writeln!(f)?;
            }
            write!(f, "{}", row.iter().map(Cell::tile).collect::<String>())?;
        }
        Ok(())
    }
}

/// Parses an ASCII map with one line per row: `.` open, `#` wall, `S` start, `E` end.
impl FromStr for Grid {
    type Err = PathError;

    fn from_str(s: &str) -> Result<Grid> {
        let lines = s
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.is_empty())
            .collect::<Vec<&str>>();
        let cols = validate_rows(lines.iter().map(|line| line.chars().count()))?;
        let mut grid = Grid::open(lines.len(), cols);
        for (row, line) in lines.iter().enumerate() {
            for (col, tile) in line.chars().enumerate() {
                let point = Point::new(col as i32, row as i32);
                match tile {
                    '.' => {}
                    '#' => grid.cells[row * cols + col].is_wall = true,
                    'S' if grid.start.is_some() => {
                        return Err(PathError::InvalidGrid("more than one start".to_owned()))
                    }
                    'E' if grid.end.is_some() => {
                        return Err(PathError::InvalidGrid("more than one end".to_owned()))
                    }
                    'S' => grid.mark_start(point),
                    'E' => grid.mark_end(point),
                    _ => return Err(PathError::UnknownTile { row, col, tile }),
                }
            }
        }
        grid.generate_components();
        Ok(grid)
    }
}
