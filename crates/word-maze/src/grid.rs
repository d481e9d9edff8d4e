//! Grid topology: wall state, perimeter addressing and the letter layer.
//!
//! Walls are stored as two edge arrays. `verticals` holds the walls to the
//! left of each cell plus one extra column for the right boundary, and
//! `horizontals` holds the walls above each cell plus one extra row for the
//! bottom boundary. A `true` entry means the wall is standing.
//!
//! Boundary openings are named by a perimeter index that walks the outside
//! of the grid clockwise from the top-left corner: the top edge left to
//! right, the right edge top to bottom, the bottom edge right to left and
//! finally the left edge bottom to top.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{MazeError, MazeResult};

/// One side of a cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Top,
    Right,
    Bottom,
    Left,
}

impl Side {
    /// All sides in clockwise order starting at the top.
    pub const ALL: [Side; 4] = [Side::Top, Side::Right, Side::Bottom, Side::Left];

    pub fn opposite(self) -> Side {
        match self {
            Side::Top => Side::Bottom,
            Side::Right => Side::Left,
            Side::Bottom => Side::Top,
            Side::Left => Side::Right,
        }
    }

    /// Unit step towards the neighbour on this side (y grows downwards).
    pub fn delta(self) -> (i32, i32) {
        match self {
            Side::Top => (0, -1),
            Side::Right => (1, 0),
            Side::Bottom => (0, 1),
            Side::Left => (-1, 0),
        }
    }
}

/// Cell coordinate. Signed so that positions just outside the grid (such as
/// the display cell of the extra letter) can be expressed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The adjacent position across `side`.
    pub fn step(self, side: Side) -> Position {
        let (dx, dy) = side.delta();
        Position::new(self.x + dx, self.y + dy)
    }
}

/// Largest width or height a grid may have. Keeps coordinates inside `i32`
/// and perimeter arithmetic far from overflow.
pub const MAX_DIMENSION: usize = 4096;

/// Walls plus letters for a `width x height` maze.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordGrid {
    width: usize,
    height: usize,
    /// `height` rows of `width + 1` entries.
    verticals: Vec<bool>,
    /// `height + 1` rows of `width` entries.
    horizontals: Vec<bool>,
    /// Row-major, `None` until some stage writes the cell.
    letters: Vec<Option<char>>,
}

fn dimension_in_range(side: usize) -> bool {
    (2..=MAX_DIMENSION).contains(&side)
}

/// Check `width x height` against the supported grid sizes.
pub fn check_dimensions(width: usize, height: usize) -> MazeResult<()> {
    if dimension_in_range(width) && dimension_in_range(height) {
        Ok(())
    } else {
        Err(MazeError::InvalidDimensions { width, height })
    }
}

impl WordGrid {
    /// Create a grid with a closed boundary and no interior walls.
    pub fn new(width: usize, height: usize) -> MazeResult<Self> {
        check_dimensions(width, height)?;

        let mut grid = Self {
            width,
            height,
            verticals: vec![false; height * (width + 1)],
            horizontals: vec![false; (height + 1) * width],
            letters: vec![None; width * height],
        };

        for y in 0..height {
            grid.verticals[y * (width + 1)] = true;
            grid.verticals[y * (width + 1) + width] = true;
        }
        for x in 0..width {
            grid.horizontals[x] = true;
            grid.horizontals[height * width + x] = true;
        }

        Ok(grid)
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Number of distinct perimeter indices, `2 * (width + height)`.
    pub fn circumference(&self) -> usize {
        2 * (self.width + self.height)
    }

    pub fn cell_count(&self) -> usize {
        self.width * self.height
    }

    pub fn contains(&self, pos: Position) -> bool {
        pos.x >= 0 && pos.y >= 0 && (pos.x as usize) < self.width && (pos.y as usize) < self.height
    }

    /// Row-major index of an in-bounds position.
    pub fn cell_index(&self, pos: Position) -> Option<usize> {
        if self.contains(pos) {
            Some(pos.y as usize * self.width + pos.x as usize)
        } else {
            None
        }
    }

    /// Inverse of [`WordGrid::cell_index`].
    pub fn position_of(&self, index: usize) -> Position {
        Position::new((index % self.width) as i32, (index / self.width) as i32)
    }

    /// Iterate over every cell, row by row.
    pub fn positions(&self) -> impl Iterator<Item = Position> + '_ {
        (0..self.cell_count()).map(move |i| self.position_of(i))
    }

    // Edge array slot for a side of an in-bounds cell.
    fn edge(&self, pos: Position, side: Side) -> (bool, usize) {
        let (x, y) = (pos.x as usize, pos.y as usize);
        match side {
            Side::Top => (false, y * self.width + x),
            Side::Bottom => (false, (y + 1) * self.width + x),
            Side::Left => (true, y * (self.width + 1) + x),
            Side::Right => (true, y * (self.width + 1) + x + 1),
        }
    }

    /// Whether the wall on `side` of `pos` is standing. Positions outside
    /// the grid report every wall as standing.
    pub fn has_wall(&self, pos: Position, side: Side) -> bool {
        if !self.contains(pos) {
            return true;
        }
        match self.edge(pos, side) {
            (true, i) => self.verticals[i],
            (false, i) => self.horizontals[i],
        }
    }

    pub fn is_wall_open(&self, pos: Position, side: Side) -> bool {
        !self.has_wall(pos, side)
    }

    /// Open or close the wall on `side` of `pos`. Ignored for positions
    /// outside the grid.
    pub fn set_wall_open(&mut self, pos: Position, side: Side, open: bool) {
        if !self.contains(pos) {
            return;
        }
        match self.edge(pos, side) {
            (true, i) => self.verticals[i] = !open,
            (false, i) => self.horizontals[i] = !open,
        }
    }

    /// Close every wall, interior and boundary.
    pub fn fill_all_walls(&mut self) {
        self.verticals.iter_mut().for_each(|w| *w = true);
        self.horizontals.iter_mut().for_each(|w| *w = true);
    }

    /// Sides of `pos` that can be walked through: the wall is open and the
    /// neighbour is inside the grid. Boundary openings are never included.
    pub fn open_sides(&self, pos: Position) -> SmallVec<[Side; 4]> {
        Side::ALL
            .iter()
            .copied()
            .filter(|&side| self.contains(pos.step(side)) && self.is_wall_open(pos, side))
            .collect()
    }

    /// Cells reachable in one step from `pos`.
    pub fn open_neighbors(&self, pos: Position) -> SmallVec<[Position; 4]> {
        self.open_sides(pos).into_iter().map(|side| pos.step(side)).collect()
    }

    fn check_perimeter(&self, index: usize) -> MazeResult<()> {
        if index < self.circumference() {
            Ok(())
        } else {
            Err(MazeError::PerimeterOutOfRange {
                index,
                circumference: self.circumference(),
            })
        }
    }

    /// Boundary cell named by a perimeter index.
    pub fn perimeter_position(&self, index: usize) -> MazeResult<Position> {
        self.check_perimeter(index)?;
        let (w, h) = (self.width, self.height);
        let (x, y) = if index < w {
            (index, 0)
        } else if index < w + h {
            (w - 1, index - w)
        } else if index < 2 * w + h {
            (2 * w + h - index - 1, h - 1)
        } else {
            (0, 2 * w + 2 * h - index - 1)
        };
        Ok(Position::new(x as i32, y as i32))
    }

    /// Outward-facing side named by a perimeter index.
    pub fn perimeter_side(&self, index: usize) -> MazeResult<Side> {
        self.check_perimeter(index)?;
        let (w, h) = (self.width, self.height);
        Ok(if index < w {
            Side::Top
        } else if index < w + h {
            Side::Right
        } else if index < 2 * w + h {
            Side::Bottom
        } else {
            Side::Left
        })
    }

    /// Perimeter index of a boundary cell and outward side, or `None` when
    /// the side does not face out of the grid.
    pub fn perimeter_index(&self, pos: Position, side: Side) -> Option<usize> {
        if !self.contains(pos) {
            return None;
        }
        let (w, h) = (self.width, self.height);
        let (x, y) = (pos.x as usize, pos.y as usize);
        match side {
            Side::Top if y == 0 => Some(x),
            Side::Right if x == w - 1 => Some(w + y),
            Side::Bottom if y == h - 1 => Some(2 * w + h - 1 - x),
            Side::Left if x == 0 => Some(2 * w + 2 * h - 1 - y),
            _ => None,
        }
    }

    /// Open or close the boundary wall named by a perimeter index.
    pub fn set_perimeter_open(&mut self, index: usize, open: bool) -> MazeResult<()> {
        let pos = self.perimeter_position(index)?;
        let side = self.perimeter_side(index)?;
        self.set_wall_open(pos, side, open);
        Ok(())
    }

    /// Total number of interior walls, open or closed.
    pub fn interior_wall_count(&self) -> usize {
        (self.width - 1) * self.height + self.width * (self.height - 1)
    }

    /// Interior wall number `k` as a cell and the side it sits on. Vertical
    /// walls come first, then horizontal ones.
    pub fn interior_wall(&self, k: usize) -> (Position, Side) {
        let verticals = (self.width - 1) * self.height;
        if k < verticals {
            let x = k % (self.width - 1);
            let y = k / (self.width - 1);
            (Position::new(x as i32, y as i32), Side::Right)
        } else {
            let k = k - verticals;
            let x = k % self.width;
            let y = k / self.width;
            (Position::new(x as i32, y as i32), Side::Bottom)
        }
    }

    pub fn closed_interior_walls(&self) -> usize {
        (0..self.interior_wall_count())
            .filter(|&k| {
                let (pos, side) = self.interior_wall(k);
                self.has_wall(pos, side)
            })
            .count()
    }

    /// Number of cells reachable from `origin` through open walls.
    pub fn reachable_from(&self, origin: Position) -> usize {
        let Some(start) = self.cell_index(origin) else {
            return 0;
        };
        let mut seen = vec![false; self.cell_count()];
        let mut stack = vec![origin];
        seen[start] = true;
        let mut count = 0;

        while let Some(pos) = stack.pop() {
            count += 1;
            for next in self.open_neighbors(pos) {
                if let Some(i) = self.cell_index(next) {
                    if !seen[i] {
                        seen[i] = true;
                        stack.push(next);
                    }
                }
            }
        }
        count
    }

    /// Whether every cell can reach every other cell.
    pub fn is_connected(&self) -> bool {
        self.reachable_from(Position::new(0, 0)) == self.cell_count()
    }

    pub fn letter_at(&self, pos: Position) -> Option<char> {
        self.cell_index(pos).and_then(|i| self.letters[i])
    }

    /// Overwrite the letter at `pos`, returning what was there before.
    pub fn set_letter(&mut self, pos: Position, letter: Option<char>) -> Option<char> {
        match self.cell_index(pos) {
            Some(i) => std::mem::replace(&mut self.letters[i], letter),
            None => None,
        }
    }

    /// Letters rendered one string per row, with `blank` for unset cells.
    pub fn letter_rows(&self, blank: char) -> Vec<String> {
        self.letters
            .chunks(self.width)
            .map(|row| row.iter().map(|c| c.unwrap_or(blank)).collect())
            .collect()
    }

    /// Vertical walls as `height` rows of `width + 1` flags.
    pub fn vertical_walls(&self) -> Vec<Vec<bool>> {
        self.verticals.chunks(self.width + 1).map(|r| r.to_vec()).collect()
    }

    /// Horizontal walls as `height + 1` rows of `width` flags.
    pub fn horizontal_walls(&self) -> Vec<Vec<bool>> {
        self.horizontals.chunks(self.width).map(|r| r.to_vec()).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_rejects_small_grids() {
        assert_eq!(
            WordGrid::new(1, 5),
            Err(MazeError::InvalidDimensions { width: 1, height: 5 })
        );
        assert!(WordGrid::new(2, 2).is_ok());
    }

    #[test]
    fn test_rejects_oversized_grids() {
        assert_eq!(
            WordGrid::new(usize::MAX / 2, 3),
            Err(MazeError::InvalidDimensions {
                width: usize::MAX / 2,
                height: 3
            })
        );
        assert!(check_dimensions(MAX_DIMENSION, 2).is_ok());
        assert!(check_dimensions(2, MAX_DIMENSION + 1).is_err());
    }

    #[test]
    fn test_new_grid_has_closed_boundary_only() {
        let grid = WordGrid::new(3, 2).unwrap();
        for i in 0..grid.circumference() {
            let pos = grid.perimeter_position(i).unwrap();
            let side = grid.perimeter_side(i).unwrap();
            assert!(grid.has_wall(pos, side));
        }
        assert_eq!(grid.closed_interior_walls(), 0);
        assert!(grid.is_connected());
    }

    #[test]
    fn test_perimeter_walks_clockwise() {
        let grid = WordGrid::new(3, 2).unwrap();
        let expected = [
            ((0, 0), Side::Top),
            ((1, 0), Side::Top),
            ((2, 0), Side::Top),
            ((2, 0), Side::Right),
            ((2, 1), Side::Right),
            ((2, 1), Side::Bottom),
            ((1, 1), Side::Bottom),
            ((0, 1), Side::Bottom),
            ((0, 1), Side::Left),
            ((0, 0), Side::Left),
        ];
        assert_eq!(grid.circumference(), expected.len());
        for (i, ((x, y), side)) in expected.iter().enumerate() {
            assert_eq!(grid.perimeter_position(i).unwrap(), Position::new(*x, *y));
            assert_eq!(grid.perimeter_side(i).unwrap(), *side);
        }
    }

    #[test]
    fn test_perimeter_out_of_range() {
        let mut grid = WordGrid::new(2, 2).unwrap();
        let err = MazeError::PerimeterOutOfRange {
            index: 8,
            circumference: 8,
        };
        assert_eq!(grid.perimeter_position(8), Err(err.clone()));
        assert_eq!(grid.perimeter_side(8), Err(err.clone()));
        assert_eq!(grid.set_perimeter_open(8, true), Err(err));
    }

    #[test]
    fn test_perimeter_index_rejects_inner_sides() {
        let grid = WordGrid::new(3, 3).unwrap();
        assert_eq!(grid.perimeter_index(Position::new(1, 1), Side::Top), None);
        assert_eq!(grid.perimeter_index(Position::new(0, 0), Side::Right), None);
        assert_eq!(grid.perimeter_index(Position::new(5, 0), Side::Top), None);
    }

    #[test]
    fn test_walls_are_shared_between_neighbours() {
        let mut grid = WordGrid::new(3, 3).unwrap();
        grid.fill_all_walls();
        let a = Position::new(1, 1);
        for side in Side::ALL {
            grid.set_wall_open(a, side, true);
            assert!(grid.is_wall_open(a.step(side), side.opposite()));
        }
        assert_eq!(grid.open_neighbors(a).len(), 4);
        grid.set_wall_open(a, Side::Left, false);
        assert!(grid.has_wall(Position::new(0, 1), Side::Right));
    }

    #[test]
    fn test_open_sides_skip_boundary_openings() {
        let mut grid = WordGrid::new(2, 2).unwrap();
        grid.fill_all_walls();
        grid.set_perimeter_open(0, true).unwrap();
        assert!(grid.is_wall_open(Position::new(0, 0), Side::Top));
        assert!(grid.open_sides(Position::new(0, 0)).is_empty());
    }

    #[test]
    fn test_interior_wall_enumeration_covers_every_wall_once() {
        let grid = WordGrid::new(4, 3).unwrap();
        let mut seen = std::collections::HashSet::new();
        for k in 0..grid.interior_wall_count() {
            let (pos, side) = grid.interior_wall(k);
            assert!(grid.contains(pos) && grid.contains(pos.step(side)));
            assert!(seen.insert((pos, side)));
        }
        assert_eq!(seen.len(), 3 * 3 + 4 * 2);
    }

    #[test]
    fn test_set_letter_returns_previous() {
        let mut grid = WordGrid::new(2, 2).unwrap();
        let pos = Position::new(1, 0);
        assert_eq!(grid.set_letter(pos, Some('Q')), None);
        assert_eq!(grid.set_letter(pos, Some('R')), Some('Q'));
        assert_eq!(grid.letter_at(pos), Some('R'));
        assert_eq!(grid.letter_at(Position::new(-1, 0)), None);
        assert_eq!(grid.letter_rows('.'), vec![".R".to_string(), "..".to_string()]);
    }

    proptest! {
        #[test]
        fn prop_perimeter_round_trip(width in 2usize..16, height in 2usize..16) {
            let grid = WordGrid::new(width, height).unwrap();
            for index in 0..grid.circumference() {
                let pos = grid.perimeter_position(index).unwrap();
                let side = grid.perimeter_side(index).unwrap();
                prop_assert!(grid.contains(pos));
                prop_assert_eq!(grid.perimeter_index(pos, side), Some(index));
            }
        }
    }
}
