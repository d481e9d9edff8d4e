//! Randomized maze generation and barrier relaxation.
//!
//! Generation grows a spanning tree outwards from a random seed cell. Each
//! step picks a random frontier cell and knocks down the wall to one of its
//! ungrown neighbours, occasionally carrying on to a second or third
//! neighbour in the same step to produce short side branches. A neighbour is
//! marked grown the moment its wall opens, so it can never be reached twice
//! and the result is a perfect maze.

use log::debug;
use rand::Rng;
use smallvec::SmallVec;

use crate::error::{MazeError, MazeResult};
use crate::grid::{Position, Side, WordGrid};

/// Probability of opening another ungrown neighbour in the same step.
pub const CHANCE_TO_SPLIT: f64 = 0.2;

/// Tracks which cells already belong to the spanning tree.
struct Growth {
    grown: Vec<bool>,
}

impl Growth {
    fn new(grid: &WordGrid) -> Self {
        Self {
            grown: vec![false; grid.cell_count()],
        }
    }

    fn is_grown(&self, grid: &WordGrid, pos: Position) -> bool {
        grid.cell_index(pos).map_or(false, |i| self.grown[i])
    }

    fn mark(&mut self, grid: &WordGrid, pos: Position) {
        if let Some(i) = grid.cell_index(pos) {
            self.grown[i] = true;
        }
    }

    /// In-bounds sides of `pos` whose neighbour has the given grown state.
    fn sides_where(&self, grid: &WordGrid, pos: Position, grown: bool) -> SmallVec<[Side; 4]> {
        Side::ALL
            .iter()
            .copied()
            .filter(|&side| {
                let next = pos.step(side);
                grid.contains(next) && self.is_grown(grid, next) == grown
            })
            .collect()
    }

    /// Grow the tree from `origin` until no frontier cell has an ungrown
    /// neighbour left.
    fn grow_from<R: Rng + ?Sized>(&mut self, grid: &mut WordGrid, origin: Position, rng: &mut R) {
        let mut frontier = vec![origin];
        self.mark(grid, origin);

        while !frontier.is_empty() {
            let slot = rng.gen_range(0..frontier.len());
            let current = frontier[slot];
            let mut available = self.sides_where(grid, current, false);

            if available.is_empty() {
                frontier.swap_remove(slot);
                continue;
            }

            loop {
                let side = available.swap_remove(rng.gen_range(0..available.len()));
                let child = current.step(side);
                grid.set_wall_open(current, side, true);
                self.mark(grid, child);
                frontier.push(child);

                if available.is_empty() || !rng.gen_bool(CHANCE_TO_SPLIT) {
                    break;
                }
            }
        }
    }

    fn ungrown(&self, grid: &WordGrid) -> Vec<Position> {
        self.grown
            .iter()
            .enumerate()
            .filter(|(_, grown)| !**grown)
            .map(|(i, _)| grid.position_of(i))
            .collect()
    }

    /// Join every ungrown region to the tree through one wall and grow it.
    ///
    /// [`Growth::grow_from`] already spans the whole grid from a single
    /// origin, so after a full growth this finds nothing to do.
    fn attach_strays<R: Rng + ?Sized>(&mut self, grid: &mut WordGrid, rng: &mut R) {
        let mut blanks = self.ungrown(grid);
        while !blanks.is_empty() {
            let current = blanks[rng.gen_range(0..blanks.len())];
            let attached = self.sides_where(grid, current, true);
            if attached.is_empty() {
                continue;
            }
            let side = attached[rng.gen_range(0..attached.len())];
            grid.set_wall_open(current, side, true);
            self.grow_from(grid, current, rng);
            blanks = self.ungrown(grid);
            debug!("attached stray region, {} cells left", blanks.len());
        }
    }
}

/// Close every wall and carve a perfect maze into `grid`.
///
/// Boundary walls stay closed; the caller opens the entrance and exit.
pub fn generate_maze<R: Rng + ?Sized>(grid: &mut WordGrid, rng: &mut R) {
    grid.fill_all_walls();

    let mut growth = Growth::new(grid);
    let seed = Position::new(
        rng.gen_range(0..grid.width()) as i32,
        rng.gen_range(0..grid.height()) as i32,
    );
    growth.grow_from(grid, seed, rng);
    growth.attach_strays(grid, rng);
}

/// Knock down `barrier_count` additional closed interior walls at random,
/// introducing cycles. The boundary is never touched.
///
/// Fails with [`MazeError::TooManyBarrierRemovals`] when fewer than
/// `barrier_count` interior walls are still closed, since the rejection
/// sampling below could otherwise never finish.
pub fn relax_barriers<R: Rng + ?Sized>(
    grid: &mut WordGrid,
    barrier_count: usize,
    rng: &mut R,
) -> MazeResult<()> {
    let available = grid.closed_interior_walls();
    if barrier_count > available {
        return Err(MazeError::TooManyBarrierRemovals {
            requested: barrier_count,
            available,
        });
    }

    let total = grid.interior_wall_count();
    let mut removed = 0;
    while removed < barrier_count {
        let (pos, side) = grid.interior_wall(rng.gen_range(0..total));
        if grid.is_wall_open(pos, side) {
            continue;
        }
        grid.set_wall_open(pos, side, true);
        removed += 1;
    }
    Ok(())
}

/// Closed interior walls left behind by [`generate_maze`] on a grid of the
/// given size: every interior wall minus the `cells - 1` tree edges.
pub fn max_barrier_removals(width: usize, height: usize) -> usize {
    let interior = width
        .saturating_sub(1)
        .saturating_mul(height)
        .saturating_add(width.saturating_mul(height.saturating_sub(1)));
    interior.saturating_sub(width.saturating_mul(height).saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn open_interior_walls(grid: &WordGrid) -> usize {
        grid.interior_wall_count() - grid.closed_interior_walls()
    }

    #[test]
    fn test_generates_perfect_maze() {
        let mut rng = ChaCha8Rng::seed_from_u64(7);
        let mut grid = WordGrid::new(9, 6).unwrap();
        generate_maze(&mut grid, &mut rng);

        assert!(grid.is_connected());
        // A spanning tree over n cells has exactly n - 1 edges.
        assert_eq!(open_interior_walls(&grid), grid.cell_count() - 1);
        assert_eq!(grid.closed_interior_walls(), max_barrier_removals(9, 6));
    }

    #[test]
    fn test_boundary_stays_closed() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let mut grid = WordGrid::new(4, 4).unwrap();
        generate_maze(&mut grid, &mut rng);
        for i in 0..grid.circumference() {
            let pos = grid.perimeter_position(i).unwrap();
            let side = grid.perimeter_side(i).unwrap();
            assert!(grid.has_wall(pos, side));
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        let build = |seed| {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut grid = WordGrid::new(8, 8).unwrap();
            generate_maze(&mut grid, &mut rng);
            relax_barriers(&mut grid, 5, &mut rng).unwrap();
            grid
        };
        assert_eq!(build(42), build(42));
    }

    #[test]
    fn test_relax_opens_exactly_count_walls() {
        let mut rng = ChaCha8Rng::seed_from_u64(11);
        let mut grid = WordGrid::new(6, 5).unwrap();
        generate_maze(&mut grid, &mut rng);
        let before = open_interior_walls(&grid);

        relax_barriers(&mut grid, 4, &mut rng).unwrap();

        assert_eq!(open_interior_walls(&grid), before + 4);
        assert!(grid.is_connected());
    }

    #[test]
    fn test_relax_rejects_more_than_available() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let mut grid = WordGrid::new(3, 3).unwrap();
        generate_maze(&mut grid, &mut rng);
        let available = grid.closed_interior_walls();
        assert_eq!(available, 4);

        let before = grid.clone();
        let err = relax_barriers(&mut grid, available + 1, &mut rng).unwrap_err();
        assert_eq!(
            err,
            MazeError::TooManyBarrierRemovals {
                requested: 5,
                available: 4
            }
        );
        assert_eq!(grid, before);

        // Taking every remaining wall is still allowed.
        relax_barriers(&mut grid, available, &mut rng).unwrap();
        assert_eq!(grid.closed_interior_walls(), 0);
    }

    #[test]
    fn test_attaches_regions_outside_the_tree() {
        // Only the corner cell is part of the tree; everything else has to
        // be attached and grown.
        let mut rng = ChaCha8Rng::seed_from_u64(9);
        let mut grid = WordGrid::new(5, 4).unwrap();
        grid.fill_all_walls();
        let mut growth = Growth::new(&grid);
        growth.mark(&grid, Position::new(0, 0));

        growth.attach_strays(&mut grid, &mut rng);

        assert!(growth.ungrown(&grid).is_empty());
        assert!(grid.is_connected());
        assert_eq!(open_interior_walls(&grid), grid.cell_count() - 1);
    }

    #[test]
    fn test_full_growth_leaves_no_strays() {
        let mut rng = ChaCha8Rng::seed_from_u64(10);
        let mut grid = WordGrid::new(6, 6).unwrap();
        grid.fill_all_walls();
        let mut growth = Growth::new(&grid);
        growth.grow_from(&mut grid, Position::new(2, 3), &mut rng);
        assert!(growth.ungrown(&grid).is_empty());
    }

    proptest! {
        #[test]
        fn prop_generated_mazes_are_connected(
            width in 2usize..14,
            height in 2usize..14,
            seed in any::<u64>(),
        ) {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let mut grid = WordGrid::new(width, height).unwrap();
            generate_maze(&mut grid, &mut rng);
            prop_assert!(grid.is_connected());
            prop_assert_eq!(open_interior_walls(&grid), width * height - 1);
        }
    }
}
