//! Primary path solver.
//!
//! Finds the answer path from the entrance cell to the exit cell. The walk
//! spells every letter of the concatenated answers except the last one,
//! which is never written into the grid: it is shown outside the maze next
//! to the exit as the "extra letter" and lets a solver check their work.

use log::{debug, info};
use rand::Rng;

use crate::error::{MazeError, MazeResult};
use crate::grid::{Position, WordGrid};
use crate::search::{find_letter_path, Goal, SearchLimits, SearchOutcome};

/// Configuration for the solver
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SolverConfig {
    pub limits: SearchLimits,
}

/// A solved answer path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSolution {
    /// Cells from entrance to exit, one per placed letter.
    pub path: Vec<Position>,
    /// Final character of the sequence, left out of the grid.
    pub extra_letter: char,
}

/// Find a walk from `start` to `end` spelling `sequence` minus its last
/// character, writing the letters into `grid` as it goes.
///
/// Returns [`MazeError::Unsolvable`] when no such walk exists in the current
/// wall layout (or the search budget runs out). The grid is untouched in
/// that case, and the caller is expected to start over with a new maze.
pub fn solve_word_path<R: Rng + ?Sized>(
    grid: &mut WordGrid,
    rng: &mut R,
    start: Position,
    end: Position,
    sequence: &[char],
    config: &SolverConfig,
) -> MazeResult<PathSolution> {
    let Some((&extra_letter, placed)) = sequence.split_last() else {
        return Err(MazeError::SequenceTooShort { length: 0 });
    };
    if placed.is_empty() {
        return Err(MazeError::SequenceTooShort {
            length: sequence.len(),
        });
    }

    info!(
        "solving for a path of {} cells from {:?} to {:?}",
        placed.len(),
        start,
        end
    );

    match find_letter_path(grid, rng, start, placed, Goal::Reach(end), config.limits) {
        SearchOutcome::Found(path) => {
            debug!("found path of length {}", path.len());
            Ok(PathSolution { path, extra_letter })
        }
        SearchOutcome::Exhausted => Err(MazeError::Unsolvable {
            length: sequence.len(),
        }),
        SearchOutcome::BudgetExceeded => {
            debug!(
                "search budget of {} expansions exhausted",
                config.limits.max_expansions
            );
            Err(MazeError::Unsolvable {
                length: sequence.len(),
            })
        }
    }
}

/// Display cell for the extra letter: the exit's boundary cell pushed one
/// step outwards through its opening. Usually outside the grid.
pub fn extra_letter_position(grid: &WordGrid, exit_index: usize) -> MazeResult<Position> {
    let pos = grid.perimeter_position(exit_index)?;
    let side = grid.perimeter_side(exit_index)?;
    Ok(pos.step(side))
}
