//! Alternate answer placement.
//!
//! For every word boundary the placer tries to lay down each alternate
//! answer starting from one of the boundary's candidate cells. An exact
//! search that respects every letter already in the grid is tried first.
//! When that fails a best-effort walk is used instead, which only keeps
//! itself consistent and may overwrite letters placed earlier (including
//! the primary path). That loss is accepted: it degrades the alternate
//! variant of the puzzle but never the primary answer path search.

use std::collections::HashMap;

use log::{debug, warn};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{MazeError, MazeResult};
use crate::grid::{Position, WordGrid};
use crate::search::{accepts_letter, find_letter_path, Goal, SearchLimits};
use crate::segmenter::WordBoundary;

/// Tally of what happened to each alternate answer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlacementStats {
    /// Placed without disturbing any existing letter.
    pub exact: usize,
    /// Placed by the best-effort walk.
    pub fallback: usize,
    /// Dropped because the answer was empty or no candidate cell could take
    /// its first letter.
    pub skipped: usize,
}

/// Place `alternates[i]` starting near `boundaries[i]`, in order.
///
/// `alternates` must hold one list per boundary; an empty list means no
/// alternates for that word.
pub fn place_alternates<R: Rng + ?Sized>(
    grid: &mut WordGrid,
    rng: &mut R,
    boundaries: &[WordBoundary],
    alternates: &[Vec<Vec<char>>],
    limits: SearchLimits,
) -> MazeResult<PlacementStats> {
    if alternates.len() != boundaries.len() {
        return Err(MazeError::AlternateCountMismatch {
            expected: boundaries.len(),
            actual: alternates.len(),
        });
    }

    let mut stats = PlacementStats::default();
    for (index, (boundary, answers)) in boundaries.iter().zip(alternates).enumerate() {
        for answer in answers {
            let Some(&first) = answer.first() else {
                debug!("boundary {}: empty alternate, skipping", index);
                stats.skipped += 1;
                continue;
            };

            let starts: Vec<Position> = boundary
                .candidates
                .iter()
                .copied()
                .filter(|&pos| accepts_letter(grid, pos, first))
                .collect();
            let Some(&start) = starts.choose(rng) else {
                debug!("boundary {}: no usable start for alternate, skipping", index);
                stats.skipped += 1;
                continue;
            };

            let path = match find_letter_path(grid, rng, start, answer, Goal::Anywhere, limits)
                .into_path()
            {
                Some(path) => {
                    stats.exact += 1;
                    path
                }
                None => {
                    warn!(
                        "boundary {}: exact placement failed, letters may be overwritten",
                        index
                    );
                    stats.fallback += 1;
                    best_effort_path(grid, rng, start, answer)
                }
            };

            for (&pos, &letter) in path.iter().zip(answer) {
                grid.set_letter(pos, Some(letter));
            }
        }
    }

    Ok(stats)
}

/// Walk one cell per letter from `start` without ever backtracking.
///
/// Each step takes the first shuffled open direction whose cell is free or
/// already holds the needed letter according to this walk's own
/// assignments, where a revisited cell holds the letter written last;
/// letters already in the grid are ignored. If no direction
/// qualifies, the first shuffled one is taken anyway, so the walk only stops
/// short when a cell has no open neighbour at all.
pub fn best_effort_path<R: Rng + ?Sized>(
    grid: &WordGrid,
    rng: &mut R,
    start: Position,
    letters: &[char],
) -> Vec<Position> {
    let mut path = Vec::with_capacity(letters.len());
    let Some(&first) = letters.first() else {
        return path;
    };

    let mut tentative: HashMap<Position, char> = HashMap::new();
    tentative.insert(start, first);
    path.push(start);

    let mut current = start;
    for &needed in &letters[1..] {
        let mut sides = grid.open_sides(current);
        sides.shuffle(rng);

        let chosen = sides
            .iter()
            .copied()
            .find(|&side| {
                tentative
                    .get(&current.step(side))
                    .map_or(true, |&existing| existing == needed)
            })
            .or_else(|| sides.first().copied());
        let Some(side) = chosen else {
            break;
        };

        current = current.step(side);
        tentative.insert(current, needed);
        path.push(current);
    }

    path
}
