//! Letter-consistent backtracking search over the maze.
//!
//! The search walks the open corridors one cell per letter. Every cell takes
//! the letter required at its first visit; later visits are only allowed
//! when the letter already there is the one required again. Letters are
//! written straight into the grid as the search descends and each write is
//! recorded in an [`UndoLog`], so backing out of a branch restores exactly
//! what was there before.
//!
//! Recursion is replaced by an explicit stack of [`SearchFrame`]s. Each
//! frame keeps the directions it has not tried yet, already shuffled, so
//! the exploration order is fixed by the random source alone.

use rand::seq::SliceRandom;
use rand::Rng;
use smallvec::SmallVec;

use crate::grid::{Position, Side, WordGrid};

/// Default cap on frames pushed by a single search.
pub const DEFAULT_MAX_EXPANSIONS: usize = 2_000_000;

/// Bounds for a single search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchLimits {
    /// Maximum number of cells entered before the search gives up.
    pub max_expansions: usize,
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            max_expansions: DEFAULT_MAX_EXPANSIONS,
        }
    }
}

/// Where a successful walk is allowed to stop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Goal {
    /// The last letter must land on this cell.
    Reach(Position),
    /// Any cell will do once every letter is placed.
    Anywhere,
}

impl Goal {
    fn accepts(self, pos: Position) -> bool {
        match self {
            Goal::Reach(target) => target == pos,
            Goal::Anywhere => true,
        }
    }
}

/// How a search ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchOutcome {
    /// A walk was found and its letters are now in the grid.
    Found(Vec<Position>),
    /// Every branch was tried without success.
    Exhausted,
    /// The expansion budget ran out first.
    BudgetExceeded,
}

impl SearchOutcome {
    pub fn into_path(self) -> Option<Vec<Position>> {
        match self {
            SearchOutcome::Found(path) => Some(path),
            _ => None,
        }
    }
}

/// Record of tentative letter writes, replayed in reverse to undo them.
#[derive(Debug, Default)]
pub struct UndoLog {
    entries: Vec<(Position, Option<char>)>,
}

impl UndoLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current length, usable as a rollback point.
    pub fn checkpoint(&self) -> usize {
        self.entries.len()
    }

    /// Write `letter` at `pos`, remembering the previous content.
    pub fn write(&mut self, grid: &mut WordGrid, pos: Position, letter: char) {
        let previous = grid.set_letter(pos, Some(letter));
        self.entries.push((pos, previous));
    }

    /// Undo every write made after `checkpoint`, newest first.
    pub fn rollback_to(&mut self, grid: &mut WordGrid, checkpoint: usize) {
        while self.entries.len() > checkpoint {
            if let Some((pos, previous)) = self.entries.pop() {
                grid.set_letter(pos, previous);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// A cell on the current walk and the directions left to try from it.
#[derive(Debug, Clone)]
struct SearchFrame {
    position: Position,
    /// Undo log length before this frame wrote its letter.
    checkpoint: usize,
    /// Untried directions; popped from the back.
    remaining: SmallVec<[Side; 4]>,
}

/// Whether `pos` can carry `letter` without contradicting what is there.
pub fn accepts_letter(grid: &WordGrid, pos: Position, letter: char) -> bool {
    grid.letter_at(pos).map_or(true, |existing| existing == letter)
}

/// Find a walk starting at `start` that spells `letters`, one cell per
/// letter, ending somewhere `goal` accepts.
///
/// On success the letters stay written in the grid. On any failure the grid
/// is left exactly as it was.
pub fn find_letter_path<R: Rng + ?Sized>(
    grid: &mut WordGrid,
    rng: &mut R,
    start: Position,
    letters: &[char],
    goal: Goal,
    limits: SearchLimits,
) -> SearchOutcome {
    if letters.is_empty() || !grid.contains(start) || !accepts_letter(grid, start, letters[0]) {
        return SearchOutcome::Exhausted;
    }

    let mut log = UndoLog::new();
    let mut frames: Vec<SearchFrame> = Vec::with_capacity(letters.len());
    let mut expansions = 1;
    frames.push(enter(grid, rng, &mut log, start, letters[0]));

    while !frames.is_empty() {
        let depth = frames.len() - 1;
        let top = &mut frames[depth];

        if depth + 1 == letters.len() {
            if goal.accepts(top.position) {
                return SearchOutcome::Found(frames.iter().map(|f| f.position).collect());
            }
            backtrack(grid, &mut log, &mut frames);
            continue;
        }

        let Some(side) = top.remaining.pop() else {
            backtrack(grid, &mut log, &mut frames);
            continue;
        };

        let child = top.position.step(side);
        let needed = letters[depth + 1];
        if !accepts_letter(grid, child, needed) {
            continue;
        }

        if expansions >= limits.max_expansions {
            log.rollback_to(grid, 0);
            return SearchOutcome::BudgetExceeded;
        }
        expansions += 1;
        frames.push(enter(grid, rng, &mut log, child, needed));
    }

    SearchOutcome::Exhausted
}

fn enter<R: Rng + ?Sized>(
    grid: &mut WordGrid,
    rng: &mut R,
    log: &mut UndoLog,
    position: Position,
    letter: char,
) -> SearchFrame {
    let checkpoint = log.checkpoint();
    if grid.letter_at(position).is_none() {
        log.write(grid, position, letter);
    }
    let mut remaining = grid.open_sides(position);
    remaining.shuffle(rng);
    SearchFrame {
        position,
        checkpoint,
        remaining,
    }
}

fn backtrack(grid: &mut WordGrid, log: &mut UndoLog, frames: &mut Vec<SearchFrame>) {
    if let Some(frame) = frames.pop() {
        log.rollback_to(grid, frame.checkpoint);
    }
}
