//! End-to-end construction of a word maze.
//!
//! One attempt runs generation, barrier relaxation, the primary path
//! search, word segmentation, alternate placement and random fill against a
//! single grid, in that order, all drawing from the same random source. An
//! unsolvable layout throws the whole attempt away and starts again with a
//! fresh maze, up to the configured number of attempts.

use log::{debug, info, warn};
use rand::Rng;
use serde::Serialize;

use crate::config::MazeConfig;
use crate::error::MazeResult;
use crate::fill::fill_random_letters;
use crate::generator::{generate_maze, relax_barriers};
use crate::grid::{Position, Side, WordGrid};
use crate::placer::{place_alternates, PlacementStats};
use crate::segmenter::{segment_words, WordBoundary};
use crate::solver::{extra_letter_position, solve_word_path, SolverConfig};

/// Counters describing how a maze was built.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildMetrics {
    /// Attempts used, including the successful one.
    pub attempts: usize,
    /// Cells on the primary path.
    pub path_length: usize,
    /// Cells filled with noise letters.
    pub noise_cells: usize,
    pub placement: PlacementStats,
}

/// The letter shown outside the maze next to the exit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExtraLetter {
    pub letter: char,
    pub position: Position,
}

/// A finished maze, ready to be drawn.
#[derive(Debug, Clone)]
pub struct WordMaze {
    grid: WordGrid,
    answer_key: WordGrid,
    start: usize,
    end: usize,
    questions: Vec<String>,
    path: Vec<Position>,
    boundaries: Vec<WordBoundary>,
    extra_letter: ExtraLetter,
    metrics: BuildMetrics,
}

impl WordMaze {
    /// The filled grid.
    pub fn grid(&self) -> &WordGrid {
        &self.grid
    }

    /// The grid as it stood before noise letters were added.
    pub fn answer_key(&self) -> &WordGrid {
        &self.answer_key
    }

    pub fn width(&self) -> usize {
        self.grid.width()
    }

    pub fn height(&self) -> usize {
        self.grid.height()
    }

    pub fn start(&self) -> usize {
        self.start
    }

    pub fn end(&self) -> usize {
        self.end
    }

    /// Clues in word order; empty when none were configured.
    pub fn questions(&self) -> &[String] {
        &self.questions
    }

    pub fn is_wall_open(&self, pos: Position, side: Side) -> bool {
        self.grid.is_wall_open(pos, side)
    }

    pub fn letter_at(&self, pos: Position) -> Option<char> {
        self.grid.letter_at(pos)
    }

    pub fn path(&self) -> &[Position] {
        &self.path
    }

    pub fn boundaries(&self) -> &[WordBoundary] {
        &self.boundaries
    }

    pub fn extra_letter(&self) -> ExtraLetter {
        self.extra_letter
    }

    pub fn metrics(&self) -> &BuildMetrics {
        &self.metrics
    }

    /// Serializable view for renderers.
    pub fn snapshot(&self) -> MazeSnapshot {
        MazeSnapshot {
            width: self.width(),
            height: self.height(),
            start: self.start,
            end: self.end,
            questions: self.questions.clone(),
            vertical_walls: self.grid.vertical_walls(),
            horizontal_walls: self.grid.horizontal_walls(),
            letters: self.grid.letter_rows(' '),
            answer_key: self.answer_key.letter_rows(' '),
            extra_letter: self.extra_letter,
            path: self.path.clone(),
        }
    }
}

/// Plain-data form of a [`WordMaze`]. Wall flags are `true` where a wall
/// stands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeSnapshot {
    pub width: usize,
    pub height: usize,
    pub start: usize,
    pub end: usize,
    pub questions: Vec<String>,
    pub vertical_walls: Vec<Vec<bool>>,
    pub horizontal_walls: Vec<Vec<bool>>,
    pub letters: Vec<String>,
    pub answer_key: Vec<String>,
    pub extra_letter: ExtraLetter,
    pub path: Vec<Position>,
}

/// Build a maze from a validated config, retrying with a fresh layout
/// whenever the primary path cannot be found.
pub fn generate_word_maze<R: Rng + ?Sized>(config: &MazeConfig, rng: &mut R) -> MazeResult<WordMaze> {
    config.validate()?;

    let mut attempt = 1;
    loop {
        match build_attempt(config, rng) {
            Ok(mut maze) => {
                maze.metrics.attempts = attempt;
                info!("maze built after {} attempt(s)", attempt);
                return Ok(maze);
            }
            Err(err) if err.is_retryable() && attempt < config.max_attempts => {
                warn!("attempt {} failed: {}; regenerating", attempt, err);
                attempt += 1;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Run every stage once. Fails with [`crate::MazeError::Unsolvable`] when this
/// layout has no answer path.
pub fn build_attempt<R: Rng + ?Sized>(config: &MazeConfig, rng: &mut R) -> MazeResult<WordMaze> {
    let mut grid = WordGrid::new(config.width, config.height)?;

    info!("generating {}x{} maze", config.width, config.height);
    generate_maze(&mut grid, rng);
    grid.set_perimeter_open(config.start, true)?;
    grid.set_perimeter_open(config.end, true)?;
    relax_barriers(&mut grid, config.barrier_removals, rng)?;

    let start = grid.perimeter_position(config.start)?;
    let end = grid.perimeter_position(config.end)?;
    let solver = SolverConfig {
        limits: config.search_limits(),
    };
    let solution = solve_word_path(&mut grid, rng, start, end, &config.sequence(), &solver)?;

    let segmentation = segment_words(&mut grid, &solution.path, &config.word_letters());
    debug_assert_eq!(segmentation.extra_letter, Some(solution.extra_letter));

    info!("placing alternate answers");
    let placement = place_alternates(
        &mut grid,
        rng,
        &segmentation.boundaries,
        &config.alternate_letters(),
        config.search_limits(),
    )?;
    debug!("alternate placement: {:?}", placement);

    let answer_key = grid.clone();
    let noise_cells = fill_random_letters(&mut grid, &config.alphabet_chars(), rng)?;

    let extra_letter = ExtraLetter {
        letter: solution.extra_letter,
        position: extra_letter_position(&grid, config.end)?,
    };

    Ok(WordMaze {
        grid,
        answer_key,
        start: config.start,
        end: config.end,
        questions: config.questions.clone(),
        metrics: BuildMetrics {
            attempts: 1,
            path_length: solution.path.len(),
            noise_cells,
            placement,
        },
        path: solution.path,
        boundaries: segmentation.boundaries,
        extra_letter,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MazeError;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn words(list: &[&str]) -> Vec<String> {
        list.iter().map(|w| w.to_string()).collect()
    }

    fn sample_config() -> MazeConfig {
        let mut config = MazeConfig::new(6, 6, 0, 14, words(&["RUST", "CARGO", "CRATE"]));
        config.barrier_removals = 10;
        config.max_attempts = 200;
        config.alphabet = "xyz".to_string();
        config
    }

    #[test]
    fn test_builds_consistent_maze() {
        let config = sample_config();
        let mut rng = ChaCha8Rng::seed_from_u64(2024);
        let maze = generate_word_maze(&config, &mut rng).unwrap();

        let sequence = config.sequence();
        let path = maze.path();
        assert_eq!(path.len(), sequence.len() - 1);
        assert!(maze.grid().is_connected());

        let exit = maze.grid().perimeter_position(config.end).unwrap();
        assert_eq!(path.first(), Some(&Position::new(0, 0)));
        assert_eq!(path.last(), Some(&exit));
        for pair in path.windows(2) {
            assert!(maze.grid().open_neighbors(pair[0]).contains(&pair[1]));
        }
        for (pos, letter) in path.iter().zip(&sequence) {
            assert_eq!(maze.letter_at(*pos), Some(*letter));
            assert_eq!(maze.answer_key().letter_at(*pos), Some(*letter));
        }

        let extra = maze.extra_letter();
        assert_eq!(extra.letter, 'E');
        // Index 14 on a 6x6 grid is the bottom of (3,5).
        assert_eq!(extra.position, Position::new(3, 6));

        // Entrance and exit are open, the rest of the boundary is not.
        for i in 0..maze.grid().circumference() {
            let pos = maze.grid().perimeter_position(i).unwrap();
            let side = maze.grid().perimeter_side(i).unwrap();
            assert_eq!(maze.is_wall_open(pos, side), i == 0 || i == 14);
        }

        // Noise letters only come from the alphabet and fill every gap.
        for pos in maze.grid().positions() {
            let letter = maze.letter_at(pos).unwrap();
            if maze.answer_key().letter_at(pos).is_none() {
                assert!("xyz".contains(letter));
            }
        }
        assert_eq!(maze.metrics().path_length, path.len());
    }

    #[test]
    fn test_boundaries_match_path_neighbours() {
        let config = sample_config();
        let mut rng = ChaCha8Rng::seed_from_u64(77);
        let maze = generate_word_maze(&config, &mut rng).unwrap();

        let boundaries = maze.boundaries();
        assert_eq!(boundaries.len(), 3);
        assert_eq!(boundaries[0].candidates.as_slice(), &[maze.path()[0]]);
        assert_eq!(boundaries[1].offset, 4);
        assert_eq!(boundaries[2].offset, 9);
        for boundary in &boundaries[1..] {
            let before = maze.path()[boundary.offset - 1];
            assert_eq!(boundary.candidates, maze.grid().open_neighbors(before));
        }
    }

    #[test]
    fn test_same_seed_same_maze() {
        let config = sample_config();
        let build = || {
            let mut rng = ChaCha8Rng::seed_from_u64(31337);
            generate_word_maze(&config, &mut rng).unwrap().snapshot()
        };
        assert_eq!(build(), build());
    }

    #[test]
    fn test_places_alternates() {
        let mut config = sample_config();
        config.alternates = vec![words(&["ROBOT"]), vec![], words(&["CLIPPY", "QQ"])];
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let maze = generate_word_maze(&config, &mut rng).unwrap();

        let placement = maze.metrics().placement;
        assert_eq!(placement.exact + placement.fallback + placement.skipped, 3);
        // ROBOT always fits: its first letter matches the entrance cell.
        assert!(placement.exact + placement.fallback >= 1);
    }

    #[test]
    fn test_unsolvable_after_last_attempt() {
        // Two cells apart, but the sequence needs a single-cell path.
        let mut config = MazeConfig::new(2, 2, 0, 5, words(&["AB"]));
        config.max_attempts = 3;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert_eq!(
            generate_word_maze(&config, &mut rng).unwrap_err(),
            MazeError::Unsolvable { length: 2 }
        );
    }

    #[test]
    fn test_invalid_config_is_not_retried() {
        let mut config = sample_config();
        config.barrier_removals = 1000;
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        assert!(matches!(
            generate_word_maze(&config, &mut rng),
            Err(MazeError::TooManyBarrierRemovals { .. })
        ));
    }

    #[test]
    fn test_snapshot_serializes_camel_case() {
        let config = sample_config();
        let mut rng = ChaCha8Rng::seed_from_u64(8);
        let maze = generate_word_maze(&config, &mut rng).unwrap();
        let json = serde_json::to_value(maze.snapshot()).unwrap();

        assert_eq!(json["width"], 6);
        assert_eq!(json["verticalWalls"].as_array().unwrap().len(), 6);
        assert_eq!(json["horizontalWalls"].as_array().unwrap().len(), 7);
        assert_eq!(json["answerKey"].as_array().unwrap().len(), 6);
        assert_eq!(json["extraLetter"]["letter"], "E");
        assert_eq!(json["questions"].as_array().unwrap().len(), 0);
    }

    #[test]
    fn test_questions_pass_through_to_snapshot() {
        let mut config = sample_config();
        config.questions = words(&["Systems language?", "Build tool?", "Package?"]);
        let mut rng = ChaCha8Rng::seed_from_u64(12);
        let maze = generate_word_maze(&config, &mut rng).unwrap();

        assert_eq!(maze.questions(), config.questions.as_slice());
        assert_eq!(maze.snapshot().questions, config.questions);
    }
}
