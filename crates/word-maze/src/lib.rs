//! Word maze generation.
//!
//! This crate builds rectangular mazes whose solution path, walked from the
//! entrance to the exit, spells out a list of answer words. Alternate
//! answers can be threaded in next to each word so a second variant of the
//! puzzle exists, and every remaining cell is filled with noise letters.
//! Rendering is left to the caller, which reads walls and letters back
//! through [`WordMaze`] or its serializable [`MazeSnapshot`].

pub mod config;
pub mod error;
pub mod fill;
pub mod generator;
pub mod grid;
pub mod pipeline;
pub mod placer;
pub mod search;
pub mod segmenter;
pub mod solver;

// Re-export main types
pub use config::{MazeConfig, DEFAULT_ALPHABET};
pub use error::{MazeError, MazeResult};
pub use grid::{Position, Side, WordGrid};
pub use pipeline::{build_attempt, generate_word_maze, BuildMetrics, ExtraLetter, MazeSnapshot, WordMaze};
pub use placer::PlacementStats;
pub use search::SearchLimits;
pub use segmenter::WordBoundary;
pub use solver::{solve_word_path, PathSolution, SolverConfig};
