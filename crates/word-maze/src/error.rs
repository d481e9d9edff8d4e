//! Error types shared by every stage of maze construction.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type MazeResult<T> = Result<T, MazeError>;

/// Everything that can go wrong while building a word maze.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MazeError {
    /// No walk of the required length connects the entrance to the exit.
    /// The only recovery is to regenerate the maze and try again.
    #[error("maze cannot be solved with a path of length {length}")]
    Unsolvable { length: usize },

    #[error("perimeter index {index} is outside 0..{circumference}")]
    PerimeterOutOfRange { index: usize, circumference: usize },

    #[error("mazes must be between 2x2 and 4096x4096, got {width}x{height}")]
    InvalidDimensions { width: usize, height: usize },

    #[error("entrance and exit must use different perimeter positions")]
    SamePerimeterPosition,

    #[error("expected {expected} alternate answer lists (one per word), got {actual}")]
    AlternateCountMismatch { expected: usize, actual: usize },

    #[error("expected {expected} questions (one per word), got {actual}")]
    QuestionCountMismatch { expected: usize, actual: usize },

    /// Asking for more removals than there are closed interior walls would
    /// never terminate, so it is rejected up front.
    #[error("cannot remove {requested} barriers, only {available} interior walls are closed")]
    TooManyBarrierRemovals { requested: usize, available: usize },

    #[error("word sequence must have at least 2 letters, got {length}")]
    SequenceTooShort { length: usize },

    #[error("word {index} is empty")]
    EmptyWord { index: usize },

    #[error("alternate {index} for word {word} is empty")]
    EmptyAlternate { word: usize, index: usize },

    #[error("fill alphabet is empty")]
    EmptyAlphabet,

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl MazeError {
    /// Whether a fresh maze might succeed where this one failed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, MazeError::Unsolvable { .. })
    }
}
