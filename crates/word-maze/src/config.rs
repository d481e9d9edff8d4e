//! Maze configuration as read from JSON.
//!
//! Field names are camelCase on the wire. Optional fields fall back to the
//! defaults below.

use serde::{Deserialize, Serialize};

use crate::error::{MazeError, MazeResult};
use crate::generator::max_barrier_removals;
use crate::grid::check_dimensions;
use crate::search::{SearchLimits, DEFAULT_MAX_EXPANSIONS};

/// Noise alphabet used when none is configured.
pub const DEFAULT_ALPHABET: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ";

fn default_alphabet() -> String {
    DEFAULT_ALPHABET.to_string()
}

fn default_max_attempts() -> usize {
    1
}

fn default_max_expansions() -> usize {
    DEFAULT_MAX_EXPANSIONS
}

/// Everything needed to build one word maze.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MazeConfig {
    pub width: usize,
    pub height: usize,
    /// Perimeter index of the entrance.
    pub start: usize,
    /// Perimeter index of the exit.
    pub end: usize,
    /// Extra interior walls to knock down after generation.
    #[serde(default)]
    pub barrier_removals: usize,
    /// Primary answers, in path order.
    pub words: Vec<String>,
    /// Clue for each word, in the same order; empty for none at all.
    #[serde(default)]
    pub questions: Vec<String>,
    /// Alternate answers per word; empty for none at all.
    #[serde(default)]
    pub alternates: Vec<Vec<String>>,
    #[serde(default = "default_alphabet")]
    pub alphabet: String,
    /// Seed for the random source. Chosen at random when absent.
    #[serde(default)]
    pub seed: Option<u64>,
    /// Fresh mazes to try before giving up on an unsolvable layout.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
    /// Search budget per path search.
    #[serde(default = "default_max_expansions")]
    pub max_expansions: usize,
}

impl MazeConfig {
    pub fn new(width: usize, height: usize, start: usize, end: usize, words: Vec<String>) -> Self {
        Self {
            width,
            height,
            start,
            end,
            barrier_removals: 0,
            words,
            questions: Vec::new(),
            alternates: Vec::new(),
            alphabet: default_alphabet(),
            seed: None,
            max_attempts: default_max_attempts(),
            max_expansions: default_max_expansions(),
        }
    }

    /// Parse, normalize and validate a JSON configuration.
    pub fn from_json(json: &str) -> MazeResult<Self> {
        let config: MazeConfig =
            serde_json::from_str(json).map_err(|e| MazeError::InvalidConfig(e.to_string()))?;
        let config = config.normalized();
        config.validate()?;
        Ok(config)
    }

    /// Trim and upper-case every answer, and trim every question.
    pub fn normalized(mut self) -> Self {
        self.questions
            .iter_mut()
            .for_each(|q| *q = q.trim().to_string());
        let normalize = |word: &mut String| *word = word.trim().to_uppercase();
        self.words.iter_mut().for_each(normalize);
        self.alternates
            .iter_mut()
            .flat_map(|list| list.iter_mut())
            .for_each(normalize);
        self
    }

    pub fn circumference(&self) -> usize {
        self.width.saturating_add(self.height).saturating_mul(2)
    }

    /// Check every constraint that can be known before generating.
    pub fn validate(&self) -> MazeResult<()> {
        check_dimensions(self.width, self.height)?;
        for index in [self.start, self.end] {
            if index >= self.circumference() {
                return Err(MazeError::PerimeterOutOfRange {
                    index,
                    circumference: self.circumference(),
                });
            }
        }
        if self.start == self.end {
            return Err(MazeError::SamePerimeterPosition);
        }
        if let Some(index) = self.words.iter().position(|w| w.is_empty()) {
            return Err(MazeError::EmptyWord { index });
        }
        let length = self.sequence().len();
        if length < 2 {
            return Err(MazeError::SequenceTooShort { length });
        }
        if !self.alternates.is_empty() && self.alternates.len() != self.words.len() {
            return Err(MazeError::AlternateCountMismatch {
                expected: self.words.len(),
                actual: self.alternates.len(),
            });
        }
        if !self.questions.is_empty() && self.questions.len() != self.words.len() {
            return Err(MazeError::QuestionCountMismatch {
                expected: self.words.len(),
                actual: self.questions.len(),
            });
        }
        for (word, list) in self.alternates.iter().enumerate() {
            if let Some(index) = list.iter().position(|a| a.is_empty()) {
                return Err(MazeError::EmptyAlternate { word, index });
            }
        }
        if self.alphabet.is_empty() {
            return Err(MazeError::EmptyAlphabet);
        }
        let available = max_barrier_removals(self.width, self.height);
        if self.barrier_removals > available {
            return Err(MazeError::TooManyBarrierRemovals {
                requested: self.barrier_removals,
                available,
            });
        }
        if self.max_attempts == 0 {
            return Err(MazeError::InvalidConfig(
                "maxAttempts must be at least 1".to_string(),
            ));
        }
        if self.max_expansions == 0 {
            return Err(MazeError::InvalidConfig(
                "maxExpansions must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    /// Each primary answer as characters.
    pub fn word_letters(&self) -> Vec<Vec<char>> {
        self.words.iter().map(|w| w.chars().collect()).collect()
    }

    /// All primary answers concatenated.
    pub fn sequence(&self) -> Vec<char> {
        self.words.iter().flat_map(|w| w.chars()).collect()
    }

    /// Alternates as characters, one list per word (empty lists when none
    /// were configured).
    pub fn alternate_letters(&self) -> Vec<Vec<Vec<char>>> {
        if self.alternates.is_empty() {
            return vec![Vec::new(); self.words.len()];
        }
        self.alternates
            .iter()
            .map(|list| list.iter().map(|w| w.chars().collect()).collect())
            .collect()
    }

    pub fn alphabet_chars(&self) -> Vec<char> {
        self.alphabet.chars().collect()
    }

    pub fn search_limits(&self) -> SearchLimits {
        SearchLimits {
            max_expansions: self.max_expansions,
        }
    }
}
