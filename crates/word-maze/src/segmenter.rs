//! Splits the solved path back into the individual answer words.
//!
//! Each word gets a [`WordBoundary`]: where its letters start along the path
//! and which cells could serve as the start of an alternate answer for it.
//! The alternates branch off one step from the cell just before the word,
//! so that a second version of the puzzle can diverge at that point.

use smallvec::SmallVec;

use crate::grid::{Position, WordGrid};

/// Where one answer word starts on the path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordBoundary {
    /// Index into the path of the word's first letter.
    pub offset: usize,
    /// Cells an alternate answer for this word may start from.
    pub candidates: SmallVec<[Position; 4]>,
}

/// Outcome of replaying the path word by word.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segmentation {
    pub boundaries: Vec<WordBoundary>,
    /// Set when the path ran out before the sequence did; always the last
    /// character of the whole sequence.
    pub extra_letter: Option<char>,
}

/// Write `words` along `path` in order and record a boundary per word.
///
/// The first word's only candidate is the path start. Every later word's
/// candidates are the open neighbours of the path cell just before its
/// first letter. Characters past the end of the path are not placed.
pub fn segment_words(grid: &mut WordGrid, path: &[Position], words: &[Vec<char>]) -> Segmentation {
    let mut boundaries = Vec::with_capacity(words.len());
    let mut offset: usize = 0;

    for (i, word) in words.iter().enumerate() {
        let candidates: SmallVec<[Position; 4]> = if i == 0 {
            path.first().copied().into_iter().collect()
        } else {
            offset
                .checked_sub(1)
                .and_then(|before| path.get(before))
                .map(|&pos| grid.open_neighbors(pos))
                .unwrap_or_default()
        };
        boundaries.push(WordBoundary { offset, candidates });

        for (k, &letter) in word.iter().enumerate() {
            if let Some(&pos) = path.get(offset + k) {
                grid.set_letter(pos, Some(letter));
            }
        }
        offset += word.len();
    }

    let extra_letter = if path.len() < offset {
        words.iter().rev().find_map(|w| w.last().copied())
    } else {
        None
    };

    Segmentation {
        boundaries,
        extra_letter,
    }
}
