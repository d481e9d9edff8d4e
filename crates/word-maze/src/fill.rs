//! Noise letters for every cell no answer claimed.

use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{MazeError, MazeResult};
use crate::grid::WordGrid;

/// Give every unset cell a random letter from `alphabet`, returning how
/// many cells were filled.
pub fn fill_random_letters<R: Rng + ?Sized>(
    grid: &mut WordGrid,
    alphabet: &[char],
    rng: &mut R,
) -> MazeResult<usize> {
    if alphabet.is_empty() {
        return Err(MazeError::EmptyAlphabet);
    }

    let blanks: Vec<_> = grid
        .positions()
        .filter(|&pos| grid.letter_at(pos).is_none())
        .collect();
    for &pos in &blanks {
        let letter = alphabet.choose(rng).copied();
        grid.set_letter(pos, letter);
    }
    Ok(blanks.len())
}
