//! Grid layout and reordering rules for the 5x5 board.
//!
//! All functions assume a well-formed grid (25 squares, exactly one center)
//! and do not self-heal malformed input.

use rand::seq::SliceRandom;
use rand::Rng;

use shared::{Square, CENTER_INDEX, FREE_SQUARE_TEXT, GRID_SQUARES};

/// The default layout of a freshly created board: 25 squares with empty
/// content and the pinned center at index 12 reading "FREE".
pub fn default_squares() -> Vec<Square> {
    (0..GRID_SQUARES)
        .map(|i| {
            let is_center = i == CENTER_INDEX;
            Square {
                id: Square::generate_id(),
                content: if is_center {
                    FREE_SQUARE_TEXT.to_string()
                } else {
                    String::new()
                },
                is_center,
            }
        })
        .collect()
}

/// Move the square `source_id` to the position of `dest_id`, shifting the
/// squares in between by one (a single-element move, not a swap).
///
/// Returns `None` when the move is rejected: the center square can never be
/// moved, nothing can be moved into the center slot, and unknown or equal
/// ids leave the grid untouched.
pub fn reposition(squares: &[Square], source_id: &str, dest_id: &str) -> Option<Vec<Square>> {
    let source = squares.iter().position(|s| s.id == source_id)?;
    let dest = squares.iter().position(|s| s.id == dest_id)?;

    if source == dest {
        return None;
    }
    if squares[source].is_center || squares[dest].is_center {
        return None;
    }

    let mut reordered = squares.to_vec();
    let moved = reordered.remove(source);
    reordered.insert(dest, moved);

    // A move across the middle drags the pinned square off index 12; put it
    // back without disturbing the moved element's landing position.
    if let Some(center) = reordered.iter().position(|s| s.is_center) {
        if center != CENTER_INDEX && CENTER_INDEX < reordered.len() {
            let pinned = reordered.remove(center);
            reordered.insert(CENTER_INDEX, pinned);
        }
    }

    Some(reordered)
}

/// Shuffle the 24 non-center squares with an unbiased Fisher-Yates
/// permutation and reinsert the center at index 12. A grid without a center
/// square is shuffled as-is.
pub fn randomize(squares: &[Square]) -> Vec<Square> {
    let mut rng = rand::rng();
    randomize_with(squares, &mut rng)
}

/// Deterministic variant of [`randomize`] for seeded callers.
pub fn randomize_with<R: Rng + ?Sized>(squares: &[Square], rng: &mut R) -> Vec<Square> {
    let center = squares.iter().find(|s| s.is_center).cloned();
    let mut shuffled: Vec<Square> = squares.iter().filter(|s| !s.is_center).cloned().collect();
    shuffled.shuffle(rng);

    if let Some(center) = center {
        shuffled.insert(CENTER_INDEX, center);
    }
    shuffled
}

/// Replace a single square's text, leaving order untouched. Returns `None`
/// for an unknown square id.
pub fn set_square_content(squares: &[Square], square_id: &str, content: &str) -> Option<Vec<Square>> {
    squares.iter().position(|s| s.id == square_id)?;

    Some(
        squares
            .iter()
            .map(|s| {
                if s.id == square_id {
                    Square {
                        content: content.to_string(),
                        ..s.clone()
                    }
                } else {
                    s.clone()
                }
            })
            .collect(),
    )
}
