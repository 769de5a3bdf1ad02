//! Token-selection validation for the "take tokens" action
//!
//! A normal take is 1-3 board tokens on a straight, gap-free line; the bonus
//! mode (entered through the Token ability) instead demands exactly one token
//! of a required color. Gold and empty cells are never selectable.

use crate::board::{Board, Pos};
use crate::core::TokenKind;
use crate::{GameError, Result};
use smallvec::SmallVec;

/// Validation mode for a proposed selection
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Regular 1-3 token take
    Normal,
    /// Ability-driven take of exactly one token of this color
    Bonus { color: TokenKind },
}

/// Validate a set of board positions for taking. Returns the token kinds at
/// those positions (in the order given) so the caller can move them without
/// a second lookup.
pub fn validate_selection(
    board: &Board,
    positions: &[Pos],
    mode: SelectionMode,
) -> Result<SmallVec<[TokenKind; 3]>> {
    let mut kinds: SmallVec<[TokenKind; 3]> = SmallVec::new();
    for &pos in positions {
        if !pos.in_bounds() {
            return Err(GameError::InvalidAction(format!(
                "Position {} is off the board",
                pos
            )));
        }
        if positions.iter().filter(|p| **p == pos).count() > 1 {
            return Err(GameError::InvalidAction(format!(
                "Position {} selected twice",
                pos
            )));
        }
        match board.token_at(pos) {
            None => {
                return Err(GameError::InvalidAction(format!("Cell {} is empty", pos)));
            }
            Some(TokenKind::Gold) => {
                return Err(GameError::InvalidAction(
                    "Gold tokens cannot be taken".to_string(),
                ));
            }
            Some(kind) => kinds.push(kind),
        }
    }

    match mode {
        SelectionMode::Bonus { color } => {
            if kinds.len() != 1 {
                return Err(GameError::InvalidAction(
                    "Exactly one bonus token must be selected".to_string(),
                ));
            }
            if kinds[0] != color {
                return Err(GameError::InvalidAction(format!(
                    "The bonus token must be {}",
                    color
                )));
            }
        }
        SelectionMode::Normal => match positions.len() {
            1 => {}
            2 => {
                let (a, b) = (positions[0], positions[1]);
                let dr = (a.row as i16 - b.row as i16).abs();
                let dc = (a.col as i16 - b.col as i16).abs();
                if dr.max(dc) != 1 {
                    return Err(GameError::InvalidAction(
                        "Two tokens must be adjacent".to_string(),
                    ));
                }
            }
            3 => {
                let mut sorted: SmallVec<[Pos; 3]> = SmallVec::from_slice(positions);
                sorted.sort();
                let (first, mid, last) = (sorted[0], sorted[1], sorted[2]);
                let dr = last.row as i16 - first.row as i16;
                let dc = last.col as i16 - first.col as i16;
                let is_line = matches!((dr, dc), (0, 2) | (2, 0) | (2, 2) | (2, -2));
                let mid_on_line = mid.row as i16 == first.row as i16 + dr / 2
                    && mid.col as i16 == first.col as i16 + dc / 2;
                if !is_line || !mid_on_line {
                    return Err(GameError::InvalidAction(
                        "Three tokens must form an unbroken line".to_string(),
                    ));
                }
            }
            n => {
                return Err(GameError::InvalidAction(format!(
                    "Cannot take {} tokens (1 to 3 allowed)",
                    n
                )));
            }
        },
    }

    Ok(kinds)
}

/// How many scrolls the opponent is owed for this exact set of taken tokens.
/// The matching-color and two-pearl rules are checked independently and can
/// both fire from the same take.
pub fn scroll_awards(kinds: &[TokenKind]) -> u8 {
    let mut awards = 0;
    if kinds.len() == 3 && kinds.iter().all(|k| *k == kinds[0]) {
        awards += 1;
    }
    if kinds.iter().filter(|k| **k == TokenKind::Pearl).count() == 2 {
        awards += 1;
    }
    awards
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_with(cells: &[(Pos, TokenKind)]) -> Board {
        let mut board = Board::empty();
        for &(pos, kind) in cells {
            board.place(pos, kind);
        }
        board
    }

    #[test]
    fn test_single_token_always_valid() {
        let board = board_with(&[(Pos::new(0, 0), TokenKind::Blue)]);
        let kinds = validate_selection(&board, &[Pos::new(0, 0)], SelectionMode::Normal).unwrap();
        assert_eq!(kinds.as_slice(), &[TokenKind::Blue]);
    }

    #[test]
    fn test_gold_and_empty_rejected() {
        let board = board_with(&[(Pos::new(1, 1), TokenKind::Gold)]);
        assert!(validate_selection(&board, &[Pos::new(1, 1)], SelectionMode::Normal).is_err());
        assert!(validate_selection(&board, &[Pos::new(3, 3)], SelectionMode::Normal).is_err());
    }

    #[test]
    fn test_pair_adjacency() {
        let board = board_with(&[
            (Pos::new(2, 2), TokenKind::Blue),
            (Pos::new(3, 3), TokenKind::Red),
            (Pos::new(2, 4), TokenKind::Green),
        ]);
        // Diagonal neighbors are fine
        assert!(
            validate_selection(&board, &[Pos::new(2, 2), Pos::new(3, 3)], SelectionMode::Normal)
                .is_ok()
        );
        // Distance two is not
        assert!(
            validate_selection(&board, &[Pos::new(2, 2), Pos::new(2, 4)], SelectionMode::Normal)
                .is_err()
        );
    }

    #[test]
    fn test_row_of_three_mixed_colors_is_valid() {
        let board = board_with(&[
            (Pos::new(2, 2), TokenKind::Blue),
            (Pos::new(2, 3), TokenKind::Red),
            (Pos::new(2, 4), TokenKind::Green),
        ]);
        let kinds = validate_selection(
            &board,
            &[Pos::new(2, 2), Pos::new(2, 3), Pos::new(2, 4)],
            SelectionMode::Normal,
        )
        .unwrap();
        assert_eq!(kinds.len(), 3);
    }

    #[test]
    fn test_anti_diagonal_line() {
        let board = board_with(&[
            (Pos::new(0, 4), TokenKind::Blue),
            (Pos::new(1, 3), TokenKind::Blue),
            (Pos::new(2, 2), TokenKind::Blue),
        ]);
        assert!(validate_selection(
            &board,
            &[Pos::new(2, 2), Pos::new(0, 4), Pos::new(1, 3)],
            SelectionMode::Normal,
        )
        .is_ok());
    }

    #[test]
    fn test_gapped_line_rejected() {
        let board = board_with(&[
            (Pos::new(0, 0), TokenKind::Blue),
            (Pos::new(0, 1), TokenKind::Blue),
            (Pos::new(0, 3), TokenKind::Blue),
        ]);
        assert!(validate_selection(
            &board,
            &[Pos::new(0, 0), Pos::new(0, 1), Pos::new(0, 3)],
            SelectionMode::Normal,
        )
        .is_err());
    }

    #[test]
    fn test_line_containing_gold_rejected() {
        let board = board_with(&[
            (Pos::new(4, 0), TokenKind::Blue),
            (Pos::new(4, 1), TokenKind::Gold),
            (Pos::new(4, 2), TokenKind::Blue),
        ]);
        assert!(validate_selection(
            &board,
            &[Pos::new(4, 0), Pos::new(4, 1), Pos::new(4, 2)],
            SelectionMode::Normal,
        )
        .is_err());
    }

    #[test]
    fn test_bonus_mode_requires_exact_color() {
        let board = board_with(&[
            (Pos::new(1, 1), TokenKind::Red),
            (Pos::new(1, 2), TokenKind::Blue),
        ]);
        let mode = SelectionMode::Bonus {
            color: TokenKind::Red,
        };
        assert!(validate_selection(&board, &[Pos::new(1, 1)], mode).is_ok());
        assert!(validate_selection(&board, &[Pos::new(1, 2)], mode).is_err());
        assert!(validate_selection(&board, &[Pos::new(1, 1), Pos::new(1, 2)], mode).is_err());
    }

    #[test]
    fn test_scroll_awards() {
        use TokenKind::*;
        assert_eq!(scroll_awards(&[Blue, Blue, Blue]), 1);
        assert_eq!(scroll_awards(&[Pearl, Pearl, Blue]), 1);
        assert_eq!(scroll_awards(&[Pearl, Pearl]), 1);
        assert_eq!(scroll_awards(&[Pearl, Blue, Green]), 0);
        assert_eq!(scroll_awards(&[Blue, Blue]), 0);
        // The rules are checked independently of each other
        assert_eq!(scroll_awards(&[Pearl, Pearl, Green]), 1);
        assert_eq!(scroll_awards(&[Green, Green, Green]), 1);
    }
}
