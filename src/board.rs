//! The 5x5 token board and the bag of returned tokens
//!
//! Tokens enter the board along a fixed spiral from the center cell, both at
//! setup and whenever the bag is poured back during a refill.

use crate::core::{TokenCounts, TokenKind, GEM_KINDS};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;

pub const BOARD_SIZE: usize = 5;

/// Tokens in play: 4 of each gem color, 2 pearls, 3 gold
pub fn starting_tokens() -> Vec<TokenKind> {
    let mut tokens = Vec::with_capacity(25);
    for &kind in &GEM_KINDS {
        for _ in 0..4 {
            tokens.push(kind);
        }
    }
    tokens.push(TokenKind::Pearl);
    tokens.push(TokenKind::Pearl);
    for _ in 0..3 {
        tokens.push(TokenKind::Gold);
    }
    tokens
}

/// A board cell position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub row: u8,
    pub col: u8,
}

impl Pos {
    pub fn new(row: u8, col: u8) -> Self {
        Pos { row, col }
    }

    pub fn in_bounds(self) -> bool {
        (self.row as usize) < BOARD_SIZE && (self.col as usize) < BOARD_SIZE
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.col)
    }
}

/// The placement order: clockwise spiral from the center cell (2,2) going
/// right first, with the step length growing every two direction changes.
/// Off-board steps of the outer arms are skipped.
pub fn spiral_order() -> Vec<Pos> {
    // (row delta, col delta) for right, down, left, up
    const DIRS: [(i8, i8); 4] = [(0, 1), (1, 0), (0, -1), (-1, 0)];

    let mut order = Vec::with_capacity(BOARD_SIZE * BOARD_SIZE);
    let (mut row, mut col) = (2i8, 2i8);
    order.push(Pos::new(row as u8, col as u8));

    let mut leg = 0usize;
    while order.len() < BOARD_SIZE * BOARD_SIZE {
        let (dr, dc) = DIRS[leg % 4];
        let steps = leg / 2 + 1;
        for _ in 0..steps {
            row += dr;
            col += dc;
            let in_bounds =
                (0..BOARD_SIZE as i8).contains(&row) && (0..BOARD_SIZE as i8).contains(&col);
            if in_bounds {
                order.push(Pos::new(row as u8, col as u8));
                if order.len() == BOARD_SIZE * BOARD_SIZE {
                    break;
                }
            }
        }
        leg += 1;
    }
    order
}

/// The 5x5 token grid. Gold tokens only ever leave it through reserving.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Board {
    cells: [[Option<TokenKind>; BOARD_SIZE]; BOARD_SIZE],
}

impl Default for Board {
    fn default() -> Self {
        Board {
            cells: [[None; BOARD_SIZE]; BOARD_SIZE],
        }
    }
}

impl Board {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Shuffle the full starting token set onto the board in spiral order
    pub fn filled<R: Rng>(rng: &mut R) -> Self {
        let mut board = Board::empty();
        let mut tokens = starting_tokens();
        tokens.shuffle(rng);
        for (pos, kind) in spiral_order().into_iter().zip(tokens) {
            board.place(pos, kind);
        }
        board
    }

    pub fn token_at(&self, pos: Pos) -> Option<TokenKind> {
        if !pos.in_bounds() {
            return None;
        }
        self.cells[pos.row as usize][pos.col as usize]
    }

    pub fn place(&mut self, pos: Pos, kind: TokenKind) {
        self.cells[pos.row as usize][pos.col as usize] = Some(kind);
    }

    /// Remove and return the token at a cell
    pub fn take(&mut self, pos: Pos) -> Option<TokenKind> {
        if !pos.in_bounds() {
            return None;
        }
        self.cells[pos.row as usize][pos.col as usize].take()
    }

    pub fn count_of(&self, kind: TokenKind) -> u8 {
        let mut count = 0;
        for row in &self.cells {
            for cell in row {
                if *cell == Some(kind) {
                    count += 1;
                }
            }
        }
        count
    }

    pub fn has(&self, kind: TokenKind) -> bool {
        self.count_of(kind) > 0
    }

    pub fn total_tokens(&self) -> u8 {
        let mut count = 0;
        for row in &self.cells {
            count += row.iter().filter(|cell| cell.is_some()).count() as u8;
        }
        count
    }

    /// Positions of gold tokens, in spiral order
    pub fn gold_positions(&self) -> Vec<Pos> {
        spiral_order()
            .into_iter()
            .filter(|&pos| self.token_at(pos) == Some(TokenKind::Gold))
            .collect()
    }

    /// Pour the shuffled bag into empty cells along the spiral, stopping when
    /// either runs out. Returns how many tokens were placed.
    pub fn refill_from<R: Rng>(&mut self, bag: &mut TokenCounts, rng: &mut R) -> u8 {
        let mut tokens = bag.expand();
        tokens.shuffle(rng);

        let mut poured = 0;
        let mut next = tokens.into_iter();
        for pos in spiral_order() {
            if self.token_at(pos).is_some() {
                continue;
            }
            match next.next() {
                Some(kind) => {
                    bag.remove_one(kind);
                    self.place(pos, kind);
                    poured += 1;
                }
                None => break,
            }
        }
        poured
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for cell in row {
                match cell {
                    Some(kind) => write!(f, "{} ", kind)?,
                    None => write!(f, ". ")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
