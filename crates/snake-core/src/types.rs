//! Fundamental grid types.

use serde::{Deserialize, Serialize};

use crate::constants::GRID_SIZE;

/// A single board cell. The board is GRID_SIZE x GRID_SIZE with (0, 0)
/// in the top-left corner and y growing downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub x: i32,
    pub y: i32,
}

impl Cell {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The neighboring cell one step in the given direction.
    pub fn step(&self, direction: Direction) -> Cell {
        let (dx, dy) = direction.delta();
        Cell {
            x: self.x + dx,
            y: self.y + dy,
        }
    }

    /// Whether the cell lies on the board.
    pub fn in_bounds(&self) -> bool {
        self.x >= 0 && self.x < GRID_SIZE && self.y >= 0 && self.y < GRID_SIZE
    }
}

/// Travel direction, as a unit delta on the grid.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Up,
    Down,
    Left,
    #[default]
    Right,
}

impl Direction {
    /// Unit delta vector (dx, dy).
    pub fn delta(&self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::Down => (0, 1),
            Direction::Left => (-1, 0),
            Direction::Right => (1, 0),
        }
    }

    /// The exact reverse of this direction.
    pub fn opposite(&self) -> Direction {
        match self {
            Direction::Up => Direction::Down,
            Direction::Down => Direction::Up,
            Direction::Left => Direction::Right,
            Direction::Right => Direction::Left,
        }
    }

    /// True when applying `other` would reverse travel 180 degrees.
    pub fn is_opposite(&self, other: Direction) -> bool {
        other == self.opposite()
    }
}

/// Victory target length for the secret-phrase mode: one body cell per
/// character plus the head.
pub fn secret_target_length(phrase: &str) -> u32 {
    phrase.chars().count() as u32 + 1
}
