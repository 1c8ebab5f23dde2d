//! Random placement of food and bonuses.

use std::collections::VecDeque;

use rand::Rng;

use snake_core::constants::{GRID_SIZE, PLACEMENT_MAX_ATTEMPTS};
use snake_core::types::Cell;

/// Pick a random cell not covered by the snake or any excluded cell.
///
/// Rejection sampling with a retry cap; past the cap the last sample is
/// accepted so the call terminates even on a nearly full grid.
pub fn random_free_cell<R: Rng>(rng: &mut R, snake: &VecDeque<Cell>, exclude: &[Cell]) -> Cell {
    let mut cell = random_cell(rng);
    let mut attempts = 0;
    while (snake.contains(&cell) || exclude.contains(&cell)) && attempts < PLACEMENT_MAX_ATTEMPTS {
        cell = random_cell(rng);
        attempts += 1;
    }
    cell
}

fn random_cell<R: Rng>(rng: &mut R) -> Cell {
    Cell::new(rng.gen_range(0..GRID_SIZE), rng.gen_range(0..GRID_SIZE))
}
