//! Number Matrix: a 4×4 Latin square with some cells hidden.
//!
//! The full square is built by backtracking over cells in row-major order, trying values in a
//! freshly shuffled order at every visit. The search keeps an explicit frame stack; its draw
//! order is the same as the recursive formulation, so the generated square only depends on the
//! stream.

use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::rng::{Mulberry32, shuffle};

pub const SIZE: usize = 4;
const MIN_REVEALED: usize = 4;

pub type Grid = Vec<Vec<u8>>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NumberMatrixPuzzle {
    pub size: usize,
    /// Starting board; `0` marks a hidden cell.
    pub puzzle: Grid,
    pub solution: Grid,
    pub given: Vec<Vec<bool>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellHint {
    pub row: usize,
    pub col: usize,
    pub value: u8,
}

struct Frame {
    cell: usize,
    candidates: Vec<u8>,
    next: usize,
}

pub fn generate(rng: &mut Mulberry32, difficulty: f64) -> NumberMatrixPuzzle {
    let solution = build_latin_square(SIZE, rng);

    let mut positions: Vec<(usize, usize)> =
        (0..SIZE).flat_map(|row| (0..SIZE).map(move |col| (row, col))).collect();
    shuffle(&mut positions, rng);

    let mut given = vec![vec![false; SIZE]; SIZE];
    for &(row, col) in positions.iter().take(reveal_count(difficulty)) {
        given[row][col] = true;
    }

    let puzzle = solution
        .iter()
        .zip(&given)
        .map(|(values, shown)| {
            values.iter().zip(shown).map(|(&value, &shown)| if shown { value } else { 0 }).collect()
        })
        .collect();

    NumberMatrixPuzzle { size: SIZE, puzzle, solution, given }
}

/// `max(4, floor(16 * (0.65 - difficulty * 0.1)))`, capped at the board size.
pub fn reveal_count(difficulty: f64) -> usize {
    let total = SIZE * SIZE;
    let scaled = (total as f64 * (0.65 - difficulty * 0.1)).floor();
    if scaled <= MIN_REVEALED as f64 { MIN_REVEALED } else { (scaled as usize).min(total) }
}

fn build_latin_square(size: usize, rng: &mut Mulberry32) -> Grid {
    let total = size * size;
    let mut cells = vec![0_u8; total];
    let mut stack = vec![Frame { cell: 0, candidates: candidate_order(size, rng), next: 0 }];
    let mut backtracks = 0_u32;

    while let Some(frame) = stack.last_mut() {
        let (row, col) = (frame.cell / size, frame.cell % size);
        cells[frame.cell] = 0;

        let mut placed = None;
        while frame.next < frame.candidates.len() {
            let value = frame.candidates[frame.next];
            frame.next += 1;
            if fits(&cells, size, row, col, value) {
                placed = Some(value);
                break;
            }
        }

        match placed {
            Some(value) => {
                cells[frame.cell] = value;
                let next_cell = frame.cell + 1;
                if next_cell == total {
                    break;
                }
                let candidates = candidate_order(size, rng);
                stack.push(Frame { cell: next_cell, candidates, next: 0 });
            }
            None => {
                stack.pop();
                backtracks += 1;
            }
        }
    }

    trace!(backtracks, "latin square built");
    cells.chunks(size).map(<[u8]>::to_vec).collect()
}

fn candidate_order(size: usize, rng: &mut Mulberry32) -> Vec<u8> {
    let mut values: Vec<u8> = (1..=size as u8).collect();
    shuffle(&mut values, rng);
    values
}

fn fits(cells: &[u8], size: usize, row: usize, col: usize, value: u8) -> bool {
    (0..size).all(|i| cells[row * size + i] != value && cells[i * size + col] != value)
}

/// Every row and column is a permutation of `1..=size`.
pub fn is_latin_square(grid: &[Vec<u8>], size: usize) -> bool {
    let is_permutation = |values: &mut dyn Iterator<Item = u8>| {
        let mut seen = vec![false; size + 1];
        let mut count = 0;
        for value in values {
            let slot = usize::from(value);
            if slot == 0 || slot > size || seen[slot] {
                return false;
            }
            seen[slot] = true;
            count += 1;
        }
        count == size
    };

    grid.len() == size
        && grid.iter().all(|row| row.len() == size)
        && (0..size).all(|r| is_permutation(&mut grid[r].iter().copied()))
        && (0..size).all(|c| is_permutation(&mut grid.iter().map(|row| row[c])))
}

/// True iff the grid has the solution's shape and every cell matches exactly.
pub fn validate(user_grid: &[Vec<u8>], solution: &[Vec<u8>]) -> bool {
    user_grid.len() == solution.len()
        && user_grid.iter().zip(solution).all(|(user_row, row)| user_row == row)
}

/// Writes a revealed cell into `grid`; cells outside the grid are ignored.
pub fn apply_hint(grid: &mut [Vec<u8>], hint: &CellHint) {
    if let Some(cell) = grid.get_mut(hint.row).and_then(|row| row.get_mut(hint.col)) {
        *cell = hint.value;
    }
}

/// One non-given cell the player has wrong or empty, or `None` when nothing is left.
pub fn hint(
    puzzle: &NumberMatrixPuzzle,
    user_grid: &[Vec<u8>],
    rng: &mut Mulberry32,
) -> Option<CellHint> {
    let mut open = Vec::new();
    for (row, values) in puzzle.solution.iter().enumerate() {
        for (col, &value) in values.iter().enumerate() {
            let given = puzzle.given.get(row).and_then(|g| g.get(col)).copied().unwrap_or(false);
            let entered = user_grid.get(row).and_then(|user_row| user_row.get(col)).copied();
            if !given && entered != Some(value) {
                open.push(CellHint { row, col, value });
            }
        }
    }
    if open.is_empty() {
        return None;
    }
    Some(open[rng.below(open.len())])
}
