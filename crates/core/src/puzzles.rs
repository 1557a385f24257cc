//! The five puzzle families. Each module exposes `generate`, `validate`, and `hint` over its
//! own plain-data types; `generator` dispatches between them.

pub mod binary_logic;
pub mod deduction_grid;
pub mod number_matrix;
pub mod pattern_match;
pub mod sequence_solver;

pub use binary_logic::BinaryLogicPuzzle;
pub use deduction_grid::DeductionGridPuzzle;
pub use number_matrix::NumberMatrixPuzzle;
pub use pattern_match::PatternMatchPuzzle;
pub use sequence_solver::SequenceSolverPuzzle;

/// `floor(difficulty)` as a count, never below zero.
pub(crate) fn difficulty_steps(difficulty: f64) -> usize {
    difficulty.max(0.0).floor() as usize
}
