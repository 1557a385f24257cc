//! Date-driven dispatch into the puzzle families.
//!
//! A [`PuzzleEngine`] owns its configuration and nothing else: every call builds a fresh
//! stream from the date's seed, so generation for different dates can interleave or run in
//! parallel without sharing state.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::calendar::{DailySchedule, format_date, parse_date, puzzle_type_on};
use crate::config::EngineConfig;
use crate::error::PuzzleError;
use crate::puzzles::binary_logic::{self, GateAnswers, GateHint};
use crate::puzzles::deduction_grid::{self, AssignmentHint, Assignments};
use crate::puzzles::number_matrix::{self, CellHint, Grid};
use crate::puzzles::pattern_match::{self, EliminationHint};
use crate::puzzles::sequence_solver::{self, BlankAnswers, RuleHint};
use crate::puzzles::{
    BinaryLogicPuzzle, DeductionGridPuzzle, NumberMatrixPuzzle, PatternMatchPuzzle,
    SequenceSolverPuzzle,
};
use crate::rng::{Mulberry32, create_rng};
use crate::types::PuzzleType;

/// A generated daily puzzle: the common envelope plus the family-specific body.
///
/// The solution travels inside the body; the client is trusted to check its own answers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Puzzle {
    pub date: NaiveDate,
    /// Rounded to one decimal for display.
    pub difficulty: f64,
    #[serde(flatten)]
    pub body: PuzzleBody,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum PuzzleBody {
    NumberMatrix(NumberMatrixPuzzle),
    PatternMatch(PatternMatchPuzzle),
    SequenceSolver(SequenceSolverPuzzle),
    DeductionGrid(DeductionGridPuzzle),
    BinaryLogic(BinaryLogicPuzzle),
}

impl PuzzleBody {
    pub fn kind(&self) -> PuzzleType {
        match self {
            Self::NumberMatrix(_) => PuzzleType::NumberMatrix,
            Self::PatternMatch(_) => PuzzleType::PatternMatch,
            Self::SequenceSolver(_) => PuzzleType::SequenceSolver,
            Self::DeductionGrid(_) => PuzzleType::DeductionGrid,
            Self::BinaryLogic(_) => PuzzleType::BinaryLogic,
        }
    }

    fn generate(kind: PuzzleType, rng: &mut Mulberry32, difficulty: f64) -> Self {
        match kind {
            PuzzleType::NumberMatrix => {
                Self::NumberMatrix(number_matrix::generate(rng, difficulty))
            }
            PuzzleType::PatternMatch => {
                Self::PatternMatch(pattern_match::generate(rng, difficulty))
            }
            PuzzleType::SequenceSolver => {
                Self::SequenceSolver(sequence_solver::generate(rng, difficulty))
            }
            PuzzleType::DeductionGrid => {
                Self::DeductionGrid(deduction_grid::generate(rng, difficulty))
            }
            PuzzleType::BinaryLogic => Self::BinaryLogic(binary_logic::generate(rng, difficulty)),
        }
    }
}

impl Puzzle {
    pub fn kind(&self) -> PuzzleType {
        self.body.kind()
    }

    /// The embedded solution expressed as the answer a player would submit.
    pub fn solution_answer(&self) -> Answer {
        match &self.body {
            PuzzleBody::NumberMatrix(p) => Answer::NumberMatrix(p.solution.clone()),
            PuzzleBody::PatternMatch(p) => {
                Answer::PatternMatch(p.rounds.iter().map(|round| round.answer_index).collect())
            }
            PuzzleBody::SequenceSolver(p) => {
                Answer::SequenceSolver(sequence_solver::solution_answers(p))
            }
            PuzzleBody::DeductionGrid(p) => Answer::DeductionGrid(p.solution.assignments.clone()),
            PuzzleBody::BinaryLogic(p) => Answer::BinaryLogic(p.solution.clone()),
        }
    }

    /// Number of rounds the player steps through; single-board families have one.
    pub fn round_count(&self) -> usize {
        match &self.body {
            PuzzleBody::PatternMatch(p) => p.total_rounds,
            PuzzleBody::SequenceSolver(p) => p.total_rounds,
            _ => 1,
        }
    }
}

/// A player's submission, shaped per family.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "camelCase")]
pub enum Answer {
    NumberMatrix(Grid),
    /// Chosen option index per round.
    PatternMatch(Vec<usize>),
    /// Blank values keyed `"{round}-{blank}"`.
    SequenceSolver(BlankAnswers),
    DeductionGrid(Assignments),
    BinaryLogic(GateAnswers),
}

impl Answer {
    pub fn kind(&self) -> PuzzleType {
        match self {
            Self::NumberMatrix(_) => PuzzleType::NumberMatrix,
            Self::PatternMatch(_) => PuzzleType::PatternMatch,
            Self::SequenceSolver(_) => PuzzleType::SequenceSolver,
            Self::DeductionGrid(_) => PuzzleType::DeductionGrid,
            Self::BinaryLogic(_) => PuzzleType::BinaryLogic,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Hint {
    NumberMatrix(CellHint),
    PatternMatch(EliminationHint),
    SequenceSolver(RuleHint),
    DeductionGrid(AssignmentHint),
    BinaryLogic(GateHint),
}

/// What a hint request knows about the play-through so far.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HintContext {
    /// Round being played (pattern and sequence families).
    pub round: usize,
    /// The player's current partial answer, if any.
    pub progress: Option<Answer>,
    /// Hints already revealed; selects the hint stream.
    pub hints_used: u32,
    /// Hints shown earlier in this play-through. They are never handed out again.
    pub revealed: Vec<Hint>,
}

/// Generation, validation, and hints under one explicit configuration.
#[derive(Clone, Debug, Default)]
pub struct PuzzleEngine {
    config: EngineConfig,
}

impl PuzzleEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn schedule(&self, date: NaiveDate) -> Result<DailySchedule, PuzzleError> {
        DailySchedule::for_date(date, &self.config)
    }

    pub fn generate(&self, date: NaiveDate) -> Result<Puzzle, PuzzleError> {
        let schedule = self.schedule(date)?;
        let mut rng = create_rng(schedule.seed.as_str());
        let body = PuzzleBody::generate(schedule.puzzle_type, &mut rng, schedule.difficulty);
        debug!(
            date = %format_date(date),
            puzzle_type = schedule.puzzle_type.code(),
            difficulty = schedule.difficulty,
            "generated puzzle"
        );
        Ok(Puzzle { date, difficulty: schedule.display_difficulty(), body })
    }

    pub fn generate_str(&self, date: &str) -> Result<Puzzle, PuzzleError> {
        self.generate(parse_date(date)?)
    }

    /// Stream for the `hints_used`-th hint of a play-through on `date`.
    pub fn hint_rng(&self, date: NaiveDate, hints_used: u32) -> Mulberry32 {
        create_rng(format!("{}hint-{}-{hints_used}", self.config.seed_prefix, format_date(date)))
    }

    /// The next hint for this play-through, or `None` when there is nothing new to reveal.
    pub fn hint(&self, puzzle: &Puzzle, context: &HintContext) -> Option<Hint> {
        let mut rng = self.hint_rng(puzzle.date, context.hints_used);
        let revealed = &context.revealed;
        let hint = match &puzzle.body {
            PuzzleBody::NumberMatrix(p) => {
                let mut grid = match &context.progress {
                    Some(Answer::NumberMatrix(grid)) => grid.clone(),
                    _ => p.puzzle.clone(),
                };
                for hint in revealed {
                    if let Hint::NumberMatrix(cell) = hint {
                        number_matrix::apply_hint(&mut grid, cell);
                    }
                }
                number_matrix::hint(p, &grid, &mut rng).map(Hint::NumberMatrix)
            }
            PuzzleBody::PatternMatch(p) => {
                let eliminated: Vec<usize> = revealed
                    .iter()
                    .filter_map(|hint| match hint {
                        Hint::PatternMatch(h) if h.round == context.round => {
                            Some(h.eliminate_index)
                        }
                        _ => None,
                    })
                    .collect();
                pattern_match::hint(p, context.round, &eliminated).map(Hint::PatternMatch)
            }
            PuzzleBody::SequenceSolver(p) => {
                sequence_solver::hint(p, context.round).map(Hint::SequenceSolver)
            }
            PuzzleBody::DeductionGrid(p) => {
                let names: Vec<&str> = revealed
                    .iter()
                    .filter_map(|hint| match hint {
                        Hint::DeductionGrid(h) => Some(h.name.as_str()),
                        _ => None,
                    })
                    .collect();
                deduction_grid::hint(p, &names, &mut rng).map(Hint::DeductionGrid)
            }
            PuzzleBody::BinaryLogic(p) => {
                let mut answers = match &context.progress {
                    Some(Answer::BinaryLogic(answers)) => answers.clone(),
                    _ => GateAnswers::new(),
                };
                for hint in revealed {
                    if let Hint::BinaryLogic(gate) = hint {
                        answers.insert(gate.gate_id.clone(), gate.answer);
                    }
                }
                binary_logic::hint(p, &answers).map(Hint::BinaryLogic)
            }
        };
        hint.filter(|hint| !revealed.contains(hint))
    }
}

/// Generates the puzzle for a `YYYY-MM-DD` date with the default seed prefix.
pub fn generate_puzzle(date: &str, difficulty_modifier: f64) -> Result<Puzzle, PuzzleError> {
    let config = EngineConfig::default().with_difficulty_modifier(difficulty_modifier);
    PuzzleEngine::new(config).generate_str(date)
}

/// False when the answer belongs to another family or does not match the puzzle.
pub fn validate_solution(kind: PuzzleType, answer: &Answer, puzzle: &Puzzle) -> bool {
    if kind != puzzle.kind() || kind != answer.kind() {
        return false;
    }
    match (answer, &puzzle.body) {
        (Answer::NumberMatrix(grid), PuzzleBody::NumberMatrix(p)) => {
            number_matrix::validate(grid, &p.solution)
        }
        (Answer::PatternMatch(chosen), PuzzleBody::PatternMatch(p)) => {
            pattern_match::validate(chosen, p)
        }
        (Answer::SequenceSolver(blanks), PuzzleBody::SequenceSolver(p)) => {
            sequence_solver::validate(blanks, p)
        }
        (Answer::DeductionGrid(assignments), PuzzleBody::DeductionGrid(p)) => {
            deduction_grid::validate(assignments, &p.solution)
        }
        (Answer::BinaryLogic(gates), PuzzleBody::BinaryLogic(p)) => {
            binary_logic::validate(gates, p)
        }
        _ => false,
    }
}

pub fn get_puzzle_hint(kind: PuzzleType, puzzle: &Puzzle, context: &HintContext) -> Option<Hint> {
    if kind != puzzle.kind() {
        return None;
    }
    PuzzleEngine::default().hint(puzzle, context)
}

pub fn puzzle_type_for_date(date: &str) -> Result<PuzzleType, PuzzleError> {
    parse_date(date).map(puzzle_type_on)
}
