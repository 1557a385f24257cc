//! One player's attempt at a day's puzzle: timer, hint budget, and scoring.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::activity::ActivityEntry;
use crate::error::{PuzzleError, SessionError};
use crate::generator::{Answer, Hint, HintContext, Puzzle, PuzzleEngine, validate_solution};
use crate::stats::SolveEvent;

pub const POINTS_BASE: u32 = 100;
pub const POINTS_FLOOR: u32 = 10;
const HINT_PENALTY: u32 = 20;
const MINUTE_PENALTY: u32 = 5;

/// `max(10, 100 - 20 per hint - 5 per full minute)`.
pub fn score(hints_used: u32, elapsed_seconds: u32) -> u32 {
    let penalty = hints_used
        .saturating_mul(HINT_PENALTY)
        .saturating_add((elapsed_seconds / 60).saturating_mul(MINUTE_PENALTY));
    POINTS_BASE.saturating_sub(penalty).max(POINTS_FLOOR)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    Playing,
    /// The last submission was wrong; the player may try again.
    Failed,
    Solved,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SolveOutcome {
    pub points: u32,
    pub event: SolveEvent,
    pub entry: ActivityEntry,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Submission {
    Solved(SolveOutcome),
    Incorrect { attempts: u32 },
}

#[derive(Clone, Debug)]
pub struct PlaySession {
    engine: PuzzleEngine,
    puzzle: Puzzle,
    status: SessionStatus,
    hints_used: u32,
    hints: Vec<Hint>,
    elapsed_seconds: u32,
    round: usize,
    progress: Option<Answer>,
    attempts: u32,
}

impl PlaySession {
    pub fn start(engine: &PuzzleEngine, date: NaiveDate) -> Result<Self, PuzzleError> {
        let puzzle = engine.generate(date)?;
        Ok(Self::with_puzzle(engine, puzzle))
    }

    pub fn with_puzzle(engine: &PuzzleEngine, puzzle: Puzzle) -> Self {
        Self {
            engine: engine.clone(),
            puzzle,
            status: SessionStatus::Playing,
            hints_used: 0,
            hints: Vec::new(),
            elapsed_seconds: 0,
            round: 0,
            progress: None,
            attempts: 0,
        }
    }

    pub fn puzzle(&self) -> &Puzzle {
        &self.puzzle
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn hints_used(&self) -> u32 {
        self.hints_used
    }

    pub fn hints_remaining(&self) -> u32 {
        self.engine.config().max_hints.saturating_sub(self.hints_used)
    }

    /// Hints revealed so far, oldest first.
    pub fn hints(&self) -> &[Hint] {
        &self.hints
    }

    pub fn elapsed_seconds(&self) -> u32 {
        self.elapsed_seconds
    }

    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Advances the timer; a solved session's clock is stopped.
    pub fn tick(&mut self, seconds: u32) {
        if self.status != SessionStatus::Solved {
            self.elapsed_seconds = self.elapsed_seconds.saturating_add(seconds);
        }
    }

    pub fn round(&self) -> usize {
        self.round
    }

    /// Moves to `round`, clamped to the puzzle's last round.
    pub fn set_round(&mut self, round: usize) {
        self.round = round.min(self.puzzle.round_count().saturating_sub(1));
    }

    pub fn set_progress(&mut self, answer: Answer) {
        self.progress = Some(answer);
    }

    pub fn progress(&self) -> Option<&Answer> {
        self.progress.as_ref()
    }

    /// Reveals the next hint. A request with nothing left to reveal costs nothing.
    pub fn request_hint(&mut self) -> Result<Option<Hint>, SessionError> {
        if self.status == SessionStatus::Solved {
            return Err(SessionError::AlreadySolved);
        }
        let budget = self.engine.config().max_hints;
        if self.hints_used >= budget {
            return Err(SessionError::HintsExhausted { used: self.hints_used, budget });
        }
        let context = HintContext {
            round: self.round,
            progress: self.progress.clone(),
            hints_used: self.hints_used,
            revealed: self.hints.clone(),
        };
        let hint = self.engine.hint(&self.puzzle, &context);
        if let Some(hint) = &hint {
            self.hints_used += 1;
            self.hints.push(hint.clone());
            debug!(hints_used = self.hints_used, budget, "hint revealed");
        }
        Ok(hint)
    }

    /// Checks `answer`; a correct one ends the session and produces the day's records.
    pub fn submit(&mut self, answer: Answer) -> Result<Submission, SessionError> {
        if self.status == SessionStatus::Solved {
            return Err(SessionError::AlreadySolved);
        }
        self.attempts += 1;
        let correct = validate_solution(self.puzzle.kind(), &answer, &self.puzzle);
        self.progress = Some(answer);
        if !correct {
            self.status = SessionStatus::Failed;
            debug!(attempts = self.attempts, "incorrect submission");
            return Ok(Submission::Incorrect { attempts: self.attempts });
        }

        self.status = SessionStatus::Solved;
        let points = score(self.hints_used, self.elapsed_seconds);
        let no_mistakes = self.hints_used == 0;
        let event = SolveEvent {
            date: self.puzzle.date,
            points,
            time_seconds: self.elapsed_seconds,
            puzzle_type: self.puzzle.kind(),
            no_mistakes,
            hints_used: self.hints_used,
        };
        let entry = ActivityEntry {
            date: self.puzzle.date,
            solved: true,
            score: points,
            puzzle_type: self.puzzle.kind(),
            time_seconds: self.elapsed_seconds,
            hints_used: self.hints_used,
            no_mistakes,
            synced: false,
        };
        info!(
            date = %self.puzzle.date,
            puzzle_type = self.puzzle.kind().code(),
            points,
            seconds = self.elapsed_seconds,
            "puzzle solved"
        );
        Ok(Submission::Solved(SolveOutcome { points, event, entry }))
    }
}
