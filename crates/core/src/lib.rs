pub mod activity;
pub mod activity_file;
pub mod calendar;
pub mod config;
pub mod error;
pub mod fingerprint;
pub mod generator;
pub mod puzzles;
pub mod rng;
pub mod session;
pub mod stats;
pub mod streaks;
pub mod types;

pub use activity::{ActivityEntry, ActivityLog, intensity};
pub use activity_file::{
    ActivityLogWriter, LoadedActivityLog, load_activity_log, open_activity_log,
};
pub use calendar::{DailySchedule, format_date, parse_date, upcoming_schedule};
pub use config::EngineConfig;
pub use error::{ActivityLoadError, PuzzleError, SessionError};
pub use generator::{
    Answer, Hint, HintContext, Puzzle, PuzzleBody, PuzzleEngine, generate_puzzle, get_puzzle_hint,
    puzzle_type_for_date, validate_solution,
};
pub use rng::{Mulberry32, Seed, create_rng, hash_seed, pick_n, rand_int, shuffle};
pub use session::{PlaySession, SessionStatus, SolveOutcome, Submission};
pub use stats::{Achievement, SolveEvent, StatsAggregate, record_solve, record_solve_now};
pub use streaks::{SolvedDay, StreakSummary, calculate_streaks};
pub use types::PuzzleType;
