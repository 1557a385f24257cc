//! Date parsing and the date-driven schedule: puzzle type, difficulty ramp, and seed.

use chrono::{Datelike, Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::config::{EngineConfig, check_difficulty_modifier};
use crate::error::PuzzleError;
use crate::types::PuzzleType;

pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Strict `YYYY-MM-DD` parse.
pub fn parse_date(text: &str) -> Result<NaiveDate, PuzzleError> {
    let trimmed = text.trim();
    // chrono accepts unpadded fields; the daily seed depends on the exact text.
    if trimmed.len() != 10 {
        return Err(PuzzleError::InvalidDate(text.to_string()));
    }
    NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|_| PuzzleError::InvalidDate(text.to_string()))
}

pub fn format_date(date: NaiveDate) -> String {
    date.format(DATE_FORMAT).to_string()
}

/// 1-indexed day within the proleptic Gregorian year.
pub fn day_of_year(date: NaiveDate) -> u32 {
    date.ordinal()
}

pub fn puzzle_type_on(date: NaiveDate) -> PuzzleType {
    PuzzleType::from_rotation(day_of_year(date) as usize)
}

/// `1 + (doy % 10) * 0.1`: a ten-day sawtooth over `[1.0, 1.9]`.
pub fn base_difficulty(date: NaiveDate) -> f64 {
    1.0 + f64::from(day_of_year(date) % 10) * 0.1
}

pub fn round_difficulty(difficulty: f64) -> f64 {
    (difficulty * 10.0).round() / 10.0
}

/// Everything about a date's puzzle that is known before any random draw.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DailySchedule {
    pub date: NaiveDate,
    pub puzzle_type: PuzzleType,
    /// Unrounded; generators see this value.
    pub difficulty: f64,
    pub seed: String,
}

impl DailySchedule {
    pub fn for_date(date: NaiveDate, config: &EngineConfig) -> Result<Self, PuzzleError> {
        check_difficulty_modifier(config.difficulty_modifier)?;
        Ok(Self {
            date,
            puzzle_type: puzzle_type_on(date),
            difficulty: base_difficulty(date) * config.difficulty_modifier,
            seed: format!("{}{}", config.seed_prefix, format_date(date)),
        })
    }

    pub fn display_difficulty(&self) -> f64 {
        round_difficulty(self.difficulty)
    }
}

/// Schedules for `from` and the `days` dates after it (inclusive of `from`).
pub fn upcoming_schedule(
    from: NaiveDate,
    days: u32,
    config: &EngineConfig,
) -> Result<Vec<DailySchedule>, PuzzleError> {
    (0..=u64::from(days))
        .map_while(|offset| from.checked_add_days(Days::new(offset)))
        .map(|date| DailySchedule::for_date(date, config))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(text: &str) -> NaiveDate {
        parse_date(text).unwrap()
    }

    #[test]
    fn parses_iso_dates_and_rejects_garbage() {
        assert_eq!(date("2026-02-17"), NaiveDate::from_ymd_opt(2026, 2, 17).unwrap());
        for bad in ["", "2026-2-17", "2026-02-30", "17/02/2026", "yesterday", "2026-13-01"] {
            assert_eq!(parse_date(bad), Err(PuzzleError::InvalidDate(bad.to_string())));
        }
    }

    #[test]
    fn day_of_year_accounts_for_leap_years() {
        assert_eq!(day_of_year(date("2026-01-01")), 1);
        assert_eq!(day_of_year(date("2026-03-01")), 60);
        assert_eq!(day_of_year(date("2024-03-01")), 61);
        assert_eq!(day_of_year(date("2024-12-31")), 366);
    }

    #[test]
    fn type_rotation_follows_day_of_year_modulo_five() {
        // doy 48 -> index 3
        assert_eq!(puzzle_type_on(date("2026-02-17")), PuzzleType::DeductionGrid);
        assert_eq!(puzzle_type_on(date("2026-01-05")), PuzzleType::NumberMatrix);
        assert_eq!(puzzle_type_on(date("2026-01-01")), PuzzleType::PatternMatch);
    }

    #[test]
    fn difficulty_ramps_over_ten_days() {
        assert_eq!(round_difficulty(base_difficulty(date("2026-01-10"))), 1.0);
        assert_eq!(round_difficulty(base_difficulty(date("2026-01-09"))), 1.9);
        let schedule = DailySchedule::for_date(
            date("2026-01-04"),
            &EngineConfig::default().with_difficulty_modifier(2.0),
        )
        .unwrap();
        assert_eq!(schedule.display_difficulty(), 2.8);
        assert_eq!(schedule.seed, "logic-looper-2026-01-04");
    }

    #[test]
    fn upcoming_schedule_is_inclusive_and_consecutive() {
        let schedule = upcoming_schedule(date("2026-12-29"), 7, &EngineConfig::default()).unwrap();
        assert_eq!(schedule.len(), 8);
        assert_eq!(schedule[0].date, date("2026-12-29"));
        assert_eq!(schedule[7].date, date("2027-01-05"));
        for entry in &schedule {
            assert_eq!(entry.puzzle_type, puzzle_type_on(entry.date));
        }
    }

    #[test]
    fn schedule_rejects_negative_modifier() {
        let config = EngineConfig::default().with_difficulty_modifier(-1.0);
        assert_eq!(
            DailySchedule::for_date(date("2026-02-17"), &config),
            Err(PuzzleError::InvalidDifficulty(-1.0))
        );
    }
}
