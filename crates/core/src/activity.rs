//! Per-day activity records, the store that sync and streak derivation read from.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::stats::SolveEvent;
use crate::streaks::{SolvedDay, StreakSummary, calculate_streaks};
use crate::types::PuzzleType;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityEntry {
    pub date: NaiveDate,
    pub solved: bool,
    pub score: u32,
    pub puzzle_type: PuzzleType,
    pub time_seconds: u32,
    pub hints_used: u32,
    pub no_mistakes: bool,
    #[serde(default)]
    pub synced: bool,
}

impl ActivityEntry {
    pub fn intensity(&self) -> u8 {
        intensity(self.score)
    }

    /// The stats event this record stands for; unsolved days have none.
    pub fn solve_event(&self) -> Option<SolveEvent> {
        self.solved.then(|| SolveEvent {
            date: self.date,
            points: self.score,
            time_seconds: self.time_seconds,
            puzzle_type: self.puzzle_type,
            no_mistakes: self.no_mistakes,
            hints_used: self.hints_used,
        })
    }
}

impl SolvedDay for ActivityEntry {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn solved(&self) -> bool {
        self.solved
    }
}

/// Heatmap bucket for a day's score: 0 for nothing, then 1 to 4.
pub fn intensity(score: u32) -> u8 {
    match score {
        0 => 0,
        1..50 => 1,
        50..80 => 2,
        80..100 => 3,
        _ => 4,
    }
}

/// One user's activity in record order. Later records for a date replace earlier ones.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActivityLog {
    pub user_id: String,
    pub entries: Vec<ActivityEntry>,
}

impl ActivityLog {
    pub fn new(user_id: impl Into<String>) -> Self {
        Self { user_id: user_id.into(), entries: Vec::new() }
    }

    pub fn record(&mut self, entry: ActivityEntry) {
        self.entries.push(entry);
    }

    /// Last-write-wins view keyed by date.
    pub fn latest_by_date(&self) -> BTreeMap<NaiveDate, &ActivityEntry> {
        self.entries.iter().map(|entry| (entry.date, entry)).collect()
    }

    pub fn get(&self, date: NaiveDate) -> Option<&ActivityEntry> {
        self.entries.iter().rev().find(|entry| entry.date == date)
    }

    pub fn unsynced(&self) -> Vec<&ActivityEntry> {
        self.latest_by_date().into_values().filter(|entry| !entry.synced).collect()
    }

    pub fn total_solved(&self) -> usize {
        self.latest_by_date().values().filter(|entry| entry.solved).count()
    }

    pub fn total_score(&self) -> u64 {
        self.latest_by_date().values().map(|entry| u64::from(entry.score)).sum()
    }

    pub fn intensities(&self) -> BTreeMap<NaiveDate, u8> {
        self.latest_by_date().into_iter().map(|(date, entry)| (date, entry.intensity())).collect()
    }

    pub fn streaks(&self, today: NaiveDate) -> StreakSummary {
        calculate_streaks(self.latest_by_date().into_values(), today)
    }
}
