//! Streak derivation from a raw activity log.
//!
//! This is the authoritative computation; [`crate::stats::StatsAggregate`] keeps the same
//! numbers incrementally and both must agree on the same solve history.

use std::collections::BTreeSet;

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::stats::SolveEvent;

/// Anything that can be read as a `{date, solved}` pair.
pub trait SolvedDay {
    fn date(&self) -> NaiveDate;
    fn solved(&self) -> bool;
}

impl SolvedDay for (NaiveDate, bool) {
    fn date(&self) -> NaiveDate {
        self.0
    }

    fn solved(&self) -> bool {
        self.1
    }
}

impl SolvedDay for SolveEvent {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn solved(&self) -> bool {
        true
    }
}

impl<T: SolvedDay> SolvedDay for &T {
    fn date(&self) -> NaiveDate {
        (**self).date()
    }

    fn solved(&self) -> bool {
        (**self).solved()
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakSummary {
    pub current_streak: u32,
    pub longest_streak: u32,
}

/// Current and longest streaks as of `today`.
///
/// The current streak counts back from `today`, or from yesterday when today has no solve
/// yet, so an unfinished day does not break a running streak.
pub fn calculate_streaks<I>(entries: I, today: NaiveDate) -> StreakSummary
where
    I: IntoIterator,
    I::Item: SolvedDay,
{
    let solved: BTreeSet<NaiveDate> =
        entries.into_iter().filter(|entry| entry.solved()).map(|entry| entry.date()).collect();

    let mut cursor = if solved.contains(&today) { Some(today) } else { previous_day(today) };
    let mut current_streak = 0;
    while let Some(day) = cursor.filter(|day| solved.contains(day)) {
        current_streak += 1;
        cursor = previous_day(day);
    }

    let mut longest_streak = 0;
    let mut run = 0;
    let mut last: Option<NaiveDate> = None;
    for &day in &solved {
        run = match last {
            Some(prev) if previous_day(day) == Some(prev) => run + 1,
            _ => 1,
        };
        longest_streak = longest_streak.max(run);
        last = Some(day);
    }

    StreakSummary { current_streak, longest_streak: longest_streak.max(current_streak) }
}

fn previous_day(day: NaiveDate) -> Option<NaiveDate> {
    day.checked_sub_days(Days::new(1))
}
