//! Cumulative player statistics folded from solve events.

use std::collections::BTreeMap;

use chrono::{Local, NaiveDate, Timelike};
use serde::{Deserialize, Serialize};

use crate::types::PuzzleType;

const SPEED_DEMON_SECONDS: u32 = 60;
const PERFECT_RUN: u32 = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Achievement {
    FirstSolve,
    #[serde(rename = "streak_3")]
    Streak3,
    #[serde(rename = "streak_7")]
    Streak7,
    #[serde(rename = "streak_30")]
    Streak30,
    NoHints,
    SpeedDemon,
    AllTypes,
    #[serde(rename = "perfect_10")]
    Perfect10,
    NightOwl,
    EarlyBird,
}

impl Achievement {
    pub const ALL: [Achievement; 10] = [
        Achievement::FirstSolve,
        Achievement::Streak3,
        Achievement::Streak7,
        Achievement::Streak30,
        Achievement::NoHints,
        Achievement::SpeedDemon,
        Achievement::AllTypes,
        Achievement::Perfect10,
        Achievement::NightOwl,
        Achievement::EarlyBird,
    ];

    pub fn id(self) -> &'static str {
        match self {
            Self::FirstSolve => "first_solve",
            Self::Streak3 => "streak_3",
            Self::Streak7 => "streak_7",
            Self::Streak30 => "streak_30",
            Self::NoHints => "no_hints",
            Self::SpeedDemon => "speed_demon",
            Self::AllTypes => "all_types",
            Self::Perfect10 => "perfect_10",
            Self::NightOwl => "night_owl",
            Self::EarlyBird => "early_bird",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::FirstSolve => "First Steps",
            Self::Streak3 => "On a Roll",
            Self::Streak7 => "Week Warrior",
            Self::Streak30 => "Monthly Master",
            Self::NoHints => "No Help Needed",
            Self::SpeedDemon => "Speed Demon",
            Self::AllTypes => "Well Rounded",
            Self::Perfect10 => "Perfect Ten",
            Self::NightOwl => "Night Owl",
            Self::EarlyBird => "Early Bird",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::FirstSolve => "Solve your first puzzle",
            Self::Streak3 => "3-day streak",
            Self::Streak7 => "7-day streak",
            Self::Streak30 => "30-day streak",
            Self::NoHints => "Solve without hints",
            Self::SpeedDemon => "Solve in under 60 seconds",
            Self::AllTypes => "Solve all 5 puzzle types",
            Self::Perfect10 => "10 puzzles with no mistakes",
            Self::NightOwl => "Solve after midnight",
            Self::EarlyBird => "Solve before 7 AM",
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveEvent {
    pub date: NaiveDate,
    pub points: u32,
    pub time_seconds: u32,
    pub puzzle_type: PuzzleType,
    pub no_mistakes: bool,
    #[serde(default)]
    pub hints_used: u32,
}

#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StatsAggregate {
    pub current_streak: u32,
    pub longest_streak: u32,
    pub total_solved: u32,
    pub total_points: u64,
    /// Running mean, rounded to whole seconds after every solve.
    pub average_time: u32,
    pub last_solve_date: Option<NaiveDate>,
    /// Points per date; several solves on one day add up.
    pub heatmap: BTreeMap<NaiveDate, u32>,
    /// First-solve order.
    pub solved_types: Vec<PuzzleType>,
    /// Unlock order; each achievement appears at most once.
    pub achievements: Vec<Achievement>,
    /// Consecutive solves with no mistakes.
    pub perfect_streak: u32,
    pub fastest_solve: Option<u32>,
}

impl StatsAggregate {
    /// Folds one solve into the aggregate.
    ///
    /// `local_hour` is the wall-clock hour at which the solve is recorded (not the puzzle's
    /// date); it only drives the night-owl and early-bird unlocks.
    pub fn apply_solve(&mut self, event: &SolveEvent, local_hour: u32) {
        match self.last_solve_date {
            Some(last) => {
                let gap = (event.date - last).num_days();
                if gap == 1 {
                    self.current_streak += 1;
                } else if gap > 1 {
                    self.current_streak = 1;
                }
            }
            None => self.current_streak = 1,
        }
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.last_solve_date = Some(event.date);

        self.total_solved += 1;
        self.total_points += u64::from(event.points);
        let solved = u64::from(self.total_solved);
        let previous_total = u64::from(self.average_time) * (solved - 1);
        let mean = (previous_total + u64::from(event.time_seconds)) as f64 / solved as f64;
        self.average_time = mean.round() as u32;

        *self.heatmap.entry(event.date).or_default() += event.points;

        if !self.solved_types.contains(&event.puzzle_type) {
            self.solved_types.push(event.puzzle_type);
        }

        if event.no_mistakes {
            self.perfect_streak += 1;
        } else {
            self.perfect_streak = 0;
        }

        if self.fastest_solve.is_none_or(|fastest| event.time_seconds < fastest) {
            self.fastest_solve = Some(event.time_seconds);
        }

        self.check_achievements(event, local_hour);
    }

    fn check_achievements(&mut self, event: &SolveEvent, local_hour: u32) {
        let earned = [
            (Achievement::FirstSolve, self.total_solved >= 1),
            (Achievement::Streak3, self.current_streak >= 3),
            (Achievement::Streak7, self.current_streak >= 7),
            (Achievement::Streak30, self.current_streak >= 30),
            (Achievement::NoHints, event.hints_used == 0),
            (Achievement::SpeedDemon, event.time_seconds < SPEED_DEMON_SECONDS),
            (Achievement::AllTypes, self.solved_types.len() >= PuzzleType::ALL.len()),
            (Achievement::Perfect10, self.perfect_streak >= PERFECT_RUN),
            (Achievement::NightOwl, local_hour < 5),
            (Achievement::EarlyBird, (5..7).contains(&local_hour)),
        ];
        for (achievement, unlocked) in earned {
            if unlocked {
                self.unlock(achievement);
            }
        }
    }

    /// Appends `achievement` unless it is already unlocked.
    pub fn unlock(&mut self, achievement: Achievement) {
        if !self.achievements.contains(&achievement) {
            self.achievements.push(achievement);
        }
    }

    pub fn has(&self, achievement: Achievement) -> bool {
        self.achievements.contains(&achievement)
    }

    pub fn points_on(&self, date: NaiveDate) -> u32 {
        self.heatmap.get(&date).copied().unwrap_or_default()
    }
}

/// Pure reducer form of [`StatsAggregate::apply_solve`].
pub fn record_solve(stats: &StatsAggregate, event: &SolveEvent, local_hour: u32) -> StatsAggregate {
    let mut next = stats.clone();
    next.apply_solve(event, local_hour);
    next
}

/// [`record_solve`] stamped with the current local hour.
pub fn record_solve_now(stats: &StatsAggregate, event: &SolveEvent) -> StatsAggregate {
    record_solve(stats, event, Local::now().hour())
}
