//! Sequence Solver: numeric sequences from six rule families with one or two blanked terms.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::difficulty_steps;
use crate::rng::{Mulberry32, rand_int, shuffle};

const MAX_ROUNDS: usize = 5;
const RECURRENCE_TERMS: usize = 8;
/// Blanking either of the first two terms would leave the rule unguessable.
pub const FIRST_BLANKABLE: usize = 2;

/// Submitted blank values keyed by [`blank_key`].
pub type BlankAnswers = BTreeMap<String, i64>;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SequenceRule {
    Arithmetic { start: i64, diff: i64 },
    Geometric { start: i64, ratio: i64 },
    Square { offset: i64 },
    Triangular { mult: i64 },
    FibonacciLike { terms: Vec<i64> },
    AlternatingAdd { add1: i64, add2: i64, terms: Vec<i64> },
}

const RULE_COUNT: i64 = 6;

impl SequenceRule {
    /// Draws a family uniformly, then its constants.
    fn random(rng: &mut Mulberry32) -> Self {
        match rand_int(0, RULE_COUNT - 1, rng) {
            0 => {
                let start = rand_int(1, 20, rng);
                let diff = rand_int(2, 8, rng);
                Self::Arithmetic { start, diff }
            }
            1 => {
                let start = rand_int(1, 5, rng);
                let ratio = rand_int(2, 3, rng);
                Self::Geometric { start, ratio }
            }
            2 => Self::Square { offset: rand_int(0, 5, rng) },
            3 => Self::Triangular { mult: rand_int(1, 3, rng) },
            4 => {
                let a = rand_int(1, 5, rng);
                let b = rand_int(1, 5, rng);
                let mut terms = vec![a, b];
                for i in 2..RECURRENCE_TERMS {
                    terms.push(terms[i - 1] + terms[i - 2]);
                }
                Self::FibonacciLike { terms }
            }
            _ => {
                let start = rand_int(1, 10, rng);
                let add1 = rand_int(2, 5, rng);
                let add2 = rand_int(3, 7, rng);
                let mut terms = vec![start];
                for i in 1..RECURRENCE_TERMS {
                    let step = if i % 2 == 1 { add1 } else { add2 };
                    terms.push(terms[i - 1] + step);
                }
                Self::AlternatingAdd { add1, add2, terms }
            }
        }
    }

    pub fn term(&self, i: usize) -> i64 {
        let n = i as i64;
        match self {
            Self::Arithmetic { start, diff } => start + diff * n,
            Self::Geometric { start, ratio } => start * ratio.pow(i as u32),
            Self::Square { offset } => (n + 1 + offset) * (n + 1 + offset),
            Self::Triangular { mult } => mult * ((n + 1) * (n + 2)) / 2,
            Self::FibonacciLike { terms } | Self::AlternatingAdd { terms, .. } => {
                terms.get(i).copied().unwrap_or_default()
            }
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Arithmetic { .. } => "arithmetic",
            Self::Geometric { .. } => "geometric",
            Self::Square { .. } => "square",
            Self::Triangular { .. } => "triangular",
            Self::FibonacciLike { .. } => "fibonacci-like",
            Self::AlternatingAdd { .. } => "alternating-add",
        }
    }

    pub fn label(&self) -> String {
        match self {
            Self::Arithmetic { diff, .. } => format!("+{diff}"),
            Self::Geometric { ratio, .. } => format!("×{ratio}"),
            Self::Square { .. } => "n²".to_string(),
            Self::Triangular { .. } => "triangular".to_string(),
            Self::FibonacciLike { .. } => "fib".to_string(),
            Self::AlternatingAdd { add1, add2, .. } => format!("+{add1}/+{add2}"),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceRound {
    pub sequence: Vec<i64>,
    /// Ascending indices into `sequence`, all at least [`FIRST_BLANKABLE`].
    pub blanks: Vec<usize>,
    pub rule_name: String,
    pub rule_label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SequenceSolverPuzzle {
    pub rounds: Vec<SequenceRound>,
    pub total_rounds: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleHint {
    pub round: usize,
    pub rule_name: String,
    pub rule_label: String,
}

/// Answer-map key for blank number `blank` of round `round`.
pub fn blank_key(round: usize, blank: usize) -> String {
    format!("{round}-{blank}")
}

pub fn round_count(difficulty: f64) -> usize {
    (2 + difficulty_steps(difficulty)).min(MAX_ROUNDS)
}

pub fn blank_count(difficulty: f64) -> usize {
    if difficulty >= 2.0 { 2 } else { 1 }
}

pub fn generate(rng: &mut Mulberry32, difficulty: f64) -> SequenceSolverPuzzle {
    let total_rounds = round_count(difficulty);
    let rounds = (0..total_rounds).map(|_| generate_round(rng, difficulty)).collect();
    SequenceSolverPuzzle { rounds, total_rounds }
}

fn generate_round(rng: &mut Mulberry32, difficulty: f64) -> SequenceRound {
    let rule = SequenceRule::random(rng);
    let length = rand_int(5, 7, rng) as usize;
    let sequence = (0..length).map(|i| rule.term(i)).collect();

    let mut blankable: Vec<usize> = (FIRST_BLANKABLE..length).collect();
    shuffle(&mut blankable, rng);
    let mut blanks: Vec<usize> = blankable.into_iter().take(blank_count(difficulty)).collect();
    blanks.sort_unstable();

    SequenceRound { sequence, blanks, rule_name: rule.name().to_string(), rule_label: rule.label() }
}

/// The answers that fill every blank of the puzzle.
pub fn solution_answers(puzzle: &SequenceSolverPuzzle) -> BlankAnswers {
    let mut answers = BlankAnswers::new();
    for (ri, round) in puzzle.rounds.iter().enumerate() {
        for (bi, &index) in round.blanks.iter().enumerate() {
            answers.insert(blank_key(ri, bi), round.sequence[index]);
        }
    }
    answers
}

pub fn validate(answers: &BlankAnswers, puzzle: &SequenceSolverPuzzle) -> bool {
    puzzle.rounds.iter().enumerate().all(|(ri, round)| {
        round.blanks.iter().enumerate().all(|(bi, &index)| {
            answers.get(&blank_key(ri, bi)) == round.sequence.get(index)
        })
    })
}

/// Reveals the rule of `round`, never a number.
pub fn hint(puzzle: &SequenceSolverPuzzle, round: usize) -> Option<RuleHint> {
    let current = puzzle.rounds.get(round)?;
    Some(RuleHint {
        round,
        rule_name: current.rule_name.clone(),
        rule_label: current.rule_label.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::create_rng;

    #[test]
    fn rule_terms_follow_their_formulas() {
        assert_eq!(
            (0..5)
                .map(|i| SequenceRule::Arithmetic { start: 3, diff: 4 }.term(i))
                .collect::<Vec<_>>(),
            vec![3, 7, 11, 15, 19]
        );
        assert_eq!(SequenceRule::Geometric { start: 2, ratio: 3 }.term(4), 162);
        assert_eq!(SequenceRule::Square { offset: 2 }.term(0), 9);
        assert_eq!(
            (0..4).map(|i| SequenceRule::Triangular { mult: 2 }.term(i)).collect::<Vec<_>>(),
            vec![2, 6, 12, 20]
        );
        assert_eq!(SequenceRule::Arithmetic { start: 1, diff: 2 }.label(), "+2");
        assert_eq!(SequenceRule::Geometric { start: 1, ratio: 2 }.label(), "×2");
    }

    #[test]
    fn blanks_are_in_bounds_sorted_and_skip_first_two() {
        for seed in 0..50_u32 {
            for difficulty in [1.0, 2.5] {
                let puzzle = generate(&mut create_rng(seed), difficulty);
                for round in &puzzle.rounds {
                    assert!((5..=7).contains(&round.sequence.len()));
                    assert_eq!(round.blanks.len(), blank_count(difficulty));
                    assert!(round.blanks.windows(2).all(|pair| pair[0] < pair[1]));
                    assert!(round.blanks.iter().all(|&i| i >= FIRST_BLANKABLE));
                    assert!(round.blanks.iter().all(|&i| i < round.sequence.len()));
                }
            }
        }
    }

    #[test]
    fn recurrence_rules_satisfy_their_recurrence() {
        for seed in 0..80_u32 {
            let puzzle = generate(&mut create_rng(seed), 1.0);
            for round in &puzzle.rounds {
                let s = &round.sequence;
                match round.rule_name.as_str() {
                    "fibonacci-like" => {
                        assert!((2..s.len()).all(|i| s[i] == s[i - 1] + s[i - 2]));
                    }
                    "arithmetic" => {
                        assert!((2..s.len()).all(|i| s[i] - s[i - 1] == s[1] - s[0]));
                    }
                    _ => {}
                }
            }
        }
    }

    #[test]
    fn validate_requires_each_blank() {
        let puzzle = generate(&mut create_rng("sequence"), 2.0);
        let mut answers = solution_answers(&puzzle);
        assert!(validate(&answers, &puzzle));

        let key = blank_key(0, 1);
        *answers.get_mut(&key).expect("two blanks at difficulty 2") += 1;
        assert!(!validate(&answers, &puzzle));

        answers.remove(&key);
        assert!(!validate(&answers, &puzzle));
    }

    #[test]
    fn hint_reveals_rule_only_for_existing_rounds() {
        let puzzle = generate(&mut create_rng("rule"), 1.0);
        let hint = hint(&puzzle, 1).expect("round 1 exists");
        assert_eq!(hint.round, 1);
        assert_eq!(hint.rule_name, puzzle.rounds[1].rule_name);
        assert_eq!(hint.rule_label, puzzle.rounds[1].rule_label);
        assert_eq!(super::hint(&puzzle, 99), None);
    }
}
