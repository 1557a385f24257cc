//! Pattern Match: pick the element that continues a repeating visual sequence.

use serde::{Deserialize, Serialize};

use super::difficulty_steps;
use crate::rng::{Mulberry32, choose, rand_int, shuffle};

pub const OPTION_COUNT: usize = 4;
const MAX_ROUNDS: usize = 6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Shape {
    Circle,
    Square,
    Triangle,
    Diamond,
    Star,
    Hexagon,
}

pub const SHAPES: [Shape; 6] =
    [Shape::Circle, Shape::Square, Shape::Triangle, Shape::Diamond, Shape::Star, Shape::Hexagon];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "#FF6B6B")]
    Coral,
    #[serde(rename = "#4ECDC4")]
    Turquoise,
    #[serde(rename = "#45B7D1")]
    Sky,
    #[serde(rename = "#96CEB4")]
    Sage,
    #[serde(rename = "#FFEAA7")]
    Cream,
    #[serde(rename = "#DDA0DD")]
    Plum,
    #[serde(rename = "#98D8C8")]
    Mint,
    #[serde(rename = "#F7DC6F")]
    Mustard,
}

pub const COLORS: [Color; 8] = [
    Color::Coral,
    Color::Turquoise,
    Color::Sky,
    Color::Sage,
    Color::Cream,
    Color::Plum,
    Color::Mint,
    Color::Mustard,
];

impl Color {
    pub fn hex(self) -> &'static str {
        match self {
            Self::Coral => "#FF6B6B",
            Self::Turquoise => "#4ECDC4",
            Self::Sky => "#45B7D1",
            Self::Sage => "#96CEB4",
            Self::Cream => "#FFEAA7",
            Self::Plum => "#DDA0DD",
            Self::Mint => "#98D8C8",
            Self::Mustard => "#F7DC6F",
        }
    }
}

/// Degrees.
pub const ROTATIONS: [u16; 4] = [0, 90, 180, 270];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Element {
    pub shape: Shape,
    pub color: Color,
    pub rotation: u16,
}

impl Element {
    fn random(rng: &mut Mulberry32) -> Self {
        let shape = *choose(&SHAPES, rng);
        let color = *choose(&COLORS, rng);
        let rotation = *choose(&ROTATIONS, rng);
        Self { shape, color, rotation }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternRound {
    pub sequence: Vec<Element>,
    pub options: Vec<Element>,
    pub answer_index: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PatternMatchPuzzle {
    pub rounds: Vec<PatternRound>,
    pub total_rounds: usize,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EliminationHint {
    pub round: usize,
    pub eliminate_index: usize,
}

pub fn round_count(difficulty: f64) -> usize {
    (3 + difficulty_steps(difficulty)).min(MAX_ROUNDS)
}

pub fn generate(rng: &mut Mulberry32, difficulty: f64) -> PatternMatchPuzzle {
    let total_rounds = round_count(difficulty);
    let rounds = (0..total_rounds).map(|_| generate_round(rng)).collect();
    PatternMatchPuzzle { rounds, total_rounds }
}

fn generate_round(rng: &mut Mulberry32) -> PatternRound {
    let length = rand_int(4, 6, rng) as usize;
    let period = rand_int(2, 4, rng) as usize;
    let base: Vec<Element> = (0..period).map(|_| Element::random(rng)).collect();
    let sequence = (0..length).map(|i| base[i % period]).collect();
    let answer = base[length % period];

    let mut options = vec![answer];
    while options.len() < OPTION_COUNT {
        let distractor = Element::random(rng);
        if distractor != answer {
            options.push(distractor);
        }
    }
    shuffle(&mut options, rng);
    let answer_index = options.iter().position(|option| *option == answer).unwrap_or_default();

    PatternRound { sequence, options, answer_index }
}

/// One chosen option index per round, each equal to that round's answer index.
pub fn validate(answers: &[usize], puzzle: &PatternMatchPuzzle) -> bool {
    answers.len() == puzzle.rounds.len()
        && puzzle.rounds.iter().zip(answers).all(|(round, &chosen)| chosen == round.answer_index)
}

/// The first wrong option of `round` not already in `eliminated`. `None` once every wrong
/// option is gone or when the round does not exist.
pub fn hint(
    puzzle: &PatternMatchPuzzle,
    round: usize,
    eliminated: &[usize],
) -> Option<EliminationHint> {
    let current = puzzle.rounds.get(round)?;
    (0..current.options.len())
        .find(|index| *index != current.answer_index && !eliminated.contains(index))
        .map(|eliminate_index| EliminationHint { round, eliminate_index })
}
