use serde::{Deserialize, Serialize};

/// The five daily puzzle families, in rotation order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PuzzleType {
    NumberMatrix,
    PatternMatch,
    SequenceSolver,
    DeductionGrid,
    BinaryLogic,
}

impl PuzzleType {
    /// Rotation order: the type for a date is `ALL[day_of_year % 5]`.
    pub const ALL: [PuzzleType; 5] = [
        PuzzleType::NumberMatrix,
        PuzzleType::PatternMatch,
        PuzzleType::SequenceSolver,
        PuzzleType::DeductionGrid,
        PuzzleType::BinaryLogic,
    ];

    pub fn from_rotation(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    pub fn code(self) -> &'static str {
        match self {
            Self::NumberMatrix => "numberMatrix",
            Self::PatternMatch => "patternMatch",
            Self::SequenceSolver => "sequenceSolver",
            Self::DeductionGrid => "deductionGrid",
            Self::BinaryLogic => "binaryLogic",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NumberMatrix => "Number Matrix",
            Self::PatternMatch => "Pattern Match",
            Self::SequenceSolver => "Sequence Solver",
            Self::DeductionGrid => "Deduction Grid",
            Self::BinaryLogic => "Binary Logic",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Self::NumberMatrix => "Fill the grid so every row and column has unique numbers",
            Self::PatternMatch => "Find the next pattern in the sequence",
            Self::SequenceSolver => "Discover the rule and fill in missing numbers",
            Self::DeductionGrid => "Use clues to deduce who owns what",
            Self::BinaryLogic => "Trace the logic gates to find the outputs",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.code() == code)
    }
}
