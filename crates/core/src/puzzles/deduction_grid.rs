//! Deduction Grid: match three people to a house color and an item from five clues.
//!
//! The answer key pairs `names[i]`, `colors[i]` and `items[i]` after each list is shuffled.
//! Clues are instantiated from a fixed template; [`count_solutions`] brute-forces all 36
//! color/item permutations and generation asserts the template pins down exactly one.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::rng::{Mulberry32, rand_int, shuffle};

pub const SIZE: usize = 3;

const NAME_SETS: [[&str; SIZE]; 3] =
    [["Alice", "Bob", "Carol"], ["Dave", "Eve", "Frank"], ["Grace", "Hank", "Ivy"]];
const COLOR_SETS: [[&str; SIZE]; 3] =
    [["Red", "Blue", "Green"], ["Purple", "Orange", "Yellow"], ["Teal", "Pink", "Gold"]];
const ITEM_SETS: [[&str; SIZE]; 3] =
    [["Cat", "Dog", "Fish"], ["Book", "Phone", "Watch"], ["Coffee", "Tea", "Juice"]];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    Names,
    Colors,
    Items,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ClueKind {
    Direct,
    Negative,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClueData {
    pub category1: Category,
    pub value1: String,
    pub category2: Category,
    pub value2: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Clue {
    #[serde(rename = "type")]
    pub kind: ClueKind,
    pub text: String,
    pub data: ClueData,
}

impl Clue {
    fn new(kind: ClueKind, text: String, link: (Category, &str, Category, &str)) -> Self {
        let (category1, value1, category2, value2) = link;
        let data = ClueData {
            category1,
            value1: value1.to_string(),
            category2,
            value2: value2.to_string(),
        };
        Self { kind, text, data }
    }
}

/// Alphabetically sorted display lists; the key order stays hidden.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Categories {
    pub names: Vec<String>,
    pub colors: Vec<String>,
    pub items: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Assignment {
    pub color: String,
    pub item: String,
}

pub type Assignments = BTreeMap<String, Assignment>;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionSolution {
    pub assignments: Assignments,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeductionGridPuzzle {
    pub categories: Categories,
    pub clues: Vec<Clue>,
    pub solution: DeductionSolution,
    pub size: usize,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssignmentHint {
    pub name: String,
    pub color: String,
    pub item: String,
}

pub fn generate(rng: &mut Mulberry32, _difficulty: f64) -> DeductionGridPuzzle {
    let set = rand_int(0, 2, rng) as usize;
    let mut names = NAME_SETS[set];
    let mut colors = COLOR_SETS[set];
    let mut items = ITEM_SETS[set];
    shuffle(&mut names, rng);
    shuffle(&mut colors, rng);
    shuffle(&mut items, rng);

    let clues = generate_clues(&names, &colors, &items, rng);
    let categories = Categories {
        names: sorted(&names),
        colors: sorted(&colors),
        items: sorted(&items),
    };
    let assignments = (0..SIZE)
        .map(|i| {
            let assignment =
                Assignment { color: colors[i].to_string(), item: items[i].to_string() };
            (names[i].to_string(), assignment)
        })
        .collect();

    debug_assert_eq!(count_solutions(&categories, &clues), 1);
    let solution = DeductionSolution { assignments };
    DeductionGridPuzzle { categories, clues, solution, size: SIZE }
}

fn sorted(values: &[&str; SIZE]) -> Vec<String> {
    let mut values: Vec<String> = values.iter().map(|value| value.to_string()).collect();
    values.sort();
    values
}

fn generate_clues(
    names: &[&str; SIZE],
    colors: &[&str; SIZE],
    items: &[&str; SIZE],
    rng: &mut Mulberry32,
) -> Vec<Clue> {
    use Category::{Colors, Items, Names};

    let first = rand_int(0, 2, rng) as usize;
    let second = (first + 1) % SIZE;
    let third = (second + 1) % SIZE;
    let wrong_item = items[(third + 1) % SIZE];

    let mut clues = vec![
        Clue::new(
            ClueKind::Direct,
            format!("{} has a {} house.", names[first], colors[first]),
            (Names, names[first], Colors, colors[first]),
        ),
        Clue::new(
            ClueKind::Direct,
            format!("{} owns a {}.", names[second], items[second]),
            (Names, names[second], Items, items[second]),
        ),
        Clue::new(
            ClueKind::Negative,
            format!("{} does NOT own a {}.", names[third], wrong_item),
            (Names, names[third], Items, wrong_item),
        ),
        Clue::new(
            ClueKind::Direct,
            format!("The {} house has a {}.", colors[third], items[third]),
            (Colors, colors[third], Items, items[third]),
        ),
    ];

    // The one name not covered by the first two direct clues.
    let remaining = (0..SIZE).find(|&i| i != first && i != second).unwrap_or(third);
    clues.push(Clue::new(
        ClueKind::Direct,
        format!("{} has a {} house.", names[remaining], colors[remaining]),
        (Names, names[remaining], Colors, colors[remaining]),
    ));

    shuffle(&mut clues, rng);
    clues
}

/// Number of complete assignments consistent with every clue.
pub fn count_solutions(categories: &Categories, clues: &[Clue]) -> usize {
    let permutations = permutations_of_three();
    let mut count = 0;
    for color_order in &permutations {
        for item_order in &permutations {
            let rows: Vec<[&str; 3]> = (0..SIZE)
                .map(|i| {
                    [
                        categories.names[i].as_str(),
                        categories.colors[color_order[i]].as_str(),
                        categories.items[item_order[i]].as_str(),
                    ]
                })
                .collect();
            if clues.iter().all(|clue| clue_holds(clue, &rows)) {
                count += 1;
            }
        }
    }
    count
}

fn permutations_of_three() -> [[usize; 3]; 6] {
    [[0, 1, 2], [0, 2, 1], [1, 0, 2], [1, 2, 0], [2, 0, 1], [2, 1, 0]]
}

fn column(category: Category) -> usize {
    match category {
        Category::Names => 0,
        Category::Colors => 1,
        Category::Items => 2,
    }
}

fn clue_holds(clue: &Clue, rows: &[[&str; 3]]) -> bool {
    let data = &clue.data;
    let (left, right) = (column(data.category1), column(data.category2));
    let Some(row) = rows.iter().find(|row| row[left] == data.value1) else {
        return false;
    };
    let linked = row[right] == data.value2;
    match clue.kind {
        ClueKind::Direct => linked,
        ClueKind::Negative => !linked,
    }
}

/// Every name's color and item must match; a missing name fails.
pub fn validate(answers: &Assignments, solution: &DeductionSolution) -> bool {
    solution.assignments.iter().all(|(name, expected)| answers.get(name) == Some(expected))
}

/// Reveals one full row of the key for a name not in `revealed`.
pub fn hint(
    puzzle: &DeductionGridPuzzle,
    revealed: &[&str],
    rng: &mut Mulberry32,
) -> Option<AssignmentHint> {
    let open: Vec<(&String, &Assignment)> = puzzle
        .solution
        .assignments
        .iter()
        .filter(|(name, _)| !revealed.contains(&name.as_str()))
        .collect();
    if open.is_empty() {
        return None;
    }
    let (name, assignment) = open[rng.below(open.len())];
    Some(AssignmentHint {
        name: name.clone(),
        color: assignment.color.clone(),
        item: assignment.item.clone(),
    })
}
