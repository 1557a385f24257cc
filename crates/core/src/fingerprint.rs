//! Stable puzzle hashing for cross-machine determinism checks.
//! Two machines that generate the same date must print the same fingerprint; any drift in the
//! stream, the dispatcher, or a family generator changes it.

use std::hash::Hasher;

use xxhash_rust::xxh3::Xxh3;

use crate::generator::{Puzzle, PuzzleBody};
use crate::puzzles::binary_logic::GateKind;
use crate::puzzles::deduction_grid::{Category, ClueKind};
use crate::puzzles::pattern_match::{Element, Shape};

impl Puzzle {
    pub fn fingerprint(&self) -> u64 {
        let mut hasher = Xxh3::new();
        write_str(&mut hasher, &self.date.to_string());
        hasher.write_u64(self.difficulty.to_bits());
        hasher.write_u8(self.kind() as u8);
        match &self.body {
            PuzzleBody::NumberMatrix(p) => {
                hasher.write_u64(p.size as u64);
                for row in p.puzzle.iter().chain(&p.solution) {
                    hasher.write(row);
                }
                for row in &p.given {
                    for &cell in row {
                        hasher.write_u8(u8::from(cell));
                    }
                }
            }
            PuzzleBody::PatternMatch(p) => {
                hasher.write_u64(p.total_rounds as u64);
                for round in &p.rounds {
                    hasher.write_u64(round.sequence.len() as u64);
                    for element in round.sequence.iter().chain(&round.options) {
                        write_element(&mut hasher, element);
                    }
                    hasher.write_u64(round.answer_index as u64);
                }
            }
            PuzzleBody::SequenceSolver(p) => {
                hasher.write_u64(p.total_rounds as u64);
                for round in &p.rounds {
                    hasher.write_u64(round.sequence.len() as u64);
                    for &term in &round.sequence {
                        hasher.write_i64(term);
                    }
                    hasher.write_u64(round.blanks.len() as u64);
                    for &blank in &round.blanks {
                        hasher.write_u64(blank as u64);
                    }
                    write_str(&mut hasher, &round.rule_name);
                    write_str(&mut hasher, &round.rule_label);
                }
            }
            PuzzleBody::DeductionGrid(p) => {
                let lists = [&p.categories.names, &p.categories.colors, &p.categories.items];
                for value in lists.into_iter().flatten() {
                    write_str(&mut hasher, value);
                }
                for clue in &p.clues {
                    hasher.write_u8(match clue.kind {
                        ClueKind::Direct => 0,
                        ClueKind::Negative => 1,
                    });
                    write_str(&mut hasher, &clue.text);
                    hasher.write_u8(category_code(clue.data.category1));
                    write_str(&mut hasher, &clue.data.value1);
                    hasher.write_u8(category_code(clue.data.category2));
                    write_str(&mut hasher, &clue.data.value2);
                }
                for (name, assignment) in &p.solution.assignments {
                    write_str(&mut hasher, name);
                    write_str(&mut hasher, &assignment.color);
                    write_str(&mut hasher, &assignment.item);
                }
            }
            PuzzleBody::BinaryLogic(p) => {
                for input in &p.inputs {
                    write_str(&mut hasher, &input.id);
                    hasher.write_u8(input.value);
                }
                for layer in &p.gates {
                    hasher.write_u64(layer.len() as u64);
                    for gate in layer {
                        write_str(&mut hasher, &gate.id);
                        hasher.write_u8(gate_code(gate.kind));
                        for wire in &gate.inputs {
                            write_str(&mut hasher, wire);
                        }
                        hasher.write_u8(gate.output.unwrap_or(0xFF));
                    }
                }
                for (gate_id, answer) in &p.solution {
                    write_str(&mut hasher, gate_id);
                    hasher.write_u8(*answer);
                }
            }
        }
        hasher.finish()
    }
}

fn write_str(hasher: &mut Xxh3, value: &str) {
    hasher.write_u64(value.len() as u64);
    hasher.write(value.as_bytes());
}

fn write_element(hasher: &mut Xxh3, element: &Element) {
    hasher.write_u8(match element.shape {
        Shape::Circle => 0,
        Shape::Square => 1,
        Shape::Triangle => 2,
        Shape::Diamond => 3,
        Shape::Star => 4,
        Shape::Hexagon => 5,
    });
    hasher.write(element.color.hex().as_bytes());
    hasher.write_u16(element.rotation);
}

fn category_code(category: Category) -> u8 {
    match category {
        Category::Names => 0,
        Category::Colors => 1,
        Category::Items => 2,
    }
}

fn gate_code(kind: GateKind) -> u8 {
    match kind {
        GateKind::And => 0,
        GateKind::Or => 1,
        GateKind::Xor => 2,
        GateKind::Not => 3,
    }
}
