//! Binary Logic: a layered gate circuit where some gate outputs are hidden.
//!
//! Layer `k` reads only from layer `k - 1` (or the primary inputs for the first layer), so
//! evaluating layers in order is a topological evaluation of the circuit.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::difficulty_steps;
use crate::rng::{Mulberry32, choose, rand_int, shuffle};

const MAX_DEPTH: usize = 3;
const MAX_QUESTIONS: usize = 5;

/// Submitted gate outputs keyed by gate id.
pub type GateAnswers = BTreeMap<String, u8>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum GateKind {
    And,
    Or,
    Xor,
    Not,
}

pub const GATE_KINDS: [GateKind; 4] = [GateKind::And, GateKind::Or, GateKind::Xor, GateKind::Not];

impl GateKind {
    pub fn arity(self) -> usize {
        match self {
            Self::Not => 1,
            _ => 2,
        }
    }

    pub fn apply(self, a: u8, b: u8) -> u8 {
        match self {
            Self::And => a & b,
            Self::Or => a | b,
            Self::Xor => a ^ b,
            Self::Not => u8::from(a != 1),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CircuitInput {
    pub id: String,
    pub value: u8,
    pub label: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: GateKind,
    pub inputs: Vec<String>,
    /// `None` when the output is one of the questions.
    pub output: Option<u8>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub gate_id: String,
    pub answer: u8,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryLogicPuzzle {
    pub inputs: Vec<CircuitInput>,
    pub gates: Vec<Vec<Gate>>,
    pub questions: Vec<Question>,
    pub solution: GateAnswers,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateHint {
    pub gate_id: String,
    pub answer: u8,
}

pub fn depth_for(difficulty: f64) -> usize {
    (1 + difficulty_steps(difficulty * 0.5)).min(MAX_DEPTH)
}

pub fn question_count(difficulty: f64) -> usize {
    (2 + difficulty_steps(difficulty)).min(MAX_QUESTIONS)
}

pub fn generate(rng: &mut Mulberry32, difficulty: f64) -> BinaryLogicPuzzle {
    let depth = depth_for(difficulty);
    let (inputs, mut gates) = build_circuit(rng, depth);

    let mut hideable: Vec<(String, u8)> = gates
        .iter()
        .flatten()
        .map(|gate| (gate.id.clone(), gate.output.unwrap_or_default()))
        .collect();
    shuffle(&mut hideable, rng);

    let questions: Vec<Question> = hideable
        .into_iter()
        .take(question_count(difficulty))
        .map(|(gate_id, answer)| Question { gate_id, answer })
        .collect();
    let solution: GateAnswers =
        questions.iter().map(|question| (question.gate_id.clone(), question.answer)).collect();

    for gate in gates.iter_mut().flatten() {
        if solution.contains_key(&gate.id) {
            gate.output = None;
        }
    }

    BinaryLogicPuzzle { inputs, gates, questions, solution }
}

fn build_circuit(rng: &mut Mulberry32, depth: usize) -> (Vec<CircuitInput>, Vec<Vec<Gate>>) {
    let input_count = if depth <= 1 { 3 } else { 4 };
    let inputs: Vec<CircuitInput> = (0..input_count)
        .map(|i| CircuitInput {
            id: format!("in_{i}"),
            value: rand_int(0, 1, rng) as u8,
            label: char::from(b'A' + i as u8).to_string(),
        })
        .collect();

    let mut values: BTreeMap<String, u8> =
        inputs.iter().map(|input| (input.id.clone(), input.value)).collect();
    let mut previous: Vec<String> = inputs.iter().map(|input| input.id.clone()).collect();
    let mut layers = Vec::with_capacity(depth);

    for layer in 0..depth {
        let width = previous.len().saturating_sub(1).max(1);
        let mut gates = Vec::with_capacity(width);
        for g in 0..width {
            let kind = *choose(&GATE_KINDS, rng);
            let wires: Vec<String> = (0..kind.arity())
                .map(|offset| previous[(g + offset) % previous.len()].clone())
                .collect();
            let output = evaluate_gate(kind, &wires, &values);
            let id = format!("gate_{layer}_{g}");
            values.insert(id.clone(), output);
            gates.push(Gate { id, kind, inputs: wires, output: Some(output) });
        }
        previous = gates.iter().map(|gate| gate.id.clone()).collect();
        layers.push(gates);
    }

    (inputs, layers)
}

fn evaluate_gate(kind: GateKind, wires: &[String], values: &BTreeMap<String, u8>) -> u8 {
    let read = |index: usize| wires.get(index).and_then(|id| values.get(id)).copied();
    let a = read(0).unwrap_or_default();
    let b = read(1).unwrap_or_default();
    kind.apply(a, b)
}

/// Recomputes every gate output from the primary inputs, layer by layer.
pub fn evaluate_circuit(inputs: &[CircuitInput], gates: &[Vec<Gate>]) -> BTreeMap<String, u8> {
    let mut values: BTreeMap<String, u8> =
        inputs.iter().map(|input| (input.id.clone(), input.value)).collect();
    for gate in gates.iter().flatten() {
        let output = evaluate_gate(gate.kind, &gate.inputs, &values);
        values.insert(gate.id.clone(), output);
    }
    values
}

pub fn validate(answers: &GateAnswers, puzzle: &BinaryLogicPuzzle) -> bool {
    puzzle.questions.iter().all(|question| answers.get(&question.gate_id) == Some(&question.answer))
}

/// The first question not yet present in `answers`.
pub fn hint(puzzle: &BinaryLogicPuzzle, answers: &GateAnswers) -> Option<GateHint> {
    puzzle
        .questions
        .iter()
        .find(|question| !answers.contains_key(&question.gate_id))
        .map(|question| GateHint { gate_id: question.gate_id.clone(), answer: question.answer })
}
