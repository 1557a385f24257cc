use std::collections::BTreeSet;

use anyhow::{Result, bail};
use chrono::{Days, NaiveDate};
use clap::Parser;
use puzzle_core::puzzles::binary_logic::evaluate_circuit;
use puzzle_core::puzzles::deduction_grid::count_solutions;
use puzzle_core::puzzles::number_matrix::is_latin_square;
use puzzle_core::{
    PuzzleBody, PuzzleEngine, PuzzleType, SolveEvent, StatsAggregate, calculate_streaks,
    create_rng, format_date, puzzle_type_for_date, record_solve, validate_solution,
};
use rand_chacha::{
    ChaCha8Rng,
    rand_core::{Rng, SeedableRng},
};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(short, long, default_value_t = 42)]
    seed: u64,
    /// Number of random dates to check
    #[arg(short, long, default_value_t = 1000)]
    dates: u32,
}

const SPAN_DAYS: u64 = 36_500;

fn random_date(rng: &mut ChaCha8Rng) -> NaiveDate {
    let epoch = NaiveDate::from_ymd_opt(2000, 1, 1).unwrap_or_default();
    epoch + Days::new(rng.next_u64() % SPAN_DAYS)
}

fn check_rng_stream(seed: &str) -> Result<()> {
    let mut left = create_rng(seed);
    let mut right = create_rng(seed);
    for _ in 0..100 {
        let (a, b) = (left.next_f64(), right.next_f64());
        if a.to_bits() != b.to_bits() || !(0.0..1.0).contains(&a) {
            bail!("Invariant failed: RNG stream for {seed:?} diverged or left [0,1)");
        }
    }
    Ok(())
}

fn check_date(engine: &PuzzleEngine, date: NaiveDate) -> Result<()> {
    let text = format_date(date);
    check_rng_stream(&format!("{}{text}", engine.config().seed_prefix))?;

    let puzzle = engine.generate(date)?;
    if puzzle != engine.generate(date)? {
        bail!("Invariant failed: {text} generated two different puzzles");
    }
    if puzzle.kind() != puzzle_type_for_date(&text)? {
        bail!("Invariant failed: {text} embedded type disagrees with the rotation");
    }
    if !validate_solution(puzzle.kind(), &puzzle.solution_answer(), &puzzle) {
        bail!("Invariant failed: {text} rejects its own solution");
    }

    match &puzzle.body {
        PuzzleBody::NumberMatrix(p) => {
            if !is_latin_square(&p.solution, p.size) {
                bail!("Invariant failed: {text} solution is not a Latin square");
            }
            let consistent = p
                .puzzle
                .iter()
                .flatten()
                .zip(p.given.iter().flatten())
                .all(|(&cell, &given)| given == (cell != 0));
            if !consistent {
                bail!("Invariant failed: {text} given mask disagrees with the board");
            }
        }
        PuzzleBody::SequenceSolver(p) => {
            if p.rounds.iter().flat_map(|round| &round.blanks).any(|&index| index < 2) {
                bail!("Invariant failed: {text} blanks one of the first two terms");
            }
        }
        PuzzleBody::DeductionGrid(p) => {
            let colors: BTreeSet<&String> =
                p.solution.assignments.values().map(|a| &a.color).collect();
            let items: BTreeSet<&String> =
                p.solution.assignments.values().map(|a| &a.item).collect();
            if p.solution.assignments.len() != 3 || colors.len() != 3 || items.len() != 3 {
                bail!("Invariant failed: {text} assignments are not a bijection");
            }
            if count_solutions(&p.categories, &p.clues) != 1 {
                bail!("Invariant failed: {text} clues do not pin down one solution");
            }
        }
        PuzzleBody::BinaryLogic(p) => {
            let values = evaluate_circuit(&p.inputs, &p.gates);
            for gate in p.gates.iter().flatten() {
                let stored = gate.output.or_else(|| p.solution.get(&gate.id).copied());
                if stored != values.get(&gate.id).copied() {
                    bail!("Invariant failed: {text} gate {} does not re-evaluate", gate.id);
                }
            }
        }
        PuzzleBody::PatternMatch(p) => {
            if p.rounds.iter().any(|round| round.answer_index >= round.options.len()) {
                bail!("Invariant failed: {text} answer index out of range");
            }
        }
    }
    Ok(())
}

/// Random solve histories must give the same streaks through the reducer and the log scan.
fn check_streaks(rng: &mut ChaCha8Rng) -> Result<()> {
    let mut date = random_date(rng);
    let mut stats = StatsAggregate::default();
    let mut history = Vec::new();
    for _ in 0..(rng.next_u64() % 30 + 1) {
        date = date + Days::new(rng.next_u64() % 3);
        history.push((date, true));
        let event = SolveEvent {
            date,
            points: 50,
            time_seconds: 120,
            puzzle_type: PuzzleType::from_rotation(history.len()),
            no_mistakes: true,
            hints_used: 0,
        };
        stats = record_solve(&stats, &event, 12);
    }
    let derived = calculate_streaks(&history, date);
    let reduced = (stats.current_streak, stats.longest_streak);
    if (derived.current_streak, derived.longest_streak) != reduced {
        bail!("Invariant failed: streaks disagree for history {history:?}");
    }
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();

    println!("Starting fuzz harness on seed {} for {} dates...", args.seed, args.dates);
    let engine = PuzzleEngine::default();
    let mut rng = ChaCha8Rng::seed_from_u64(args.seed);

    for _ in 0..args.dates {
        let date = random_date(&mut rng);
        check_date(&engine, date)?;
        check_streaks(&mut rng)?;
    }

    println!("Fuzzing completed successfully.");
    Ok(())
}
