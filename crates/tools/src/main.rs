use std::io;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use puzzle_core::{
    ActivityEntry, ActivityLog, PlaySession, PuzzleEngine, StatsAggregate, Submission, format_date,
    load_activity_log, open_activity_log, parse_date, record_solve_now, upcoming_schedule,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod config;

use config::LooperConfig;

/// Hour used when folding stored history; the clock-based achievements need a live solve.
const REPLAY_HOUR: u32 = 12;

#[derive(Parser)]
#[command(name = "looper", author, version, about, long_about = None)]
struct Cli {
    /// Path to a looper.toml (default: platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the puzzle for a date as JSON
    Generate {
        #[arg(short, long)]
        date: String,
        /// Difficulty modifier (overrides config)
        #[arg(short, long)]
        modifier: Option<f64>,
        #[arg(long)]
        pretty: bool,
    },
    /// List type and difficulty for a run of dates
    Schedule {
        #[arg(long)]
        from: String,
        #[arg(long, default_value_t = 7)]
        days: u32,
    },
    /// Print stable puzzle fingerprints for cross-machine comparison
    Fingerprint {
        #[arg(short, long)]
        date: String,
        #[arg(long, default_value_t = 0)]
        days: u32,
    },
    /// Play a date with its own solution and record the result
    Simulate {
        #[arg(short, long)]
        date: String,
        #[arg(long, default_value_t = 0)]
        hints: u32,
        #[arg(long, default_value_t = 90)]
        seconds: u32,
        /// Activity log to append to (default: config, then platform data dir)
        #[arg(long)]
        log: Option<PathBuf>,
    },
    /// Summarize an activity log
    Stats {
        #[arg(long)]
        log: Option<PathBuf>,
        /// Day to measure the current streak against (default: today)
        #[arg(long)]
        today: Option<String>,
    },
    /// Mark every unsynced day as synced
    Sync {
        #[arg(long)]
        log: Option<PathBuf>,
    },
}

fn init_logging(filter: &str) {
    let filter = EnvFilter::try_new(filter).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn activity_path(explicit: Option<PathBuf>, config: &LooperConfig) -> Result<PathBuf> {
    explicit
        .or_else(|| config.activity_path())
        .ok_or_else(|| anyhow!("No activity log path: pass --log or set activity_log"))
}

fn parse_day(text: &str) -> Result<NaiveDate> {
    parse_date(text).with_context(|| format!("Bad date argument: {text}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = LooperConfig::resolve(cli.config.as_deref())?;
    init_logging(&config.log_filter);

    match cli.command {
        Command::Generate { date, modifier, pretty } => {
            let mut engine_config = config.engine.clone();
            if let Some(modifier) = modifier {
                engine_config = engine_config.with_difficulty_modifier(modifier);
            }
            engine_config.validate()?;
            let puzzle = PuzzleEngine::new(engine_config).generate(parse_day(&date)?)?;
            let json = if pretty {
                serde_json::to_string_pretty(&puzzle)?
            } else {
                serde_json::to_string(&puzzle)?
            };
            println!("{json}");
        }
        Command::Schedule { from, days } => {
            for entry in upcoming_schedule(parse_day(&from)?, days, &config.engine)? {
                println!(
                    "{}  {:<16} {:.1}",
                    format_date(entry.date),
                    entry.puzzle_type.label(),
                    entry.display_difficulty()
                );
            }
        }
        Command::Fingerprint { date, days } => {
            let engine = PuzzleEngine::new(config.engine.clone());
            for entry in upcoming_schedule(parse_day(&date)?, days, &config.engine)? {
                let puzzle = engine.generate(entry.date)?;
                println!(
                    "{}  {:016x}  {}",
                    format_date(entry.date),
                    puzzle.fingerprint(),
                    puzzle.kind().code()
                );
            }
        }
        Command::Simulate { date, hints, seconds, log } => {
            let path = activity_path(log, &config)?;
            let entry = simulate(&config, parse_day(&date)?, hints, seconds)?;
            let (log, mut writer) = open_activity_log(&path, &config.user_id)
                .with_context(|| format!("Failed to open activity log: {}", path.display()))?;
            writer.append(&entry)?;
            info!(path = %path.display(), "recorded activity");
            println!(
                "Solved {} ({}) for {} points",
                format_date(entry.date),
                entry.puzzle_type.label(),
                entry.score
            );
            let before = replay_stats(&log);
            if let Some(event) = entry.solve_event() {
                let after = record_solve_now(&before, &event);
                for achievement in after.achievements.iter().filter(|a| !before.has(**a)) {
                    println!("Unlocked: {} - {}", achievement.name(), achievement.description());
                }
            }
        }
        Command::Stats { log, today } => {
            let path = activity_path(log, &config)?;
            let today = match today {
                Some(text) => parse_day(&text)?,
                None => Local::now().date_naive(),
            };
            print_stats(&path, today)?;
        }
        Command::Sync { log } => {
            let path = activity_path(log, &config)?;
            let (mut log, mut writer) = open_activity_log(&path, &config.user_id)
                .with_context(|| format!("Failed to open activity log: {}", path.display()))?;
            let dates: Vec<NaiveDate> = log.unsynced().iter().map(|entry| entry.date).collect();
            let changed = writer.mark_synced(&mut log, &dates)?;
            println!("Marked {changed} day(s) synced");
        }
    }

    Ok(())
}

fn simulate(
    config: &LooperConfig,
    date: NaiveDate,
    hints: u32,
    seconds: u32,
) -> Result<ActivityEntry> {
    let engine = PuzzleEngine::new(config.engine.clone());
    let mut session = PlaySession::start(&engine, date)?;
    for _ in 0..hints {
        match session.request_hint() {
            Ok(Some(hint)) => println!("Hint: {}", serde_json::to_string(&hint)?),
            Ok(None) => break,
            Err(err) => {
                warn!(%err, "stopping hint requests");
                break;
            }
        }
    }
    session.tick(seconds);
    let answer = session.puzzle().solution_answer();
    match session.submit(answer)? {
        Submission::Solved(outcome) => Ok(outcome.entry),
        Submission::Incorrect { .. } => Err(anyhow!("Generated solution was rejected for {date}")),
    }
}

/// Folds the stored history into a fresh aggregate, one event per date.
fn replay_stats(log: &ActivityLog) -> StatsAggregate {
    let mut stats = StatsAggregate::default();
    for entry in log.latest_by_date().values() {
        if let Some(event) = entry.solve_event() {
            stats.apply_solve(&event, REPLAY_HOUR);
        }
    }
    stats
}

fn print_stats(path: &Path, today: NaiveDate) -> Result<()> {
    let loaded = load_activity_log(path)
        .with_context(|| format!("Failed to load activity log: {}", path.display()))?;
    let log = loaded.log;
    let streaks = log.streaks(today);

    let stats = replay_stats(&log);

    println!("User:            {}", log.user_id);
    println!("Days solved:     {}", log.total_solved());
    println!("Total score:     {}", log.total_score());
    println!("Current streak:  {}", streaks.current_streak);
    println!("Longest streak:  {}", streaks.longest_streak);
    println!("Average time:    {}s", stats.average_time);
    if let Some(fastest) = stats.fastest_solve {
        println!("Fastest solve:   {fastest}s");
    }
    println!("Unsynced days:   {}", log.unsynced().len());
    for achievement in &stats.achievements {
        println!("  [{}] {} - {}", achievement.id(), achievement.name(), achievement.description());
    }
    Ok(())
}
