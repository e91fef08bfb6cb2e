use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc::Receiver;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::Parser;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use crossterm::terminal;

use typearena::app::{MatchPhase, MatchRunner, TurnOutcome};
use typearena::config::Config;
use typearena::content::{BuiltinLibrary, Passage};
use typearena::engine::achievements;
use typearena::event::SessionEvent;
use typearena::players::MatchController;
use typearena::session::stats::{FinalStats, LiveStats};
use typearena::session::typing::{BackspaceMode, TypingSession};
use typearena::store::json_store::JsonStore;

#[derive(Parser)]
#[command(
    name = "typearena",
    version,
    about = "Local turn-based multiplayer typing race"
)]
struct Cli {
    #[arg(
        short,
        long = "player",
        value_name = "NAME",
        help = "Player names in turn order (repeatable)"
    )]
    player: Vec<String>,

    #[arg(short, long, help = "Rounds per match")]
    rounds: Option<u32>,

    #[arg(short, long, help = "Difficulty (easy, medium, hard, expert)")]
    difficulty: Option<String>,

    #[arg(short, long, help = "Content category")]
    category: Option<String>,

    #[arg(long, help = "Disable backspace during turns")]
    no_backspace: bool,

    #[arg(long, value_name = "DIR", help = "Override the data directory")]
    data_dir: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(rounds) = cli.rounds {
        config.total_rounds = rounds;
    }
    if let Some(difficulty) = cli.difficulty {
        config.difficulty = difficulty;
    }
    if let Some(category) = cli.category {
        config.category = category;
    }
    if cli.no_backspace {
        config.backspace_mode = "disabled".to_string();
    }
    config.validate();

    let store = match cli.data_dir {
        Some(dir) => JsonStore::with_base_dir(dir)?,
        None => JsonStore::new()?,
    };

    // Locked categories fall back instead of erroring.
    let unlocked = store.unlocks();
    if !unlocked.iter().any(|c| *c == config.category) {
        eprintln!(
            "Category '{}' is still locked; playing 'classics' instead.",
            config.category
        );
        config.category = "classics".to_string();
    }

    let names = if cli.player.is_empty() {
        prompt_for_names()?
    } else {
        cli.player
    };

    let mut runner = MatchRunner::new(config, store, Box::new(BuiltinLibrary::new()), &names);
    run_match(&mut runner)
}

fn prompt_for_names() -> Result<Vec<String>> {
    println!("Enter player names in turn order (blank line to finish):");
    let stdin = io::stdin();
    let mut names = Vec::new();
    loop {
        print!("  player {}: ", names.len() + 1);
        io::stdout().flush()?;
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let name = line.trim();
        if name.is_empty() {
            break;
        }
        names.push(name.to_string());
    }
    if names.is_empty() {
        names.push("Player 1".to_string());
    }
    Ok(names)
}

fn run_match(runner: &mut MatchRunner) -> Result<()> {
    println!(
        "\n=== typearena: {} players, {} rounds, {} difficulty ===",
        runner.controller.player_count(),
        runner.controller.total_rounds(),
        runner.config.difficulty
    );

    loop {
        let player = runner
            .controller
            .current_player()
            .cloned()
            .context("no players configured")?;
        let passage = runner.next_passage();

        println!(
            "\n--- Round {}/{}: {}'s turn ---",
            runner.controller.current_round(),
            runner.controller.total_rounds(),
            player.name
        );
        countdown(runner.config.countdown_secs);

        let final_stats = play_turn(
            &passage,
            runner.config.backspace_mode(),
            runner.config.live_tick_ms,
        )?;
        let outcome = runner.finish_turn(&final_stats)?;
        print_outcome(&outcome, &final_stats);

        match runner.advance() {
            MatchPhase::NextTurn => {}
            MatchPhase::RoundComplete => {
                print_round_results(&runner.controller);
                runner.begin_next_round();
            }
            MatchPhase::MatchComplete => {
                print_round_results(&runner.controller);
                print_match_results(&runner.controller);
                return Ok(());
            }
        }
    }
}

fn countdown(seconds: u32) {
    for remaining in (1..=seconds).rev() {
        print!("{remaining}... ");
        let _ = io::stdout().flush();
        thread::sleep(Duration::from_secs(1));
    }
    println!("Go!");
}

fn play_turn(passage: &Passage, backspace_mode: BackspaceMode, tick_ms: u64) -> Result<FinalStats> {
    let mut session = TypingSession::new();
    session.set_backspace_mode(backspace_mode);
    session.set_tick_interval(Duration::from_millis(tick_ms));
    session.init(&passage.text);
    let events = session.subscribe();

    println!("\n  {}", passage.text);
    println!("  ({})\n", passage.source);

    terminal::enable_raw_mode()?;
    let result = drive_session(&mut session, &events);
    terminal::disable_raw_mode()?;
    println!();
    result
}

/// Raw-mode keystroke loop. The buffer is resynchronized to whatever the
/// session accepts, which is how rejected backspaces get undone on screen.
fn drive_session(
    session: &mut TypingSession,
    events: &Receiver<SessionEvent>,
) -> Result<FinalStats> {
    let mut buffer = String::new();
    loop {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Release {
                    continue;
                }
                match key.code {
                    KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                        bail!("interrupted");
                    }
                    KeyCode::Char(ch) => {
                        buffer.push(ch);
                        buffer = session.process_input(&buffer);
                    }
                    KeyCode::Backspace => {
                        buffer.pop();
                        buffer = session.process_input(&buffer);
                    }
                    _ => {}
                }
            }
        }

        for event in events.try_iter() {
            match event {
                SessionEvent::Live(live) => render_status(&live),
                SessionEvent::Tick => render_status(&session.stats()),
                SessionEvent::InputError => {
                    // Terminal bell as the shake/flash stand-in.
                    print!("\x07");
                    let _ = io::stdout().flush();
                }
                SessionEvent::Completed(final_stats) => return Ok(final_stats),
            }
        }
    }
}

fn render_status(live: &LiveStats) {
    print!(
        "\r  {:>3} wpm   {:>3}% acc   {:>5.1}%   {}   ",
        live.wpm, live.accuracy, live.progress, live.formatted_time
    );
    let _ = io::stdout().flush();
}

fn print_outcome(outcome: &TurnOutcome, final_stats: &FinalStats) {
    let breakdown = &outcome.breakdown;
    println!(
        "\n{}: {} wpm, {}% accuracy in {}",
        outcome.player.name, final_stats.wpm, final_stats.accuracy, final_stats.formatted_time
    );
    println!(
        "  score: {} (base {} + accuracy {} + time {}) x{}",
        breakdown.total_score,
        breakdown.base_score,
        breakdown.accuracy_bonus,
        breakdown.time_bonus,
        breakdown.difficulty_multiplier
    );
    println!(
        "  +{} XP, level {} ({}% to next)",
        outcome.xp_earned, outcome.profile.level, outcome.level_progress
    );
    if outcome.leveled_up {
        println!("  LEVEL UP! Welcome to level {}.", outcome.profile.level);
    }
    if outcome.new_highscore {
        println!("  New category highscore!");
    }
    for id in &outcome.new_achievements {
        let achievement = achievements::by_id(*id);
        println!(
            "  Achievement unlocked: {} ({})",
            achievement.name, achievement.description
        );
    }
    for category in &outcome.new_unlocks {
        println!("  New category unlocked: {category}");
    }
}

fn print_round_results(controller: &MatchController) {
    println!("\nRound {} results:", controller.current_round());
    for standing in controller.round_results() {
        match standing.result {
            Some(result) => println!(
                "  {}. {:<12} {:>5} pts  ({} wpm, {}%)",
                standing.rank, standing.player.name, result.score, result.wpm, result.accuracy
            ),
            None => println!("  {}. {:<12}  (no score)", standing.rank, standing.player.name),
        }
    }
}

fn print_match_results(controller: &MatchController) {
    println!("\n=== Final standings ===");
    for standing in controller.match_results() {
        println!(
            "  {}. {:<12} {:>5} pts  (avg {} wpm, {}%)",
            standing.rank,
            standing.player.name,
            standing.totals.total_score,
            standing.avg_wpm,
            standing.avg_accuracy
        );
    }
    if let Some(winner) = controller.match_winner() {
        println!("\nWinner: {}!", winner.player.name);
    }
}
