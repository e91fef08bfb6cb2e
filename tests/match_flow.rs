//! End-to-end match flow: typing sessions feed the runner, the runner
//! persists progression, the controller ranks the match.

use std::sync::mpsc::Receiver;

use tempfile::TempDir;

use typearena::app::{MatchPhase, MatchRunner};
use typearena::config::Config;
use typearena::content::BuiltinLibrary;
use typearena::event::SessionEvent;
use typearena::session::stats::FinalStats;
use typearena::session::typing::{BackspaceMode, TypingSession};
use typearena::store::json_store::JsonStore;

/// Feeds `typed` one character at a time as growing buffer snapshots and
/// returns the completion event's final stats.
fn type_through(
    session: &mut TypingSession,
    events: &Receiver<SessionEvent>,
    typed: &str,
) -> FinalStats {
    let mut buffer = String::new();
    for ch in typed.chars() {
        buffer.push(ch);
        buffer = session.process_input(&buffer);
    }
    events
        .try_iter()
        .find_map(|event| match event {
            SessionEvent::Completed(final_stats) => Some(final_stats),
            _ => None,
        })
        .expect("session should have completed")
}

/// A copy of `text` with the first character mistyped.
fn fumble(text: &str) -> String {
    let mut chars: Vec<char> = text.chars().collect();
    if let Some(first) = chars.first_mut() {
        *first = if *first == '#' { '@' } else { '#' };
    }
    chars.into_iter().collect()
}

fn make_runner(dir: &TempDir, names: &[&str], total_rounds: u32) -> MatchRunner {
    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let mut config = Config::default();
    config.total_rounds = total_rounds;
    config.difficulty = "easy".to_string();
    config.category = "classics".to_string();
    MatchRunner::new(
        config,
        store,
        Box::new(BuiltinLibrary::with_seed(9)),
        names,
    )
}

#[test]
fn two_player_three_round_match() {
    let dir = TempDir::new().unwrap();
    let mut runner = make_runner(&dir, &["alice", "bob"], 3);

    let mut recorded: Vec<(String, u32)> = Vec::new();
    let mut phases: Vec<&str> = Vec::new();
    loop {
        let player_name = runner.controller.current_player().unwrap().name.clone();
        let passage = runner.next_passage();

        let mut session = TypingSession::new();
        session.init(&passage.text);
        let events = session.subscribe();

        // bob fumbles the first character of every turn; alice types clean.
        let typed = if player_name == "bob" {
            fumble(&passage.text)
        } else {
            passage.text.clone()
        };
        let final_stats = type_through(&mut session, &events, &typed);
        assert!(!session.is_active());
        if player_name == "alice" {
            assert_eq!(final_stats.accuracy, 100);
        } else {
            assert!(final_stats.accuracy < 100);
            assert_eq!(final_stats.incorrect_chars, 1);
        }

        let outcome = runner.finish_turn(&final_stats).unwrap();
        recorded.push((player_name, outcome.breakdown.total_score));

        match runner.advance() {
            MatchPhase::NextTurn => {}
            MatchPhase::RoundComplete => {
                phases.push("round");
                runner.begin_next_round();
            }
            MatchPhase::MatchComplete => {
                phases.push("match");
                break;
            }
        }
    }

    assert_eq!(recorded.len(), 6);
    assert_eq!(phases, vec!["round", "round", "match"]);

    // Every player's match total is exactly the sum of their round scores.
    let results = runner.controller.match_results();
    assert_eq!(results.len(), 2);
    for standing in &results {
        let expected: u32 = recorded
            .iter()
            .filter(|(name, _)| *name == standing.player.name)
            .map(|(_, score)| score)
            .sum();
        assert_eq!(standing.totals.total_score, expected);
        assert_eq!(standing.totals.rounds, 3);
    }
    assert_eq!(runner.controller.match_winner().unwrap().rank, 1);

    // Both profiles were persisted with lifetime stats and badges.
    for name in ["alice", "bob"] {
        let profile = runner.store().player_by_name(name).unwrap();
        assert_eq!(profile.games_played, 3);
        assert!(profile.xp >= 30);
        assert!(profile.best_wpm > 0);
        assert!(profile.total_words_typed > 0);
        assert!(profile.achievements.contains(&"first_steps".to_string()));
    }
}

#[test]
fn profiles_survive_a_new_store_instance() {
    let dir = TempDir::new().unwrap();
    {
        let mut runner = make_runner(&dir, &["carol"], 1);
        let passage = runner.next_passage();
        let mut session = TypingSession::new();
        session.init(&passage.text);
        let events = session.subscribe();
        let final_stats = type_through(&mut session, &events, &passage.text);
        runner.finish_turn(&final_stats).unwrap();
        assert_eq!(runner.advance(), MatchPhase::MatchComplete);
    }

    let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
    let profile = store.player_by_name("carol").unwrap();
    assert_eq!(profile.games_played, 1);
    assert!(profile.xp >= 10);
}

#[test]
fn rejected_backspace_forces_caller_resync() {
    let mut session = TypingSession::new();
    session.set_backspace_mode(BackspaceMode::Disabled);
    session.init("abc");

    let mut buffer = String::from("a");
    buffer = session.process_input(&buffer);
    assert_eq!(buffer, "a");

    // The caller tries to delete; the session hands back the prior text and
    // the caller adopts it, exactly as the input loop in the binary does.
    buffer.pop();
    buffer = session.process_input(&buffer);
    assert_eq!(buffer, "a");

    buffer.push('b');
    buffer = session.process_input(&buffer);
    buffer.push('c');
    buffer = session.process_input(&buffer);

    assert!(!session.is_active());
    let final_stats = session.final_stats();
    assert_eq!(final_stats.accuracy, 100);
    assert_eq!(final_stats.correct_chars, 3);
}

#[test]
fn tied_round_scores_rank_by_seat_order() {
    let dir = TempDir::new().unwrap();
    let mut runner = make_runner(&dir, &["dave", "erin"], 1);

    // Identical stats produce identical scores for both players.
    let final_stats = FinalStats {
        wpm: 50,
        accuracy: 100,
        time_seconds: 60,
        formatted_time: "1:00".to_string(),
        correct_chars: 100,
        incorrect_chars: 0,
        total_chars: 100,
        words_typed: 20,
    };
    runner.finish_turn(&final_stats).unwrap();
    assert_eq!(runner.advance(), MatchPhase::NextTurn);
    runner.finish_turn(&final_stats).unwrap();
    assert_eq!(runner.advance(), MatchPhase::MatchComplete);

    let results = runner.controller.round_results();
    assert_eq!(results[0].player.name, "dave");
    assert_eq!(results[0].rank, 1);
    assert_eq!(results[1].player.name, "erin");
    assert_eq!(results[1].rank, 2);
    assert_eq!(
        results[0].result.unwrap().score,
        results[1].result.unwrap().score
    );
}
