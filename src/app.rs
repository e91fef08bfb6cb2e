//! Match orchestration: glues the session results to the scoring and
//! progression engines, the match controller and the store. Everything here
//! is headless; the binary owns the terminal.

use anyhow::{Context, Result};

use crate::config::Config;
use crate::content::{Passage, TextProvider};
use crate::engine::achievements::{self, AchievementId, StatsSnapshot};
use crate::engine::progression;
use crate::engine::scoring::{self, ScoreBreakdown};
use crate::engine::unlocks;
use crate::players::{MatchController, Player, RoundScore};
use crate::session::stats::FinalStats;
use crate::store::json_store::JsonStore;
use crate::store::schema::PlayerProfile;

/// Everything a completed turn earned, ready for the driver to present.
#[derive(Clone, Debug)]
pub struct TurnOutcome {
    pub player: Player,
    pub breakdown: ScoreBreakdown,
    pub xp_earned: u32,
    pub profile: PlayerProfile,
    pub leveled_up: bool,
    pub level_progress: u32,
    pub new_achievements: Vec<AchievementId>,
    pub new_unlocks: Vec<&'static str>,
    pub new_highscore: bool,
}

/// Where the match stands after a turn has been folded in.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MatchPhase {
    NextTurn,
    RoundComplete,
    MatchComplete,
}

pub struct MatchRunner {
    pub config: Config,
    pub controller: MatchController,
    store: JsonStore,
    provider: Box<dyn TextProvider>,
    session_rounds: u32,
}

impl MatchRunner {
    pub fn new<S: AsRef<str>>(
        config: Config,
        store: JsonStore,
        provider: Box<dyn TextProvider>,
        names: &[S],
    ) -> Self {
        let mut controller = MatchController::new(config.total_rounds);
        controller.set_players(names);
        Self {
            config,
            controller,
            store,
            provider,
            session_rounds: 0,
        }
    }

    pub fn next_passage(&mut self) -> Passage {
        self.provider
            .get_text(&self.config.category, self.config.difficulty())
    }

    /// Folds a finished turn into the match: scores it, persists XP, stats,
    /// badges, unlocks and the category highscore, and reports what the
    /// driver should announce.
    pub fn finish_turn(&mut self, final_stats: &FinalStats) -> Result<TurnOutcome> {
        let player = self
            .controller
            .current_player()
            .cloned()
            .context("no players configured")?;
        let difficulty = self.config.difficulty();
        self.session_rounds += 1;

        let breakdown = scoring::calculate_score(
            final_stats.wpm,
            final_stats.accuracy,
            final_stats.time_seconds,
            difficulty,
        );
        let xp_earned = scoring::calculate_xp(final_stats.wpm, final_stats.accuracy, difficulty);

        self.controller.record_score(RoundScore {
            wpm: final_stats.wpm,
            accuracy: final_stats.accuracy,
            time_seconds: final_stats.time_seconds,
            score: breakdown.total_score,
        });

        let (profile, leveled_up) = self.store.update_player_xp(&player.name, xp_earned)?;
        self.store
            .update_player_stats(&player.name, final_stats.wpm, final_stats.words_typed)?;

        let existing = self.store.achievements_for(&player.name);
        let snapshot = StatsSnapshot {
            rounds_completed: profile.games_played,
            wpm: final_stats.wpm,
            accuracy: final_stats.accuracy,
            session_rounds: self.session_rounds,
        };
        let new_achievements = achievements::check_achievements(&snapshot, &existing);
        for id in &new_achievements {
            self.store.add_achievement(&player.name, id.as_str())?;
        }

        let already = self.store.unlocks();
        let new_unlocks = unlocks::newly_unlocked(profile.level, &already);
        for category in &new_unlocks {
            self.store.unlock_category(category)?;
        }

        let new_highscore = self
            .store
            .record_highscore(&self.config.category, breakdown.total_score)?;

        log::info!(
            "{} finished round {} with {} points ({} XP)",
            player.name,
            self.controller.current_round(),
            breakdown.total_score,
            xp_earned
        );

        Ok(TurnOutcome {
            player,
            breakdown,
            xp_earned,
            level_progress: progression::level_progress(profile.xp),
            profile,
            leveled_up,
            new_achievements,
            new_unlocks,
            new_highscore,
        })
    }

    /// Advances after a recorded turn: rotates to the next pending player,
    /// or closes out the round / the match.
    pub fn advance(&mut self) -> MatchPhase {
        if !self.controller.is_round_complete() {
            self.controller.next_player();
            return MatchPhase::NextTurn;
        }
        if self.controller.current_round() < self.controller.total_rounds() {
            MatchPhase::RoundComplete
        } else {
            MatchPhase::MatchComplete
        }
    }

    /// Starts the next round once a `RoundComplete` phase has been shown.
    pub fn begin_next_round(&mut self) {
        self.controller.start_next_round();
    }

    pub fn session_rounds(&self) -> u32 {
        self.session_rounds
    }

    pub fn store(&self) -> &JsonStore {
        &self.store
    }
}
