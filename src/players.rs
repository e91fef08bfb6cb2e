//! Players, turn order and score bookkeeping for one match.
//!
//! A match is a fixed roster playing `total_rounds` rounds; every round each
//! player takes one turn in roster order. The controller owns the per-round
//! score slots and the cumulative match accumulators; it never touches
//! persistence or sessions.

use std::cmp::Reverse;

/// Avatar palette, assigned round-robin by roster order.
pub const PLAYER_COLORS: [&str; 4] = ["#e94560", "#4ecca3", "#6bcbff", "#ffd93d"];

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Player {
    /// 1-based, stable for the lifetime of the match.
    pub id: u32,
    pub name: String,
    pub color: &'static str,
}

/// One recorded turn.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RoundScore {
    pub wpm: u32,
    pub accuracy: u32,
    pub time_seconds: u32,
    pub score: u32,
}

/// Per-player accumulator across the match. Reset only with the roster.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MatchScore {
    pub total_score: u32,
    pub total_wpm: u32,
    pub total_accuracy: u32,
    pub rounds: u32,
}

/// A player's placement within one round.
#[derive(Clone, Debug)]
pub struct RoundStanding {
    pub player: Player,
    /// `None` until the player has taken this round's turn.
    pub result: Option<RoundScore>,
    pub rank: u32,
}

/// A player's placement across the whole match.
#[derive(Clone, Debug)]
pub struct MatchStanding {
    pub player: Player,
    pub totals: MatchScore,
    pub avg_wpm: u32,
    pub avg_accuracy: u32,
    pub rank: u32,
}

pub struct MatchController {
    players: Vec<Player>,
    current_player_index: usize,
    round_scores: Vec<Option<RoundScore>>,
    match_scores: Vec<MatchScore>,
    current_round: u32,
    total_rounds: u32,
}

impl MatchController {
    pub fn new(total_rounds: u32) -> Self {
        Self {
            players: Vec::new(),
            current_player_index: 0,
            round_scores: Vec::new(),
            match_scores: Vec::new(),
            current_round: 1,
            total_rounds: total_rounds.max(1),
        }
    }

    /// Fixes the roster for the match: sequential 1-based ids, a default
    /// name for blank entries, palette colors wrapping past four players.
    /// Resets all round and match scores.
    pub fn set_players<S: AsRef<str>>(&mut self, names: &[S]) -> &[Player] {
        self.players = names
            .iter()
            .enumerate()
            .map(|(index, name)| {
                let id = index as u32 + 1;
                let name = name.as_ref().trim();
                Player {
                    id,
                    name: if name.is_empty() {
                        format!("Player {id}")
                    } else {
                        name.to_string()
                    },
                    color: PLAYER_COLORS[index % PLAYER_COLORS.len()],
                }
            })
            .collect();
        self.reset_scores();
        &self.players
    }

    /// Back to round 1 with empty slots and zeroed accumulators.
    pub fn reset_scores(&mut self) {
        self.current_player_index = 0;
        self.current_round = 1;
        self.round_scores = vec![None; self.players.len()];
        self.match_scores = vec![MatchScore::default(); self.players.len()];
    }

    pub fn players(&self) -> &[Player] {
        &self.players
    }

    pub fn player_count(&self) -> usize {
        self.players.len()
    }

    pub fn current_player(&self) -> Option<&Player> {
        self.players.get(self.current_player_index)
    }

    pub fn current_player_index(&self) -> usize {
        self.current_player_index
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn total_rounds(&self) -> u32 {
        self.total_rounds
    }

    pub fn set_total_rounds(&mut self, rounds: u32) {
        self.total_rounds = rounds.max(1);
    }

    pub fn is_last_player_turn(&self) -> bool {
        !self.players.is_empty() && self.current_player_index == self.players.len() - 1
    }

    /// Raw rotation with wraparound; round bookkeeping is the caller's
    /// concern, so this will happily cycle past players who already played.
    pub fn next_player(&mut self) -> Option<&Player> {
        if self.players.is_empty() {
            return None;
        }
        self.current_player_index = (self.current_player_index + 1) % self.players.len();
        self.current_player()
    }

    /// Records the current player's turn. A repeat call within the same
    /// round is a re-take: the earlier entry is replaced and backed out of
    /// the match accumulators first, so totals never double-count. Returns
    /// the replaced entry when that happens.
    pub fn record_score(&mut self, result: RoundScore) -> Option<RoundScore> {
        if self.players.is_empty() {
            return None;
        }
        let index = self.current_player_index;
        let previous = self.round_scores[index].replace(result);
        let totals = &mut self.match_scores[index];
        if let Some(prev) = previous {
            totals.total_score -= prev.score;
            totals.total_wpm -= prev.wpm;
            totals.total_accuracy -= prev.accuracy;
            totals.rounds -= 1;
        }
        totals.total_score += result.score;
        totals.total_wpm += result.wpm;
        totals.total_accuracy += result.accuracy;
        totals.rounds += 1;
        previous
    }

    /// Standings for the current round, best score first. Unplayed slots
    /// rank as zero. The sort is stable, so equal scores keep roster order:
    /// the earlier-seated player wins ties.
    pub fn round_results(&self) -> Vec<RoundStanding> {
        let mut results: Vec<RoundStanding> = self
            .players
            .iter()
            .cloned()
            .zip(self.round_scores.iter().copied())
            .map(|(player, result)| RoundStanding {
                player,
                result,
                rank: 0,
            })
            .collect();
        results.sort_by_key(|standing| Reverse(standing.result.map_or(0, |r| r.score)));
        for (position, standing) in results.iter_mut().enumerate() {
            standing.rank = position as u32 + 1;
        }
        results
    }

    /// Cumulative standings, best total first, with per-round averages.
    pub fn match_results(&self) -> Vec<MatchStanding> {
        let mut results: Vec<MatchStanding> = self
            .players
            .iter()
            .cloned()
            .zip(self.match_scores.iter().copied())
            .map(|(player, totals)| {
                let (avg_wpm, avg_accuracy) = if totals.rounds > 0 {
                    (
                        (totals.total_wpm as f64 / totals.rounds as f64).round() as u32,
                        (totals.total_accuracy as f64 / totals.rounds as f64).round() as u32,
                    )
                } else {
                    (0, 0)
                };
                MatchStanding {
                    player,
                    totals,
                    avg_wpm,
                    avg_accuracy,
                    rank: 0,
                }
            })
            .collect();
        results.sort_by_key(|standing| Reverse(standing.totals.total_score));
        for (position, standing) in results.iter_mut().enumerate() {
            standing.rank = position as u32 + 1;
        }
        results
    }

    pub fn round_winner(&self) -> Option<RoundStanding> {
        self.round_results().into_iter().next()
    }

    pub fn match_winner(&self) -> Option<MatchStanding> {
        self.match_results().into_iter().next()
    }

    /// Clears the round slots and rewinds the turn order; the match
    /// accumulators are untouched.
    pub fn start_next_round(&mut self) {
        self.current_round += 1;
        self.current_player_index = 0;
        self.round_scores = vec![None; self.players.len()];
    }

    pub fn is_round_complete(&self) -> bool {
        self.round_scores.iter().all(Option::is_some)
    }

    pub fn is_match_complete(&self) -> bool {
        self.current_round > self.total_rounds && self.is_round_complete()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn score(points: u32) -> RoundScore {
        RoundScore {
            wpm: 50,
            accuracy: 95,
            time_seconds: 40,
            score: points,
        }
    }

    fn two_player_controller() -> MatchController {
        let mut controller = MatchController::new(3);
        controller.set_players(&["alice", "bob"]);
        controller
    }

    #[test]
    fn test_set_players_assigns_ids_and_colors() {
        let mut controller = MatchController::new(3);
        let players = controller.set_players(&["a", "b", "c", "d", "e"]);
        assert_eq!(players.len(), 5);
        assert_eq!(players[0].id, 1);
        assert_eq!(players[4].id, 5);
        assert_eq!(players[0].color, PLAYER_COLORS[0]);
        // Palette wraps for the fifth player.
        assert_eq!(players[4].color, PLAYER_COLORS[0]);
    }

    #[test]
    fn test_blank_names_get_defaults() {
        let mut controller = MatchController::new(1);
        let players = controller.set_players(&["", "  ", "carol"]);
        assert_eq!(players[0].name, "Player 1");
        assert_eq!(players[1].name, "Player 2");
        assert_eq!(players[2].name, "carol");
    }

    #[test]
    fn test_next_player_wraps() {
        let mut controller = two_player_controller();
        assert_eq!(controller.current_player().unwrap().name, "alice");
        assert_eq!(controller.next_player().unwrap().name, "bob");
        assert_eq!(controller.next_player().unwrap().name, "alice");
    }

    #[test]
    fn test_record_score_accumulates() {
        let mut controller = two_player_controller();
        controller.record_score(score(100));
        controller.next_player();
        controller.record_score(score(80));

        assert!(controller.is_round_complete());
        let results = controller.match_results();
        assert_eq!(results[0].player.name, "alice");
        assert_eq!(results[0].totals.total_score, 100);
        assert_eq!(results[0].totals.rounds, 1);
    }

    #[test]
    fn test_record_score_retake_replaces_without_double_count() {
        let mut controller = two_player_controller();
        controller.record_score(score(100));
        let replaced = controller.record_score(score(120));
        assert_eq!(replaced, Some(score(100)));

        let totals = controller.match_results();
        let alice = totals.iter().find(|s| s.player.name == "alice").unwrap();
        assert_eq!(alice.totals.total_score, 120);
        assert_eq!(alice.totals.rounds, 1);
    }

    #[test]
    fn test_round_ranking_sorted_descending() {
        let mut controller = two_player_controller();
        controller.record_score(score(80));
        controller.next_player();
        controller.record_score(score(140));

        let results = controller.round_results();
        assert_eq!(results[0].player.name, "bob");
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[1].player.name, "alice");
        assert_eq!(results[1].rank, 2);
        assert_eq!(controller.round_winner().unwrap().player.name, "bob");
    }

    #[test]
    fn test_tie_goes_to_earlier_seat() {
        let mut controller = two_player_controller();
        controller.record_score(score(100));
        controller.next_player();
        controller.record_score(score(100));

        let results = controller.round_results();
        assert_eq!(results[0].player.name, "alice");
        assert_eq!(results[0].rank, 1);
        assert_eq!(results[1].player.name, "bob");
        assert_eq!(results[1].rank, 2);
    }

    #[test]
    fn test_unplayed_slot_ranks_as_zero() {
        let mut controller = two_player_controller();
        controller.record_score(score(10));
        let results = controller.round_results();
        assert_eq!(results[0].player.name, "alice");
        assert!(results[1].result.is_none());
        assert_eq!(results[1].rank, 2);
    }

    #[test]
    fn test_round_reset_preserves_match_totals() {
        let mut controller = two_player_controller();
        controller.record_score(score(100));
        controller.next_player();
        controller.record_score(score(90));

        controller.start_next_round();
        assert_eq!(controller.current_round(), 2);
        assert_eq!(controller.current_player_index(), 0);
        assert!(!controller.is_round_complete());
        assert!(controller.round_results().iter().all(|s| s.result.is_none()));

        let totals = controller.match_results();
        assert_eq!(totals[0].totals.total_score, 100);
        assert_eq!(totals[1].totals.total_score, 90);
    }

    #[test]
    fn test_three_round_match_totals_and_winner() {
        let mut controller = two_player_controller();
        // Round winners alternate; bob takes two of three.
        let rounds = [(100, 120), (130, 110), (90, 140)];
        for (round_index, (alice_points, bob_points)) in rounds.iter().enumerate() {
            controller.record_score(score(*alice_points));
            controller.next_player();
            controller.record_score(score(*bob_points));
            assert!(controller.is_round_complete());
            if round_index < rounds.len() - 1 {
                controller.start_next_round();
            }
        }

        let results = controller.match_results();
        let alice = results.iter().find(|s| s.player.name == "alice").unwrap();
        let bob = results.iter().find(|s| s.player.name == "bob").unwrap();
        assert_eq!(alice.totals.total_score, 100 + 130 + 90);
        assert_eq!(bob.totals.total_score, 120 + 110 + 140);
        assert_eq!(controller.match_winner().unwrap().player.name, "bob");
        assert_eq!(alice.avg_wpm, 50);
        assert_eq!(alice.avg_accuracy, 95);
        assert_eq!(alice.totals.rounds, 3);
    }

    #[test]
    fn test_match_complete_requires_rounds_exhausted() {
        let mut controller = two_player_controller();
        controller.set_total_rounds(1);
        controller.record_score(score(10));
        controller.next_player();
        controller.record_score(score(20));
        assert!(controller.is_round_complete());
        assert!(!controller.is_match_complete());
        controller.start_next_round();
        // Round 2 of 1: slots are empty again, so completion needs them full.
        assert!(!controller.is_match_complete());
    }

    #[test]
    fn test_averages_guard_zero_rounds() {
        let controller = two_player_controller();
        let results = controller.match_results();
        assert_eq!(results[0].avg_wpm, 0);
        assert_eq!(results[0].avg_accuracy, 0);
    }

    #[test]
    fn test_last_player_turn_detection() {
        let mut controller = two_player_controller();
        assert!(!controller.is_last_player_turn());
        controller.next_player();
        assert!(controller.is_last_player_turn());
    }

    #[test]
    fn test_empty_roster_is_safe() {
        let mut controller = MatchController::new(3);
        assert!(controller.current_player().is_none());
        assert!(controller.next_player().is_none());
        assert!(controller.record_score(score(10)).is_none());
        assert!(controller.round_results().is_empty());
        assert!(controller.match_winner().is_none());
    }
}
