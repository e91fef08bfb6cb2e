//! JSON-backed persistence for profiles, unlocks and highscores.
//!
//! Each document is a single pretty-printed file under the data dir. Writes
//! go through a tmp file + rename so a crash never leaves a half-written
//! document behind; unreadable files are logged and replaced with defaults
//! rather than surfaced as errors.

use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Serialize, de::DeserializeOwned};

use crate::engine::progression;
use crate::store::schema::{
    HighscoresData, PlayerProfile, ProfilesData, SCHEMA_VERSION, UnlocksData,
};

const PROFILES_FILE: &str = "players.json";
const UNLOCKS_FILE: &str = "unlocks.json";
const HIGHSCORES_FILE: &str = "highscores.json";

pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typearena");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn file_path(&self, name: &str) -> PathBuf {
        self.base_dir.join(name)
    }

    fn load<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        let path = self.file_path(name);
        if !path.exists() {
            return T::default();
        }
        match fs::read_to_string(&path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|err| {
                log::warn!("discarding unreadable {name}: {err}");
                T::default()
            }),
            Err(err) => {
                log::warn!("failed to read {name}: {err}");
                T::default()
            }
        }
    }

    fn save<T: Serialize>(&self, name: &str, data: &T) -> Result<()> {
        let path = self.file_path(name);
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(data)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }

    pub fn load_profiles(&self) -> ProfilesData {
        let data: ProfilesData = self.load(PROFILES_FILE);
        if data.needs_reset() {
            log::warn!(
                "{PROFILES_FILE} has schema {} (want {SCHEMA_VERSION}); starting fresh",
                data.schema_version
            );
            return ProfilesData::default();
        }
        data
    }

    pub fn save_profiles(&self, data: &ProfilesData) -> Result<()> {
        self.save(PROFILES_FILE, data)
    }

    pub fn load_unlocks(&self) -> UnlocksData {
        self.load(UNLOCKS_FILE)
    }

    pub fn save_unlocks(&self, data: &UnlocksData) -> Result<()> {
        self.save(UNLOCKS_FILE, data)
    }

    pub fn load_highscores(&self) -> HighscoresData {
        self.load(HIGHSCORES_FILE)
    }

    pub fn save_highscores(&self, data: &HighscoresData) -> Result<()> {
        self.save(HIGHSCORES_FILE, data)
    }

    /// Name lookup is case-insensitive: "Alice" and "alice" are one player.
    pub fn player_by_name(&self, name: &str) -> Option<PlayerProfile> {
        let key = name.to_lowercase();
        self.load_profiles()
            .players
            .into_iter()
            .find(|profile| profile.name.to_lowercase() == key)
    }

    /// Grants XP, creating the profile on first sight, and recomputes the
    /// level. Also counts the game and stamps the play time. Returns the
    /// updated profile and whether a level boundary was crossed.
    pub fn update_player_xp(&self, name: &str, xp_gained: u32) -> Result<(PlayerProfile, bool)> {
        let mut data = self.load_profiles();
        let key = name.to_lowercase();
        let index = match data
            .players
            .iter()
            .position(|profile| profile.name.to_lowercase() == key)
        {
            Some(index) => index,
            None => {
                data.players.push(PlayerProfile::new(name));
                data.players.len() - 1
            }
        };

        let profile = &mut data.players[index];
        profile.xp += xp_gained;
        profile.games_played += 1;
        profile.last_played = Some(Utc::now());
        let new_level = progression::level_from_xp(profile.xp);
        let leveled_up = new_level > profile.level;
        profile.level = new_level;

        let snapshot = profile.clone();
        self.save_profiles(&data)?;
        Ok((snapshot, leveled_up))
    }

    /// Best-WPM high-water mark and cumulative word count. No-op for a
    /// player that has never earned XP.
    pub fn update_player_stats(&self, name: &str, wpm: u32, words_typed: usize) -> Result<()> {
        let mut data = self.load_profiles();
        let key = name.to_lowercase();
        if let Some(profile) = data
            .players
            .iter_mut()
            .find(|profile| profile.name.to_lowercase() == key)
        {
            profile.best_wpm = profile.best_wpm.max(wpm);
            profile.total_words_typed += words_typed as u64;
            self.save_profiles(&data)?;
        }
        Ok(())
    }

    pub fn achievements_for(&self, name: &str) -> Vec<String> {
        self.player_by_name(name)
            .map(|profile| profile.achievements)
            .unwrap_or_default()
    }

    /// Returns true when the badge was newly added.
    pub fn add_achievement(&self, name: &str, achievement_id: &str) -> Result<bool> {
        let mut data = self.load_profiles();
        let key = name.to_lowercase();
        let Some(profile) = data
            .players
            .iter_mut()
            .find(|profile| profile.name.to_lowercase() == key)
        else {
            return Ok(false);
        };
        if profile.achievements.iter().any(|have| have == achievement_id) {
            return Ok(false);
        }
        profile.achievements.push(achievement_id.to_string());
        self.save_profiles(&data)?;
        Ok(true)
    }

    pub fn unlocks(&self) -> Vec<String> {
        self.load_unlocks().unlocked
    }

    /// Returns true when the category was newly unlocked.
    pub fn unlock_category(&self, category: &str) -> Result<bool> {
        let mut data = self.load_unlocks();
        if data.unlocked.iter().any(|have| have == category) {
            return Ok(false);
        }
        data.unlocked.push(category.to_string());
        self.save_unlocks(&data)?;
        Ok(true)
    }

    pub fn highscore(&self, category: &str) -> Option<u32> {
        self.load_highscores().scores.get(category).copied()
    }

    /// Returns true when `score` beats (or first sets) the category best.
    pub fn record_highscore(&self, category: &str, score: u32) -> Result<bool> {
        let mut data = self.load_highscores();
        if let Some(&best) = data.scores.get(category)
            && score <= best
        {
            return Ok(false);
        }
        data.scores.insert(category.to_string(), score);
        self.save_highscores(&data)?;
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn test_unknown_player_is_none() {
        let (_dir, store) = make_test_store();
        assert!(store.player_by_name("nobody").is_none());
    }

    #[test]
    fn test_update_xp_creates_profile() {
        let (_dir, store) = make_test_store();
        let (profile, leveled_up) = store.update_player_xp("alice", 250).unwrap();
        assert_eq!(profile.xp, 250);
        assert_eq!(profile.level, 1);
        assert_eq!(profile.games_played, 1);
        assert!(profile.last_played.is_some());
        assert!(!leveled_up);
    }

    #[test]
    fn test_level_up_detection() {
        let (_dir, store) = make_test_store();
        store.update_player_xp("alice", 900).unwrap();
        let (profile, leveled_up) = store.update_player_xp("alice", 200).unwrap();
        assert_eq!(profile.xp, 1100);
        assert_eq!(profile.level, 2);
        assert!(leveled_up);
    }

    #[test]
    fn test_name_lookup_is_case_insensitive() {
        let (_dir, store) = make_test_store();
        store.update_player_xp("Alice", 100).unwrap();
        let profile = store.player_by_name("aLiCe").unwrap();
        assert_eq!(profile.name, "Alice");
        // And the update path must not create a duplicate.
        store.update_player_xp("ALICE", 50).unwrap();
        assert_eq!(store.load_profiles().players.len(), 1);
    }

    #[test]
    fn test_update_stats_tracks_best_wpm() {
        let (_dir, store) = make_test_store();
        store.update_player_xp("alice", 10).unwrap();
        store.update_player_stats("alice", 60, 25).unwrap();
        store.update_player_stats("alice", 45, 30).unwrap();
        let profile = store.player_by_name("alice").unwrap();
        assert_eq!(profile.best_wpm, 60);
        assert_eq!(profile.total_words_typed, 55);
    }

    #[test]
    fn test_update_stats_without_profile_is_noop() {
        let (_dir, store) = make_test_store();
        store.update_player_stats("ghost", 60, 25).unwrap();
        assert!(store.player_by_name("ghost").is_none());
    }

    #[test]
    fn test_achievements_dedup() {
        let (_dir, store) = make_test_store();
        store.update_player_xp("alice", 10).unwrap();
        assert!(store.add_achievement("alice", "first_steps").unwrap());
        assert!(!store.add_achievement("alice", "first_steps").unwrap());
        assert_eq!(store.achievements_for("alice"), vec!["first_steps"]);
    }

    #[test]
    fn test_unlocks_default_to_classics() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.unlocks(), vec!["classics"]);
    }

    #[test]
    fn test_unlock_category_once() {
        let (_dir, store) = make_test_store();
        assert!(store.unlock_category("poetry").unwrap());
        assert!(!store.unlock_category("poetry").unwrap());
        assert_eq!(store.unlocks(), vec!["classics", "poetry"]);
    }

    #[test]
    fn test_highscore_high_water_mark() {
        let (_dir, store) = make_test_store();
        assert_eq!(store.highscore("classics"), None);
        assert!(store.record_highscore("classics", 500).unwrap());
        assert!(!store.record_highscore("classics", 400).unwrap());
        assert!(!store.record_highscore("classics", 500).unwrap());
        assert!(store.record_highscore("classics", 600).unwrap());
        assert_eq!(store.highscore("classics"), Some(600));
    }

    #[test]
    fn test_corrupt_file_resets_to_default() {
        let (_dir, store) = make_test_store();
        store.update_player_xp("alice", 100).unwrap();
        fs::write(store.file_path(PROFILES_FILE), "not json").unwrap();
        assert!(store.load_profiles().players.is_empty());
    }

    #[test]
    fn test_stale_schema_resets_profiles() {
        let (_dir, store) = make_test_store();
        let mut data = ProfilesData::default();
        data.schema_version = 0;
        data.players.push(PlayerProfile::new("alice"));
        store.save_profiles(&data).unwrap();
        assert!(store.load_profiles().players.is_empty());
    }

    #[test]
    fn test_profiles_survive_reload() {
        let (dir, store) = make_test_store();
        store.update_player_xp("alice", 1200).unwrap();
        store.add_achievement("alice", "first_steps").unwrap();
        drop(store);

        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        let profile = store.player_by_name("alice").unwrap();
        assert_eq!(profile.xp, 1200);
        assert_eq!(profile.level, 2);
        assert_eq!(profile.achievements, vec!["first_steps"]);
    }
}
