use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const SCHEMA_VERSION: u32 = 1;

/// One saved player. Looked up case-insensitively by name.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PlayerProfile {
    pub name: String,
    pub xp: u32,
    pub level: u32,
    pub games_played: u32,
    pub best_wpm: u32,
    pub total_words_typed: u64,
    pub achievements: Vec<String>,
    #[serde(default)]
    pub last_played: Option<DateTime<Utc>>,
}

impl PlayerProfile {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            xp: 0,
            level: 1,
            games_played: 0,
            best_wpm: 0,
            total_words_typed: 0,
            achievements: Vec::new(),
            last_played: None,
        }
    }
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ProfilesData {
    pub schema_version: u32,
    pub players: Vec<PlayerProfile>,
}

impl Default for ProfilesData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            players: Vec::new(),
        }
    }
}

impl ProfilesData {
    /// True when the on-disk layout predates this build and must be reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }
}

/// Category ids the local install has opened up. `classics` ships unlocked.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct UnlocksData {
    pub schema_version: u32,
    pub unlocked: Vec<String>,
}

impl Default for UnlocksData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            unlocked: vec!["classics".to_string()],
        }
    }
}

/// Best total score seen per category.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HighscoresData {
    pub schema_version: u32,
    pub scores: HashMap<String, u32>,
}

impl Default for HighscoresData {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            scores: HashMap::new(),
        }
    }
}
