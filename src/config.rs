use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::content;
use crate::engine::scoring::Difficulty;
use crate::session::typing::BackspaceMode;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_backspace_mode")]
    pub backspace_mode: String,
    #[serde(default = "default_difficulty")]
    pub difficulty: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default = "default_total_rounds")]
    pub total_rounds: u32,
    #[serde(default = "default_live_tick_ms")]
    pub live_tick_ms: u64,
    #[serde(default = "default_countdown_secs")]
    pub countdown_secs: u32,
}

fn default_backspace_mode() -> String {
    "allowed".to_string()
}
fn default_difficulty() -> String {
    "medium".to_string()
}
fn default_category() -> String {
    "classics".to_string()
}
fn default_total_rounds() -> u32 {
    3
}
fn default_live_tick_ms() -> u64 {
    100
}
fn default_countdown_secs() -> u32 {
    3
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backspace_mode: default_backspace_mode(),
            difficulty: default_difficulty(),
            category: default_category(),
            total_rounds: default_total_rounds(),
            live_tick_ms: default_live_tick_ms(),
            countdown_secs: default_countdown_secs(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("typearena")
            .join("config.toml")
    }

    /// Normalizes stale or out-of-range values instead of rejecting them.
    /// Call after deserialization and after applying CLI overrides.
    pub fn validate(&mut self) {
        if Difficulty::from_key(&self.difficulty).is_none() {
            self.difficulty = default_difficulty();
        }
        if !matches!(self.backspace_mode.as_str(), "allowed" | "disabled") {
            self.backspace_mode = default_backspace_mode();
        }
        if content::category_by_id(&self.category).is_none() {
            self.category = default_category();
        }
        self.total_rounds = self.total_rounds.clamp(1, 10);
        self.live_tick_ms = self.live_tick_ms.clamp(16, 1000);
        self.countdown_secs = self.countdown_secs.min(10);
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::from_key(&self.difficulty).unwrap_or_default()
    }

    pub fn backspace_mode(&self) -> BackspaceMode {
        BackspaceMode::from_key(&self.backspace_mode)
    }
}
