//! One-shot badges evaluated after every completed turn.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum AchievementId {
    FirstSteps,
    SpeedDemon,
    Centurion,
    Perfectionist,
    Marathon,
}

impl AchievementId {
    pub fn as_str(self) -> &'static str {
        match self {
            AchievementId::FirstSteps => "first_steps",
            AchievementId::SpeedDemon => "speed_demon",
            AchievementId::Centurion => "centurion",
            AchievementId::Perfectionist => "perfectionist",
            AchievementId::Marathon => "marathon",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "first_steps" => Some(AchievementId::FirstSteps),
            "speed_demon" => Some(AchievementId::SpeedDemon),
            "centurion" => Some(AchievementId::Centurion),
            "perfectionist" => Some(AchievementId::Perfectionist),
            "marathon" => Some(AchievementId::Marathon),
            _ => None,
        }
    }
}

pub struct Achievement {
    pub id: AchievementId,
    pub name: &'static str,
    pub description: &'static str,
}

pub const ACHIEVEMENTS: &[Achievement] = &[
    Achievement {
        id: AchievementId::FirstSteps,
        name: "First Steps",
        description: "Complete your first round",
    },
    Achievement {
        id: AchievementId::SpeedDemon,
        name: "Speed Demon",
        description: "Reach 80+ WPM",
    },
    Achievement {
        id: AchievementId::Centurion,
        name: "100 WPM Club",
        description: "Reach 100+ WPM",
    },
    Achievement {
        id: AchievementId::Perfectionist,
        name: "Perfectionist",
        description: "100% accuracy in a round",
    },
    Achievement {
        id: AchievementId::Marathon,
        name: "Marathon",
        description: "Complete 10 rounds in one session",
    },
];

pub fn by_id(id: AchievementId) -> &'static Achievement {
    ACHIEVEMENTS
        .iter()
        .find(|a| a.id == id)
        .expect("every AchievementId has a table entry")
}

/// The numbers the rules look at after a turn.
#[derive(Clone, Copy, Debug, Default)]
pub struct StatsSnapshot {
    /// Lifetime rounds for this player, from the persisted profile.
    pub rounds_completed: u32,
    pub wpm: u32,
    pub accuracy: u32,
    /// Rounds completed since the program started.
    pub session_rounds: u32,
}

/// Evaluates every rule and returns only badges not already in `existing`.
/// The rules are independent; any subset may fire from a single turn.
pub fn check_achievements(stats: &StatsSnapshot, existing: &[String]) -> Vec<AchievementId> {
    let mut earned = Vec::new();
    let mut consider = |id: AchievementId, qualified: bool| {
        if qualified && !existing.iter().any(|have| have == id.as_str()) {
            earned.push(id);
        }
    };

    consider(AchievementId::FirstSteps, stats.rounds_completed >= 1);
    consider(AchievementId::SpeedDemon, stats.wpm >= 80);
    consider(AchievementId::Centurion, stats.wpm >= 100);
    // Strict equality on the already-rounded percentage; no tolerance band.
    consider(AchievementId::Perfectionist, stats.accuracy == 100);
    consider(AchievementId::Marathon, stats.session_rounds >= 10);

    earned
}
