//! Pure stat formulas shared by live updates and final results.

/// Standard typing measure: five correct characters count as one word.
pub fn words_per_minute(correct_chars: usize, elapsed_secs: f64) -> f64 {
    if elapsed_secs <= 0.0 {
        return 0.0;
    }
    (correct_chars as f64 / 5.0) / (elapsed_secs / 60.0)
}

/// Percentage of classified characters that were correct. Optimistic at
/// zero: an untouched session reports 100, not undefined.
pub fn accuracy_percent(correct: usize, incorrect: usize) -> f64 {
    let total = correct + incorrect;
    if total == 0 {
        return 100.0;
    }
    correct as f64 / total as f64 * 100.0
}

/// How far the cursor is through the target, capped at 100.
pub fn progress_percent(current_index: usize, target_len: usize) -> f64 {
    if target_len == 0 {
        return 0.0;
    }
    (current_index as f64 / target_len as f64 * 100.0).min(100.0)
}

/// `M:SS` clock display.
pub fn format_time(seconds: u64) -> String {
    format!("{}:{:02}", seconds / 60, seconds % 60)
}

/// Snapshot pushed to subscribers while a turn is running.
#[derive(Clone, Debug, PartialEq)]
pub struct LiveStats {
    pub wpm: u32,
    pub accuracy: u32,
    pub progress: f64,
    pub elapsed_secs: u64,
    pub formatted_time: String,
    pub current_index: usize,
    pub total_chars: usize,
    pub correct_chars: usize,
    pub incorrect_chars: usize,
}

/// Fixed result of a completed turn.
#[derive(Clone, Debug, PartialEq)]
pub struct FinalStats {
    pub wpm: u32,
    pub accuracy: u32,
    pub time_seconds: u32,
    pub formatted_time: String,
    pub correct_chars: usize,
    pub incorrect_chars: usize,
    pub total_chars: usize,
    pub words_typed: usize,
}
