//! Level-gated content categories.

/// Level thresholds that open new categories. `classics` is available from
/// the start and is not listed here.
pub const LEVEL_UNLOCKS: &[(u32, &str)] = &[
    (3, "poetry"),
    (5, "code"),
    (8, "random"),
    (12, "humor"),
    (15, "modern"),
];

/// Categories whose threshold `level` meets and that are not yet in
/// `unlocked`. Persisting the grown set is the store's job, not ours.
pub fn newly_unlocked(level: u32, unlocked: &[String]) -> Vec<&'static str> {
    LEVEL_UNLOCKS
        .iter()
        .filter(|(required, _)| level >= *required)
        .map(|(_, category)| *category)
        .filter(|category| !unlocked.iter().any(|have| have == category))
        .collect()
}
