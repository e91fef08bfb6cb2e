pub mod achievements;
pub mod progression;
pub mod scoring;
pub mod unlocks;
