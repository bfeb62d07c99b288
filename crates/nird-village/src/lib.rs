//! NIRD Village - the in-memory village game
//!
//! Players register with a role, start and complete NIRD missions that move
//! their three pillars (inclusion, responsabilite, durabilite), and compete on
//! a global leaderboard. State lives in memory only.

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod catalog;
pub mod error;
pub mod types;
pub mod village;

pub use error::VillageError;
pub use types::{
    Completion, Difficulty, LeaderboardEntry, MissionFilter, Pillar, PillarImpact,
    PillarsProgress, Progress, ProgressId, ProgressReport, Resource, Rewards, User, UserId,
    VillageMission, VillageStats, DEFAULT_MISSION_POINTS, PILLAR_MAX,
};
pub use village::{Village, VillageCounts, DEFAULT_LEADERBOARD_LIMIT};
