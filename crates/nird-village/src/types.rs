//! Core types for the village game
//!
//! Defines:
//! - Players and their pillar progress
//! - Built-in missions and resources
//! - Progress rows, leaderboard rows and village statistics

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use ulid::Ulid;

/// Highest value a pillar can reach
pub const PILLAR_MAX: u32 = 100;

/// Points a mission awards when it does not set its own
pub const DEFAULT_MISSION_POINTS: u32 = 100;

/// Player identifier (`user_<ulid>`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub String);

impl UserId {
    /// Generate new player ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(format!("user_{}", Ulid::new()))
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for UserId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Progress row identifier (`progress_<ulid>`)
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProgressId(pub String);

impl ProgressId {
    /// Generate new progress ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(format!("progress_{}", Ulid::new()))
    }
}

impl Default for ProgressId {
    fn default() -> Self {
        Self::new()
    }
}

/// The three NIRD pillars
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Pillar {
    /// Inclusive digital practice
    Inclusion,
    /// Responsible digital practice
    Responsabilite,
    /// Sustainable digital practice
    Durabilite,
}

/// Per-pillar progress, each in `0..=PILLAR_MAX`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarsProgress {
    pub inclusion: u32,
    pub responsabilite: u32,
    pub durabilite: u32,
}

impl PillarsProgress {
    /// Value of one pillar
    #[inline]
    #[must_use]
    pub fn get(&self, pillar: Pillar) -> u32 {
        match pillar {
            Pillar::Inclusion => self.inclusion,
            Pillar::Responsabilite => self.responsabilite,
            Pillar::Durabilite => self.durabilite,
        }
    }

    /// Raise one pillar, capped at `PILLAR_MAX`
    pub fn raise(&mut self, pillar: Pillar, by: u32) {
        let slot = match pillar {
            Pillar::Inclusion => &mut self.inclusion,
            Pillar::Responsabilite => &mut self.responsabilite,
            Pillar::Durabilite => &mut self.durabilite,
        };
        *slot = slot.saturating_add(by).min(PILLAR_MAX);
    }
}

/// A player of the village game
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
    pub pillars_progress: PillarsProgress,
    /// Completed mission ids, in completion order
    pub completed_missions: Vec<String>,
    pub total_points: u32,
}

impl User {
    /// Fresh player with no progress
    #[must_use]
    pub fn new(username: impl Into<String>, role: impl Into<String>) -> Self {
        Self {
            id: UserId::new(),
            username: username.into(),
            role: role.into(),
            created_at: Utc::now(),
            pillars_progress: PillarsProgress::default(),
            completed_missions: Vec::new(),
            total_points: 0,
        }
    }

    /// Whether the player already completed `mission_id`
    #[inline]
    #[must_use]
    pub fn has_completed(&self, mission_id: &str) -> bool {
        self.completed_missions.iter().any(|m| m == mission_id)
    }
}

/// Mission difficulty
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

/// How much a mission moves one pillar
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarImpact {
    pub pillar: Pillar,
    pub value: u32,
}

/// What finishing a mission unlocks
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Rewards {
    pub badge: String,
    pub unlocks_next: Vec<String>,
}

/// A built-in village mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageMission {
    pub id: String,
    pub title: String,
    pub place_id: String,
    pub description: String,
    /// Roles that may take the mission; empty means everyone
    pub roles_requis: Vec<String>,
    pub difficulty: Difficulty,
    pub duration: String,
    pub points: Option<u32>,
    pub steps: Vec<String>,
    pub pillars_impact: Vec<PillarImpact>,
    pub rewards: Rewards,
}

impl VillageMission {
    /// Points awarded on completion
    #[inline]
    #[must_use]
    pub fn points(&self) -> u32 {
        self.points.unwrap_or(DEFAULT_MISSION_POINTS)
    }

    /// Whether a player with `role` may take the mission
    #[inline]
    #[must_use]
    pub fn open_to(&self, role: &str) -> bool {
        self.roles_requis.is_empty() || self.roles_requis.iter().any(|r| r == role)
    }
}

/// A reference resource
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Resource {
    pub id: String,
    pub title: String,
    pub description: String,
    pub url: String,
    pub category: String,
    pub pillar: Pillar,
}

/// A player's run through a mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Progress {
    pub id: ProgressId,
    pub user_id: UserId,
    pub mission_id: String,
    pub started_at: DateTime<Utc>,
    pub current_step: u32,
    pub completed: bool,
}

/// Mission listing filter
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MissionFilter {
    pub role: Option<String>,
    pub place_id: Option<String>,
}

/// Result of completing a mission
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Completion {
    pub user: User,
    pub points_earned: u32,
    pub pillars_updated: Vec<PillarImpact>,
}

/// A player's progress overview
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressReport {
    pub user: User,
    pub active_missions: Vec<Progress>,
    pub completed_count: usize,
}

/// One row of the global leaderboard
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    pub username: String,
    pub role: String,
    pub total_points: u32,
    pub completed_missions: usize,
    pub pillars_progress: PillarsProgress,
}

/// Village-wide statistics
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VillageStats {
    pub total_users: usize,
    pub total_missions: usize,
    pub total_completed_missions: usize,
    pub average_pillars_progress: PillarsProgress,
    pub role_distribution: BTreeMap<String, usize>,
    /// Percentage of (player, mission) pairs completed
    pub completion_rate: u32,
}
