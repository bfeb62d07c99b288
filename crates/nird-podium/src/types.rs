//! Core types for the podium
//!
//! Defines:
//! - Mission and team identifiers
//! - The catalog document (missions, teams, membership)
//! - Score ledger entries and the clamped score range
//! - Derived ranking rows

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lowest score a ledger entry can hold
pub const SCORE_MIN: i64 = 0;

/// Highest score a ledger entry can hold
pub const SCORE_MAX: i64 = 10_000;

/// Clamp a raw score into `[SCORE_MIN, SCORE_MAX]`
#[inline]
#[must_use]
pub fn clamp_score(raw: i64) -> i64 {
    raw.clamp(SCORE_MIN, SCORE_MAX)
}

/// Mission identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MissionId(pub i64);

impl std::fmt::Display for MissionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Team identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TeamId(pub i64);

impl std::fmt::Display for TeamId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A themed challenge and the teams taking part in it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Mission {
    /// Mission identifier
    pub id: MissionId,
    /// Display title
    pub title: String,
    /// Public page of the mission
    pub url: String,
    /// Participating teams, in catalog order
    #[serde(default)]
    pub team_ids: Vec<TeamId>,
}

/// A group of participants
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Team {
    /// Team identifier
    pub id: TeamId,
    /// Display name
    pub name: String,
    /// Public page of the team
    pub url: String,
    /// Member display names
    #[serde(default)]
    pub members: Vec<String>,
    /// Missions the team declares itself part of (informational only)
    #[serde(default)]
    pub mission_ids: Vec<MissionId>,
}

/// The catalog document: immutable after load
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Catalog {
    /// All missions
    #[serde(default)]
    pub missions: Vec<Mission>,
    /// All teams
    #[serde(default)]
    pub teams: Vec<Team>,
}

impl Catalog {
    /// Create catalog from parts
    #[inline]
    #[must_use]
    pub fn new(missions: Vec<Mission>, teams: Vec<Team>) -> Self {
        Self { missions, teams }
    }

    /// Find a team anywhere in the catalog
    #[must_use]
    pub fn team(&self, id: TeamId) -> Option<&Team> {
        self.teams.iter().find(|t| t.id == id)
    }
}

/// One row of the score ledger, keyed by `(mission_id, team_id)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreEntry {
    /// Mission the score belongs to
    pub mission_id: MissionId,
    /// Team the score belongs to
    pub team_id: TeamId,
    /// Stored score
    pub score: i64,
    /// Last write time
    pub updated_at: DateTime<Utc>,
}

impl ScoreEntry {
    /// Whether this entry is the one for `(mission, team)`
    #[inline]
    #[must_use]
    pub fn is_for(&self, mission: MissionId, team: TeamId) -> bool {
        self.mission_id == mission && self.team_id == team
    }
}

/// The in-memory score ledger, in file order
pub type Ledger = Vec<ScoreEntry>;

/// A team's position in a mission ranking (derived, never stored)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RankingRow {
    /// 1-based position in sorted order
    pub rank: usize,
    /// Team identifier
    pub team_id: TeamId,
    /// Team name
    pub name: String,
    /// Team page
    pub url: String,
    /// Team members
    pub members: Vec<String>,
    /// Resolved score (0 when the team has no ledger entry)
    pub score: i64,
}
