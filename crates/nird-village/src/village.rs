//! The village: players, mission runs, leaderboard and statistics
//!
//! Everything lives in memory for the lifetime of the process. Missions and
//! resources are fixed at construction; players and progress rows grow as
//! requests come in and are never removed.

use crate::catalog::{builtin_missions, builtin_resources};
use crate::error::VillageError;
use crate::types::{
    Completion, LeaderboardEntry, MissionFilter, PillarsProgress, Progress, ProgressId,
    ProgressReport, Resource, User, VillageMission, VillageStats,
};
use chrono::Utc;
use parking_lot::RwLock;
use std::collections::BTreeMap;

/// Default leaderboard length
pub const DEFAULT_LEADERBOARD_LIMIT: usize = 10;

#[derive(Debug, Default)]
struct VillageState {
    users: Vec<User>,
    progress: Vec<Progress>,
}

impl VillageState {
    fn user(&self, id: &str) -> Result<&User, VillageError> {
        self.users
            .iter()
            .find(|u| u.id.0 == id)
            .ok_or_else(|| VillageError::UserNotFound(id.to_string()))
    }

    fn user_mut(&mut self, id: &str) -> Result<&mut User, VillageError> {
        self.users
            .iter_mut()
            .find(|u| u.id.0 == id)
            .ok_or_else(|| VillageError::UserNotFound(id.to_string()))
    }
}

/// Counts reported by the health check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VillageCounts {
    pub users: usize,
    pub missions: usize,
    pub active_progress: usize,
}

/// In-memory village game
#[derive(Debug)]
pub struct Village {
    missions: Vec<VillageMission>,
    resources: Vec<Resource>,
    state: RwLock<VillageState>,
}

impl Village {
    /// Village with the built-in missions and resources
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::with_catalog(builtin_missions(), builtin_resources())
    }

    /// Village with a custom mission and resource set
    #[must_use]
    pub fn with_catalog(missions: Vec<VillageMission>, resources: Vec<Resource>) -> Self {
        Self {
            missions,
            resources,
            state: RwLock::new(VillageState::default()),
        }
    }

    /// Create a player, or return the existing one with that username
    ///
    /// # Errors
    /// `VillageError::InvalidInput` when either field is blank
    pub fn register(&self, username: &str, role: &str) -> Result<User, VillageError> {
        let username = username.trim();
        let role = role.trim();
        if username.is_empty() || role.is_empty() {
            return Err(VillageError::InvalidInput(
                "username and role are required".to_string(),
            ));
        }

        let mut state = self.state.write();
        if let Some(existing) = state.users.iter().find(|u| u.username == username) {
            return Ok(existing.clone());
        }

        let user = User::new(username, role);
        tracing::info!(user = %user.id, role, "player registered");
        state.users.push(user.clone());
        Ok(user)
    }

    /// Look up a player
    ///
    /// # Errors
    /// `VillageError::UserNotFound`
    pub fn user(&self, id: &str) -> Result<User, VillageError> {
        self.state.read().user(id).cloned()
    }

    /// Change a player's role
    ///
    /// # Errors
    /// `VillageError::InvalidInput` for a blank role, `VillageError::UserNotFound`
    pub fn set_role(&self, id: &str, role: &str) -> Result<User, VillageError> {
        let role = role.trim();
        if role.is_empty() {
            return Err(VillageError::InvalidInput("role is required".to_string()));
        }

        let mut state = self.state.write();
        let user = state.user_mut(id)?;
        user.role = role.to_string();
        Ok(user.clone())
    }

    /// Missions matching `filter`, in catalog order
    #[must_use]
    pub fn missions(&self, filter: &MissionFilter) -> Vec<VillageMission> {
        self.missions
            .iter()
            .filter(|m| filter.place_id.as_ref().map_or(true, |p| &m.place_id == p))
            .filter(|m| filter.role.as_ref().map_or(true, |r| m.open_to(r)))
            .cloned()
            .collect()
    }

    /// Look up a mission
    ///
    /// # Errors
    /// `VillageError::MissionNotFound`
    pub fn mission(&self, id: &str) -> Result<VillageMission, VillageError> {
        self.find_mission(id).cloned()
    }

    fn find_mission(&self, id: &str) -> Result<&VillageMission, VillageError> {
        self.missions
            .iter()
            .find(|m| m.id == id)
            .ok_or_else(|| VillageError::MissionNotFound(id.to_string()))
    }

    /// Open a progress row for a player on a mission
    ///
    /// # Errors
    /// - `VillageError::MissionNotFound` / `VillageError::UserNotFound`
    /// - `VillageError::MissionAlreadyCompleted` when the player finished it
    pub fn start_mission(
        &self,
        mission_id: &str,
        user_id: &str,
    ) -> Result<(Progress, VillageMission), VillageError> {
        let mission = self.find_mission(mission_id)?;

        let mut state = self.state.write();
        if state.user(user_id)?.has_completed(&mission.id) {
            return Err(VillageError::MissionAlreadyCompleted(mission.id.clone()));
        }

        let progress = Progress {
            id: ProgressId::new(),
            user_id: state.user(user_id)?.id.clone(),
            mission_id: mission.id.clone(),
            started_at: Utc::now(),
            current_step: 0,
            completed: false,
        };
        state.progress.push(progress.clone());
        tracing::debug!(user = user_id, mission = mission_id, "mission started");

        Ok((progress, mission.clone()))
    }

    /// Finish a mission: award points, raise pillars, close open runs
    ///
    /// # Errors
    /// - `VillageError::MissionNotFound` / `VillageError::UserNotFound`
    /// - `VillageError::MissionAlreadyCompleted` on a second completion
    pub fn complete_mission(
        &self,
        mission_id: &str,
        user_id: &str,
    ) -> Result<Completion, VillageError> {
        let mission = self.find_mission(mission_id)?;

        let mut state = self.state.write();
        let user = state.user_mut(user_id)?;
        if user.has_completed(&mission.id) {
            return Err(VillageError::MissionAlreadyCompleted(mission.id.clone()));
        }

        let points = mission.points();
        user.total_points = user.total_points.saturating_add(points);
        for impact in &mission.pillars_impact {
            user.pillars_progress.raise(impact.pillar, impact.value);
        }
        user.completed_missions.push(mission.id.clone());
        let user = user.clone();

        for run in state
            .progress
            .iter_mut()
            .filter(|p| p.user_id == user.id && p.mission_id == mission.id)
        {
            run.completed = true;
        }

        tracing::info!(user = %user.id, mission = mission_id, points, "mission completed");
        Ok(Completion {
            user,
            points_earned: points,
            pillars_updated: mission.pillars_impact.clone(),
        })
    }

    /// A player's open runs and completion count
    ///
    /// # Errors
    /// `VillageError::UserNotFound`
    pub fn progress(&self, user_id: &str) -> Result<ProgressReport, VillageError> {
        let state = self.state.read();
        let user = state.user(user_id)?.clone();
        let active_missions = state
            .progress
            .iter()
            .filter(|p| p.user_id == user.id && !p.completed)
            .cloned()
            .collect();

        Ok(ProgressReport {
            completed_count: user.completed_missions.len(),
            user,
            active_missions,
        })
    }

    /// Players by total points (descending, then username), optionally one role
    #[must_use]
    pub fn leaderboard(&self, limit: usize, role: Option<&str>) -> Vec<LeaderboardEntry> {
        let state = self.state.read();
        let mut rows: Vec<LeaderboardEntry> = state
            .users
            .iter()
            .filter(|u| role.map_or(true, |r| u.role == r))
            .map(|u| LeaderboardEntry {
                username: u.username.clone(),
                role: u.role.clone(),
                total_points: u.total_points,
                completed_missions: u.completed_missions.len(),
                pillars_progress: u.pillars_progress,
            })
            .collect();

        rows.sort_by(|a, b| {
            b.total_points
                .cmp(&a.total_points)
                .then_with(|| a.username.cmp(&b.username))
        });
        rows.truncate(limit);
        rows
    }

    /// Village-wide statistics
    #[must_use]
    pub fn stats(&self) -> VillageStats {
        let state = self.state.read();
        let total_users = state.users.len();
        let total_missions = self.missions.len();
        let total_completed_missions: usize =
            state.users.iter().map(|u| u.completed_missions.len()).sum();

        let mut sums = [0u64; 3];
        let mut role_distribution = BTreeMap::new();
        for user in &state.users {
            sums[0] += u64::from(user.pillars_progress.inclusion);
            sums[1] += u64::from(user.pillars_progress.responsabilite);
            sums[2] += u64::from(user.pillars_progress.durabilite);
            *role_distribution.entry(user.role.clone()).or_insert(0) += 1;
        }

        let users = total_users as u64;
        let average_pillars_progress = PillarsProgress {
            inclusion: round_ratio(sums[0], users),
            responsabilite: round_ratio(sums[1], users),
            durabilite: round_ratio(sums[2], users),
        };
        let completion_rate = round_ratio(
            total_completed_missions as u64 * 100,
            users * total_missions as u64,
        );

        VillageStats {
            total_users,
            total_missions,
            total_completed_missions,
            average_pillars_progress,
            role_distribution,
            completion_rate,
        }
    }

    /// Reference resources
    #[must_use]
    pub fn resources(&self) -> Vec<Resource> {
        self.resources.clone()
    }

    /// Sizes of the village collections
    #[must_use]
    pub fn counts(&self) -> VillageCounts {
        let state = self.state.read();
        VillageCounts {
            users: state.users.len(),
            missions: self.missions.len(),
            active_progress: state.progress.iter().filter(|p| !p.completed).count(),
        }
    }
}

impl Default for Village {
    fn default() -> Self {
        Self::new()
    }
}

/// `numerator / denominator` rounded half up; 0 when the denominator is 0
fn round_ratio(numerator: u64, denominator: u64) -> u32 {
    if denominator == 0 {
        return 0;
    }
    let rounded = (2 * numerator + denominator) / (2 * denominator);
    u32::try_from(rounded).unwrap_or(u32::MAX)
}
