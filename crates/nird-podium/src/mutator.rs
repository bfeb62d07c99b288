//! Score mutator
//!
//! Absolute and delta updates both funnel through [`apply_absolute`]. A
//! mutation needs a [`ScoreTarget`], and the only way to get one is
//! [`Podium::resolve`], which checks that the mission exists and lists the
//! team. Ledger rows for unknown missions or teams can therefore only come
//! from the loaded file, never from a mutation.
//!
//! Delta updates are not idempotent: delivering the same delta twice adds it
//! twice. Callers that may retry should prefer absolute updates.

use crate::error::PodiumError;
use crate::podium::Podium;
use crate::ranking;
use crate::store::LedgerStore;
use crate::types::{clamp_score, Ledger, MissionId, ScoreEntry, TeamId};
use chrono::{DateTime, Utc};

/// A `(mission, team)` pair checked against the catalog
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ScoreTarget {
    mission: MissionId,
    team: TeamId,
}

impl ScoreTarget {
    /// Mission being scored
    #[inline]
    #[must_use]
    pub fn mission(&self) -> MissionId {
        self.mission
    }

    /// Team being scored
    #[inline]
    #[must_use]
    pub fn team(&self) -> TeamId {
        self.team
    }
}

/// Set the score for `(mission, team)` in `ledger`, clamped, stamped `now`
///
/// Updates the first matching entry in place or appends a new one, and
/// returns a copy of the entry as stored.
pub fn apply_absolute(
    ledger: &mut Ledger,
    mission: MissionId,
    team: TeamId,
    new_score: i64,
    now: DateTime<Utc>,
) -> ScoreEntry {
    let score = clamp_score(new_score);

    if let Some(existing) = ledger.iter_mut().find(|e| e.is_for(mission, team)) {
        existing.score = score;
        existing.updated_at = now;
        return existing.clone();
    }

    let entry = ScoreEntry {
        mission_id: mission,
        team_id: team,
        score,
        updated_at: now,
    };
    ledger.push(entry.clone());
    entry
}

impl<S: LedgerStore> Podium<S> {
    /// Check that `mission` exists and lists `team`
    ///
    /// # Errors
    /// - `PodiumError::MissionNotFound` for an unknown mission
    /// - `PodiumError::TeamNotInMission` when the mission does not list a
    ///   known team with that id
    pub fn resolve(&self, mission: MissionId, team: TeamId) -> Result<ScoreTarget, PodiumError> {
        if self.mission_by_id(mission).is_none() {
            return Err(PodiumError::MissionNotFound(mission));
        }

        if !self.teams_for_mission(mission).iter().any(|t| t.id == team) {
            return Err(PodiumError::TeamNotInMission { mission, team });
        }

        Ok(ScoreTarget { mission, team })
    }

    /// Replace the team's score (clamped to the score range) and persist
    ///
    /// Re-applying the same call leaves the same stored score.
    ///
    /// # Errors
    /// `PodiumError::Storage` if the ledger write fails. The in-memory mirror
    /// keeps the new score in that case, so memory and disk disagree until
    /// the next successful persist.
    pub fn set_score(
        &self,
        target: ScoreTarget,
        new_score: i64,
    ) -> Result<ScoreEntry, PodiumError> {
        let mut ledger = self.ledger.lock();
        let entry = apply_absolute(&mut ledger, target.mission, target.team, new_score, Utc::now());
        self.persist_locked(&ledger, &entry)?;
        Ok(entry)
    }

    /// Add `delta` (possibly negative) to the team's current score and persist
    ///
    /// # Errors
    /// Same as [`Podium::set_score`].
    pub fn add_score(&self, target: ScoreTarget, delta: i64) -> Result<ScoreEntry, PodiumError> {
        let mut ledger = self.ledger.lock();
        let current = ranking::score_for(&ledger, target.mission, target.team);
        let entry = apply_absolute(
            &mut ledger,
            target.mission,
            target.team,
            current.saturating_add(delta),
            Utc::now(),
        );
        self.persist_locked(&ledger, &entry)?;
        Ok(entry)
    }

    fn persist_locked(&self, ledger: &Ledger, entry: &ScoreEntry) -> Result<(), PodiumError> {
        match self.store.persist(ledger) {
            Ok(()) => {
                tracing::info!(
                    mission = %entry.mission_id,
                    team = %entry.team_id,
                    score = entry.score,
                    "score updated"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    mission = %entry.mission_id,
                    team = %entry.team_id,
                    "ledger persist failed, memory and disk now differ: {}",
                    e
                );
                Err(e.into())
            }
        }
    }
}
