//! Error types for the podium
//!
//! Provides error handling for:
//! - Store operations (catalog/ledger load, ledger persist)
//! - Lookups that fail a mutation's preconditions

use crate::types::{MissionId, TeamId};
use std::path::PathBuf;

/// Errors raised by the durable store
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// Document could not be read
    #[error("io error reading {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document is not valid JSON of the expected shape
    #[error("malformed document {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// Ledger could not be written back
    #[error("failed to persist ledger to {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl StoreError {
    /// Create IO error for path
    pub fn io_error(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create malformed-document error for path
    pub fn malformed(path: impl Into<PathBuf>, source: serde_json::Error) -> Self {
        Self::Malformed {
            path: path.into(),
            source,
        }
    }

    /// Create persist error for path
    pub fn persist(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Persist {
            path: path.into(),
            source,
        }
    }
}

/// Main podium error type
#[derive(Debug, thiserror::Error)]
pub enum PodiumError {
    /// Mission is not in the catalog
    #[error("mission {0} not found")]
    MissionNotFound(MissionId),

    /// Team is not part of the mission
    #[error("team {team} not found in mission {mission}")]
    TeamNotInMission { mission: MissionId, team: TeamId },

    /// Durable store failed
    #[error("storage failure: {0}")]
    Storage(#[from] StoreError),
}

impl PodiumError {
    /// Whether the error names a missing mission or team
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::MissionNotFound(_) | Self::TeamNotInMission { .. })
    }

    /// Whether memory and disk may now disagree
    #[inline]
    #[must_use]
    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn podium_error_display() {
        let err = PodiumError::MissionNotFound(MissionId(7));
        assert_eq!(err.to_string(), "mission 7 not found");

        let err = PodiumError::TeamNotInMission {
            mission: MissionId(1),
            team: TeamId(9),
        };
        assert_eq!(err.to_string(), "team 9 not found in mission 1");
    }

    #[test]
    fn podium_error_classification() {
        assert!(PodiumError::MissionNotFound(MissionId(1)).is_not_found());

        let storage = PodiumError::from(StoreError::persist(
            "/nowhere/scores.json",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        ));
        assert!(storage.is_storage());
        assert!(!storage.is_not_found());
        assert!(storage.to_string().contains("/nowhere/scores.json"));
    }
}
