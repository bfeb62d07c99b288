//! Error types for the village game

/// Main village error type
#[derive(Debug, thiserror::Error)]
pub enum VillageError {
    /// No player with that id
    #[error("user {0} not found")]
    UserNotFound(String),

    /// No built-in mission with that id
    #[error("mission {0} not found")]
    MissionNotFound(String),

    /// The player already finished the mission
    #[error("mission {0} already completed")]
    MissionAlreadyCompleted(String),

    /// Request is missing or has unusable fields
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl VillageError {
    /// Whether the error names a missing player or mission
    #[inline]
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::UserNotFound(_) | Self::MissionNotFound(_))
    }
}
