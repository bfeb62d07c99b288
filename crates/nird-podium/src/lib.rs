//! NIRD Podium - team scoring for missions
//!
//! Holds the mission/team catalog and the per-(mission, team) score ledger:
//! - Loads both JSON documents at startup
//! - Resolves a mission's teams and a team's score
//! - Produces deterministic rankings (score descending, team id ascending)
//! - Applies absolute or delta score updates, clamped to `[0, 10000]`,
//!   persisting the whole ledger after each one
//!
//! # Example
//!
//! ```rust,ignore
//! use nird_podium::{MissionId, Podium, TeamId};
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let podium = Podium::open("data/nuitdelinfo.json", "data/scores.json")?;
//!
//! let target = podium.resolve(MissionId(1), TeamId(3))?;
//! podium.add_score(target, 25)?;
//!
//! for row in podium.ranking_for(MissionId(1)).unwrap_or_default() {
//!     println!("{} {} {}", row.rank, row.name, row.score);
//! }
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]
#![allow(missing_docs)]

pub mod error;
pub mod mutator;
pub mod podium;
pub mod ranking;
pub mod store;
pub mod types;

pub use error::{PodiumError, StoreError};
pub use mutator::{apply_absolute, ScoreTarget};
pub use podium::Podium;
pub use store::{load_catalog, JsonLedgerFile, LedgerStore, MemoryLedger};
pub use types::{
    clamp_score, Catalog, Ledger, Mission, MissionId, RankingRow, ScoreEntry, Team, TeamId,
    SCORE_MAX, SCORE_MIN,
};

/// Version of this crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
