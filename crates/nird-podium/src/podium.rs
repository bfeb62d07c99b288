//! The podium: owned catalog, in-memory ledger mirror, durable ledger store
//!
//! Constructed once at startup and shared by handle. The ledger mirror sits
//! behind a single mutex; every mutation holds it across
//! read-modify-write-persist, and every ranking read holds it for the
//! duration of the computation.

use crate::error::StoreError;
use crate::ranking;
use crate::store::{load_catalog, JsonLedgerFile, LedgerStore};
use crate::types::{Catalog, Ledger, Mission, MissionId, RankingRow, Team, TeamId};
use parking_lot::Mutex;
use std::path::Path;

/// Mission/team scoring state
#[derive(Debug)]
pub struct Podium<S = JsonLedgerFile> {
    pub(crate) catalog: Catalog,
    pub(crate) ledger: Mutex<Ledger>,
    pub(crate) store: S,
}

impl Podium<JsonLedgerFile> {
    /// Load catalog and ledger from their JSON documents
    ///
    /// # Errors
    /// Any `StoreError`: a missing or malformed document means the process
    /// cannot serve traffic.
    pub fn open(
        catalog_path: impl AsRef<Path>,
        scores_path: impl AsRef<Path>,
    ) -> Result<Self, StoreError> {
        let catalog = load_catalog(catalog_path)?;
        Self::load(catalog, JsonLedgerFile::new(scores_path.as_ref()))
    }
}

impl<S: LedgerStore> Podium<S> {
    /// Build a podium over `catalog`, mirroring the ledger held by `store`
    ///
    /// # Errors
    /// Whatever `store.load()` reports
    pub fn load(catalog: Catalog, store: S) -> Result<Self, StoreError> {
        let ledger = store.load()?;
        tracing::info!(
            missions = catalog.missions.len(),
            teams = catalog.teams.len(),
            entries = ledger.len(),
            "podium loaded"
        );

        Ok(Self {
            catalog,
            ledger: Mutex::new(ledger),
            store,
        })
    }

    /// The loaded catalog
    #[inline]
    #[must_use]
    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    /// The durable store
    #[inline]
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Copy of the current in-memory ledger
    #[must_use]
    pub fn scores_snapshot(&self) -> Ledger {
        self.ledger.lock().clone()
    }

    /// Look up a mission
    #[inline]
    #[must_use]
    pub fn mission_by_id(&self, id: MissionId) -> Option<&Mission> {
        ranking::mission_by_id(&self.catalog, id)
    }

    /// Teams of a mission in declared order; empty for an unknown mission
    #[inline]
    #[must_use]
    pub fn teams_for_mission(&self, mission: MissionId) -> Vec<&Team> {
        ranking::teams_for_mission(&self.catalog, mission)
    }

    /// Current score, 0 when nothing has been recorded
    #[must_use]
    pub fn score_for(&self, mission: MissionId, team: TeamId) -> i64 {
        ranking::score_for(&self.ledger.lock(), mission, team)
    }

    /// Fresh ranking of a mission; `None` for an unknown mission
    #[must_use]
    pub fn ranking_for(&self, mission: MissionId) -> Option<Vec<RankingRow>> {
        ranking::ranking_for(&self.catalog, &self.ledger.lock(), mission)
    }
}
