//! Shared application state

use crate::config::ServerConfig;
use nird_podium::{Podium, StoreError};
use nird_village::Village;
use std::sync::Arc;

/// State shared by every request
#[derive(Debug)]
pub struct AppState {
    /// Mission/team scoring, backed by the ledger file
    pub podium: Podium,
    /// In-memory village game
    pub village: Village,
}

/// Handle passed to route handlers
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Wrap already-built parts
    #[must_use]
    pub fn new(podium: Podium, village: Village) -> SharedState {
        Arc::new(Self { podium, village })
    }

    /// Load the podium documents named by `config`
    ///
    /// # Errors
    /// Any `StoreError`; the server must not start without its data.
    pub fn load(config: &ServerConfig) -> Result<SharedState, StoreError> {
        let podium = Podium::open(&config.catalog_path, &config.scores_path)?;
        Ok(Self::new(podium, Village::new()))
    }
}
