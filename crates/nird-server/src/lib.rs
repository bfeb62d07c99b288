//! NIRD Server - HTTP API for the Village Numérique Résistant
//!
//! Serves two independent surfaces over one warp filter tree:
//!
//! - **Podium** (`/api/podium/...`): mission and team listings, per-mission
//!   rankings, and score updates persisted to the ledger file.
//! - **Village** (`/api/...`): the in-memory village game, plus health and
//!   build information.
//!
//! ```text
//!   CLI / env ──► ServerConfig ──► AppState::load ──► routes::api ──► warp::serve
//! ```

pub mod config;
pub mod error;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use config::{command, ConfigError, ServerConfig};
pub use error::{handle_rejection, ApiError};
pub use routes::{api, MAX_BODY_BYTES};
pub use state::{AppState, SharedState};
