//! Testing utilities for the NIRD workspace
//!
//! Shared fixtures: a small catalog, pre-built podiums, on-disk data dirs.

#![allow(missing_docs)]

use chrono::{DateTime, Utc};
use nird_podium::{
    Catalog, JsonLedgerFile, Ledger, MemoryLedger, Mission, MissionId, Podium, ScoreEntry, Team,
    TeamId,
};
use nird_village::Village;
use std::path::PathBuf;
use tempfile::TempDir;

/// Mission with teams 1, 2 and 3
pub const PODIUM_MISSION: MissionId = MissionId(1);
/// Mission with teams 2 and 4
pub const RELAY_MISSION: MissionId = MissionId(2);
/// Mission without teams
pub const EMPTY_MISSION: MissionId = MissionId(3);
/// Id no mission uses
pub const UNKNOWN_MISSION: MissionId = MissionId(404);

pub fn team(id: i64, name: &str, members: &[&str]) -> Team {
    Team {
        id: TeamId(id),
        name: name.to_string(),
        url: format!("https://nuitdelinfo.example/teams/{id}"),
        members: members.iter().map(|m| (*m).to_string()).collect(),
        mission_ids: Vec::new(),
    }
}

pub fn mission(id: i64, title: &str, teams: &[i64]) -> Mission {
    Mission {
        id: MissionId(id),
        title: title.to_string(),
        url: format!("https://nuitdelinfo.example/missions/{id}"),
        team_ids: teams.iter().copied().map(TeamId).collect(),
    }
}

pub fn sample_catalog() -> Catalog {
    let mut teams = vec![
        team(1, "Les Libristes", &["Alice", "Bilal"]),
        team(2, "Pingouins Solidaires", &["Chloé"]),
        team(3, "Octets Durables", &["Dan", "Eva", "Farid"]),
        team(4, "Relais Numérique", &["Gwen"]),
    ];
    teams[1].mission_ids = vec![PODIUM_MISSION, RELAY_MISSION];

    Catalog::new(
        vec![
            mission(1, "Podium", &[1, 2, 3]),
            mission(2, "Relais", &[2, 4]),
            mission(3, "Sans équipe", &[]),
        ],
        teams,
    )
}

pub fn timestamp(raw: &str) -> DateTime<Utc> {
    raw.parse().unwrap()
}

pub fn entry(mission: MissionId, team: i64, score: i64) -> ScoreEntry {
    ScoreEntry {
        mission_id: mission,
        team_id: TeamId(team),
        score,
        updated_at: timestamp("2025-12-05T01:00:00Z"),
    }
}

pub fn memory_podium() -> Podium<MemoryLedger> {
    memory_podium_with(Ledger::new())
}

pub fn memory_podium_with(entries: Ledger) -> Podium<MemoryLedger> {
    Podium::load(sample_catalog(), MemoryLedger::with_entries(entries)).unwrap()
}

/// Catalog and ledger documents in a temporary directory
pub struct DataDir {
    dir: TempDir,
}

impl DataDir {
    pub fn new() -> Self {
        Self::with_entries(&[])
    }

    pub fn with_entries(entries: &[ScoreEntry]) -> Self {
        let dir = tempfile::tempdir().unwrap();
        let data = Self { dir };
        data.write_catalog(&sample_catalog());
        std::fs::write(data.scores_path(), serde_json::to_vec_pretty(entries).unwrap()).unwrap();
        data
    }

    pub fn catalog_path(&self) -> PathBuf {
        self.dir.path().join("nuitdelinfo.json")
    }

    pub fn scores_path(&self) -> PathBuf {
        self.dir.path().join("scores.json")
    }

    pub fn write_catalog(&self, catalog: &Catalog) {
        std::fs::write(self.catalog_path(), serde_json::to_vec_pretty(catalog).unwrap()).unwrap();
    }

    pub fn open(&self) -> Podium<JsonLedgerFile> {
        Podium::open(self.catalog_path(), self.scores_path()).unwrap()
    }

    pub fn read_scores(&self) -> Ledger {
        let raw = std::fs::read_to_string(self.scores_path()).unwrap();
        serde_json::from_str(&raw).unwrap()
    }
}

impl Default for DataDir {
    fn default() -> Self {
        Self::new()
    }
}

pub fn village_with_players(players: &[(&str, &str)]) -> Village {
    let village = Village::new();
    for (username, role) in players {
        village.register(username, role).unwrap();
    }
    village
}
