//! Ranking engine
//!
//! Pure reads over a catalog and a ledger. Nothing here is cached: every call
//! recomputes from the state it is handed.

use crate::types::{Catalog, Mission, MissionId, RankingRow, ScoreEntry, Team, TeamId};
use std::cmp::Ordering;
use std::collections::HashSet;

/// Look up a mission
#[must_use]
pub fn mission_by_id(catalog: &Catalog, id: MissionId) -> Option<&Mission> {
    catalog.missions.iter().find(|m| m.id == id)
}

/// Teams of a mission, in the mission's declared order
///
/// Ids with no matching team are dropped, as are repeated ids. An unknown
/// mission yields an empty list.
#[must_use]
pub fn teams_for_mission(catalog: &Catalog, mission: MissionId) -> Vec<&Team> {
    let Some(mission) = mission_by_id(catalog, mission) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    mission
        .team_ids
        .iter()
        .filter(|id| seen.insert(**id))
        .filter_map(|id| catalog.team(*id))
        .collect()
}

/// Current score of a team for a mission, 0 without a ledger entry
#[must_use]
pub fn score_for(ledger: &[ScoreEntry], mission: MissionId, team: TeamId) -> i64 {
    ledger
        .iter()
        .find(|e| e.is_for(mission, team))
        .map_or(0, |e| e.score)
}

/// Ranking order: score descending, then team id ascending
#[inline]
#[must_use]
pub fn ranking_order(a: &RankingRow, b: &RankingRow) -> Ordering {
    b.score.cmp(&a.score).then_with(|| a.team_id.cmp(&b.team_id))
}

/// Full ranking of a mission's teams, ranks assigned 1.. in sorted order
///
/// Returns `None` for an unknown mission. Every team of the mission appears,
/// scored or not.
#[must_use]
pub fn ranking_for(
    catalog: &Catalog,
    ledger: &[ScoreEntry],
    mission: MissionId,
) -> Option<Vec<RankingRow>> {
    mission_by_id(catalog, mission)?;

    let mut rows: Vec<RankingRow> = teams_for_mission(catalog, mission)
        .into_iter()
        .map(|team| RankingRow {
            rank: 0,
            team_id: team.id,
            name: team.name.clone(),
            url: team.url.clone(),
            members: team.members.clone(),
            score: score_for(ledger, mission, team.id),
        })
        .collect();

    rows.sort_by(ranking_order);
    for (index, row) in rows.iter_mut().enumerate() {
        row.rank = index + 1;
    }

    Some(rows)
}
