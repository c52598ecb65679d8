use chrono::{DateTime, Utc};
use serde::Serialize;

/// Temporal status of a fixture, derived from provider completion/state
/// fields rather than carried through literally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FixtureStatus {
    Upcoming,
    Live,
    Finished,
}

/// One scheduled or completed match involving the configured team.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fixture {
    /// Provider event id; unique within any response after dedup
    pub id: String,
    pub competition: String,
    pub home_team: String,
    pub away_team: String,
    /// Human-formatted kickoff date, e.g. "Feb 1, 2026"
    pub date: String,
    pub venue: String,
    pub status: FixtureStatus,
    /// Kickoff instant; sort key for the upcoming list, not part of the wire shape
    #[serde(skip)]
    pub kickoff: DateTime<Utc>,
}

/// One row of the league table.
#[derive(Debug, Clone, Serialize)]
pub struct Standing {
    /// 1-based rank within the emitted slice
    pub pos: u32,
    pub team: String,
    pub played: u32,
    pub won: u32,
    pub drawn: u32,
    pub lost: u32,
    pub points: u32,
}

/// Full payload for GET /api/sports. Built per request, never shared.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SportsSnapshot {
    pub next_fixture: Option<Fixture>,
    pub upcoming_fixtures: Vec<Fixture>,
    pub standings: Vec<Standing>,
    pub last_updated: DateTime<Utc>,
}
