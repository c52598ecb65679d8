//! The fixture/standings aggregation pipeline behind GET /api/sports.
//!
//! One call to [`SportsAggregator::snapshot`] issues the three upstream
//! queries concurrently, merges and dedups the two scoreboard windows,
//! normalizes events for the configured team, picks the next fixture, and
//! extracts the league table. Nothing is cached or shared between calls.

use chrono::{DateTime, Duration, Utc};
use serde_json::Value;
use std::collections::HashSet;
use std::sync::Arc;
use tracing::{debug, error};

use crate::config::Config;
use crate::espn::adapter::{self, NormalizeOptions};
use crate::espn::{SportsDataSource, UpstreamError};
use crate::models::{Fixture, FixtureStatus, SportsSnapshot};

/// Maximum length of the upcoming-fixtures list.
pub const UPCOMING_LIMIT: usize = 5;

/// How long a finished fixture stays visible after kickoff.
const GRACE_HOURS: i64 = 12;

/// Merge the near-term and extended scoreboard windows, keeping the first
/// occurrence of each event id. Output order is first-occurrence order;
/// chronological sorting happens later in selection. Events without an id
/// cannot participate in identity and are dropped.
pub fn dedup_events(near_term: Vec<Value>, extended: Vec<Value>) -> Vec<Value> {
    let mut seen = HashSet::new();
    near_term
        .into_iter()
        .chain(extended)
        .filter(|ev| match ev["id"].as_str() {
            Some(id) => seen.insert(id.to_string()),
            None => false,
        })
        .collect()
}

/// Drop finished fixtures older than the grace window, sort the rest by
/// kickoff, and slice out the next fixture plus the bounded upcoming list.
/// An empty result is a valid state, not an error.
pub fn select_fixtures(
    mut fixtures: Vec<Fixture>,
    now: DateTime<Utc>,
) -> (Option<Fixture>, Vec<Fixture>) {
    let cutoff = now - Duration::hours(GRACE_HOURS);
    fixtures.retain(|f| f.status != FixtureStatus::Finished || f.kickoff > cutoff);
    fixtures.sort_by_key(|f| f.kickoff);
    fixtures.truncate(UPCOMING_LIMIT);
    let next = fixtures.first().cloned();
    (next, fixtures)
}

/// Orchestrates the fixture and standings branches for one request.
pub struct SportsAggregator {
    source: Arc<dyn SportsDataSource>,
    config: Config,
}

impl SportsAggregator {
    pub fn new(source: Arc<dyn SportsDataSource>, config: Config) -> Self {
        SportsAggregator { source, config }
    }

    /// Build one aggregated snapshot. If any of the three upstream queries
    /// fails the whole request fails; no partial payload is returned.
    pub async fn snapshot(&self) -> Result<SportsSnapshot, UpstreamError> {
        self.snapshot_at(Utc::now()).await
    }

    pub(crate) async fn snapshot_at(
        &self,
        now: DateTime<Utc>,
    ) -> Result<SportsSnapshot, UpstreamError> {
        let (near_term, extended, table) = tokio::join!(
            self.source.scoreboard(),
            self.source.scoreboard_ahead(),
            self.source.standings(),
        );

        let near_term = self.require("scoreboard", near_term)?;
        let extended = self.require("scoreboard-ahead", extended)?;
        let table = self.require("standings", table)?;

        let events = dedup_events(
            adapter::collect_events(&near_term),
            adapter::collect_events(&extended),
        );
        debug!("{} events after dedup across both windows", events.len());

        let opts = NormalizeOptions {
            team_id: &self.config.team_id,
            competition_name: &self.config.competition_name,
            fallback_venue: &self.config.fallback_venue,
        };
        let fixtures = adapter::normalize_events(&events, &opts);
        let (next_fixture, upcoming_fixtures) = select_fixtures(fixtures, now);
        let standings = adapter::extract_standings(&table);

        Ok(SportsSnapshot {
            next_fixture,
            upcoming_fixtures,
            standings,
            last_updated: Utc::now(),
        })
    }

    /// Per-query result handling: log which upstream query failed before the
    /// all-or-nothing policy propagates the error.
    fn require(
        &self,
        query: &str,
        result: Result<Value, UpstreamError>,
    ) -> Result<Value, UpstreamError> {
        result.map_err(|e| {
            error!("{} query '{}' failed: {}", self.source.name(), query, e);
            e
        })
    }
}
