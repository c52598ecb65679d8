//! Mapping from ESPN's scoreboard/standings schema into the canonical types.
//!
//! This is the only module that knows the provider's field names; a schema
//! change upstream should not touch the selection or dedup logic. Missing
//! individual fields never fail a request — each resolves to a documented
//! default instead.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::models::{Fixture, FixtureStatus, Standing};

/// Team name shown when the provider omits a side.
pub const PLACEHOLDER_TEAM: &str = "TBD";

/// Number of league-table rows emitted.
pub const STANDINGS_LIMIT: usize = 5;

/// Display options applied while normalizing provider records.
pub struct NormalizeOptions<'a> {
    pub team_id: &'a str,
    pub competition_name: &'a str,
    pub fallback_venue: &'a str,
}

/// Pull the top-level `events` array out of a scoreboard payload.
/// A missing key is an empty window, not an error.
pub fn collect_events(payload: &Value) -> Vec<Value> {
    payload["events"].as_array().cloned().unwrap_or_default()
}

/// Filter raw scoreboard events down to the configured team and map them
/// into canonical fixtures. Input order is preserved.
pub fn normalize_events(events: &[Value], opts: &NormalizeOptions<'_>) -> Vec<Fixture> {
    events
        .iter()
        .filter(|ev| involves_team(ev, opts.team_id))
        .filter_map(|ev| normalize_event(ev, opts))
        .collect()
}

/// completed ⇒ finished, state "in" ⇒ live, anything else ⇒ upcoming.
pub fn classify_status(competition: &Value) -> FixtureStatus {
    let status_type = &competition["status"]["type"];
    if status_type["completed"].as_bool().unwrap_or(false) {
        FixtureStatus::Finished
    } else if status_type["state"].as_str() == Some("in") {
        FixtureStatus::Live
    } else {
        FixtureStatus::Upcoming
    }
}

fn involves_team(event: &Value, team_id: &str) -> bool {
    let competitors = match event["competitions"][0]["competitors"].as_array() {
        Some(a) => a,
        None => return false,
    };
    competitors
        .iter()
        .any(|c| c["team"]["id"].as_str() == Some(team_id) || c["id"].as_str() == Some(team_id))
}

fn normalize_event(event: &Value, opts: &NormalizeOptions<'_>) -> Option<Fixture> {
    let id = event["id"].as_str()?.to_string();
    let competition = &event["competitions"][0];

    let kickoff = match event["date"].as_str().and_then(parse_kickoff) {
        Some(k) => k,
        None => {
            debug!("Skipping event {}: missing or unparsable date", id);
            return None;
        }
    };

    let side = |home_away: &str| -> Option<String> {
        competition["competitors"]
            .as_array()?
            .iter()
            .find(|c| c["homeAway"].as_str() == Some(home_away))
            .and_then(|c| c["team"]["displayName"].as_str())
            .map(str::to_string)
    };

    Some(Fixture {
        id,
        competition: opts.competition_name.to_string(),
        home_team: side("home").unwrap_or_else(|| PLACEHOLDER_TEAM.to_string()),
        away_team: side("away").unwrap_or_else(|| PLACEHOLDER_TEAM.to_string()),
        date: kickoff.format("%b %-d, %Y").to_string(),
        venue: competition["venue"]["fullName"]
            .as_str()
            .unwrap_or(opts.fallback_venue)
            .to_string(),
        status: classify_status(competition),
        kickoff,
    })
}

fn parse_kickoff(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    // ESPN scoreboard dates omit seconds ("2026-02-01T20:00Z")
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%MZ")
        .ok()
        .map(|naive| naive.and_utc())
}

/// Map the provider league table into the capped canonical slice.
///
/// Each stat is looked up by name and independently defaults to 0 when
/// absent. `pos` is the 1-based index within the emitted slice, which
/// follows the provider's natural table order.
pub fn extract_standings(payload: &Value) -> Vec<Standing> {
    let entries = match payload["children"][0]["standings"]["entries"].as_array() {
        Some(a) => a,
        None => return vec![],
    };

    entries
        .iter()
        .take(STANDINGS_LIMIT)
        .enumerate()
        .map(|(index, entry)| {
            let stats = entry["stats"].as_array();
            let stat = |name: &str| -> u32 {
                stats
                    .and_then(|s| s.iter().find(|st| st["name"].as_str() == Some(name)))
                    .and_then(|st| st["value"].as_f64())
                    .map(|v| v.max(0.0) as u32)
                    .unwrap_or(0)
            };
            Standing {
                pos: index as u32 + 1,
                team: entry["team"]["displayName"]
                    .as_str()
                    .unwrap_or("Unknown")
                    .to_string(),
                played: stat("gamesPlayed"),
                won: stat("wins"),
                drawn: stat("ties"),
                lost: stat("losses"),
                points: stat("points"),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn opts() -> NormalizeOptions<'static> {
        NormalizeOptions {
            team_id: "83",
            competition_name: "La Liga",
            fallback_venue: "Spotify Camp Nou",
        }
    }

    fn event(id: &str, home_id: &str, away_id: &str) -> Value {
        json!({
            "id": id,
            "date": "2026-02-01T20:00Z",
            "competitions": [{
                "venue": { "fullName": "Estadi Olímpic" },
                "competitors": [
                    { "id": home_id, "homeAway": "home",
                      "team": { "id": home_id, "displayName": format!("Team {home_id}") } },
                    { "id": away_id, "homeAway": "away",
                      "team": { "id": away_id, "displayName": format!("Team {away_id}") } }
                ],
                "status": { "type": { "completed": false, "state": "pre" } }
            }]
        })
    }

    #[test]
    fn test_filters_to_configured_team() {
        let events = vec![event("1", "83", "94"), event("2", "86", "94"), event("3", "94", "83")];
        let fixtures = normalize_events(&events, &opts());
        let ids: Vec<&str> = fixtures.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3"]);
    }

    #[test]
    fn test_matches_on_top_level_competitor_id() {
        // Some payloads carry the team id only on the competitor itself
        let mut ev = event("1", "90", "94");
        ev["competitions"][0]["competitors"][0]["id"] = json!("83");
        ev["competitions"][0]["competitors"][0]["team"]["id"] = json!("90");
        let fixtures = normalize_events(&[ev], &opts());
        assert_eq!(fixtures.len(), 1);
    }

    #[test]
    fn test_missing_side_becomes_placeholder() {
        let mut ev = event("1", "83", "94");
        ev["competitions"][0]["competitors"][1]["homeAway"] = json!("home");
        let fixtures = normalize_events(&[ev], &opts());
        assert_eq!(fixtures[0].away_team, PLACEHOLDER_TEAM);
    }

    #[test]
    fn test_missing_venue_falls_back() {
        let mut ev = event("1", "83", "94");
        ev["competitions"][0].as_object_mut().unwrap().remove("venue");
        let fixtures = normalize_events(&[ev], &opts());
        assert_eq!(fixtures[0].venue, "Spotify Camp Nou");
    }

    #[test]
    fn test_unparsable_date_skips_event() {
        let mut ev = event("1", "83", "94");
        ev["date"] = json!("soon");
        assert!(normalize_events(&[ev], &opts()).is_empty());
    }

    #[test]
    fn test_kickoff_parses_minute_precision_dates() {
        let fixtures = normalize_events(&[event("1", "83", "94")], &opts());
        assert_eq!(fixtures[0].date, "Feb 1, 2026");
    }

    #[test]
    fn test_status_rule_priority() {
        let completed = json!({ "status": { "type": { "completed": true, "state": "post" } } });
        assert_eq!(classify_status(&completed), FixtureStatus::Finished);

        let live = json!({ "status": { "type": { "completed": false, "state": "in" } } });
        assert_eq!(classify_status(&live), FixtureStatus::Live);

        let pre = json!({ "status": { "type": { "completed": false, "state": "pre" } } });
        assert_eq!(classify_status(&pre), FixtureStatus::Upcoming);

        // completed wins even if state still says "in"
        let both = json!({ "status": { "type": { "completed": true, "state": "in" } } });
        assert_eq!(classify_status(&both), FixtureStatus::Finished);

        // missing fields behave as not-started
        assert_eq!(classify_status(&json!({})), FixtureStatus::Upcoming);
    }

    #[test]
    fn test_missing_events_key_is_empty_window() {
        assert!(collect_events(&json!({ "leagues": [] })).is_empty());
    }

    fn table_entry(team: &str, stats: Value) -> Value {
        json!({ "team": { "displayName": team }, "stats": stats })
    }

    fn table(entries: Vec<Value>) -> Value {
        json!({ "children": [{ "standings": { "entries": entries } }] })
    }

    #[test]
    fn test_standings_caps_at_five() {
        let entries = (1..=8)
            .map(|i| table_entry(&format!("Team {i}"), json!([])))
            .collect();
        let standings = extract_standings(&table(entries));
        assert_eq!(standings.len(), 5);
        let positions: Vec<u32> = standings.iter().map(|s| s.pos).collect();
        assert_eq!(positions, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_missing_ties_stat_defaults_drawn_to_zero() {
        let entries = vec![table_entry(
            "FC Barcelona",
            json!([
                { "name": "gamesPlayed", "value": 24.0 },
                { "name": "wins", "value": 18.0 },
                { "name": "losses", "value": 2.0 },
                { "name": "points", "value": 58.0 }
            ]),
        )];
        let standings = extract_standings(&table(entries));
        assert_eq!(standings[0].drawn, 0);
        assert_eq!(standings[0].won, 18);
    }

    #[test]
    fn test_points_only_entry_zeroes_everything_else() {
        let entries = vec![table_entry(
            "FC Barcelona",
            json!([{ "name": "points", "value": 58.0 }]),
        )];
        let standings = extract_standings(&table(entries));
        let s = &standings[0];
        assert_eq!(
            (s.points, s.played, s.won, s.drawn, s.lost),
            (58, 0, 0, 0, 0)
        );
    }

    #[test]
    fn test_absent_standings_path_is_empty() {
        assert!(extract_standings(&json!({})).is_empty());
        assert!(extract_standings(&json!({ "children": [] })).is_empty());
    }
}
