use axum::{
    extract::State,
    http::{header, StatusCode},
    response::{Html, IntoResponse},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tracing::error;

use crate::aggregator::SportsAggregator;

#[derive(Clone)]
pub struct AppState {
    pub aggregator: Arc<SportsAggregator>,
    /// Advertised via Cache-Control so the HTTP cache in front can serve
    /// repeat requests without hitting the upstream provider.
    pub cache_fresh_secs: u64,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
    message: String,
}

/// Build the Axum router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index_handler))
        .route("/api/sports", get(sports_handler))
        .layer(CorsLayer::permissive())
        .with_state(Arc::new(state))
}

/// Serve the embedded status page.
async fn index_handler() -> impl IntoResponse {
    Html(STATUS_HTML)
}

/// GET /api/sports
async fn sports_handler(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.aggregator.snapshot().await {
        Ok(snapshot) => {
            let cache_control = format!("public, max-age={}", state.cache_fresh_secs);
            ([(header::CACHE_CONTROL, cache_control)], Json(snapshot)).into_response()
        }
        Err(e) => {
            error!("Failed to build sports snapshot: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ErrorBody {
                    error: "Failed to fetch sports data".to_string(),
                    message: e.to_string(),
                }),
            )
                .into_response()
        }
    }
}

/// Embedded single-file status page (HTML + CSS + JS)
const STATUS_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="UTF-8">
<meta name="viewport" content="width=device-width, initial-scale=1.0">
<title>Sportsboard</title>
<style>
  :root {
    --bg: #0f1117;
    --card: #1a1d27;
    --border: #2a2d3a;
    --accent: #6c63ff;
    --green: #00c896;
    --red: #ff4f6a;
    --text: #e0e0e0;
    --muted: #8888aa;
  }
  * { box-sizing: border-box; margin: 0; padding: 0; }
  body { background: var(--bg); color: var(--text); font-family: 'Segoe UI', system-ui, sans-serif; }
  header { display: flex; align-items: center; gap: 1rem; padding: 1rem 2rem; border-bottom: 1px solid var(--border); }
  header h1 { font-size: 1.4rem; font-weight: 700; }
  main { padding: 1.5rem 2rem; display: grid; gap: 1.5rem; max-width: 900px; }
  .panel { background: var(--card); border: 1px solid var(--border); border-radius: 10px; overflow: hidden; }
  .panel-header { padding: .9rem 1.2rem; border-bottom: 1px solid var(--border); font-weight: 600; }
  .next { padding: 1.2rem; font-size: 1.1rem; }
  .next .meta { color: var(--muted); font-size: .85rem; margin-top: .4rem; }
  table { width: 100%; border-collapse: collapse; }
  th { padding: .7rem 1rem; text-align: left; font-size: .75rem; text-transform: uppercase; color: var(--muted); border-bottom: 1px solid var(--border); }
  td { padding: .65rem 1rem; font-size: .88rem; border-bottom: 1px solid #1e2130; }
  tr:last-child td { border-bottom: none; }
  .pill { display: inline-block; padding: .15rem .55rem; border-radius: 20px; font-size: .75rem; font-weight: 600; }
  .pill.upcoming { background: rgba(108,99,255,.2); color: var(--accent); }
  .pill.live { background: rgba(0,200,150,.15); color: var(--green); }
  .pill.finished { background: rgba(255,79,106,.15); color: var(--red); }
  .empty { color: var(--muted); text-align: center; padding: 2rem; font-size: .9rem; }
</style>
</head>
<body>
<header>
  <h1>⚽ Sportsboard</h1>
  <span style="margin-left:auto;color:var(--muted);font-size:.8rem;" id="last-updated"></span>
</header>

<main>
  <div class="panel">
    <div class="panel-header">Next Fixture</div>
    <div class="next" id="next-fixture">Loading…</div>
  </div>

  <div class="panel">
    <div class="panel-header">Upcoming Fixtures</div>
    <table>
      <thead><tr><th>Date</th><th>Match</th><th>Venue</th><th>Status</th></tr></thead>
      <tbody id="fixtures-tbody"><tr><td colspan="4" class="empty">Loading…</td></tr></tbody>
    </table>
  </div>

  <div class="panel">
    <div class="panel-header">League Table</div>
    <table>
      <thead><tr><th>#</th><th>Team</th><th>P</th><th>W</th><th>D</th><th>L</th><th>Pts</th></tr></thead>
      <tbody id="standings-tbody"><tr><td colspan="7" class="empty">Loading…</td></tr></tbody>
    </table>
  </div>
</main>

<script>
async function loadAll() {
  const r = await fetch('/api/sports');
  if (!r.ok) {
    document.getElementById('next-fixture').textContent = 'Upstream data unavailable';
    return;
  }
  const data = await r.json();

  const next = data.nextFixture;
  document.getElementById('next-fixture').innerHTML = next
    ? `${next.homeTeam} vs ${next.awayTeam}
       <div class="meta">${next.date} · ${next.venue} · ${next.competition}</div>`
    : '<span class="empty">No fixtures scheduled</span>';

  const fixtures = data.upcomingFixtures || [];
  document.getElementById('fixtures-tbody').innerHTML = fixtures.length
    ? fixtures.map(f => `<tr>
        <td>${f.date}</td>
        <td>${f.homeTeam} vs ${f.awayTeam}</td>
        <td>${f.venue}</td>
        <td><span class="pill ${f.status}">${f.status}</span></td>
      </tr>`).join('')
    : '<tr><td colspan="4" class="empty">No upcoming fixtures</td></tr>';

  const standings = data.standings || [];
  document.getElementById('standings-tbody').innerHTML = standings.length
    ? standings.map(s => `<tr>
        <td>${s.pos}</td><td>${s.team}</td><td>${s.played}</td>
        <td>${s.won}</td><td>${s.drawn}</td><td>${s.lost}</td><td>${s.points}</td>
      </tr>`).join('')
    : '<tr><td colspan="7" class="empty">No standings available</td></tr>';

  document.getElementById('last-updated').textContent =
    'Updated ' + new Date(data.lastUpdated).toLocaleTimeString();
}

loadAll();
setInterval(loadAll, 60000);
</script>
</body>
</html>"#;
