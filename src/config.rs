use clap::Parser;

/// Single-team fixture and standings aggregation service
#[derive(Parser, Debug, Clone)]
#[command(name = "sportsboard", version, about)]
pub struct Config {
    /// HTTP listen address
    #[arg(long, env = "LISTEN_ADDR", default_value = "0.0.0.0:8080")]
    pub listen_addr: String,

    /// Provider team id to aggregate fixtures for (83 = FC Barcelona)
    #[arg(long, env = "TEAM_ID", default_value = "83")]
    pub team_id: String,

    /// Provider league code
    #[arg(long, env = "LEAGUE_CODE", default_value = "esp.1")]
    pub league_code: String,

    /// Display label for the competition
    #[arg(long, env = "COMPETITION_NAME", default_value = "La Liga")]
    pub competition_name: String,

    /// Venue shown when the provider omits one
    #[arg(long, env = "FALLBACK_VENUE", default_value = "Spotify Camp Nou")]
    pub fallback_venue: String,

    /// ESPN site API base URL (scoreboard endpoints)
    #[arg(
        long,
        env = "ESPN_SITE_API_URL",
        default_value = "https://site.api.espn.com/apis/site/v2/sports"
    )]
    pub espn_site_api_url: String,

    /// ESPN v2 API base URL (standings endpoint)
    #[arg(
        long,
        env = "ESPN_V2_API_URL",
        default_value = "https://site.api.espn.com/apis/v2/sports"
    )]
    pub espn_v2_api_url: String,

    /// Days covered by the extended forward scoreboard window
    #[arg(long, env = "LOOKAHEAD_DAYS", default_value = "30")]
    pub lookahead_days: u32,

    /// Freshness hint (seconds) advertised to the HTTP cache in front
    #[arg(long, env = "CACHE_FRESH_SECS", default_value = "300")]
    pub cache_fresh_secs: u64,

    /// Per-call upstream timeout in seconds
    #[arg(long, env = "UPSTREAM_TIMEOUT_SECS", default_value = "10")]
    pub upstream_timeout_secs: u64,

    /// Retry attempts after a failed upstream call
    #[arg(long, env = "UPSTREAM_RETRIES", default_value = "2")]
    pub upstream_retries: u32,
}

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.team_id.trim().is_empty() {
            anyhow::bail!("team_id must not be empty");
        }
        if self.league_code.trim().is_empty() {
            anyhow::bail!("league_code must not be empty");
        }
        if self.upstream_timeout_secs == 0 {
            anyhow::bail!("upstream_timeout_secs must be positive");
        }
        if self.lookahead_days == 0 {
            anyhow::bail!("lookahead_days must be at least 1");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_are_valid() {
        let config = Config::parse_from(["sportsboard"]);
        assert!(config.validate().is_ok());
        assert_eq!(config.team_id, "83");
        assert_eq!(config.league_code, "esp.1");
        assert_eq!(config.cache_fresh_secs, 300);
    }

    #[test]
    fn test_rejects_empty_team_id() {
        let config = Config::parse_from(["sportsboard", "--team-id", " "]);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_rejects_zero_timeout() {
        let config = Config::parse_from(["sportsboard", "--upstream-timeout-secs", "0"]);
        assert!(config.validate().is_err());
    }
}
