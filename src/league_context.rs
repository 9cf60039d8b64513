use std::path::PathBuf;

use crate::error::ConfigError;

pub const API_BASE_URL: &str = "https://v3.football.api-sports.io";

/// Brasileirão Série A
pub const DEFAULT_LEAGUE_ID: u32 = 71;
pub const DEFAULT_SEASON: u32 = 2023;

/// The three persisted tables. The names double as file-name suffixes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    Standings,
    Scorers,
    Fixtures,
}

impl TableKind {
    pub fn file_suffix(self) -> &'static str {
        match self {
            TableKind::Standings => "classificacao",
            TableKind::Scorers => "artilharia",
            TableKind::Fixtures => "jogos",
        }
    }
}

// API, league and file settings. Passed explicitly to the fetch client and the CSV store.
#[derive(Debug, Clone)]
pub struct LeagueContext {
    pub api_key: Option<String>,
    pub base_url: String,

    pub league_id: u32,
    pub season: u32,

    pub data_dir: PathBuf,
    pub file_prefix: String,

    pub request_timeout_secs: u64,
}

impl Default for LeagueContext {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: API_BASE_URL.to_string(),

            league_id: DEFAULT_LEAGUE_ID,
            season: DEFAULT_SEASON,

            data_dir: PathBuf::from("."),
            file_prefix: "brasileirao".to_string(),

            request_timeout_secs: 30,
        }
    }
}

impl LeagueContext {
    /// Loads `.env` if present, then reads the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenv::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut ctx = Self::default();

        ctx.api_key = lookup("API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(url) = lookup("API_BASE_URL") {
            ctx.base_url = url.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("LEAGUE_ID") {
            ctx.league_id = parse_number("LEAGUE_ID", &v)?;
        }
        if let Some(v) = lookup("SEASON") {
            ctx.season = parse_number("SEASON", &v)?;
        }
        if let Some(dir) = lookup("DATA_DIR") {
            ctx.data_dir = PathBuf::from(dir);
        }
        if let Some(prefix) = lookup("FILE_PREFIX") {
            ctx.file_prefix = prefix;
        }

        Ok(ctx)
    }

    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        self.api_key.as_deref().ok_or(ConfigError::MissingApiKey)
    }

    // e.g. ./brasileirao_2023_jogos.csv
    pub fn file_path(&self, kind: TableKind) -> PathBuf {
        self.data_dir.join(format!("{}_{}_{}.csv", self.file_prefix, self.season, kind.file_suffix()))
    }
}

fn parse_number<T: std::str::FromStr>(name: &'static str, value: &str) -> Result<T, ConfigError> {
    value.trim().parse().map_err(|_| ConfigError::Invalid { name, value: value.to_string() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |name: &str| map.get(name).cloned()
    }

    #[test]
    fn defaults_point_at_serie_a_2023() {
        let ctx = LeagueContext::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(ctx.league_id, 71);
        assert_eq!(ctx.season, 2023);
        assert_eq!(ctx.base_url, API_BASE_URL);
        assert_eq!(ctx.require_api_key(), Err(ConfigError::MissingApiKey));
    }

    #[test]
    fn environment_overrides_defaults() {
        let ctx = LeagueContext::from_lookup(lookup_from(&[
            ("API_KEY", "secret"),
            ("API_BASE_URL", "http://localhost:8080/"),
            ("LEAGUE_ID", "72"),
            ("SEASON", " 2024 "),
            ("DATA_DIR", "out"),
        ]))
        .unwrap();

        assert_eq!(ctx.require_api_key(), Ok("secret"));
        assert_eq!(ctx.base_url, "http://localhost:8080");
        assert_eq!(ctx.league_id, 72);
        assert_eq!(ctx.season, 2024);
        assert_eq!(ctx.file_path(TableKind::Fixtures), PathBuf::from("out").join("brasileirao_2024_jogos.csv"));
    }

    #[test]
    fn blank_api_key_counts_as_missing() {
        let ctx = LeagueContext::from_lookup(lookup_from(&[("API_KEY", "  ")])).unwrap();
        assert_eq!(ctx.api_key, None);
    }

    #[test]
    fn bad_season_is_rejected() {
        let err = LeagueContext::from_lookup(lookup_from(&[("SEASON", "twenty")])).unwrap_err();
        assert_eq!(err, ConfigError::Invalid { name: "SEASON", value: "twenty".to_string() });
    }
}
