use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::*;
use tracing::{debug, info};

use crate::data_loader::*;
use crate::error::{AppError, FetchError};
use crate::league_context::LeagueContext;

/// Supplies raw records for the configured league and season.
pub trait FetchSource {
    fn fixtures(&self) -> Result<Vec<JsonFixture>, FetchError>;
    fn standings(&self) -> Result<Vec<JsonStanding>, FetchError>;
    fn top_scorers(&self) -> Result<Vec<JsonScorer>, FetchError>;
}

// Every API-Football response is wrapped like this. `errors` is `[]` when all is well
// and an object like {"token": "..."} otherwise.
#[derive(Deserialize, Debug)]
pub struct ApiEnvelope<T> {
    #[serde(default = "Vec::new")]
    pub response: Vec<T>,
    #[serde(default)]
    pub errors: serde_json::Value,
}

impl<T> ApiEnvelope<T> {
    pub fn error_message(&self) -> Option<String> {
        match &self.errors {
            serde_json::Value::Null => None,
            serde_json::Value::Array(a) if a.is_empty() => None,
            serde_json::Value::Object(o) if o.is_empty() => None,
            serde_json::Value::Object(o) => Some(
                o.iter()
                    .map(|(k, v)| format!("{k}: {}", v.as_str().map(str::to_owned).unwrap_or_else(|| v.to_string())))
                    .collect::<Vec<_>>()
                    .join("; "),
            ),
            other => Some(other.to_string()),
        }
    }
}

#[derive(Deserialize, Debug, Default)]
pub struct JsonLeagueStandings {
    pub league: Option<JsonLeague>,
}

#[derive(Deserialize, Debug, Default)]
pub struct JsonLeague {
    #[serde(default)]
    pub standings: Vec<Vec<JsonStanding>>,
}

// The table sits at response[0].league.standings[0]. Anything else counts as an empty table.
pub fn first_standings_table(response: Vec<JsonLeagueStandings>) -> Vec<JsonStanding> {
    response.into_iter()
        .next()
        .and_then(|entry| entry.league)
        .and_then(|league| league.standings.into_iter().next())
        .unwrap_or_default()
}

pub fn decode_envelope<T: DeserializeOwned>(endpoint: &str, body: &str) -> Result<Vec<T>, FetchError> {
    let envelope: ApiEnvelope<T> = serde_json::from_str(body)?;
    if let Some(message) = envelope.error_message() {
        return Err(FetchError::Api { endpoint: endpoint.to_string(), message });
    }
    Ok(envelope.response)
}

pub struct ApiFootballClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
    league_id: u32,
    season: u32,
}

impl ApiFootballClient {
    pub fn new(ctx: &LeagueContext) -> Result<Self, AppError> {
        let api_key = ctx.require_api_key()?.to_string();
        let http = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(ctx.request_timeout_secs))
            .build()
            .map_err(FetchError::from)?;

        Ok(Self {
            http,
            base_url: ctx.base_url.clone(),
            api_key,
            league_id: ctx.league_id,
            season: ctx.season,
        })
    }

    fn get<T: DeserializeOwned>(&self, endpoint: &str) -> Result<Vec<T>, FetchError> {
        let url = format!("{}/{}", self.base_url, endpoint);
        debug!(%url, league = self.league_id, season = self.season, "requesting");

        let resp = self.http
            .get(&url)
            .header("x-apisports-key", &self.api_key)
            .query(&[("league", self.league_id), ("season", self.season)])
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { endpoint: endpoint.to_string(), status: status.as_u16() });
        }

        let body = resp.text()?;
        decode_envelope(endpoint, &body)
    }
}

impl FetchSource for ApiFootballClient {
    fn fixtures(&self) -> Result<Vec<JsonFixture>, FetchError> {
        self.get("fixtures")
    }

    fn standings(&self) -> Result<Vec<JsonStanding>, FetchError> {
        self.get::<JsonLeagueStandings>("standings").map(first_standings_table)
    }

    fn top_scorers(&self) -> Result<Vec<JsonScorer>, FetchError> {
        self.get("players/topscorers")
    }
}

/// Fetches all three domains and normalizes them. Nothing is returned unless every
/// step succeeded, so a failed run never mixes with the previous snapshot.
pub fn collect_season<S: FetchSource>(source: &S, policies: &PolicySet) -> Result<Season, AppError> {
    info!("fetching fixtures");
    let fixtures = source.fixtures()?;

    info!("fetching standings");
    let standings = source.standings()?;

    info!("fetching top scorers");
    let scorers = source.top_scorers()?;

    debug!(fixtures = fixtures.len(), standings = standings.len(), scorers = scorers.len(), "raw records received");

    let season = normalize_season(RawSeason { fixtures, standings, scorers }, policies)?;
    Ok(season)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::NormalizeError;

    #[test]
    fn envelope_without_errors_yields_records() {
        let body = r#"{"get":"players/topscorers","errors":[],"results":1,"response":[
            {"player":{"name":"Hulk"},"statistics":[{"team":{"name":"Atletico-MG"},"goals":{"total":15}}]}
        ]}"#;

        let records: Vec<JsonScorer> = decode_envelope("players/topscorers", body).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn envelope_errors_are_surfaced() {
        let body = r#"{"errors":{"token":"Error/Missing application key."},"response":[]}"#;
        let err = decode_envelope::<JsonFixture>("fixtures", body).unwrap_err();

        match err {
            FetchError::Api { endpoint, message } => {
                assert_eq!(endpoint, "fixtures");
                assert_eq!(message, "token: Error/Missing application key.");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn standings_table_is_unwrapped() {
        let body = r#"{"errors":[],"response":[{"league":{"id":71,"standings":[[
            {"rank":1,"team":{"name":"Palmeiras"},"points":70,"goalsDiff":31,
             "all":{"played":38,"win":20,"draw":10,"lose":8,"goals":{"for":64,"against":33}}}
        ]]}}]}"#;

        let response: Vec<JsonLeagueStandings> = decode_envelope("standings", body).unwrap();
        let table = first_standings_table(response);
        assert_eq!(table.len(), 1);
        assert_eq!(table[0].points, Some(70));
    }

    #[test]
    fn missing_standings_path_is_empty() {
        let response: Vec<JsonLeagueStandings> = decode_envelope("standings", r#"{"response":[{}]}"#).unwrap();
        assert!(first_standings_table(response).is_empty());
        assert!(first_standings_table(Vec::new()).is_empty());
    }

    struct FakeSource {
        scorers: Vec<JsonScorer>,
    }

    impl FetchSource for FakeSource {
        fn fixtures(&self) -> Result<Vec<JsonFixture>, FetchError> {
            Ok(vec![JsonFixture::default()])
        }
        fn standings(&self) -> Result<Vec<JsonStanding>, FetchError> {
            Ok(Vec::new())
        }
        fn top_scorers(&self) -> Result<Vec<JsonScorer>, FetchError> {
            Ok(self.scorers.clone())
        }
    }

    #[test]
    fn collect_season_stops_on_bad_scorer() {
        let source = FakeSource {
            scorers: vec![JsonScorer { player: Some(JsonPlayer { name: Some("Pedro".to_string()) }), statistics: vec![] }],
        };

        match collect_season(&source, &PolicySet::default()) {
            Err(AppError::Normalize(NormalizeError::NoStatistics { player })) => assert_eq!(player, "Pedro"),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
