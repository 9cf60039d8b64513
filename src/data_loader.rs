use serde::*;
use serde_aux::field_attributes::deserialize_option_number_from_string;

use crate::error::NormalizeError;
use crate::rows::*;

// Raw API-Football records turn into flat rows here. Every raw field is optional so
// that the policy, not serde, decides what a missing field means.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NormalizationPolicy {
    /// Missing values become empty strings, zeros or `None`.
    Lenient,
    /// Missing values are a `NormalizeError::MissingField`.
    Strict,
}

impl NormalizationPolicy {
    fn take<T: Default>(self, value: Option<T>, record: &'static str, field: &'static str) -> Result<T, NormalizeError> {
        match (value, self) {
            (Some(v), _) => Ok(v),
            (None, NormalizationPolicy::Lenient) => Ok(T::default()),
            (None, NormalizationPolicy::Strict) => Err(NormalizeError::MissingField { record, field }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicySet {
    pub fixtures: NormalizationPolicy,
    pub standings: NormalizationPolicy,
    pub scorers: NormalizationPolicy,
}

// Fixtures are routinely partial (future matches), standings and scorers are expected complete.
impl Default for PolicySet {
    fn default() -> Self {
        Self {
            fixtures: NormalizationPolicy::Lenient,
            standings: NormalizationPolicy::Strict,
            scorers: NormalizationPolicy::Strict,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonFixture {
    pub fixture: Option<JsonFixtureInfo>,
    pub teams: Option<JsonTeams>,
    pub goals: Option<JsonGoals>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonFixtureInfo {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub id: Option<u64>,
    pub date: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonTeams {
    pub home: Option<JsonTeam>,
    pub away: Option<JsonTeam>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonTeam {
    pub name: Option<String>,
}

// `null` on both sides until kickoff
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonGoals {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub home: Option<u32>,
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub away: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonStanding {
    pub rank: Option<u32>,
    pub team: Option<JsonTeam>,
    pub points: Option<u32>,
    #[serde(rename(deserialize = "goalsDiff"))]
    pub goals_diff: Option<i32>,
    pub all: Option<JsonRecord>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonRecord {
    pub played: Option<u32>,
    pub win: Option<u32>,
    pub draw: Option<u32>,
    pub lose: Option<u32>,
    pub goals: Option<JsonGoalTotals>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonGoalTotals {
    #[serde(rename(deserialize = "for"))]
    pub goals_for: Option<u32>,
    pub against: Option<u32>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonScorer {
    pub player: Option<JsonPlayer>,
    #[serde(default)]
    pub statistics: Vec<JsonPlayerStats>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonPlayer {
    pub name: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonPlayerStats {
    pub team: Option<JsonTeam>,
    pub goals: Option<JsonScorerGoals>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct JsonScorerGoals {
    #[serde(default, deserialize_with = "deserialize_option_number_from_string")]
    pub total: Option<u32>,
}

pub fn normalize_fixture(raw: JsonFixture, policy: NormalizationPolicy) -> Result<FixtureRow, NormalizeError> {
    const RECORD: &str = "fixture";

    let fixture = policy.take(raw.fixture, RECORD, "fixture")?;
    let teams = policy.take(raw.teams, RECORD, "teams")?;
    let home = policy.take(teams.home, RECORD, "teams.home")?;
    let away = policy.take(teams.away, RECORD, "teams.away")?;
    // Goal counts stay optional under either policy: null is how the API says "not played".
    let goals = policy.take(raw.goals, RECORD, "goals")?;

    Ok(FixtureRow {
        match_id: match policy {
            NormalizationPolicy::Lenient => fixture.id,
            NormalizationPolicy::Strict => Some(policy.take(fixture.id, RECORD, "fixture.id")?),
        },
        date: policy.take(fixture.date, RECORD, "fixture.date")?,
        home_team: policy.take(home.name, RECORD, "teams.home.name")?,
        away_team: policy.take(away.name, RECORD, "teams.away.name")?,
        score: Score { home: goals.home, away: goals.away },
    })
}

pub fn normalize_standing(raw: JsonStanding, policy: NormalizationPolicy) -> Result<StandingRow, NormalizeError> {
    const RECORD: &str = "standing";

    let team = policy.take(raw.team, RECORD, "team")?;
    let all = policy.take(raw.all, RECORD, "all")?;
    let goals = policy.take(all.goals, RECORD, "all.goals")?;

    Ok(StandingRow {
        rank: policy.take(raw.rank, RECORD, "rank")?,
        team: policy.take(team.name, RECORD, "team.name")?,
        points: policy.take(raw.points, RECORD, "points")?,
        played: policy.take(all.played, RECORD, "all.played")?,
        wins: policy.take(all.win, RECORD, "all.win")?,
        draws: policy.take(all.draw, RECORD, "all.draw")?,
        losses: policy.take(all.lose, RECORD, "all.lose")?,
        goals_for: policy.take(goals.goals_for, RECORD, "all.goals.for")?,
        goals_against: policy.take(goals.against, RECORD, "all.goals.against")?,
        goal_diff: policy.take(raw.goals_diff, RECORD, "goalsDiff")?,
    })
}

// Only the first statistics entry counts, so a player who moved mid-season is listed
// under whichever club the API puts first.
pub fn normalize_scorer(raw: JsonScorer, policy: NormalizationPolicy) -> Result<ScorerRow, NormalizeError> {
    const RECORD: &str = "scorer";

    let player = policy.take(raw.player, RECORD, "player")?;
    let name = policy.take(player.name, RECORD, "player.name")?;

    let Some(stats) = raw.statistics.into_iter().next() else {
        return Err(NormalizeError::NoStatistics { player: name });
    };

    let team = policy.take(stats.team, RECORD, "statistics[0].team")?;
    let goals = policy.take(stats.goals, RECORD, "statistics[0].goals")?;

    Ok(ScorerRow {
        player: name,
        team: policy.take(team.name, RECORD, "statistics[0].team.name")?,
        goals: policy.take(goals.total, RECORD, "statistics[0].goals.total")?,
    })
}

/// Raw records for one league/season, as handed over by a fetch.
#[derive(Debug, Clone, Default)]
pub struct RawSeason {
    pub fixtures: Vec<JsonFixture>,
    pub standings: Vec<JsonStanding>,
    pub scorers: Vec<JsonScorer>,
}

/// One complete, normalized snapshot. Replaces the previous snapshot as a whole.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Season {
    pub fixtures: Vec<FixtureRow>,
    pub standings: Vec<StandingRow>,
    pub scorers: Vec<ScorerRow>,
}

pub fn normalize_season(raw: RawSeason, policies: &PolicySet) -> Result<Season, NormalizeError> {
    let fixtures = raw.fixtures.into_iter()
        .map(|f| normalize_fixture(f, policies.fixtures))
        .collect::<Result<Vec<_>, _>>()?;

    let standings = raw.standings.into_iter()
        .map(|s| normalize_standing(s, policies.standings))
        .collect::<Result<Vec<_>, _>>()?;

    let scorers = raw.scorers.into_iter()
        .map(|s| normalize_scorer(s, policies.scorers))
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Season { fixtures, standings, scorers })
}
