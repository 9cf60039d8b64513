// Flat rows produced by the normalizers. The serde names on StandingRow and ScorerRow
// are the persisted CSV headers, and field order is column order.

use serde::*;
use std::fmt;

pub const SCORE_SEPARATOR: &str = " - ";

/// Goals scored by each side. A side is `None` until the match has been played.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Score {
    pub home: Option<u32>,
    pub away: Option<u32>,
}

impl Score {
    pub fn new(home: u32, away: u32) -> Self {
        Self { home: Some(home), away: Some(away) }
    }

    pub fn unplayed() -> Self {
        Self::default()
    }

    /// Both sides, if both are known.
    pub fn goals(&self) -> Option<(u32, u32)> {
        Some((self.home?, self.away?))
    }

    // Reads back the persisted "3 - 0" form. Sides that aren't numbers become None.
    pub fn parse(text: &str) -> Self {
        match text.split_once(SCORE_SEPARATOR) {
            Some((home, away)) => Self {
                home: home.trim().parse().ok(),
                away: away.trim().parse().ok(),
            },
            None => Self::unplayed(),
        }
    }
}

impl fmt::Display for Score {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let side = |g: Option<u32>| g.map(|g| g.to_string()).unwrap_or_default();
        write!(f, "{}{}{}", side(self.home), SCORE_SEPARATOR, side(self.away))
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FixtureRow {
    pub match_id: Option<u64>,
    pub date: String,
    pub home_team: String,
    pub away_team: String,
    pub score: Score,
}

impl FixtureRow {
    pub fn is_played(&self) -> bool {
        self.score.goals().is_some()
    }

    pub fn involves(&self, team: &str) -> bool {
        self.home_team == team || self.away_team == team
    }
}

// On-disk shape of a fixture. The score only exists as a string here.
#[derive(Debug, Serialize, Deserialize)]
pub struct FixtureRecord {
    #[serde(rename = "Match ID")]
    pub match_id: Option<u64>,
    #[serde(rename = "Date")]
    pub date: String,
    #[serde(rename = "Home Team")]
    pub home_team: String,
    #[serde(rename = "Away Team")]
    pub away_team: String,
    #[serde(rename = "Score")]
    pub score: String,
}

impl From<&FixtureRow> for FixtureRecord {
    fn from(row: &FixtureRow) -> Self {
        Self {
            match_id: row.match_id,
            date: row.date.clone(),
            home_team: row.home_team.clone(),
            away_team: row.away_team.clone(),
            score: row.score.to_string(),
        }
    }
}

impl From<FixtureRecord> for FixtureRow {
    fn from(record: FixtureRecord) -> Self {
        Self {
            match_id: record.match_id,
            score: Score::parse(&record.score),
            date: record.date,
            home_team: record.home_team,
            away_team: record.away_team,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StandingRow {
    #[serde(rename = "Posição")]
    pub rank: u32,
    #[serde(rename = "Time")]
    pub team: String,
    #[serde(rename = "Pontos")]
    pub points: u32,
    #[serde(rename = "Jogos")]
    pub played: u32,
    #[serde(rename = "Vitórias")]
    pub wins: u32,
    #[serde(rename = "Empates")]
    pub draws: u32,
    #[serde(rename = "Derrotas")]
    pub losses: u32,
    #[serde(rename = "Gols Pró")]
    pub goals_for: u32,
    #[serde(rename = "Gols Contra")]
    pub goals_against: u32,
    #[serde(rename = "Saldo")]
    pub goal_diff: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScorerRow {
    #[serde(rename = "Jogador")]
    pub player: String,
    #[serde(rename = "Time")]
    pub team: String,
    #[serde(rename = "Gols")]
    pub goals: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn score_display_keeps_separator_for_missing_sides() {
        assert_eq!(Score::new(3, 0).to_string(), "3 - 0");
        assert_eq!(Score { home: None, away: Some(2) }.to_string(), " - 2");
        assert_eq!(Score::unplayed().to_string(), " - ");
    }

    #[test]
    fn score_parse_tolerates_junk() {
        assert_eq!(Score::parse("2 - 1"), Score::new(2, 1));
        assert_eq!(Score::parse(" - 2"), Score { home: None, away: Some(2) });
        assert_eq!(Score::parse("2-1"), Score::unplayed());
        assert_eq!(Score::parse("x - 1"), Score { home: None, away: Some(1) });
    }

    #[test]
    fn played_needs_both_sides() {
        let mut row = FixtureRow {
            match_id: Some(9),
            date: String::new(),
            home_team: "Bahia".to_string(),
            away_team: "Vasco".to_string(),
            score: Score { home: Some(1), away: None },
        };
        assert!(!row.is_played());
        row.score.away = Some(1);
        assert!(row.is_played());
        assert!(row.involves("Vasco"));
        assert!(!row.involves("Santos"));
    }
}
