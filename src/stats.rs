use std::cmp::Ordering;

use crate::error::StatsError;
use crate::rows::*;
use crate::util::*;

// Derived statistics over already-normalized rows. Nothing here is cached; callers
// recompute from whatever rows they currently hold.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchMargin {
    pub match_ref: Option<u64>,
    pub absolute_goal_difference: u32,
    /// Set when the score was missing or malformed. The difference is 0 then.
    pub unparseable: bool,
}

impl MatchMargin {
    fn of(match_ref: Option<u64>, goals: Option<(u32, u32)>) -> Self {
        match goals {
            Some((home, away)) => Self { match_ref, absolute_goal_difference: home.abs_diff(away), unparseable: false },
            None => Self { match_ref, absolute_goal_difference: 0, unparseable: true },
        }
    }
}

/// Margin of a persisted "home - away" score string.
pub fn score_margin(match_ref: Option<u64>, score: &str) -> MatchMargin {
    let goals = score.split_once(SCORE_SEPARATOR).and_then(|(home, away)| {
        Some((home.trim().parse::<u32>().ok()?, away.trim().parse::<u32>().ok()?))
    });
    MatchMargin::of(match_ref, goals)
}

pub fn margin(row: &FixtureRow) -> MatchMargin {
    MatchMargin::of(row.match_id, row.score.goals())
}

// Fixtures without a usable score never win, even against an all-zero field.
// Ties keep the earliest row.
pub fn biggest_margin(fixtures: &[FixtureRow]) -> Option<(&FixtureRow, MatchMargin)> {
    let mut best: Option<(&FixtureRow, MatchMargin)> = None;

    for f in fixtures {
        let m = margin(f);
        if m.unparseable { continue; }

        match best {
            Some((_, b)) if b.absolute_goal_difference >= m.absolute_goal_difference => {}
            _ => best = Some((f, m)),
        }
    }

    best
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoundPoints {
    pub team: String,
    pub round: u32,
    pub points_earned: u8,
}

/// Points per fixture for `team`, numbering rounds 1..N in the order given.
/// Every fixture must involve the team and have both goal counts.
pub fn round_points<'a, I>(team: &str, fixtures: I) -> Result<Vec<RoundPoints>, StatsError>
where
    I: IntoIterator<Item = &'a FixtureRow>,
{
    let mut out = Vec::new();

    for (idx, f) in fixtures.into_iter().enumerate() {
        if !f.involves(team) {
            return Err(StatsError::NotInvolved { team: team.to_string(), match_id: f.match_id });
        }

        let (home, away) = f.score.goals().ok_or(StatsError::UnplayedFixture { match_id: f.match_id })?;
        let (own, opp) = if f.home_team == team { (home, away) } else { (away, home) };

        let points_earned = match own.cmp(&opp) {
            Ordering::Greater => 3,
            Ordering::Equal => 1,
            Ordering::Less => 0,
        };

        out.push(RoundPoints { team: team.to_string(), round: idx as u32 + 1, points_earned });
    }

    Ok(out)
}

/// Fixtures involving `team`, in input order.
pub fn fixtures_for_team<'a>(fixtures: &'a [FixtureRow], team: &str) -> Vec<&'a FixtureRow> {
    fixtures.iter().filter(|f| f.involves(team)).collect()
}

/// Fixtures involving `team`, oldest first. Rows whose date doesn't parse go last,
/// keeping their relative order.
pub fn team_fixtures<'a>(fixtures: &'a [FixtureRow], team: &str) -> Vec<&'a FixtureRow> {
    let mut out = fixtures_for_team(fixtures, team);
    out.sort_by_key(|f| {
        let date = parse_match_date(&f.date);
        (date.is_none(), date)
    });
    out
}

pub fn played_only<'a, I>(fixtures: I) -> Vec<&'a FixtureRow>
where
    I: IntoIterator<Item = &'a FixtureRow>,
{
    fixtures.into_iter().filter(|f| f.is_played()).collect()
}

/// `day` is the DD/MM/YYYY display form.
pub fn fixtures_on_date<'a>(fixtures: &'a [FixtureRow], day: &str) -> Vec<&'a FixtureRow> {
    fixtures.iter().filter(|f| display_date(&f.date) == day).collect()
}

/// Distinct display dates, first seen first.
pub fn fixture_dates(fixtures: &[FixtureRow]) -> Vec<String> {
    let mut dates: Vec<String> = Vec::new();
    for f in fixtures {
        let d = display_date(&f.date);
        if !dates.contains(&d) {
            dates.push(d);
        }
    }
    dates
}

pub fn team_names(standings: &[StandingRow]) -> Vec<&str> {
    let mut names: Vec<&str> = Vec::new();
    for s in standings {
        if !names.contains(&s.team.as_str()) {
            names.push(&s.team);
        }
    }
    names
}

/// Up to `n` scorers, most goals first. Equal tallies keep input order.
pub fn top_scorers(scorers: &[ScorerRow], n: usize) -> Vec<&ScorerRow> {
    let mut sorted: Vec<&ScorerRow> = scorers.iter().collect();
    sorted.sort_by(|a, b| b.goals.cmp(&a.goals));
    sorted.truncate(n);
    sorted
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Points,
    Wins,
    Draws,
    Losses,
    GoalDiff,
}

impl Metric {
    pub const ALL: [Metric; 5] = [Metric::Points, Metric::Wins, Metric::Draws, Metric::Losses, Metric::GoalDiff];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Points => "Pontos",
            Metric::Wins => "Vitórias",
            Metric::Draws => "Empates",
            Metric::Losses => "Derrotas",
            Metric::GoalDiff => "Saldo",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TeamComparison {
    pub team_a: String,
    pub team_b: String,
    pub points: (u32, u32),
    pub wins: (u32, u32),
    pub draws: (u32, u32),
    pub losses: (u32, u32),
    pub goal_diff: (i32, i32),
}

impl TeamComparison {
    pub fn metric(&self, metric: Metric) -> (i64, i64) {
        let widen = |(a, b): (u32, u32)| (a as i64, b as i64);
        match metric {
            Metric::Points => widen(self.points),
            Metric::Wins => widen(self.wins),
            Metric::Draws => widen(self.draws),
            Metric::Losses => widen(self.losses),
            Metric::GoalDiff => (self.goal_diff.0 as i64, self.goal_diff.1 as i64),
        }
    }
}

fn find_team<'a>(standings: &'a [StandingRow], team: &str) -> Result<&'a StandingRow, StatsError> {
    standings.iter()
        .find(|s| s.team == team)
        .ok_or_else(|| StatsError::TeamNotFound(team.to_string()))
}

pub fn compare_teams(team_a: &str, team_b: &str, standings: &[StandingRow]) -> Result<TeamComparison, StatsError> {
    let a = find_team(standings, team_a)?;
    let b = find_team(standings, team_b)?;

    Ok(TeamComparison {
        team_a: a.team.clone(),
        team_b: b.team.clone(),
        points: (a.points, b.points),
        wins: (a.wins, b.wins),
        draws: (a.draws, b.draws),
        losses: (a.losses, b.losses),
        goal_diff: (a.goal_diff, b.goal_diff),
    })
}
