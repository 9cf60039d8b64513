use std::fmt::Write;

use crate::data_loader::Season;
use crate::rows::*;
use crate::stats::*;
use crate::util::display_date;

const BAR_WIDTH: usize = 40;

// All renderers return the text rather than printing it, the binary decides where it goes.
// `write!` into a String cannot fail, hence the ignored results.

pub fn render_standings(standings: &[StandingRow]) -> String {
    let mut out = String::from("Classificação\n");
    let _ = writeln!(out, "|{0:>3}. | {1:20} | {2:>3} | {3:>3} | {4:>3} | {5:>3} | {6:>3} | {7:>3} | {8:>3} | {9:>4}",
        "#", "Time", "Pts", "J", "V", "E", "D", "GP", "GC", "SG");

    for s in standings {
        let _ = writeln!(out, "|{0:>3}. | {1:20} | {2:>3} | {3:>3} | {4:>3} | {5:>3} | {6:>3} | {7:>3} | {8:>3} | {9:>4}",
            s.rank,
            s.team,
            s.points,
            s.played,
            s.wins,
            s.draws,
            s.losses,
            s.goals_for,
            s.goals_against,
            s.goal_diff,
        );
    }
    out
}

/// Horizontal bars scaled to the largest absolute value. Negative values use '-'.
pub fn render_bars(title: &str, items: &[(&str, i64)]) -> String {
    let mut out = format!("{title}\n");
    let max = items.iter().map(|(_, v)| v.unsigned_abs()).max().unwrap_or(0).max(1);

    for (label, value) in items {
        let len = (value.unsigned_abs() * BAR_WIDTH as u64 / max) as usize;
        let bar = if *value < 0 { "-".repeat(len) } else { "#".repeat(len) };
        let _ = writeln!(out, "{0:20} | {1:>4} | {2}", label, value, bar);
    }
    out
}

pub fn render_scorers(title: &str, scorers: &[&ScorerRow]) -> String {
    let mut out = format!("{title}\n");
    for (i, s) in scorers.iter().enumerate() {
        let _ = writeln!(out, "|{0:3}. | {1:25} | {2:20} | {3:3}", i + 1, s.player, s.team, s.goals);
    }
    out
}

pub fn render_fixtures(title: &str, fixtures: &[&FixtureRow]) -> String {
    let mut out = format!("{title}\n");
    if fixtures.is_empty() {
        out.push_str("(nenhum jogo)\n");
        return out;
    }

    for f in fixtures {
        let id = f.match_id.map(|id| id.to_string()).unwrap_or_default();
        let _ = writeln!(out, "|{0:>8} | {1:10} | {2:>20} {3:^7} {4:20}",
            id,
            display_date(&f.date),
            f.home_team,
            f.score.to_string(),
            f.away_team,
        );
    }
    out
}

pub fn render_highlight(best: Option<(&FixtureRow, MatchMargin)>) -> String {
    match best {
        Some((f, _)) => format!("Maior goleada: {} {} {} em {}\n",
            f.home_team, f.score, f.away_team, display_date(&f.date)),
        None => "Maior goleada: nenhum jogo com placar\n".to_string(),
    }
}

pub fn render_round_points(team: &str, rounds: &[RoundPoints]) -> String {
    let mut out = format!("Pontos por rodada: {team}\n");
    let mut total: u32 = 0;

    for r in rounds {
        total += r.points_earned as u32;
        let _ = writeln!(out, "Rodada {0:>2} | {1} pts | acumulado {2:>3}", r.round, r.points_earned, total);
    }
    out
}

pub fn render_comparison(cmp: &TeamComparison) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{0:10} | {1:>20} | {2:>20}", "", cmp.team_a, cmp.team_b);

    for m in Metric::ALL {
        let (a, b) = cmp.metric(m);
        let _ = writeln!(out, "{0:10} | {1:>20} | {2:>20}", m.label(), a, b);
    }
    out
}

/// Everything the dashboard showed on one page, for the selected team and date.
pub fn render_dashboard(season: &Season, team: Option<&str>, day: Option<&str>) -> String {
    let mut out = String::new();

    out.push_str(&render_standings(&season.standings));
    out.push('\n');

    let points: Vec<(&str, i64)> = season.standings.iter().map(|s| (s.team.as_str(), s.points as i64)).collect();
    out.push_str(&render_bars("Pontos por Time", &points));
    out.push('\n');

    let saldo: Vec<(&str, i64)> = season.standings.iter().map(|s| (s.team.as_str(), s.goal_diff as i64)).collect();
    out.push_str(&render_bars("Saldo de Gols por Time", &saldo));
    out.push('\n');

    let top10 = top_scorers(&season.scorers, 10);
    out.push_str(&render_scorers("Top 10 Artilheiros", &top10));
    out.push('\n');

    let goals: Vec<(&str, i64)> = top10.iter().map(|s| (s.player.as_str(), s.goals as i64)).collect();
    out.push_str(&render_bars("Gols", &goals));
    out.push('\n');

    let all: Vec<&FixtureRow> = season.fixtures.iter().collect();
    out.push_str(&render_fixtures("Jogos", &all));
    out.push('\n');

    if let Some(team) = team {
        out.push_str(&render_fixtures(&format!("Jogos do {team}"), &fixtures_for_team(&season.fixtures, team)));
        out.push('\n');
    }

    if let Some(day) = day {
        out.push_str(&render_fixtures(&format!("Jogos na data {day}"), &fixtures_on_date(&season.fixtures, day)));
        out.push('\n');
    }

    out.push_str("Destaques\n");
    out.push_str(&render_highlight(biggest_margin(&season.fixtures)));
    out
}
