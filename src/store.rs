use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, info};

use crate::data_loader::Season;
use crate::error::StoreError;
use crate::league_context::{LeagueContext, TableKind};
use crate::rows::*;

/// A row type with a fixed, ordered CSV header.
pub trait Table: Serialize + DeserializeOwned {
    const KIND: TableKind;
    const HEADERS: &'static [&'static str];
}

impl Table for StandingRow {
    const KIND: TableKind = TableKind::Standings;
    const HEADERS: &'static [&'static str] = &[
        "Posição", "Time", "Pontos", "Jogos", "Vitórias", "Empates", "Derrotas", "Gols Pró", "Gols Contra", "Saldo",
    ];
}

impl Table for ScorerRow {
    const KIND: TableKind = TableKind::Scorers;
    const HEADERS: &'static [&'static str] = &["Jogador", "Time", "Gols"];
}

impl Table for FixtureRecord {
    const KIND: TableKind = TableKind::Fixtures;
    const HEADERS: &'static [&'static str] = &["Match ID", "Date", "Home Team", "Away Team", "Score"];
}

// The header is written by hand so that an empty table still gets one.
pub fn write_rows<T: Table>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }

    let mut wtr = csv::WriterBuilder::new().has_headers(false).from_path(path)?;
    wtr.write_record(T::HEADERS)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;

    debug!(path = %path.display(), rows = rows.len(), "wrote table");
    Ok(())
}

pub fn read_rows<T: Table>(path: &Path) -> Result<Vec<T>, StoreError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => StoreError::NotFound(path.to_path_buf()),
        _ => StoreError::Io(e),
    })?;

    let mut rdr = csv::Reader::from_reader(file);
    let rows = rdr.deserialize().collect::<Result<Vec<T>, _>>()?;

    debug!(path = %path.display(), rows = rows.len(), "read table");
    Ok(rows)
}

fn staging_path(path: &Path) -> PathBuf {
    let mut staged = path.as_os_str().to_owned();
    staged.push(".tmp");
    PathBuf::from(staged)
}

/// Writes all three tables. Files are staged next to their targets and only renamed
/// into place once every table has been written. Staging is all-or-nothing; the
/// renames are not, but a failed rename discards whatever is still staged.
pub fn save_season(ctx: &LeagueContext, season: &Season) -> Result<(), StoreError> {
    let fixtures: Vec<FixtureRecord> = season.fixtures.iter().map(FixtureRecord::from).collect();

    let targets = [
        ctx.file_path(TableKind::Fixtures),
        ctx.file_path(TableKind::Standings),
        ctx.file_path(TableKind::Scorers),
    ];
    let staged: Vec<PathBuf> = targets.iter().map(|p| staging_path(p)).collect();

    let written = write_rows(&staged[0], &fixtures)
        .and_then(|_| write_rows(&staged[1], &season.standings))
        .and_then(|_| write_rows(&staged[2], &season.scorers));

    if let Err(e) = written {
        for p in &staged {
            let _ = fs::remove_file(p);
        }
        return Err(e);
    }

    for (idx, (from, to)) in staged.iter().zip(targets.iter()).enumerate() {
        if let Err(e) = fs::rename(from, to) {
            for p in &staged[idx..] {
                let _ = fs::remove_file(p);
            }
            return Err(e.into());
        }
        info!(path = %to.display(), "saved");
    }

    Ok(())
}

pub fn load_season(ctx: &LeagueContext) -> Result<Season, StoreError> {
    let fixtures = read_rows::<FixtureRecord>(&ctx.file_path(TableKind::Fixtures))?
        .into_iter()
        .map(FixtureRow::from)
        .collect();

    Ok(Season {
        fixtures,
        standings: read_rows(&ctx.file_path(TableKind::Standings))?,
        scorers: read_rows(&ctx.file_path(TableKind::Scorers))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn standing(rank: u32, team: &str, points: u32) -> StandingRow {
        StandingRow {
            rank,
            team: team.to_string(),
            points,
            played: 10,
            wins: points / 3,
            draws: points % 3,
            losses: 10 - points / 3 - points % 3,
            goals_for: 12,
            goals_against: 9,
            goal_diff: 3,
        }
    }

    #[test]
    fn standings_header_is_written_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("classificacao.csv");

        write_rows(&path, &[standing(1, "Grêmio", 22)]).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("Posição,Time,Pontos,Jogos,Vitórias,Empates,Derrotas,Gols Pró,Gols Contra,Saldo"));
        assert_eq!(lines.next(), Some("1,Grêmio,22,10,7,1,2,12,9,3"));
    }

    #[test]
    fn empty_table_still_has_header() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("artilharia.csv");

        write_rows::<ScorerRow>(&path, &[]).unwrap();

        assert_eq!(fs::read_to_string(&path).unwrap().trim_end(), "Jogador,Time,Gols");
        assert!(read_rows::<ScorerRow>(&path).unwrap().is_empty());
    }

    #[test]
    fn fixture_with_missing_sides_reloads_as_unplayed() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("jogos.csv");
        let row = FixtureRow {
            match_id: None,
            date: "2023-11-30T00:30:00+00:00".to_string(),
            home_team: "Cuiaba".to_string(),
            away_team: "Bragantino".to_string(),
            score: Score { home: None, away: Some(2) },
        };

        write_rows(&path, &[FixtureRecord::from(&row)]).unwrap();
        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains(",2023-11-30T00:30:00+00:00,Cuiaba,Bragantino,"));

        let back: Vec<FixtureRow> = read_rows::<FixtureRecord>(&path).unwrap().into_iter().map(FixtureRow::from).collect();
        assert_eq!(back, vec![row]);
    }

    fn season_with(team: &str) -> Season {
        Season {
            fixtures: vec![FixtureRow {
                match_id: Some(1),
                date: "2023-04-15T21:30:00+00:00".to_string(),
                home_team: team.to_string(),
                away_team: "Santos".to_string(),
                score: Score::new(2, 1),
            }],
            standings: vec![standing(1, team, 3)],
            scorers: vec![ScorerRow { player: "Pedro".to_string(), team: team.to_string(), goals: 1 }],
        }
    }

    #[test]
    fn failed_staging_keeps_previous_tables() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = LeagueContext::default();
        ctx.data_dir = dir.path().to_path_buf();

        let old = season_with("Flamengo");
        save_season(&ctx, &old).unwrap();

        // A directory in the way makes the last staged write fail.
        let blocked = staging_path(&ctx.file_path(TableKind::Scorers));
        fs::create_dir(&blocked).unwrap();

        assert!(save_season(&ctx, &season_with("Vasco")).is_err());
        assert_eq!(load_season(&ctx).unwrap(), old);
        assert!(!staging_path(&ctx.file_path(TableKind::Fixtures)).exists());
        assert!(!staging_path(&ctx.file_path(TableKind::Standings)).exists());
    }

    #[test]
    fn missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nope.csv");

        match read_rows::<ScorerRow>(&path) {
            Err(StoreError::NotFound(p)) => assert_eq!(p, path),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
