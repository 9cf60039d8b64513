use std::path::PathBuf;

use clap::{Parser, Subcommand};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use brasileirao_stats::data_loader::PolicySet;
use brasileirao_stats::error::{AppError, Result, StoreError};
use brasileirao_stats::fetch::{collect_season, ApiFootballClient};
use brasileirao_stats::league_context::LeagueContext;
use brasileirao_stats::report::*;
use brasileirao_stats::stats::*;
use brasileirao_stats::store::{load_season, save_season};

/*
    `fetch` pulls fixtures, standings and top scorers for one league/season into three CSV files.
    The other commands only read those files, so they work offline once a fetch has run.
*/

#[derive(Parser, Debug)]
#[command(name = "brasileirao_stats")]
#[command(about = "Collects league fixtures, standings and top scorers and reports on them", long_about = None)]
struct Cli {
    /// League id on API-Football (71 = Brasileirão Série A)
    #[arg(long)]
    league: Option<u32>,

    #[arg(long)]
    season: Option<u32>,

    /// Directory holding the CSV files
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// tracing filter, e.g. "debug" or "brasileirao_stats=trace". Wins over RUST_LOG
    #[arg(long)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fetch all three tables from the API and overwrite the CSV files
    Fetch,
    /// Print the full report
    Report {
        /// Team whose fixtures are listed (defaults to the first in the standings)
        #[arg(long)]
        team: Option<String>,
        /// Match day as DD/MM/YYYY (defaults to the first fixture date)
        #[arg(long)]
        date: Option<String>,
    },
    /// Points earned per round by a team, played fixtures only
    Rounds { team: String },
    /// Side-by-side season figures for two teams
    Compare { team_a: String, team_b: String },
    /// The biggest winning margin of the season
    Highlight,
}

fn main() {
    let cli = Cli::parse();

    let directive = log_directive(cli.log_level.as_deref(), std::env::var("RUST_LOG").ok());
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(directive))
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(cli) {
        match &e {
            AppError::Store(StoreError::NotFound(path)) => {
                error!("Erro ao carregar os dados: {} (run `fetch` first)", path.display())
            }
            _ => error!("{e}"),
        }
        std::process::exit(1);
    }
}

// --log-level, then RUST_LOG, then "info"
fn log_directive(flag: Option<&str>, env: Option<String>) -> String {
    flag.map(str::to_owned)
        .or(env.filter(|e| !e.trim().is_empty()))
        .unwrap_or_else(|| "info".to_string())
}

fn run(cli: Cli) -> Result<()> {
    let mut ctx = LeagueContext::from_env()?;
    if let Some(league) = cli.league { ctx.league_id = league; }
    if let Some(season) = cli.season { ctx.season = season; }
    if let Some(dir) = cli.data_dir { ctx.data_dir = dir; }

    match cli.command {
        Commands::Fetch => {
            info!(league = ctx.league_id, season = ctx.season, "collecting");

            let client = ApiFootballClient::new(&ctx)?;
            let season = collect_season(&client, &PolicySet::default())?;
            save_season(&ctx, &season)?;

            info!(
                fixtures = season.fixtures.len(),
                standings = season.standings.len(),
                scorers = season.scorers.len(),
                "all tables saved"
            );
        }
        Commands::Report { team, date } => {
            let season = load_season(&ctx)?;

            let team = team.or_else(|| team_names(&season.standings).first().map(|t| t.to_string()));
            let date = date.or_else(|| fixture_dates(&season.fixtures).into_iter().next());

            println!("Dashboard Brasileirão {}\n", ctx.season);
            print!("{}", render_dashboard(&season, team.as_deref(), date.as_deref()));
        }
        Commands::Rounds { team } => {
            let season = load_season(&ctx)?;

            let fixtures = team_fixtures(&season.fixtures, &team);
            let played = played_only(fixtures.iter().copied());
            if played.len() < fixtures.len() {
                warn!(team = %team, skipped = fixtures.len() - played.len(), "skipping fixtures without a final score");
            }

            let rounds = round_points(&team, played)?;
            print!("{}", render_round_points(&team, &rounds));
        }
        Commands::Compare { team_a, team_b } => {
            let season = load_season(&ctx)?;
            let cmp = compare_teams(&team_a, &team_b, &season.standings)?;
            print!("{}", render_comparison(&cmp));
        }
        Commands::Highlight => {
            let season = load_season(&ctx)?;
            print!("{}", render_highlight(biggest_margin(&season.fixtures)));
        }
    }

    Ok(())
}
