mod analysis;
mod chart;
mod errors;
mod session;

use std::fs;
use std::path::PathBuf;

use clap::{Parser, Subcommand, arg};
use log::{info, warn};

use crate::analysis::{fastest_laps_ranked, format_lap_time};
use crate::chart::overview::{delta_bar_rows, render_race_overview};
use crate::chart::{
    BarChartConfig, ChartStyle, OverviewConfig, bar_chart_height, render_bar_chart,
};
use crate::errors::PitwallError;
use crate::session::{
    FileSessionStore, SessionStore, SessionType, load_session_archive,
};

#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Directory holding session archives; defaults to the application data
    /// directory
    #[arg(short, long, global = true)]
    data_dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Validate a session archive file and add it to the store
    Import {
        #[arg(short, long)]
        input: PathBuf,
    },
    /// Rank qualifying laps against pole and render the delta chart
    Qualifying {
        #[arg(short, long)]
        year: u16,

        /// Event name, e.g. "Monaco Grand Prix"
        #[arg(short, long)]
        event: String,

        #[arg(short, long, default_value = "qualifying_deltas.svg")]
        output: PathBuf,
    },
    /// Render the full race & qualifying overview figure
    Race {
        #[arg(short, long)]
        year: u16,

        /// Event name, e.g. "Monaco Grand Prix"
        #[arg(short, long)]
        event: String,

        #[arg(short, long, default_value = "race_overview.svg")]
        output: PathBuf,

        /// How many finishers the race panels cover
        #[arg(short, long, default_value_t = 10)]
        top: usize,
    },
}

fn open_store(data_dir: &Option<PathBuf>) -> Result<FileSessionStore, PitwallError> {
    match data_dir {
        Some(dir) => FileSessionStore::new(dir.clone()),
        None => FileSessionStore::new_default(),
    }
}

fn import(store: &mut FileSessionStore, input: &PathBuf) -> Result<(), PitwallError> {
    let session = load_session_archive(input)?;
    info!(
        "Importing {} {} {} ({} results, {} laps)",
        session.info.year,
        session.info.event_name,
        session.info.session_type,
        session.results.len(),
        session.laps.len()
    );
    store.save(&session)?;
    println!(
        "Imported {} {} {}",
        session.info.year, session.info.event_name, session.info.session_type
    );
    Ok(())
}

fn qualifying(
    store: &FileSessionStore,
    year: u16,
    event: &str,
    output: &PathBuf,
) -> Result<(), PitwallError> {
    let qualy = store.load(year, event, SessionType::Qualifying)?;

    let ranking = match fastest_laps_ranked(&qualy) {
        Ok(ranking) => ranking,
        Err(PitwallError::EmptyQualifyingResult) => {
            println!("No qualifying laps found!");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    println!("{:<5} {:>10} {:>8}", "DRV", "LAP TIME", "DELTA");
    for row in &ranking {
        println!(
            "{:<5} {:>10} {:>8}",
            row.driver,
            format_lap_time(row.lap_time),
            format!("+{:.3}", row.delta.as_secs_f64())
        );
    }

    let style = ChartStyle::default();
    let pole = &ranking[0];
    let config = BarChartConfig {
        canvas_size: (420, bar_chart_height(ranking.len())),
        title: format!(
            "{} {} Qualifying - Pole {} ({})",
            qualy.info.event_name,
            qualy.info.year,
            format_lap_time(pole.lap_time),
            pole.driver
        ),
        x_label: "Delta to Pole (s)".to_string(),
    };
    let panel = render_bar_chart(&config, &style, &delta_bar_rows(&ranking, &style))?;
    fs::write(output, panel.into_document())
        .map_err(|e| PitwallError::ChartWriteError { source: e })?;
    println!("Wrote {:?}", output);
    Ok(())
}

fn race(
    store: &FileSessionStore,
    year: u16,
    event: &str,
    output: &PathBuf,
    top: usize,
) -> Result<(), PitwallError> {
    let race = store.load(year, event, SessionType::Race)?;
    let qualy = store.load(year, event, SessionType::Qualifying)?;

    let style = ChartStyle::default();
    let config = OverviewConfig {
        top_finishers: top,
        ..Default::default()
    };
    let document = match render_race_overview(&race, &qualy, &style, &config) {
        Ok(document) => document,
        Err(PitwallError::EmptyQualifyingResult) => {
            println!("No qualifying laps found!");
            return Ok(());
        }
        Err(e) => return Err(e),
    };

    fs::write(output, document).map_err(|e| PitwallError::ChartWriteError { source: e })?;
    println!("Wrote {:?}", output);
    Ok(())
}

fn run(cli: &Args) -> Result<(), PitwallError> {
    let mut store = open_store(&cli.data_dir)?;
    match &cli.command {
        Commands::Import { input } => import(&mut store, input),
        Commands::Qualifying {
            year,
            event,
            output,
        } => qualifying(&store, *year, event, output),
        Commands::Race {
            year,
            event,
            output,
            top,
        } => race(&store, *year, event, output, *top),
    }
}

fn main() {
    colog::init();

    let cli = Args::parse();
    if let Err(e) = run(&cli) {
        // Recoverable conditions are handled in the subcommands; anything
        // reaching here is surfaced as a single analytics-unavailable outcome
        let outcome = match e {
            e @ PitwallError::AnalyticsUnavailable { .. } => e,
            other => PitwallError::AnalyticsUnavailable {
                reason: other.to_string(),
            },
        };
        warn!("{}", outcome);
        eprintln!("{}", outcome);
        std::process::exit(1);
    }
}
