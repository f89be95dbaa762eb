mod display;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::{Args, Parser, Subcommand, ValueEnum};
use log::info;

use happy8_core::generator::{NumberSetGenerator, rng_from_seed};
use happy8_core::models::{Draw, Issue, NumberSet};
use happy8_core::paytable::Paytable;
use happy8_core::scoring::ScoringEngine;
use happy8_core::service::{DrawService, ServiceConfig};
use happy8_core::source::{CsvSource, DrawSource, FixtureSource, MockSource, import_csv};
use happy8_core::summary::HistorySummary;
use crate::display::{
    display_compound, display_draws, display_history, display_import_summary, display_number_sets,
    display_paytable, display_score, display_summary,
};

#[derive(Debug, Clone, Copy, ValueEnum, Default)]
pub enum SourceKind {
    #[default]
    Fixtures,
    Mock,
    Csv,
}

#[derive(Args)]
struct DrawArgs {
    /// Source des tirages
    #[arg(long, global = true, default_value = "fixtures")]
    source: SourceKind,

    /// Fichier CSV des tirages (avec --source csv)
    #[arg(long, global = true)]
    csv: Option<PathBuf>,

    /// Seed pour la reproductibilité (défaut : aléatoire, date du jour pour --source mock)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Ne pas retomber sur les tirages de secours si la source échoue
    #[arg(long, global = true)]
    strict: bool,
}

#[derive(Parser)]
#[command(name = "happy8", about = "Générateur et vérificateur de grilles Happy 8")]
struct Cli {
    #[command(flatten)]
    draws: DrawArgs,

    /// Barème JSON (défaut : barème officiel)
    #[arg(long, global = true)]
    paytable: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Lister les derniers tirages
    List {
        /// Nombre de tirages à afficher
        #[arg(short, long, default_value = "10")]
        last: usize,
    },

    /// Générer des grilles à partir d'un tirage
    Generate {
        /// Taille de la grille
        #[arg(short, long, default_value = "12")]
        pick: usize,

        /// Nombre de numéros gagnants repris du tirage (0 : grille libre pour le prochain tirage)
        #[arg(short, long, default_value = "8")]
        seeded: usize,

        /// Nombre de grilles
        #[arg(short, long, default_value = "3")]
        count: usize,

        /// Tirage de référence (défaut : le dernier)
        #[arg(short, long)]
        issue: Option<Issue>,
    },

    /// Comparer une grille avec un tirage
    Score {
        /// Numéros joués (1-80)
        #[arg(required = true)]
        numbers: Vec<u8>,

        /// Tirage à comparer (défaut : le dernier)
        #[arg(short, long)]
        issue: Option<Issue>,

        /// Jouer la grille en multiple (choix 1 à 10)
        #[arg(long)]
        play: Option<usize>,
    },

    /// Historique simulé : une grille par tirage, avec gains
    History {
        /// Nombre de tirages
        #[arg(short, long, default_value = "7")]
        last: usize,

        /// Taille de la grille
        #[arg(short, long, default_value = "10")]
        pick: usize,

        /// Nombre de numéros gagnants repris de chaque tirage
        #[arg(short, long, default_value = "6")]
        seeded: usize,

        /// Jouer chaque grille en multiple (choix 1 à 10)
        #[arg(long)]
        play: Option<usize>,
    },

    /// Afficher le barème des gains
    Paytable,

    /// Vérifier un fichier CSV de tirages
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long)]
        file: PathBuf,
    },
}

type Service = DrawService<Box<dyn DrawSource>>;

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();
    let paytable = load_paytable(cli.paytable.as_deref())?;
    let args = &cli.draws;

    match cli.command {
        Command::List { last } => cmd_list(&mut build_service(args)?, last),
        Command::Generate { pick, seeded, count, issue } => {
            cmd_generate(&mut build_service(args)?, pick, seeded, count, issue.as_ref(), args.seed)
        }
        Command::Score { numbers, issue, play } => {
            cmd_score(&mut build_service(args)?, &paytable, &numbers, issue.as_ref(), play)
        }
        Command::History { last, pick, seeded, play } => cmd_history(
            &mut build_service(args)?,
            &paytable,
            HistoryParams { last, pick, seeded, play },
            args.seed,
        ),
        Command::Paytable => {
            display_paytable(&paytable);
            Ok(())
        }
        Command::Import { file } => cmd_import(&file),
    }
}

/// Seed déterministe basé sur la date du jour (YYYYMMDD).
fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    today.year() as u64 * 10_000 + today.month() as u64 * 100 + today.day() as u64
}

fn load_paytable(path: Option<&Path>) -> Result<Paytable> {
    match path {
        Some(path) => Paytable::load(path)
            .with_context(|| format!("Impossible de charger le barème {:?}", path)),
        None => Ok(Paytable::default()),
    }
}

fn build_source(args: &DrawArgs) -> Result<Box<dyn DrawSource>> {
    let source: Box<dyn DrawSource> = match args.source {
        SourceKind::Fixtures => Box::new(FixtureSource),
        SourceKind::Mock => {
            // Numéro du jour : année + quantième sur 3 chiffres
            let today = chrono::Local::now().date_naive();
            let issue = Issue::from_number(today.year() as u64 * 1_000 + today.ordinal() as u64);
            Box::new(MockSource::new(args.seed.unwrap_or_else(date_seed), issue, today))
        }
        SourceKind::Csv => {
            let Some(path) = args.csv.clone() else {
                bail!("--csv est requis avec --source csv");
            };
            Box::new(CsvSource::new(path))
        }
    };
    Ok(source)
}

fn build_service(args: &DrawArgs) -> Result<Service> {
    let source = build_source(args)?;
    let config = ServiceConfig {
        fallback_to_fixtures: !args.strict,
        ..ServiceConfig::default()
    };
    info!("Source des tirages : {}", source.name());
    Ok(DrawService::new(source, config))
}

fn resolve_draw(service: &mut Service, issue: Option<&Issue>) -> Result<Draw> {
    match issue {
        Some(issue) => service
            .result_by_issue(issue)?
            .with_context(|| format!("Tirage {issue} introuvable")),
        None => Ok(service.latest_result()?),
    }
}

fn cmd_list(service: &mut Service, last: usize) -> Result<()> {
    let draws = service.latest_results(last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_generate(
    service: &mut Service,
    pick: usize,
    seeded: usize,
    count: usize,
    issue: Option<&Issue>,
    seed: Option<u64>,
) -> Result<()> {
    let draw = resolve_draw(service, issue)?;
    let mut rng = rng_from_seed(seed);

    let generator = if seeded == 0 {
        let next = Issue::from_number(draw.issue().value() + 1);
        NumberSetGenerator::new(None, pick, 0)?.for_issue(next)
    } else {
        NumberSetGenerator::new(Some(&draw), pick, seeded)?
    };

    let sets = generator.generate_many(count, &mut rng)?;
    display_number_sets(&sets, &draw);
    Ok(())
}

fn cmd_score(
    service: &mut Service,
    paytable: &Paytable,
    numbers: &[u8],
    issue: Option<&Issue>,
    play: Option<usize>,
) -> Result<()> {
    let draw = resolve_draw(service, issue)?;
    let engine = ScoringEngine::new(paytable);
    let set = NumberSet::new(numbers, Some(draw.issue().clone()))?;

    match play {
        Some(play) => {
            let score = engine.score_compound(&set, &draw, play)?;
            display_compound(&set, &draw, &score);
        }
        None => {
            if !paytable.supports(set.pick_size()) {
                println!("(Pas de grille de {} au barème, gain compté à 0)", set.pick_size());
            }
            let result = engine.score(&set, &draw);
            display_score(&set, &draw, &result);
        }
    }
    Ok(())
}

struct HistoryParams {
    last: usize,
    pick: usize,
    seeded: usize,
    play: Option<usize>,
}

fn cmd_history(service: &mut Service, paytable: &Paytable, params: HistoryParams, seed: Option<u64>) -> Result<()> {
    let HistoryParams { last, pick, seeded, play } = params;
    let draws = service.latest_results(last)?;
    if draws.is_empty() {
        println!("Aucun tirage disponible.");
        return Ok(());
    }

    let mut rng = rng_from_seed(seed);
    let mut history: Vec<(NumberSet, Draw)> = Vec::with_capacity(draws.len());
    for draw in draws {
        let set = NumberSetGenerator::new(Some(&draw), pick, seeded)?.generate(&mut rng)?;
        history.push((set, draw));
    }

    let engine = ScoringEngine::new(paytable);
    let mut rows = engine.backfill(&history);

    if let Some(play) = play {
        for (row, (set, draw)) in rows.iter_mut().zip(&history) {
            row.result.prize = engine.score_compound(set, draw, play)?.prize;
        }
    }

    display_history(&rows, play);
    display_summary(&HistorySummary::from_history(&rows));
    Ok(())
}

fn cmd_import(file: &Path) -> Result<()> {
    let result = import_csv(file).with_context(|| format!("Impossible de lire {:?}", file))?;
    display_import_summary(&result);
    display_draws(&result.draws[..result.draws.len().min(10)]);
    Ok(())
}
