use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::Parser;

use hearts_bench::analytics::summarize;
use hearts_bench::config::{BenchmarkConfig, LoggingConfig, ResolvedOutputs};
use hearts_bench::logging::init_logging;
use hearts_bench::tournament::{TournamentRunner, read_records};

/// Tournament harness for Hearts strategies.
#[derive(Debug, Parser)]
#[command(
    name = "hearts-bench",
    author,
    version,
    about = "Deterministic Hearts tournament harness"
)]
struct Cli {
    /// Path to the YAML configuration file.
    #[arg(short, long, value_name = "FILE", default_value = "bench/bench.yaml")]
    config: PathBuf,

    /// Override the run identifier (substitutes {run_id} templates).
    #[arg(long, value_name = "RUN_ID")]
    run_id: Option<String>,

    /// Override the number of deals to play.
    #[arg(long, value_name = "DEALS")]
    deals: Option<usize>,

    /// Override the RNG seed for deal generation.
    #[arg(long, value_name = "SEED")]
    seed: Option<u64>,

    /// Exit after validating the configuration (no tournament is run).
    #[arg(long)]
    validate_only: bool,

    /// Summarise an existing games JSONL file instead of running a tournament.
    #[arg(long, value_name = "JSONL")]
    analyze: Option<PathBuf>,

    /// Baseline agent for --analyze; defaults to the first player of the first game.
    #[arg(long, value_name = "AGENT", requires = "analyze")]
    baseline: Option<String>,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(path) = cli.analyze.as_ref() {
        return analyze(path, cli.baseline);
    }

    let mut config = BenchmarkConfig::from_path(&cli.config)?;

    if let Some(run_id) = cli.run_id {
        config.run_id = run_id;
    }

    if let Some(deals) = cli.deals {
        config.games.deals = deals;
    }

    if let Some(seed) = cli.seed {
        config.games.seed = Some(seed);
    }

    config.validate()?;

    let outputs: ResolvedOutputs = config.resolved_outputs();
    let run_id = config.run_id.clone();
    let deals = config.games.deals;
    let rotations = config.games.rotations();
    let agents = config
        .agents
        .iter()
        .map(|agent| format!("{} ({})", agent.name, agent.kind))
        .collect::<Vec<_>>()
        .join(", ");

    println!(
        "Loaded configuration '{run_id}': {agents}; {deals} deal{} × {rotations} rotation{}",
        if deals == 1 { "" } else { "s" },
        if rotations == 1 { "" } else { "s" },
    );

    let logging_guard = init_logging(&config.logging, &outputs)?;
    let runner = TournamentRunner::new(config, outputs)?;

    if cli.validate_only {
        println!("Validation-only mode: tournament execution skipped.");
        return Ok(());
    }

    let summary = runner.run()?;
    println!(
        "Tournament complete for '{run_id}': {} games in {:.1}s → {}",
        summary.games_played,
        summary.elapsed.as_secs_f64(),
        summary.jsonl_path.display()
    );
    println!();
    print!("{}", summary.analytics.to_markdown());
    println!();
    println!("Summary table: {}", summary.summary_path.display());
    if let Some(guard) = logging_guard.as_ref() {
        println!("Telemetry log: {}", guard.telemetry_path.display());
    }

    Ok(())
}

fn analyze(path: &Path, baseline: Option<String>) -> anyhow::Result<()> {
    let _ = init_logging(
        &LoggingConfig::default(),
        &ResolvedOutputs {
            jsonl: path.to_path_buf(),
            summary_md: path.to_path_buf(),
        },
    )?;

    let records =
        read_records(path).with_context(|| format!("reading games from {}", path.display()))?;
    let baseline = baseline.or_else(|| {
        records
            .first()
            .map(|record| record.game.players[0].name.clone())
    });
    let summary = summarize(records.iter().map(|record| &record.game), baseline)
        .with_context(|| format!("summarising {}", path.display()))?;

    println!("{} records from {}", records.len(), path.display());
    println!();
    print!("{}", summary.to_markdown());
    Ok(())
}
