use std::path::{Path, PathBuf};

use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing::{error, info};
use uuid::Uuid;

use invoice_bench::config::BenchmarkConfig;
use invoice_bench::constants::{AUTOMATED_RUN, BASELINE_RUN};
use invoice_bench::costs;
use invoice_bench::domain::Outcome;
use invoice_bench::generator;
use invoice_bench::ledger::{Ledger, RunRecord};
use invoice_bench::loader;
use invoice_bench::observability;
use invoice_bench::pipeline::{run_automated_pipeline, run_baseline_pipeline};
use invoice_bench::report;
use invoice_bench::rng::SimRng;

#[derive(Parser)]
#[command(name = "invoice_bench")]
#[command(about = "Invoice processing benchmark: manual baseline vs automated pipeline")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the benchmark configuration file
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a synthetic invoice corpus
    Generate {
        /// Directory the invoice files are written to
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Number of invoices to generate
        #[arg(long, default_value_t = 50)]
        count: usize,
        /// Fraction of invoices generated with an injected defect
        #[arg(long, default_value_t = 0.20)]
        monster_pct: f64,
    },
    /// Run both pipelines over the corpus and log every run to the ledger
    Benchmark {
        /// Directory holding the invoice corpus
        #[arg(long, default_value = "data")]
        data_dir: PathBuf,
        /// Ledger database path
        #[arg(long, default_value = "runs.db")]
        db: PathBuf,
        /// Override the configured random seed
        #[arg(long)]
        seed: Option<u64>,
        /// Override real-world hours represented per demo second
        #[arg(long)]
        scale: Option<f64>,
    },
    /// Render the markdown report from a previous benchmark
    Report {
        /// Ledger database path
        #[arg(long, default_value = "runs.db")]
        db: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging
    observability::init_logging();

    let cli = Cli::parse();
    let mut config = BenchmarkConfig::load_or_default(&cli.config)?;

    match cli.command {
        Commands::Generate {
            data_dir,
            count,
            monster_pct,
        } => {
            let mut rng = SimRng::new(config.run.seed);
            let written = generator::generate_corpus(&data_dir, count, monster_pct, &mut rng)?;
            println!(
                "📄 Generated {} invoices in '{}'",
                written,
                data_dir.display()
            );
        }
        Commands::Benchmark {
            data_dir,
            db,
            seed,
            scale,
        } => {
            if let Some(seed) = seed {
                config.run.seed = Some(seed);
            }
            if let Some(scale) = scale {
                config.run.real_hours_per_demo_second = scale;
            }
            if let Err(e) = observability::metrics::init() {
                error!("Metrics init failed: {}", e);
            }
            run_benchmark(&config, &data_dir, &db).await?;
        }
        Commands::Report { db } => {
            let ledger = Ledger::open_at_path(&db)?;
            let runs = ledger.fetch_runs()?;
            let report = report::summarize(&runs);
            println!("{}", report.render_markdown());
        }
    }
    Ok(())
}

async fn run_benchmark(
    config: &BenchmarkConfig,
    data_dir: &Path,
    db: &Path,
) -> anyhow::Result<()> {
    let invoices = loader::list_invoices(data_dir)?;
    if invoices.is_empty() {
        println!(
            "⚠️  No invoices found in '{}'. Run `invoice_bench generate` first.",
            data_dir.display()
        );
        return Ok(());
    }

    let ledger = Ledger::open_at_path(db)?;

    // One stream for the whole benchmark: reseeding happens here, once,
    // never mid-run.
    let mut rng = SimRng::new(config.run.seed);
    info!(
        invoices = invoices.len(),
        seed = ?config.run.seed,
        "starting benchmark"
    );

    println!("\n🔄 Running BASELINE process for {} invoices...", invoices.len());
    for path in &invoices {
        let ts_start = Utc::now();
        let outcome = run_baseline_pipeline(path, config, &mut rng).await;
        record_run(&ledger, BASELINE_RUN, &outcome, ts_start, config)?;
    }

    println!("\n🤖 Running AUTOMATED process for {} invoices...", invoices.len());
    for path in &invoices {
        let ts_start = Utc::now();
        let outcome = run_automated_pipeline(path, config, &mut rng).await;
        record_run(&ledger, AUTOMATED_RUN, &outcome, ts_start, config)?;
    }

    println!("\n✅ Benchmark complete. Generating report...");
    let runs = ledger.fetch_runs()?;
    let report = report::summarize(&runs);
    println!("{}", report.render_markdown());

    if std::env::var("INVOICE_BENCH_DUMP_METRICS").is_ok() {
        if let Some(text) = observability::metrics::render() {
            println!("{text}");
        }
    }
    Ok(())
}

fn record_run(
    ledger: &Ledger,
    run_type: &str,
    outcome: &Outcome,
    ts_start: chrono::DateTime<Utc>,
    config: &BenchmarkConfig,
) -> anyhow::Result<()> {
    let cost = costs::cost_for_run(run_type, outcome.duration_secs, &config.costs);

    match (&outcome.error_type, &outcome.error_details) {
        (Some(kind), Some(detail)) => {
            info!(run_type, invoice_id = %outcome.invoice_id, error_type = %kind, "{}", detail);
            observability::metrics::runs::failure(run_type, kind.as_str());
        }
        _ => {
            observability::metrics::runs::success(run_type);
        }
    }
    observability::metrics::runs::cycle_time(run_type, outcome.duration_secs);
    observability::metrics::runs::cost(run_type, cost);

    ledger.log_run(&RunRecord {
        run_id: Uuid::new_v4().to_string(),
        run_type: run_type.to_string(),
        invoice_id: outcome.invoice_id.clone(),
        ts_start,
        ts_end: Utc::now(),
        cycle_time_s: outcome.duration_secs,
        cost_usd: cost,
        status: outcome.status.as_str().to_string(),
        error_details: outcome.error_details.clone(),
        error_type: outcome.error_type.map(|kind| kind.as_str().to_string()),
        merkle_root: outcome.merkle_root.clone(),
    })?;
    Ok(())
}
