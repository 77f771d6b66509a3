//! Tripgraph CLI: load a JSON-lines trips file and run analytics on it

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use comfy_table::{ContentArrangement, Table};
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;
use tripgraph::{EngineConfig, PathOutcome, QueryFacade, RankResult};

#[derive(Parser)]
#[command(name = "tripgraph", version, about = "Trip graph analytics: PageRank and shortest paths")]
struct Cli {
    /// YAML engine configuration
    #[arg(long, global = true, env = "TRIPGRAPH_CONFIG")]
    config: Option<PathBuf>,

    /// Output format
    #[arg(long, default_value = "table", global = true)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, clap::ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank locations by PageRank
    Rank {
        /// JSON-lines file of trip records
        #[arg(long)]
        trips: PathBuf,

        /// Projection name (defaults to the configured one)
        #[arg(long)]
        projection: Option<String>,

        /// Number of locations to return
        #[arg(long)]
        limit: Option<usize>,

        #[arg(long)]
        damping: Option<f64>,

        #[arg(long)]
        max_iterations: Option<usize>,

        #[arg(long)]
        tolerance: Option<f64>,

        /// Abort the computation after this many milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,
    },
    /// Fewest-hop route between two locations, trips read in both directions
    Path {
        /// JSON-lines file of trip records
        #[arg(long)]
        trips: PathBuf,

        start: String,

        end: String,
    },
    /// Location and trip counts
    Stats {
        /// JSON-lines file of trip records
        #[arg(long)]
        trips: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = match &cli.config {
        Some(path) => EngineConfig::from_yaml_file(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => EngineConfig::default(),
    };

    match cli.command {
        Commands::Rank {
            trips,
            projection,
            limit,
            damping,
            max_iterations,
            tolerance,
            timeout_ms,
        } => {
            if let Some(d) = damping {
                config.pagerank.damping_factor = d;
            }
            if let Some(n) = max_iterations {
                config.pagerank.max_iterations = n;
            }
            if let Some(t) = tolerance {
                config.pagerank.tolerance = t;
            }
            let projection = projection.unwrap_or_else(|| config.default_projection.clone());
            let limit = limit.unwrap_or(config.default_limit);

            let facade = Arc::new(load_facade(config, &trips)?);
            let result = run_rank(facade, projection, limit, timeout_ms).await?;
            print_rank(&result, &cli.format)
        }
        Commands::Path { trips, start, end } => {
            let facade = load_facade(config, &trips)?;
            let outcome = facade.shortest_path(&start, &end)?;
            print_path(&outcome, &cli.format)
        }
        Commands::Stats { trips } => {
            let facade = load_facade(config, &trips)?;
            let stats = facade.stats();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&stats)?),
                OutputFormat::Table => {
                    println!("Locations: {}", stats.nodes);
                    println!("Trips:     {}", stats.edges);
                }
            }
            Ok(())
        }
    }
}

fn load_facade(config: EngineConfig, trips: &Path) -> anyhow::Result<QueryFacade> {
    let facade = QueryFacade::new(config)?;
    let file = File::open(trips).with_context(|| format!("opening {}", trips.display()))?;
    let stats = facade
        .load_trips(BufReader::new(file))
        .with_context(|| format!("reading {}", trips.display()))?;
    info!("Loaded {} trips from {}", stats.records, trips.display());
    Ok(facade)
}

async fn run_rank(
    facade: Arc<QueryFacade>,
    projection: String,
    limit: usize,
    timeout_ms: Option<u64>,
) -> anyhow::Result<RankResult> {
    let token = CancellationToken::new();
    let job_token = token.clone();
    let mut job = tokio::task::spawn_blocking(move || {
        facade.rank_cancellable(&projection, limit, &job_token)
    });

    let Some(ms) = timeout_ms else {
        return Ok(job.await??);
    };

    match tokio::time::timeout(Duration::from_millis(ms), &mut job).await {
        Ok(joined) => Ok(joined??),
        Err(_) => {
            token.cancel();
            // let the worker observe the token before reporting
            let _ = job.await;
            bail!("rank timed out after {} ms", ms)
        }
    }
}

fn print_rank(result: &RankResult, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(result)?);
        }
        OutputFormat::Table => {
            if result.is_empty() {
                println!("(no results)");
                return Ok(());
            }

            let mut table = Table::new();
            table.set_content_arrangement(ContentArrangement::Dynamic);
            table.set_header(vec!["#", "location", "score"]);
            for (i, entry) in result.entries.iter().enumerate() {
                table.add_row(vec![
                    (i + 1).to_string(),
                    entry.name.clone(),
                    format!("{:.6}", entry.score),
                ]);
            }

            println!("{}", table);
            if !result.converged {
                println!("(stopped after {} iterations without converging)", result.iterations);
            }
        }
    }
    Ok(())
}

fn print_path(outcome: &PathOutcome, format: &OutputFormat) -> anyhow::Result<()> {
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(outcome)?),
        OutputFormat::Table => match outcome {
            PathOutcome::Found(path) => {
                println!("{}", path.join(" -> "));
                println!("{} hop(s)", path.len().saturating_sub(1));
            }
            PathOutcome::NoPath => println!("no path found"),
        },
    }
    Ok(())
}
