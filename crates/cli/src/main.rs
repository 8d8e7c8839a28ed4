//! dtbench: seed and benchmark a partitioned downtime collection.
//!
//! Three workflows against one collection:
//!
//! - `seed` recreates the collection and populates it with per-team records
//! - `bench` runs the raw and typed query paths over the current dataset
//! - `run` does both for a guaranteed-fresh comparison

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use docstore::{DocumentStore, MemoryStore, RestStore};
use dtbench::{BenchReport, CollectionProvisioner, Config, DocumentSeeder, QueryBenchmark};
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "dtbench")]
#[command(about = "Seed and benchmark a partitioned downtime collection")]
#[command(version)]
struct Cli {
  /// Path to the config file (default: ./dtbench.toml, then the user config dir)
  #[arg(short, long, global = true)]
  config: Option<PathBuf>,

  /// Run against an in-process store instead of the configured endpoint
  #[arg(long, global = true)]
  memory: bool,

  /// Enable verbose logging
  #[arg(short, long, global = true)]
  verbose: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Recreate the collection and seed partitioned records
  Seed {
    /// Number of partitions to seed (default: from config)
    #[arg(short, long)]
    partitions: Option<usize>,
  },
  /// Run both query paths against whatever data is currently present
  Bench {
    /// Team id to aggregate
    #[arg(short, long, default_value = "Team01")]
    team: String,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
  },
  /// Seed then benchmark in one invocation (guaranteed-fresh dataset)
  Run {
    /// Number of partitions to seed (default: from config)
    #[arg(short, long)]
    partitions: Option<usize>,
    /// Team id to aggregate
    #[arg(short, long, default_value = "Team01")]
    team: String,
    /// Print the report as JSON
    #[arg(long)]
    json: bool,
  },
}

#[tokio::main]
async fn main() -> Result<()> {
  let cli = Cli::parse();
  init_logging(cli.verbose);

  let config = Config::load(cli.config.as_deref())?;
  let store: Box<dyn DocumentStore> = if cli.memory {
    Box::new(MemoryStore::new())
  } else {
    Box::new(RestStore::new(
      &config.store.endpoint,
      &config.store.access_key,
      &config.store.database,
    )?)
  };

  match cli.command {
    Commands::Seed { partitions } => {
      cmd_seed(&*store, &config, partitions).await?;
    }
    Commands::Bench { team, json } => {
      cmd_bench(&*store, &config, &team, json).await?;
    }
    Commands::Run { partitions, team, json } => {
      cmd_seed(&*store, &config, partitions).await?;
      cmd_bench(&*store, &config, &team, json).await?;
    }
  }

  Ok(())
}

fn init_logging(verbose: bool) {
  let filter = if verbose {
    EnvFilter::new("debug")
  } else {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
  };
  tracing_subscriber::fmt().with_env_filter(filter).init();
}

async fn cmd_seed(store: &dyn DocumentStore, config: &Config, partitions: Option<usize>) -> Result<()> {
  let partitions = partitions.unwrap_or(config.seed.partitions);
  // An empty configured path means an unpartitioned collection
  let path = config.collection.partition_key_path.as_str();
  let path = (!path.is_empty()).then_some(path);

  let provisioner = CollectionProvisioner::new(store);
  provisioner
    .reset(&config.collection.name, path, config.collection.throughput_units)
    .await?;

  let seeder = DocumentSeeder::new(store, &config.collection.name);
  let inserted = seeder.seed(partitions).await?;
  info!(partitions, inserted, "seeded");
  Ok(())
}

async fn cmd_bench(store: &dyn DocumentStore, config: &Config, team: &str, json: bool) -> Result<()> {
  let benchmark = QueryBenchmark::new(store, &config.collection.name);
  let outcome = benchmark.run(team).await?;
  let report = BenchReport::new(&config.collection.name, outcome);
  if json {
    println!("{}", report.to_json()?);
  } else {
    print!("{}", report.render());
  }
  Ok(())
}
