mod config;
mod connection;
mod registry;

use std::path::PathBuf;
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use schemars::schema_for;
use thiserror::Error;

use shopseed_core::{SeedConfig, SeedError, build_phase_graph_report};
use shopseed_generate::{RunState, SeedFailure, SeedReport, Seeder};
use shopseed_store::{MemoryStore, PgStore, Store};

use config::{ConfigError, load_config, write_default_config};
use connection::ConnectionArgs;
use registry::{RunContext, init_run_logging, init_stderr_logging, start_run, write_report};

#[derive(Debug, Error)]
enum CliError {
    #[error("registry error: {0}")]
    Registry(#[from] registry::RegistryError),
    #[error("config error: {0}")]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Seed(#[from] SeedError),
    #[error("seeding failed: {0}")]
    Failed(#[from] SeedFailure),
    #[error("invalid connection: {0}")]
    Connection(#[from] sqlx::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
}

#[derive(Parser, Debug)]
#[command(name = "shopseed", version, about = "Seed an e-commerce database with coherent fake data")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate and insert every phase.
    Run(RunArgs),
    /// Print the phase execution order.
    Plan(PlanArgs),
    /// Print the JSON schema of the config file.
    ConfigSchema,
    /// Write the default config file.
    InitConfig(InitConfigArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    #[command(flatten)]
    connection: ConnectionArgs,
    /// TOML config file; defaults apply when omitted.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Overrides the config's seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Output directory for runs.
    #[arg(long, default_value = "runs")]
    run_dir: PathBuf,
    /// Seed an in-memory store instead of the database.
    #[arg(long, default_value_t = false)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Print the full graph report as JSON.
    #[arg(long, default_value_t = false)]
    json: bool,
}

#[derive(Args, Debug)]
struct InitConfigArgs {
    #[arg(long, default_value = "shopseed.toml")]
    out: PathBuf,
    /// Overwrite an existing file.
    #[arg(long, default_value_t = false)]
    force: bool,
}

#[tokio::main]
async fn main() -> Result<(), CliError> {
    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run_seed(args).await,
        Command::Plan(args) => plan(args),
        Command::ConfigSchema => {
            let schema = schema_for!(SeedConfig);
            println!("{}", serde_json::to_string_pretty(&schema)?);
            Ok(())
        }
        Command::InitConfig(args) => {
            write_default_config(&args.out, args.force)?;
            println!("wrote {}", args.out.display());
            Ok(())
        }
    }
}

async fn run_seed(args: RunArgs) -> Result<(), CliError> {
    let RunArgs {
        connection,
        config,
        seed,
        run_dir,
        dry_run,
    } = args;

    let mut seed_config = load_config(config.as_deref())?;
    if seed.is_some() {
        seed_config.seed = seed;
    }
    let seeder = Seeder::new(seed_config)?;

    let (store, redacted): (Box<dyn Store>, _) = if dry_run {
        let store: Box<dyn Store> = Box::new(MemoryStore::new().with_storefront_rules());
        (store, None)
    } else {
        let options = connection.connect_options()?;
        // The pool keeps retrying a connection until this elapses, so it
        // bounds each readiness probe.
        let acquire_timeout = seeder
            .config()
            .readiness
            .delay()
            .max(Duration::from_secs(1));
        let store: Box<dyn Store> = Box::new(PgStore::connect_lazy(options, acquire_timeout));
        (store, Some(connection.redacted()?))
    };

    let ctx = RunContext {
        run_id: seeder.run_id().to_string(),
        started_at: chrono::Utc::now(),
        engine: store.engine().to_string(),
        dry_run,
        seed: seeder.seed(),
        config: seeder.config().clone(),
        connection: redacted,
        run_dir,
    };
    let paths = start_run(&ctx)?;
    init_run_logging(&paths.logs_path)?;

    tracing::info!(
        event = "run_started",
        run_id = %ctx.run_id,
        engine = %ctx.engine,
        dry_run,
        seed = ctx.seed,
        run_path = %paths.root.display(),
        connection = ctx.connection.as_ref().map(|c| c.redacted.as_str()).unwrap_or("memory"),
    );

    match seeder.run(store.as_ref()).await {
        Ok(outcome) => {
            write_report(&paths, &outcome.report)?;
            tracing::info!(event = "report_written", path = %paths.report_path.display());
            print_summary(&outcome.report);
            Ok(())
        }
        Err(failure) => {
            write_report(&paths, &failure.report)?;
            tracing::info!(event = "report_written", path = %paths.report_path.display());
            print_summary(&failure.report);
            Err(failure.into())
        }
    }
}

fn plan(args: PlanArgs) -> Result<(), CliError> {
    init_stderr_logging()?;
    let seeder = Seeder::new(SeedConfig::default())?;
    let nodes = seeder.nodes();
    let report = build_phase_graph_report(&nodes);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    match (&report.order, &report.cycle) {
        (Some(order), _) => {
            for (index, entity) in order.iter().enumerate() {
                let after: Vec<String> = nodes
                    .iter()
                    .filter(|node| node.entity == *entity)
                    .flat_map(|node| node.prerequisites())
                    .map(|prerequisite| prerequisite.to_string())
                    .collect();
                if after.is_empty() {
                    println!("{:>2}. {entity}", index + 1);
                } else {
                    println!("{:>2}. {entity} <- {}", index + 1, after.join(", "));
                }
            }
            Ok(())
        }
        (None, Some(cycle)) => Err(SeedError::CyclicDependencies(cycle.clone()).into()),
        (None, None) => Err(SeedError::InvalidConfig("phase graph has no order".to_string()).into()),
    }
}

fn print_summary(report: &SeedReport) {
    let state = match report.state {
        RunState::Completed => "completed",
        _ => "failed",
    };
    println!(
        "{state}: run {} seed {} inserted {} skipped {} in {}ms",
        report.run_id,
        report.seed,
        report.rows_inserted_total,
        report.rows_skipped_total,
        report.duration_ms
    );
}
