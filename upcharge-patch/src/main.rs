//! upcharge-patch: catering combo upcharge correction
//!
//! ```ignore
//! upcharge-patch establishments
//! upcharge-patch run --establishment 12 --establishment 40
//! upcharge-patch run --name "Main Street"
//! upcharge-patch run --all --max-workers 4
//! ```

use catalog_client::NetworkCatalogClient;
use clap::{Args, Parser, Subcommand};
use shared::EstablishmentId;
use std::path::PathBuf;
use std::sync::Arc;
use upcharge_patch::utils::init_logger;
use upcharge_patch::{Config, EstablishmentDirectory, Pipeline, Progress};

#[derive(Parser)]
#[command(name = "upcharge-patch", version, about = "Align catering combo upcharges with item prices")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List establishments (id and name), ordered by name
    Establishments,
    /// Collect catering items, patch drifted upcharges and write CSV reports
    Run(RunArgs),
}

#[derive(Args)]
struct RunArgs {
    /// Establishment id to process (repeatable)
    #[arg(short = 'e', long = "establishment", value_name = "ID")]
    establishments: Vec<EstablishmentId>,

    /// Establishment name to process (repeatable)
    #[arg(short = 'n', long = "name", value_name = "NAME")]
    names: Vec<String>,

    /// Process every establishment in the catalog
    #[arg(long, conflicts_with_all = ["establishments", "names"])]
    all: bool,

    /// Establishments collected concurrently (overrides MAX_WORKERS)
    #[arg(long)]
    max_workers: Option<usize>,

    /// Artifact directory (overrides OUTPUT_DIR)
    #[arg(long)]
    output_dir: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    init_logger(&config.log_level, config.log_dir.as_deref());

    let client = Arc::new(NetworkCatalogClient::new(&config.client_config())?);

    match cli.command {
        Command::Establishments => {
            let directory = EstablishmentDirectory::fetch(client.as_ref()).await?;
            for (name, id) in directory.iter() {
                println!("{id}\t{name}");
            }
        }
        Command::Run(args) => {
            if let Some(max_workers) = args.max_workers {
                config.max_workers = max_workers;
            }
            if let Some(output_dir) = args.output_dir.clone() {
                config.output_dir = output_dir;
            }

            let establishments = select_establishments(client.as_ref(), &args).await?;
            if establishments.is_empty() {
                anyhow::bail!("no establishments selected; pass --establishment, --name or --all");
            }

            let (progress, mut events) = Progress::channel();
            let printer = tokio::spawn(async move {
                while let Some(event) = events.recv().await {
                    println!("{event}");
                }
            });

            let pipeline = Pipeline::with_progress(client, config.pipeline_settings(), progress);
            let result = pipeline.run(&establishments).await;
            drop(pipeline);
            printer.await?;

            let summary = result?;
            tracing::info!(
                collected = summary.collected,
                needing_patch = summary.needing_patch,
                patched = summary.report.success_count(),
                failed = summary.report.failure_count(),
                failed_establishments = summary.failed_establishments.len(),
                "Run finished"
            );
        }
    }

    Ok(())
}

/// Turn the run arguments into establishment ids, printing the selection
async fn select_establishments(
    client: &NetworkCatalogClient,
    args: &RunArgs,
) -> anyhow::Result<Vec<EstablishmentId>> {
    if !args.all && args.names.is_empty() {
        for id in &args.establishments {
            println!("Est {id}");
        }
        return Ok(args.establishments.clone());
    }

    let directory = EstablishmentDirectory::fetch(client).await?;
    let mut selected = args.establishments.clone();

    if args.all {
        selected.extend(directory.all_ids());
    } else {
        let (ids, unknown) = directory.resolve_names(&args.names);
        for name in &unknown {
            tracing::warn!(name = %name, "Unknown establishment name skipped");
            eprintln!("Unknown establishment: {name}");
        }
        selected.extend(ids);
    }

    let mut seen = std::collections::HashSet::new();
    selected.retain(|id| seen.insert(*id));

    for id in &selected {
        match directory.name_of(*id) {
            Some(name) => println!("Est {id}: {name}"),
            None => println!("Est {id}"),
        }
    }
    Ok(selected)
}
