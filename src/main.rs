mod cli;
mod shutdown;

use std::sync::Arc;

use carwash::config::Config;
use carwash::events::TracingSink;
use carwash::handlers::{default_addon_registry, default_wash_registry};
use carwash::observability::init_tracing;
use carwash::worker::Worker;
use carwash::{CancellationToken, CustomerId, Job, JobProcessor};
use clap::Parser;
use cli::{Cli, Commands, ProcessArgs};

type AnyError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[tokio::main]
async fn main() -> Result<(), AnyError> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => Config::load_from_path(path)?,
        None => Config::load()?,
    };
    init_tracing(&config.telemetry);

    match cli.command {
        Commands::Run(args) => {
            if args.max_jobs.is_some() {
                config.worker.max_jobs = args.max_jobs;
            }
            run(config).await?
        }
        Commands::Process(args) => process(config, args).await?,
        Commands::List => list(&config)?,
        Commands::Config => print!("{}", config.to_toml()?),
    }

    Ok(())
}

async fn run(config: Config) -> Result<(), AnyError> {
    let worker = Worker::new(config, Arc::new(TracingSink))?;
    let shutdown = CancellationToken::new();
    tokio::spawn(shutdown::cancel_on_signal(shutdown.clone()));

    worker.run(shutdown).await;
    Ok(())
}

async fn process(config: Config, args: ProcessArgs) -> Result<(), AnyError> {
    let job = Job::new(
        CustomerId::new(args.customer_id)?,
        args.make,
        args.wash,
        args.addons,
    );
    let processor = JobProcessor::with_default_handlers(&config.handlers, Arc::new(TracingSink))?;
    let cancel = CancellationToken::new();
    tokio::spawn(shutdown::cancel_on_signal(cancel.clone()));

    processor.process_job(&job, &cancel).await?;
    Ok(())
}

fn list(config: &Config) -> Result<(), AnyError> {
    let sink = Arc::new(TracingSink);
    let washes = default_wash_registry(config.handlers.wash_delay.as_duration(), sink.clone())?;
    let addons = default_addon_registry(config.handlers.addon_delay.as_duration(), sink)?;

    println!("Wash tiers:");
    for tier in washes.keys() {
        println!("  {tier}");
    }
    println!("Add-ons:");
    for addon in addons.keys() {
        println!("  {addon}");
    }
    Ok(())
}
