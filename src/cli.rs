use carwash::{Addon, CarMake, WashTier};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "carwash")]
#[command(about = "Car wash job processor", long_about = None)]
pub struct Cli {
    /// Configuration file (defaults to $CARWASH_CONFIG or config/carwash.toml)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the worker loop, generating and processing random jobs
    Run(RunArgs),
    /// Process a single job and exit
    Process(ProcessArgs),
    /// List registered wash tiers and add-ons
    List,
    /// Print the effective configuration as TOML
    Config,
}

#[derive(clap::Args, Debug)]
pub struct RunArgs {
    /// Stop after this many jobs
    #[arg(long)]
    pub max_jobs: Option<u64>,
}

#[derive(clap::Args, Debug)]
pub struct ProcessArgs {
    #[arg(long)]
    pub customer_id: u64,

    #[arg(long, default_value = "Ford")]
    pub make: CarMake,

    #[arg(long)]
    pub wash: WashTier,

    /// Add-on to perform; repeat for several
    #[arg(long = "addon")]
    pub addons: Vec<Addon>,
}
