mod commands;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use chrono::Utc;
use clap::{Parser, Subcommand};
use jewelflow::logging::{self, LogFormat};
use jewelflow::{ConfigError, JewelflowError, JobKind, JobStore};
use rust_decimal::Decimal;

use commands::jobs::{AddArgs, ListArgs};
use commands::Output;

#[derive(Parser)]
#[command(author, version, about = "Front desk job tracker for a jewelry studio", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (default: ~/.jewelflow/config.json when present)
    #[arg(long, global = true, env = "JEWELFLOW_CONFIG")]
    config: Option<PathBuf>,

    /// Jobs file to use instead of the configured one
    #[arg(long, global = true)]
    data: Option<PathBuf>,

    /// Print JSON instead of text
    #[arg(long, global = true)]
    json: bool,

    /// Log line format on stderr
    #[arg(long, global = true, default_value_t = LogFormat::Text)]
    log_format: LogFormat,
}

#[derive(Subcommand)]
enum Commands {
    /// Take in a new custom or repair job
    Add(AddArgs),
    /// Move a job to its next stage
    Advance {
        id: String,
    },
    /// Record a payment toward a job's balance
    Pay {
        id: String,
        amount: Decimal,
    },
    /// Show every field of one job
    Show {
        id: String,
    },
    /// List jobs, oldest first
    List(ListArgs),
    /// Counts, money totals and stage pipelines
    Summary {
        #[arg(long)]
        kind: Option<JobKind>,
    },
    /// Jobs that still owe money, largest balance first
    Outstanding,
    /// Pieces waiting for pickup with money still due
    Ready,
    /// Open jobs past their due date
    Overdue,
    /// Open jobs per team member
    Workload,
    /// Copy all jobs to another CSV file
    Export {
        path: PathBuf,
    },
    /// Remove every job
    Reset {
        /// Put the demo jobs back afterwards
        #[arg(long)]
        seed: bool,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = logging::init(cli.log_format, "warn") {
        eprintln!("warning: logging unavailable: {}", e);
    }

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {:#}", e);
            ExitCode::from(exit_code(&e))
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let (config, mut store) =
        JobStore::open_configured(cli.config.as_deref(), cli.data.as_deref())?;
    let out = Output::new(cli.json, config.currency_symbol.clone());
    log::debug!("Using {} jobs", store.len());

    let today = Utc::now().date_naive();
    let text = match cli.command {
        Commands::Add(args) => commands::jobs::add(&mut store, args, &out)?,
        Commands::Advance { id } => commands::jobs::advance(&mut store, &id, &out)?,
        Commands::Pay { id, amount } => commands::jobs::pay(&mut store, &id, amount, &out)?,
        Commands::Show { id } => commands::jobs::show(&store, &id, &out)?,
        Commands::List(args) => commands::jobs::list(&store, &args, &out)?,
        Commands::Summary { kind } => commands::reports::summary(&store, kind, today, &out)?,
        Commands::Outstanding => commands::reports::outstanding(&store, &out)?,
        Commands::Ready => commands::reports::ready(&store, &out)?,
        Commands::Overdue => commands::reports::overdue(&store, today, &out)?,
        Commands::Workload => commands::reports::workload(&store, &out)?,
        Commands::Export { path } => commands::data::export(&store, &path, &out)?,
        Commands::Reset { seed } => commands::data::reset(&mut store, seed, &out)?,
    };

    print!("{}", text);
    if out.json {
        println!();
    }
    Ok(())
}

/// 2 for configuration problems, 1 for everything else.
fn exit_code(err: &anyhow::Error) -> u8 {
    let config_failure = matches!(
        err.downcast_ref::<JewelflowError>(),
        Some(JewelflowError::Config(_))
    ) || err.chain().any(|cause| cause.is::<ConfigError>());
    if config_failure {
        2
    } else {
        1
    }
}
