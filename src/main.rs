use crate::processes::{balance::*, report::*};
use clap::{Parser, Subcommand};
use log::error;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Evenly redistributes priority-pending jobs for a pipeline stage across
    /// the two billing accounts, moving newest jobs off the fuller account.
    Balance(BalanceArgs),
    /// Prints per-account pending-job counts for a pipeline stage without
    /// touching the queue.
    Report(ReportArgs),
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Cli::parse();

    let result = match args.command {
        Commands::Balance(cmd_args) => balance_process(&cmd_args),
        Commands::Report(cmd_args) => report_process(&cmd_args),
    };

    if let Err(e) = result {
        error!("{e}");
        std::process::exit(1);
    }
}

mod processes;

pub(crate) mod error;
pub(crate) mod queue;
pub(crate) mod slurm;
