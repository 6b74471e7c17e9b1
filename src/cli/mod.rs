use anyhow::Result;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::process::ExitCode;

use mzfingerprint::params::ChargeFilterStage;
use mzfingerprint::schema::TableKind;

mod config;
mod inspect;
mod run;

/// mzfingerprint - MALDI peak to DDA PSM spatial mass fingerprinting
#[derive(Parser)]
#[command(name = "mzfingerprint")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Where the charge restriction is applied.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ChargeFilterArg {
    /// Remove excluded charges before choosing the best candidate
    PreMatch,
    /// Choose among all candidates, then drop excluded charges
    PostMatch,
}

impl From<ChargeFilterArg> for ChargeFilterStage {
    fn from(arg: ChargeFilterArg) -> Self {
        match arg {
            ChargeFilterArg::PreMatch => ChargeFilterStage::PreMatch,
            ChargeFilterArg::PostMatch => ChargeFilterStage::PostMatch,
        }
    }
}

/// Input table kind.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum TableKindArg {
    /// MALDI peak list
    Peaks,
    /// DDA PSM table
    Psms,
}

impl From<TableKindArg> for TableKind {
    fn from(arg: TableKindArg) -> Self {
        match arg {
            TableKindArg::Peaks => TableKind::Peaks,
            TableKindArg::Psms => TableKind::Psms,
        }
    }
}

/// Arguments of the run command
#[derive(Args, Debug)]
pub struct RunArgs {
    /// MALDI peak list (CSV/TSV)
    #[arg(value_name = "PEAKS")]
    pub peaks: PathBuf,

    /// DDA PSM table (CSV/TSV)
    #[arg(value_name = "PSMS")]
    pub psms: PathBuf,

    /// Output match table
    #[arg(short, long, value_name = "FILE", default_value = "fingerprinting_results.csv")]
    pub output: PathBuf,

    /// Load settings from a TOML config file
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Mass tolerance in ppm [default: 10]
    #[arg(long)]
    pub ppm: Option<f64>,

    /// Minimum confidence score, inclusive [default: 18]
    #[arg(long, value_name = "SCORE")]
    pub min_score: Option<f64>,

    /// Accepted charge states, comma separated; empty accepts any [default: 1,2]
    #[arg(long, value_name = "LIST")]
    pub charges: Option<String>,

    /// When the charge restriction is applied [default: pre-match]
    #[arg(long, value_enum)]
    pub charge_filter: Option<ChargeFilterArg>,

    /// Mass bin width in Da for identification counts [default: 10]
    #[arg(long, value_name = "DA")]
    pub mass_bin_width: Option<f64>,

    /// Number of mass error histogram bins [default: 50]
    #[arg(long, value_name = "N")]
    pub error_bins: Option<usize>,

    /// PSM column to use as the theoretical mass
    #[arg(long, value_name = "HEADER")]
    pub psm_mass_column: Option<String>,

    /// Also write summary and plot data as JSON
    #[arg(long, value_name = "FILE")]
    pub plot_data: Option<PathBuf>,

    /// Write the match table tab-delimited
    #[arg(long)]
    pub tab: bool,

    /// Match peaks on all cores (requires the parallel feature)
    #[arg(long)]
    pub parallel: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Match a peak list against a PSM table and export the results
    Run(RunArgs),

    /// Show how a table's header resolves and how many rows are valid
    Inspect {
        /// Input table
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Table kind
        #[arg(short, long, value_enum)]
        kind: TableKindArg,

        /// PSM column to use as the theoretical mass
        #[arg(long, value_name = "HEADER")]
        psm_mass_column: Option<String>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<ExitCode> {
    match cli.command {
        Commands::Run(args) => run::run(args),
        Commands::Inspect {
            file,
            kind,
            psm_mass_column,
        } => inspect::run(file, TableKind::from(kind), psm_mass_column).map(|()| ExitCode::SUCCESS),
    }
}
