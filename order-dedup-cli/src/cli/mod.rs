//! Command-line front end: argument parsing and the process command

mod handler;
mod helpers;

pub use handler::handle_process_command;

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;

/// Split an order ledger workbook into duplicate and unique orders
#[derive(Parser, Debug)]
#[command(name = "order-dedup-cli", version, about, long_about = None)]
pub struct Cli {
    /// Input workbook (.xlsx or .xls) with the detail and done sheets
    pub input: PathBuf,

    /// Where to write the result workbook [default: 处理结果.xlsx]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Config file overriding sheet and column names
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Summary output format
    #[arg(long, value_enum, default_value_t = SummaryFormat::Text)]
    pub format: SummaryFormat,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Do not print progress checkpoints
    #[arg(short, long)]
    pub quiet: bool,

    /// Open the result workbook when done
    #[arg(long)]
    pub open: bool,

    /// Increase log verbosity (-v info, -vv debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryFormat {
    /// Labelled statistics block
    Text,
    /// Pretty-printed JSON on stdout
    Json,
}

impl Cli {
    /// Default log filter for the requested verbosity
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 => "warn",
            1 => "info",
            _ => "debug",
        }
    }
}
