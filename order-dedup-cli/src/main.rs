mod cli;
mod config;
mod dedup;
mod error;
mod excel;
mod pipeline;

use clap::Parser;
use colored::*;

use cli::Cli;

fn main() {
    let args = Cli::parse();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(args.log_filter()))
        .format_timestamp(None)
        .init();

    if let Err(e) = cli::handle_process_command(args) {
        log::error!("Run failed: {:?}", e);
        eprintln!("{}", format!("处理失败：{:#}", e).red());
        std::process::exit(1);
    }
}
