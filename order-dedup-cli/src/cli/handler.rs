//! Process command handler

use anyhow::{Context, Result};
use colored::*;
use is_terminal::IsTerminal;
use std::fs;
use std::path::PathBuf;

use super::helpers::{is_supported_workbook, try_open_file};
use super::{Cli, SummaryFormat};
use crate::config::ProcessingConfig;
use crate::dedup::{Checkpoint, NoProgress, ProgressSink, Summary};
use crate::excel::{self, CONTENT_TYPE, DEFAULT_OUTPUT_NAME};
use crate::pipeline;

/// Prints checkpoints to stderr
struct TerminalProgress;

impl ProgressSink for TerminalProgress {
    fn checkpoint(&mut self, checkpoint: Checkpoint) {
        log::debug!("Checkpoint {:?} reached", checkpoint);
        eprintln!(
            "[{:>3}%] {}",
            checkpoint.percent(),
            checkpoint.message().dimmed()
        );
    }
}

/// Handle one processing run from the command line
pub fn handle_process_command(args: Cli) -> Result<()> {
    if args.no_color || !std::io::stdout().is_terminal() {
        colored::control::set_override(false);
    }

    if !args.input.exists() {
        anyhow::bail!("Input file does not exist: {}", args.input.display());
    }
    if !is_supported_workbook(&args.input) {
        anyhow::bail!(
            "Unsupported file type: {} (expected .xlsx or .xls)",
            args.input.display()
        );
    }

    let config = ProcessingConfig::load(args.config.as_deref())?;

    let input = excel::read_input_workbook(&args.input, &config)?;
    let mut progress: Box<dyn ProgressSink> = if args.quiet {
        Box::new(NoProgress)
    } else {
        Box::new(TerminalProgress)
    };
    let outcome = pipeline::run(input, &config, progress.as_mut())?;

    let output_path = args
        .output
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_OUTPUT_NAME));
    fs::write(&output_path, &outcome.artifact)
        .with_context(|| format!("Failed to write output to: {}", output_path.display()))?;
    log::info!(
        "Wrote {} ({} bytes, {})",
        output_path.display(),
        outcome.artifact.len(),
        CONTENT_TYPE
    );

    match args.format {
        SummaryFormat::Text => {
            println!("{}", "处理完成！".bright_green().bold());
            println!("{}", format_summary(outcome.summary()));
            println!(
                "结果文件: {}",
                output_path.display().to_string().bright_green()
            );
        }
        SummaryFormat::Json => {
            let json = serde_json::json!({
                "output": output_path.display().to_string(),
                "content_type": CONTENT_TYPE,
                "summary": outcome.summary(),
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&json).context("Failed to format JSON output")?
            );
        }
    }

    if args.open {
        try_open_file(&output_path);
    }

    Ok(())
}

/// Render the statistics block shown after a run
pub fn format_summary(summary: &Summary) -> String {
    let lines = [
        ("原明细总行数", summary.detail_rows),
        ("原已做单总行数", summary.done_rows),
        ("重复订单中的已做单行数", summary.duplicate_done_rows),
        ("重复订单中的明细行数", summary.duplicate_detail_rows),
        ("明细非重复数量", summary.detail_unique_rows),
        ("已做单非重复数量", summary.done_unique_rows),
    ];

    let mut out = String::from("========== 统计信息 ==========");
    for (label, count) in lines {
        out.push('\n');
        out.push_str(&format!("{}: {}", label, count.to_string().cyan()));
    }
    out
}
