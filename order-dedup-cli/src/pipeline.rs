//! One end-to-end processing run
//!
//! The caller loads the input sheets, supplies a progress sink and gets
//! back either the finished workbook with its summary or the reason the
//! run failed. Nothing is written to disk here.

use crate::config::ProcessingConfig;
use crate::dedup::{self, Checkpoint, InputTables, ProgressSink, Report, Summary};
use crate::error::ProcessError;
use crate::excel;

/// Result of a successful run
#[derive(Debug, Clone)]
pub struct Outcome {
    pub report: Report,
    /// Rendered `.xlsx` bytes
    pub artifact: Vec<u8>,
}

impl Outcome {
    pub fn summary(&self) -> &Summary {
        &self.report.summary
    }
}

/// Process both sheets and render the output workbook
pub fn run(
    input: InputTables,
    config: &ProcessingConfig,
    progress: &mut dyn ProgressSink,
) -> Result<Outcome, ProcessError> {
    let report = dedup::process(input, config, progress)?;
    let artifact = excel::write_report(&report)?;
    progress.checkpoint(Checkpoint::ArtifactAssembled);

    Ok(Outcome { report, artifact })
}
