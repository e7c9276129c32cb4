//! Output sheets and summary counts

use serde::Serialize;

use crate::config::ProcessingConfig;

use super::partition::Partition;
use super::table::{Origin, Table};

/// Row counts reported after a run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    /// Detail rows before rows without an identifier were dropped
    pub detail_rows: usize,
    /// Done rows before rows without an identifier were dropped
    pub done_rows: usize,
    pub duplicate_done_rows: usize,
    pub duplicate_detail_rows: usize,
    pub detail_unique_rows: usize,
    pub done_unique_rows: usize,
}

/// The three output sheets, in workbook order, plus summary counts
#[derive(Debug, Clone)]
pub struct Report {
    pub duplicates: Table,
    pub detail_unique: Table,
    pub done_unique: Table,
    pub summary: Summary,
}

impl Report {
    /// Output sheets in the order they are written
    pub fn sheets(&self) -> [&Table; 3] {
        [&self.duplicates, &self.detail_unique, &self.done_unique]
    }
}

/// Name the partitions as output sheets and count them
pub fn assemble(
    partition: Partition,
    detail_rows: usize,
    done_rows: usize,
    config: &ProcessingConfig,
) -> Report {
    let summary = Summary {
        detail_rows,
        done_rows,
        duplicate_done_rows: partition.duplicates_from(Origin::Done),
        duplicate_detail_rows: partition.duplicates_from(Origin::Detail),
        detail_unique_rows: partition.detail_unique.len(),
        done_unique_rows: partition.done_unique.len(),
    };

    let Partition {
        mut duplicates,
        mut detail_unique,
        mut done_unique,
        ..
    } = partition;

    duplicates.name = config.output.duplicates.clone();
    detail_unique.name = config.output.detail_unique.clone();
    done_unique.name = config.output.done_unique.clone();

    Report {
        duplicates,
        detail_unique,
        done_unique,
        summary,
    }
}
