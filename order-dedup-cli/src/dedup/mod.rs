//! Order deduplication core
//!
//! Pure functions over in-memory tables: normalize both sheets, find the
//! identifiers they share, split rows into duplicate and unique sets and
//! count the result. Reading and writing workbooks lives in `excel`.

pub mod extract;
pub mod normalize;
pub mod partition;
pub mod report;
pub mod table;

pub use normalize::normalize;
pub use report::{Report, Summary, assemble};
pub use table::{Origin, Table, Value};

use crate::config::ProcessingConfig;
use crate::error::ProcessError;

/// The two input sheets of a run
#[derive(Debug, Clone)]
pub struct InputTables {
    pub detail: Table,
    pub done: Table,
}

/// Progress points reported during a run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Checkpoint {
    NormalizationStarted,
    Normalized,
    Intersected,
    Partitioned,
    ArtifactAssembled,
}

impl Checkpoint {
    pub fn percent(self) -> u8 {
        match self {
            Checkpoint::NormalizationStarted => 20,
            Checkpoint::Normalized => 40,
            Checkpoint::Intersected => 60,
            Checkpoint::Partitioned => 80,
            Checkpoint::ArtifactAssembled => 100,
        }
    }

    pub fn message(self) -> &'static str {
        match self {
            Checkpoint::NormalizationStarted => "正在处理数据...",
            Checkpoint::Normalized => "数据标准化完成",
            Checkpoint::Intersected => "重复订单查找完成",
            Checkpoint::Partitioned => "订单拆分完成",
            Checkpoint::ArtifactAssembled => "结果文件已生成",
        }
    }
}

/// Receives checkpoints as a run progresses
pub trait ProgressSink {
    fn checkpoint(&mut self, checkpoint: Checkpoint);
}

/// Sink that ignores all progress
#[derive(Debug, Default, Clone, Copy)]
pub struct NoProgress;

impl ProgressSink for NoProgress {
    fn checkpoint(&mut self, _checkpoint: Checkpoint) {}
}

impl ProgressSink for Vec<Checkpoint> {
    fn checkpoint(&mut self, checkpoint: Checkpoint) {
        self.push(checkpoint);
    }
}

/// Normalize, intersect, partition and count one pair of sheets
pub fn process(
    input: InputTables,
    config: &ProcessingConfig,
    progress: &mut dyn ProgressSink,
) -> Result<Report, ProcessError> {
    progress.checkpoint(Checkpoint::NormalizationStarted);
    let detail = normalize(input.detail, Origin::Detail, config)?;
    let done = normalize(input.done, Origin::Done, config)?;
    progress.checkpoint(Checkpoint::Normalized);

    let common = partition::common_ids(&detail, &done);
    log::debug!("{} order ids appear on both sheets", common.len());
    progress.checkpoint(Checkpoint::Intersected);

    let split = partition::partition_by(&detail, &done, common);
    progress.checkpoint(Checkpoint::Partitioned);

    Ok(assemble(
        split,
        detail.raw_row_count,
        done.raw_row_count,
        config,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    fn detail_sheet(ids: &[Value]) -> Table {
        let mut table = Table::new("明细", vec!["订单编号".to_string(), "金额".to_string()]);
        for id in ids {
            table.push_row(vec![id.clone(), Value::Float(10.0)]);
        }
        table
    }

    fn done_sheet(summaries: &[&str]) -> Table {
        let mut table = Table::new("已做单", vec!["日期".to_string(), "记录摘要".to_string()]);
        for summary in summaries {
            table.push_row(vec![Value::DateTime(45292.0), s(summary)]);
        }
        table
    }

    #[test]
    fn test_process_reports_checkpoints_in_order() {
        let input = InputTables {
            detail: detail_sheet(&[Value::Float(100000000001.0)]),
            done: done_sheet(&["单号100000000001已处理"]),
        };
        let mut progress: Vec<Checkpoint> = Vec::new();

        process(input, &ProcessingConfig::default(), &mut progress).unwrap();

        let percents: Vec<u8> = progress.iter().map(|c| c.percent()).collect();
        assert_eq!(percents, vec![20, 40, 60, 80]);
    }

    #[test]
    fn test_scenario_float_stored_detail_matches_text_summary() {
        let input = InputTables {
            detail: detail_sheet(&[Value::Float(100000000001.0)]),
            done: done_sheet(&["订单100000000002已完成", "单号100000000001已处理"]),
        };

        let report = process(input, &ProcessingConfig::default(), &mut NoProgress).unwrap();

        assert_eq!(report.duplicates.len(), 2);
        assert_eq!(report.summary.duplicate_done_rows, 1);
        assert_eq!(report.summary.duplicate_detail_rows, 1);
        assert_eq!(report.summary.detail_unique_rows, 0);
        assert_eq!(report.summary.done_unique_rows, 1);
        assert_eq!(report.done_unique.rows[0][0], s("100000000002"));
    }

    #[test]
    fn test_scenario_empty_done_sheet() {
        let input = InputTables {
            detail: detail_sheet(&[
                Value::Float(100000000001.0),
                s("100000000002"),
                Value::Null,
            ]),
            done: done_sheet(&[]),
        };

        let report = process(input, &ProcessingConfig::default(), &mut NoProgress).unwrap();

        assert!(report.duplicates.is_empty());
        assert!(report.done_unique.is_empty());
        assert_eq!(report.detail_unique.len(), 2);
        assert_eq!(
            report.summary,
            Summary {
                detail_rows: 3,
                done_rows: 0,
                duplicate_done_rows: 0,
                duplicate_detail_rows: 0,
                detail_unique_rows: 2,
                done_unique_rows: 0,
            }
        );
    }

    #[test]
    fn test_every_output_row_has_identifier() {
        let input = InputTables {
            detail: detail_sheet(&[Value::Null, s(""), s("NaN"), Value::Float(100000000001.0)]),
            done: done_sheet(&["", "short 123", "100000000001", "no id"]),
        };

        let report = process(input, &ProcessingConfig::default(), &mut NoProgress).unwrap();

        for sheet in report.sheets() {
            let col = sheet.column_index("订单编号").unwrap();
            for row in &sheet.rows {
                match &row[col] {
                    Value::String(id) => assert!(!id.is_empty()),
                    other => panic!("identifier cell is not text: {other:?}"),
                }
            }
        }
        assert_eq!(report.duplicates.len(), 2);
    }

    #[test]
    fn test_missing_column_aborts_run() {
        let mut done = Table::new("已做单", vec!["备注".to_string()]);
        done.push_row(vec![s("x")]);
        let input = InputTables {
            detail: detail_sheet(&[Value::Float(1.0)]),
            done,
        };
        let mut progress: Vec<Checkpoint> = Vec::new();

        let err = process(input, &ProcessingConfig::default(), &mut progress).unwrap_err();

        assert!(matches!(err, ProcessError::MissingColumn { .. }));
        assert_eq!(progress, vec![Checkpoint::NormalizationStarted]);
    }
}
