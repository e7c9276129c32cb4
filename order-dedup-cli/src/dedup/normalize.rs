//! Table normalization: origin tagging, identifier derivation, row filtering

use crate::config::ProcessingConfig;
use crate::error::ProcessError;

use super::extract::{IdPattern, extract_from_numeric};
use super::table::{OrderId, Origin, Table, Value};

/// A table whose identifier column is populated on every row
#[derive(Debug, Clone)]
pub struct NormalizedTable {
    pub origin: Origin,
    pub table: Table,
    /// Identifier of each row, parallel to `table.rows`
    pub ids: Vec<OrderId>,
    /// Row count before rows without an identifier were dropped
    pub raw_row_count: usize,
}

impl NormalizedTable {
    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn dropped_rows(&self) -> usize {
        self.raw_row_count - self.table.len()
    }
}

/// Normalize one input sheet
///
/// Detail sheets have their identifier column rewritten in place; done
/// sheets get one synthesized as the first column from the summary text.
/// Rows without an identifier are dropped, all other cells pass through.
pub fn normalize(
    mut table: Table,
    origin: Origin,
    config: &ProcessingConfig,
) -> Result<NormalizedTable, ProcessError> {
    let raw_row_count = table.len();

    table.set_column(
        &config.origin_column,
        Value::String(origin.label(config).to_string()),
    );

    let ids = match origin {
        Origin::Detail => normalize_numeric_ids(&mut table, config)?,
        Origin::Done => synthesize_text_ids(&mut table, config)?,
    };

    let mut kept_rows = Vec::with_capacity(table.rows.len());
    let mut kept_ids = Vec::with_capacity(table.rows.len());
    for (row, id) in table.rows.into_iter().zip(ids) {
        if let Some(id) = id {
            kept_rows.push(row);
            kept_ids.push(id);
        }
    }
    table.rows = kept_rows;

    let normalized = NormalizedTable {
        origin,
        table,
        ids: kept_ids,
        raw_row_count,
    };

    log::debug!(
        "Normalized sheet '{}': {} rows kept, {} without identifier dropped",
        normalized.table.name,
        normalized.len(),
        normalized.dropped_rows()
    );

    Ok(normalized)
}

fn normalize_numeric_ids(
    table: &mut Table,
    config: &ProcessingConfig,
) -> Result<Vec<Option<OrderId>>, ProcessError> {
    let col = table
        .column_index(&config.order_column)
        .ok_or_else(|| ProcessError::MissingColumn {
            sheet: table.name.clone(),
            column: config.order_column.clone(),
        })?;

    let mut ids = Vec::with_capacity(table.rows.len());
    for (idx, row) in table.rows.iter_mut().enumerate() {
        let id = extract_from_numeric(&row[col]).map_err(|e| ProcessError::Coercion {
            sheet: table.name.clone(),
            row: idx + 2,
            column: config.order_column.clone(),
            value: e.value,
        })?;

        row[col] = match &id {
            Some(id) => Value::String(id.to_string()),
            None => Value::Null,
        };
        ids.push(id);
    }

    Ok(ids)
}

fn synthesize_text_ids(
    table: &mut Table,
    config: &ProcessingConfig,
) -> Result<Vec<Option<OrderId>>, ProcessError> {
    let col = table
        .column_index(&config.summary_column)
        .ok_or_else(|| ProcessError::MissingColumn {
            sheet: table.name.clone(),
            column: config.summary_column.clone(),
        })?;

    let pattern = IdPattern::new(config.min_id_digits);
    let ids: Vec<Option<OrderId>> = table
        .rows
        .iter()
        .map(|row| pattern.extract_from_text(&row[col]))
        .collect();

    let values: Vec<Value> = ids
        .iter()
        .map(|id| match id {
            Some(id) => Value::String(id.to_string()),
            None => Value::Null,
        })
        .collect();

    match table.column_index(&config.order_column) {
        // Output of an earlier pass: the leading column already holds these identifiers
        Some(0) if table.rows.iter().zip(&values).all(|(row, v)| &row[0] == v) => {
            log::debug!(
                "Sheet '{}' already carries identifiers from '{}'",
                table.name,
                config.summary_column
            );
        }
        Some(_) => {
            return Err(ProcessError::DuplicateColumn {
                sheet: table.name.clone(),
                column: config.order_column.clone(),
            });
        }
        None => table.insert_column(0, config.order_column.clone(), values),
    }

    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    fn detail_table() -> Table {
        let mut table = Table::new(
            "明细",
            vec!["订单编号".to_string(), "金额".to_string()],
        );
        table.push_row(vec![Value::Float(100000000001.0), Value::Float(9.5)]);
        table.push_row(vec![Value::Null, Value::Float(1.0)]);
        table.push_row(vec![s("100000000002"), Value::Float(2.0)]);
        table
    }

    fn done_table() -> Table {
        let mut table = Table::new("已做单", vec!["记录摘要".to_string(), "备注".to_string()]);
        table.push_row(vec![s("单号100000000001已处理"), s("a")]);
        table.push_row(vec![s("金额123"), s("b")]);
        table.push_row(vec![Value::Null, s("c")]);
        table
    }

    #[test]
    fn test_detail_rewrites_in_place() {
        let config = ProcessingConfig::default();
        let normalized = normalize(detail_table(), Origin::Detail, &config).unwrap();

        assert_eq!(normalized.raw_row_count, 3);
        assert_eq!(normalized.len(), 2);
        assert_eq!(normalized.dropped_rows(), 1);
        assert_eq!(normalized.table.columns, vec!["订单编号", "金额", "来源"]);
        assert_eq!(normalized.table.rows[0][0], s("100000000001"));
        assert_eq!(normalized.table.rows[0][1], Value::Float(9.5));
        assert_eq!(normalized.table.rows[1][2], s("明细"));
        assert_eq!(
            normalized.ids,
            vec![
                OrderId::new("100000000001").unwrap(),
                OrderId::new("100000000002").unwrap()
            ]
        );
    }

    #[test]
    fn test_done_synthesizes_leading_column() {
        let config = ProcessingConfig::default();
        let normalized = normalize(done_table(), Origin::Done, &config).unwrap();

        assert_eq!(normalized.table.columns, vec!["订单编号", "记录摘要", "备注", "来源"]);
        assert_eq!(normalized.len(), 1);
        assert_eq!(normalized.table.rows[0][0], s("100000000001"));
        assert_eq!(normalized.table.rows[0][3], s("已做单"));
        assert_eq!(normalized.raw_row_count, 3);
    }

    #[test]
    fn test_done_rejects_existing_identifier_column() {
        let config = ProcessingConfig::default();
        let mut table = Table::new("已做单", vec!["记录摘要".to_string(), "订单编号".to_string()]);
        table.push_row(vec![s("单号100000000001"), s("stale")]);

        let err = normalize(table, Origin::Done, &config).unwrap_err();
        match err {
            ProcessError::DuplicateColumn { sheet, column } => {
                assert_eq!(sheet, "已做单");
                assert_eq!(column, "订单编号");
            }
            other => panic!("unexpected error: {other}"),
        }

        // leading position does not matter when the values differ
        let mut table = Table::new("已做单", vec!["订单编号".to_string(), "记录摘要".to_string()]);
        table.push_row(vec![s("999999999999"), s("单号100000000001")]);
        let err = normalize(table, Origin::Done, &config).unwrap_err();
        assert!(matches!(err, ProcessError::DuplicateColumn { .. }));
    }

    #[test]
    fn test_missing_columns() {
        let config = ProcessingConfig::default();

        let table = Table::new("明细", vec!["金额".to_string()]);
        let err = normalize(table, Origin::Detail, &config).unwrap_err();
        assert!(matches!(err, ProcessError::MissingColumn { ref column, .. } if column == "订单编号"));

        let table = Table::new("已做单", vec!["备注".to_string()]);
        let err = normalize(table, Origin::Done, &config).unwrap_err();
        assert!(matches!(err, ProcessError::MissingColumn { ref column, .. } if column == "记录摘要"));
    }

    #[test]
    fn test_coercion_failure_reports_row() {
        let config = ProcessingConfig::default();
        let mut table = detail_table();
        table.push_row(vec![s("not a number"), Value::Null]);

        let err = normalize(table, Origin::Detail, &config).unwrap_err();
        match err {
            ProcessError::Coercion { row, value, .. } => {
                assert_eq!(row, 5);
                assert_eq!(value, "not a number");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_renormalizing_is_noop() {
        let config = ProcessingConfig::default();

        let once = normalize(detail_table(), Origin::Detail, &config).unwrap();
        let twice = normalize(once.table.clone(), Origin::Detail, &config).unwrap();
        assert_eq!(once.table, twice.table);
        assert_eq!(once.ids, twice.ids);

        let once = normalize(done_table(), Origin::Done, &config).unwrap();
        let twice = normalize(once.table.clone(), Origin::Done, &config).unwrap();
        assert_eq!(once.table, twice.table);
        assert_eq!(once.ids, twice.ids);
    }
}
