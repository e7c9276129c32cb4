//! Duplicate detection across the two normalized sheets

use std::collections::{HashMap, HashSet};

use super::normalize::NormalizedTable;
use super::table::{OrderId, Origin, Table, Value};

/// Rows split by whether their identifier appears on both sheets
#[derive(Debug, Clone)]
pub struct Partition {
    /// Identifiers present on both sheets, in first-appearance order on the detail sheet
    pub common: Vec<OrderId>,
    pub duplicates: Table,
    /// Origin of each duplicate row, parallel to `duplicates.rows`
    pub duplicate_origins: Vec<Origin>,
    pub detail_unique: Table,
    pub done_unique: Table,
}

impl Partition {
    pub fn duplicates_from(&self, origin: Origin) -> usize {
        self.duplicate_origins
            .iter()
            .filter(|o| **o == origin)
            .count()
    }
}

/// Identifiers present on both sheets
///
/// Ordered by first appearance on the detail sheet so output is reproducible.
pub fn common_ids(detail: &NormalizedTable, done: &NormalizedTable) -> Vec<OrderId> {
    let done_ids: HashSet<&OrderId> = done.ids.iter().collect();
    let mut seen = HashSet::new();

    detail
        .ids
        .iter()
        .filter(|id| done_ids.contains(id) && seen.insert(*id))
        .cloned()
        .collect()
}

/// Split both sheets given the identifiers they share
///
/// Each common identifier contributes its done rows followed by its detail
/// rows. The duplicate sheet carries the done columns followed by any
/// detail-only columns, with blanks where a row lacks a column.
pub fn partition_by(
    detail: &NormalizedTable,
    done: &NormalizedTable,
    common: Vec<OrderId>,
) -> Partition {
    let common_set: HashSet<&OrderId> = common.iter().collect();

    let mut columns = done.table.columns.clone();
    for column in &detail.table.columns {
        if !columns.contains(column) {
            columns.push(column.clone());
        }
    }

    let done_groups = group_rows(done, &common_set);
    let detail_groups = group_rows(detail, &common_set);
    let done_map = done.table.column_map(&columns);
    let detail_map = detail.table.column_map(&columns);

    let mut duplicates = Table::new(String::new(), columns);
    let mut duplicate_origins = Vec::new();

    for id in &common {
        let groups = [
            (done, &done_map, done_groups.get(id)),
            (detail, &detail_map, detail_groups.get(id)),
        ];
        for (source, map, rows) in groups {
            for &row in rows.into_iter().flatten() {
                duplicates.push_row(project(&source.table.rows[row], map));
                duplicate_origins.push(source.origin);
            }
        }
    }

    let detail_unique = unique_rows(detail, &common_set);
    let done_unique = unique_rows(done, &common_set);

    let partition = Partition {
        common,
        duplicates,
        duplicate_origins,
        detail_unique,
        done_unique,
    };

    log::info!(
        "Found {} common order ids: {} duplicate rows, {} detail-only, {} done-only",
        partition.common.len(),
        partition.duplicates.len(),
        partition.detail_unique.len(),
        partition.done_unique.len()
    );

    partition
}

/// Row indices of each common identifier, in table order
fn group_rows<'a>(
    table: &'a NormalizedTable,
    common: &HashSet<&OrderId>,
) -> HashMap<&'a OrderId, Vec<usize>> {
    let mut groups: HashMap<&OrderId, Vec<usize>> = HashMap::new();
    for (idx, id) in table.ids.iter().enumerate() {
        if common.contains(id) {
            groups.entry(id).or_default().push(idx);
        }
    }
    groups
}

fn unique_rows(table: &NormalizedTable, common: &HashSet<&OrderId>) -> Table {
    let mut unique = table.table.empty_like();
    unique.rows = table
        .table
        .rows
        .iter()
        .zip(&table.ids)
        .filter(|(_, id)| !common.contains(id))
        .map(|(row, _)| row.clone())
        .collect();
    unique
}

fn project(row: &[Value], map: &[Option<usize>]) -> Vec<Value> {
    map.iter()
        .map(|col| col.map(|c| row[c].clone()).unwrap_or(Value::Null))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProcessingConfig;
    use crate::dedup::normalize::normalize;

    fn partition(detail: &NormalizedTable, done: &NormalizedTable) -> Partition {
        partition_by(detail, done, common_ids(detail, done))
    }

    fn s(v: &str) -> Value {
        Value::String(v.to_string())
    }

    fn detail(ids: &[f64]) -> NormalizedTable {
        let mut table = Table::new("明细", vec!["订单编号".to_string(), "商品".to_string()]);
        for (i, id) in ids.iter().enumerate() {
            table.push_row(vec![Value::Float(*id), s(&format!("item{i}"))]);
        }
        normalize(table, Origin::Detail, &ProcessingConfig::default()).unwrap()
    }

    fn done(summaries: &[&str]) -> NormalizedTable {
        let mut table = Table::new("已做单", vec!["记录摘要".to_string()]);
        for summary in summaries {
            table.push_row(vec![s(summary)]);
        }
        normalize(table, Origin::Done, &ProcessingConfig::default()).unwrap()
    }

    fn ids_of(table: &Table) -> Vec<String> {
        table.rows.iter().map(|r| r[0].to_string()).collect()
    }

    #[test]
    fn test_scenario_single_match() {
        let detail = detail(&[100000000001.0]);
        let done = done(&["订单100000000002已完成", "单号100000000001已处理"]);

        let p = partition(&detail, &done);

        assert_eq!(p.common, vec![OrderId::new("100000000001").unwrap()]);
        assert_eq!(p.duplicates.len(), 2);
        assert_eq!(p.duplicate_origins, vec![Origin::Done, Origin::Detail]);
        assert_eq!(p.duplicates_from(Origin::Done), 1);
        assert_eq!(p.duplicates_from(Origin::Detail), 1);
        assert!(p.detail_unique.is_empty());
        assert_eq!(ids_of(&p.done_unique), vec!["100000000002"]);
    }

    #[test]
    fn test_duplicate_columns_are_union() {
        let detail = detail(&[100000000001.0]);
        let done = done(&["单号100000000001"]);

        let p = partition(&detail, &done);

        assert_eq!(p.duplicates.columns, vec!["订单编号", "记录摘要", "来源", "商品"]);
        // done row has no 商品, detail row has no 记录摘要
        assert_eq!(p.duplicates.rows[0][3], Value::Null);
        assert_eq!(p.duplicates.rows[1][1], Value::Null);
        assert_eq!(p.duplicates.rows[0][2], s("已做单"));
        assert_eq!(p.duplicates.rows[1][2], s("明细"));
        assert_eq!(p.duplicates.rows[1][3], s("item0"));
    }

    #[test]
    fn test_no_common_keeps_duplicate_shape() {
        let detail = detail(&[100000000001.0, 100000000003.0]);
        let done = done(&[]);

        let p = partition(&detail, &done);

        assert!(p.common.is_empty());
        assert!(p.duplicates.is_empty());
        assert_eq!(p.duplicates.columns, vec!["订单编号", "记录摘要", "来源", "商品"]);
        assert!(p.done_unique.is_empty());
        assert_eq!(p.detail_unique, detail.table);
    }

    #[test]
    fn test_groups_follow_detail_order() {
        let detail = detail(&[300000000003.0, 100000000001.0, 300000000003.0, 200000000002.0]);
        let done = done(&[
            "100000000001",
            "300000000003 a",
            "300000000003 b",
            "999999999999",
        ]);

        let p = partition(&detail, &done);

        assert_eq!(
            ids_of(&p.duplicates),
            vec![
                "300000000003",
                "300000000003",
                "300000000003",
                "300000000003",
                "100000000001",
                "100000000001",
            ]
        );
        assert_eq!(
            p.duplicate_origins,
            vec![
                Origin::Done,
                Origin::Done,
                Origin::Detail,
                Origin::Detail,
                Origin::Done,
                Origin::Detail,
            ]
        );
        assert_eq!(p.duplicates.rows[0][1], s("300000000003 a"));
        assert_eq!(ids_of(&p.detail_unique), vec!["200000000002"]);
        assert_eq!(ids_of(&p.done_unique), vec!["999999999999"]);
    }

    #[test]
    fn test_every_row_lands_in_exactly_one_partition() {
        let detail = detail(&[1.0, 100000000001.0, 100000000001.0, 5.0]);
        let done = done(&["100000000001", "000000000001x", "5", "100000000009"]);

        let p = partition(&detail, &done);
        let common: HashSet<String> = p.common.iter().map(|id| id.to_string()).collect();

        assert_eq!(
            p.duplicates.len(),
            p.duplicates_from(Origin::Detail) + p.duplicates_from(Origin::Done)
        );
        assert_eq!(
            p.detail_unique.len() + p.duplicates_from(Origin::Detail),
            detail.len()
        );
        assert_eq!(p.done_unique.len() + p.duplicates_from(Origin::Done), done.len());

        for row in &p.detail_unique.rows {
            assert!(!common.contains(&row[0].to_string()));
        }
        for row in &p.duplicates.rows {
            assert!(common.contains(&row[0].to_string()));
        }
    }
}
