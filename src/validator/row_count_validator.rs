// ==========================================
// Excel 迁移工具 - 行数校验
// ==========================================
// 职责: 写入行数 vs 目标表实际行数，逐表比对
// 约束: 每张表一次 COUNT 查询；不一致只是结果，不是错误
// ==========================================

use crate::domain::report::{RowCountCheck, ValidationSummary};
use crate::repository::error::StoreResult;
use crate::repository::table_store::TableStore;
use tracing::{info, warn};

pub struct RowCountValidator;

impl RowCountValidator {
    /// 逐表比对，结果顺序与 load_stats 一致
    pub fn validate(
        &self,
        store: &dyn TableStore,
        load_stats: &[(String, usize)],
    ) -> StoreResult<Vec<(String, RowCountCheck)>> {
        let mut checks = Vec::with_capacity(load_stats.len());

        for (table, expected) in load_stats {
            let actual = store.count_rows(table)?;
            let check = RowCountCheck::new(*expected as u64, actual);

            if check.matched {
                info!(table = %table, rows = actual, "行数一致");
            } else {
                warn!(table = %table, expected = check.expected, actual, "行数不一致");
            }
            checks.push((table.clone(), check));
        }

        Ok(checks)
    }

    /// 汇总逐表结果
    pub fn summarize(&self, checks: &[(String, RowCountCheck)]) -> ValidationSummary {
        ValidationSummary::from_checks(checks)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellValue;
    use crate::domain::grid::SheetGrid;
    use crate::repository::sqlite_table_store::{SqliteConnector, SqliteTableStore};

    fn store_with(tables: &[(&str, usize)]) -> SqliteTableStore {
        let mut store = SqliteConnector.open("sqlite://").unwrap();
        for (table, rows) in tables {
            let grid = SheetGrid::from_rows(
                vec!["id"],
                (0..*rows).map(|i| vec![CellValue::Integer(i as i64)]).collect(),
            );
            store.replace_table(table, &grid).unwrap();
        }
        store
    }

    #[test]
    fn test_all_tables_match() {
        let store = store_with(&[("customers", 2), ("orders", 3)]);
        let load_stats = vec![("customers".to_string(), 2), ("orders".to_string(), 3)];

        let checks = RowCountValidator.validate(&store, &load_stats).unwrap();
        assert_eq!(checks.len(), 2);
        assert!(checks.iter().all(|(_, c)| c.matched));

        let summary = RowCountValidator.summarize(&checks);
        assert_eq!(summary.total_tables, 2);
        assert_eq!(summary.matching_tables, 2);
        assert!(summary.all_match);
    }

    #[test]
    fn test_external_insert_is_reported_as_mismatch() {
        let store = store_with(&[("customers", 2), ("orders", 3)]);
        // 写入后被外部追加一行
        store
            .connection()
            .execute("INSERT INTO orders (id) VALUES (99)", [])
            .unwrap();
        let load_stats = vec![("customers".to_string(), 2), ("orders".to_string(), 3)];

        let checks = RowCountValidator.validate(&store, &load_stats).unwrap();
        assert_eq!(checks[1].0, "orders");
        assert_eq!(checks[1].1, RowCountCheck::new(3, 4));
        assert!(!checks[1].1.matched);

        let summary = RowCountValidator.summarize(&checks);
        assert_eq!(summary.matching_tables, 1);
        assert!(!summary.all_match);
    }

    #[test]
    fn test_demo_table_expected_three() {
        let store = store_with(&[("demo", 3)]);
        let checks = RowCountValidator
            .validate(&store, &[("demo".to_string(), 3)])
            .unwrap();

        assert_eq!(checks, vec![("demo".to_string(), RowCountCheck::new(3, 3))]);
        let summary = RowCountValidator.summarize(&checks);
        assert_eq!(
            summary,
            ValidationSummary {
                total_tables: 1,
                matching_tables: 1,
                all_match: true
            }
        );
    }

    #[test]
    fn test_demo_table_expected_five() {
        let store = store_with(&[("demo", 3)]);
        let checks = RowCountValidator
            .validate(&store, &[("demo".to_string(), 5)])
            .unwrap();

        assert_eq!(checks[0].1.expected, 5);
        assert_eq!(checks[0].1.actual, 3);
        assert!(!checks[0].1.matched);
        assert!(!RowCountValidator.summarize(&checks).all_match);
    }

    #[test]
    fn test_missing_table_is_error() {
        let store = store_with(&[]);
        let load_stats = vec![("ghost".to_string(), 1)];
        assert!(RowCountValidator.validate(&store, &load_stats).is_err());
    }
}
