// ==========================================
// Excel 迁移工具 - 单 sheet 清洗
// ==========================================
// 流程: 表头规范化 → 限定声明列 → 类型转换 → 剔除全空行 → 索引列校验
// 约定: 每个阶段产出新的表格，不原地修改
// ==========================================

use crate::config::pipeline_config::{DeclaredColumn, SheetConfig};
use crate::domain::cell::CellValue;
use crate::domain::grid::{GridColumn, SheetGrid};
use crate::domain::report::SheetStats;
use crate::engine::error::{TransformError, TransformResult};
use crate::engine::header_normalizer::normalize_headers;
use crate::engine::type_coercion::{coerce_value, is_coercion_anomaly};
use tracing::{debug, warn};

/// 单 sheet 清洗结果
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedSheet {
    pub sheet_name: String,
    pub grid: SheetGrid,
    pub stats: SheetStats,
}

/// 类型转换阶段的输出
#[derive(Debug, Clone, PartialEq)]
pub struct CoercionOutcome {
    pub grid: SheetGrid,
    /// (列名, 被置空的单元格数)，只含有异常的列
    pub anomalies: Vec<(String, usize)>,
}

impl CoercionOutcome {
    pub fn total_anomalies(&self) -> usize {
        self.anomalies.iter().map(|(_, n)| n).sum()
    }
}

// ==========================================
// SheetCleaner - 单 sheet 清洗器
// ==========================================
pub struct SheetCleaner;

impl SheetCleaner {
    /// 按 sheet 配置清洗原始表格
    ///
    /// # 错误
    /// - MissingColumns: 声明列不在规范化后的表头中
    /// - MissingIndexColumn: 索引列不在清洗后的表格中
    pub fn clean(&self, raw: &SheetGrid, config: &SheetConfig) -> TransformResult<CleanedSheet> {
        let sheet = config.sheet_name.as_str();

        // 1) 表头规范化
        let normalized = normalize_headers(raw);

        // 2) 限定声明列 + 类型转换
        let (typed, coerced_to_null) = if config.dtypes.is_empty() {
            (normalized, 0)
        } else {
            let restricted = restrict_to_declared(&normalized, sheet, &config.dtypes)?;
            let outcome = coerce_declared(&restricted);
            for (column, count) in &outcome.anomalies {
                warn!(sheet, column = %column, count, "类型转换失败的单元格已置空");
            }
            let total = outcome.total_anomalies();
            (outcome.grid, total)
        };

        // 3) 剔除全空行
        let (cleaned, blank_rows_dropped) = drop_blank_rows(&typed);

        // 4) 索引列校验
        if let Some(index_column) = &config.index_column {
            ensure_index_column(&cleaned, sheet, index_column)?;
        }

        // 5) 统计
        let stats = SheetStats {
            rows_clean: cleaned.row_count(),
            rows_raw: raw.row_count(),
            blank_rows_dropped,
            coerced_to_null,
        };

        debug!(
            sheet,
            rows_raw = stats.rows_raw,
            rows_clean = stats.rows_clean,
            blank_rows_dropped,
            coerced_to_null,
            "sheet 清洗完成"
        );

        Ok(CleanedSheet {
            sheet_name: config.sheet_name.clone(),
            grid: cleaned,
            stats,
        })
    }
}

/// 按声明顺序只保留声明列（多余列静默丢弃），并标注列类型
pub fn restrict_to_declared(
    grid: &SheetGrid,
    sheet: &str,
    declared: &[DeclaredColumn],
) -> TransformResult<SheetGrid> {
    let missing: Vec<String> = declared
        .iter()
        .filter(|d| !grid.has_column(&d.name))
        .map(|d| d.name.clone())
        .collect();

    if !missing.is_empty() {
        return Err(TransformError::MissingColumns {
            sheet: sheet.to_string(),
            missing,
        });
    }

    // 上面已确认全部存在
    let indices: Vec<usize> = declared
        .iter()
        .filter_map(|d| grid.column_index(&d.name))
        .collect();

    let columns = declared
        .iter()
        .map(|d| GridColumn::typed(d.name.clone(), d.column_type()))
        .collect();

    let rows = grid
        .rows()
        .iter()
        .map(|row| indices.iter().map(|&i| row[i].clone()).collect())
        .collect();

    Ok(SheetGrid::new(columns, rows))
}

/// 对带类型的列逐单元格转换，无类型列保持不变
pub fn coerce_declared(grid: &SheetGrid) -> CoercionOutcome {
    let columns = grid.columns();
    let mut anomaly_counts = vec![0usize; columns.len()];

    let rows = grid
        .rows()
        .iter()
        .map(|row| {
            row.iter()
                .zip(columns)
                .enumerate()
                .map(|(idx, (value, column))| match column.column_type {
                    Some(column_type) => {
                        let coerced = coerce_value(value, column_type);
                        if is_coercion_anomaly(value, &coerced) {
                            anomaly_counts[idx] += 1;
                        }
                        coerced
                    }
                    None => value.clone(),
                })
                .collect::<Vec<CellValue>>()
        })
        .collect();

    let anomalies = columns
        .iter()
        .zip(anomaly_counts)
        .filter(|(_, n)| *n > 0)
        .map(|(c, n)| (c.name.clone(), n))
        .collect();

    CoercionOutcome {
        grid: SheetGrid::new(columns.to_vec(), rows),
        anomalies,
    }
}

/// 剔除所有列都为 Null 的行（部分缺失保留），返回 (新表格, 剔除行数)
///
/// 只看 Null: 仅含空白文本的行保留
pub fn drop_blank_rows(grid: &SheetGrid) -> (SheetGrid, usize) {
    let kept: Vec<Vec<CellValue>> = grid
        .rows()
        .iter()
        .filter(|row| !row.iter().all(CellValue::is_null))
        .cloned()
        .collect();

    let dropped = grid.row_count() - kept.len();
    (SheetGrid::new(grid.columns().to_vec(), kept), dropped)
}

/// 索引列必须存在于清洗后的列中
pub fn ensure_index_column(grid: &SheetGrid, sheet: &str, index_column: &str) -> TransformResult<()> {
    if grid.has_column(index_column) {
        Ok(())
    } else {
        Err(TransformError::MissingIndexColumn {
            sheet: sheet.to_string(),
            column: index_column.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::types::ColumnType;

    fn customers_raw() -> SheetGrid {
        SheetGrid::from_rows(
            vec!["Customer ID", "Name", "Email"],
            vec![
                vec![CellValue::Integer(1), CellValue::from("Alice "), CellValue::Null],
                vec![
                    CellValue::Integer(2),
                    CellValue::from("Bob"),
                    CellValue::from("b@x.com"),
                ],
                vec![CellValue::Null, CellValue::Null, CellValue::Null],
            ],
        )
    }

    fn customers_config() -> SheetConfig {
        SheetConfig::new("customers")
            .with_index_column("customer_id")
            .with_dtype("customer_id", "int")
            .with_dtype("name", "string")
            .with_dtype("email", "string")
    }

    #[test]
    fn test_clean_customers_sheet() {
        let cleaned = SheetCleaner.clean(&customers_raw(), &customers_config()).unwrap();

        assert_eq!(cleaned.grid.column_names(), vec!["customer_id", "name", "email"]);
        assert_eq!(cleaned.grid.row_count(), 2);
        assert_eq!(cleaned.stats.rows_clean, 2);
        assert_eq!(cleaned.stats.rows_raw, 3);
        assert_eq!(cleaned.stats.blank_rows_dropped, 1);
        assert_eq!(cleaned.grid.rows()[0][1], CellValue::from("Alice"));
        assert_eq!(cleaned.grid.rows()[0][2], CellValue::Null);
        assert_eq!(
            cleaned.grid.columns()[0].column_type,
            Some(ColumnType::Integer)
        );
    }

    #[test]
    fn test_declared_order_and_extra_columns_dropped() {
        let raw = SheetGrid::from_rows(
            vec!["B", "Extra", "A"],
            vec![vec![
                CellValue::Integer(2),
                CellValue::from("x"),
                CellValue::Integer(1),
            ]],
        );
        let config = SheetConfig::new("s").with_dtype("a", "int").with_dtype("b", "int");

        let cleaned = SheetCleaner.clean(&raw, &config).unwrap();
        assert_eq!(cleaned.grid.column_names(), vec!["a", "b"]);
        assert_eq!(
            cleaned.grid.rows()[0],
            vec![CellValue::Integer(1), CellValue::Integer(2)]
        );
    }

    #[test]
    fn test_missing_declared_column_is_fatal() {
        let config = customers_config().with_dtype("phone", "string");
        let err = SheetCleaner.clean(&customers_raw(), &config).unwrap_err();

        match err {
            TransformError::MissingColumns { sheet, missing } => {
                assert_eq!(sheet, "customers");
                assert_eq!(missing, vec!["phone".to_string()]);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_missing_index_column_is_fatal() {
        let config = SheetConfig::new("customers")
            .with_index_column("id")
            .with_dtype("name", "string");
        let err = SheetCleaner.clean(&customers_raw(), &config).unwrap_err();
        assert!(matches!(
            err,
            TransformError::MissingIndexColumn { ref column, .. } if column == "id"
        ));
    }

    #[test]
    fn test_no_dtypes_keeps_all_normalized_columns() {
        let config = SheetConfig::new("customers").with_index_column("customer_id");
        let cleaned = SheetCleaner.clean(&customers_raw(), &config).unwrap();

        assert_eq!(cleaned.grid.column_names(), vec!["customer_id", "name", "email"]);
        // 未声明类型时值保持原样
        assert_eq!(cleaned.grid.rows()[0][1], CellValue::from("Alice "));
        assert_eq!(cleaned.stats.rows_clean, 2);
    }

    #[test]
    fn test_unparsable_cell_becomes_null_and_row_survives() {
        let raw = SheetGrid::from_rows(
            vec!["id", "amount"],
            vec![
                vec![CellValue::Integer(1), CellValue::from("12.5")],
                vec![CellValue::Integer(2), CellValue::from("oops")],
            ],
        );
        let config = SheetConfig::new("s")
            .with_dtype("id", "int")
            .with_dtype("amount", "float");

        let cleaned = SheetCleaner.clean(&raw, &config).unwrap();
        assert_eq!(cleaned.grid.row_count(), 2);
        assert_eq!(cleaned.grid.rows()[1][1], CellValue::Null);
        assert_eq!(cleaned.stats.coerced_to_null, 1);
    }

    #[test]
    fn test_row_blank_after_coercion_is_dropped() {
        let raw = SheetGrid::from_rows(
            vec!["n"],
            vec![vec![CellValue::from("bad")], vec![CellValue::from("3")]],
        );
        let config = SheetConfig::new("s").with_dtype("n", "integer");

        let cleaned = SheetCleaner.clean(&raw, &config).unwrap();
        assert_eq!(cleaned.grid.rows(), &[vec![CellValue::Integer(3)]]);
        assert_eq!(cleaned.stats.rows_clean, cleaned.grid.row_count());
    }

    #[test]
    fn test_unknown_tag_passes_through() {
        let raw = SheetGrid::from_rows(vec!["geo"], vec![vec![CellValue::from(" POINT(1 2) ")]]);
        let config = SheetConfig::new("s").with_dtype("geo", "geometry");

        let cleaned = SheetCleaner.clean(&raw, &config).unwrap();
        assert_eq!(cleaned.grid.rows()[0][0], CellValue::from(" POINT(1 2) "));
        assert_eq!(cleaned.grid.columns()[0].column_type, Some(ColumnType::Unknown));
    }

    #[test]
    fn test_partial_blank_rows_are_kept() {
        let grid = SheetGrid::from_rows(
            vec!["a", "b"],
            vec![
                vec![CellValue::Null, CellValue::from("x")],
                vec![CellValue::from("  "), CellValue::Null],
                vec![CellValue::Null, CellValue::Null],
            ],
        );
        let (kept, dropped) = drop_blank_rows(&grid);
        assert_eq!(kept.row_count(), 2);
        assert_eq!(dropped, 1);
    }

    #[test]
    fn test_whitespace_only_row_survives_without_dtypes() {
        let raw = SheetGrid::from_rows(
            vec!["Note"],
            vec![vec![CellValue::from("   ")], vec![CellValue::from("x")]],
        );

        let cleaned = SheetCleaner.clean(&raw, &SheetConfig::new("notes")).unwrap();
        assert_eq!(cleaned.stats.rows_clean, 2);
        assert_eq!(cleaned.stats.blank_rows_dropped, 0);
        assert_eq!(cleaned.grid.rows()[0][0], CellValue::from("   "));
    }

    #[test]
    fn test_whitespace_only_row_survives_string_coercion() {
        let raw = SheetGrid::from_rows(
            vec!["Note"],
            vec![vec![CellValue::from("   ")], vec![CellValue::Null]],
        );
        let config = SheetConfig::new("notes").with_dtype("note", "string");

        let cleaned = SheetCleaner.clean(&raw, &config).unwrap();
        assert_eq!(cleaned.grid.rows(), &[vec![CellValue::from("")]]);
        assert_eq!(cleaned.stats.blank_rows_dropped, 1);
        assert_eq!(cleaned.stats.coerced_to_null, 0);
    }
}
