// ==========================================
// Excel 迁移工具 - 表头规范化
// ==========================================
// 规则: 去首尾空白 → 小写 → 空格/连字符替换为下划线
// 纯字符串函数，幂等
// ==========================================

use crate::domain::grid::{GridColumn, SheetGrid};

/// 规范化单个表头
pub fn normalize_header(name: &str) -> String {
    name.trim().to_lowercase().replace([' ', '-'], "_")
}

/// 规范化表格全部表头，行数据不变
pub fn normalize_headers(grid: &SheetGrid) -> SheetGrid {
    let columns = grid
        .columns()
        .iter()
        .map(|c| GridColumn {
            name: normalize_header(&c.name),
            column_type: c.column_type,
        })
        .collect();

    SheetGrid::new(columns, grid.rows().to_vec())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::cell::CellValue;

    #[test]
    fn test_normalize_header() {
        assert_eq!(normalize_header("Customer ID"), "customer_id");
        assert_eq!(normalize_header("  Order-Date "), "order_date");
        assert_eq!(normalize_header("Unit Price - EUR"), "unit_price___eur");
        assert_eq!(normalize_header("email"), "email");
    }

    #[test]
    fn test_normalize_header_idempotent() {
        for raw in ["Customer ID", " A-b C ", "already_normal", "Unnamed: 3", "ÄPFEL Menge"] {
            let once = normalize_header(raw);
            assert_eq!(normalize_header(&once), once, "not idempotent for {raw:?}");
        }
    }

    #[test]
    fn test_normalize_headers_keeps_rows() {
        let grid = SheetGrid::from_rows(
            vec!["Customer ID", "Name"],
            vec![vec![CellValue::Integer(1), CellValue::from("a")]],
        );
        let normalized = normalize_headers(&grid);

        assert_eq!(normalized.column_names(), vec!["customer_id", "name"]);
        assert_eq!(normalized.rows(), grid.rows());
    }
}
