// ==========================================
// Excel 迁移工具 - 表格数据 (Grid)
// ==========================================
// 职责: 原始表格 / 清洗后表格的统一表示
// 约定: 按列有序，行宽恒等于列数；构造后不可变
// ==========================================

use crate::domain::cell::CellValue;
use crate::domain::types::ColumnType;

/// 表格列
#[derive(Debug, Clone, PartialEq)]
pub struct GridColumn {
    pub name: String,
    /// 声明类型（原始表格与未声明列为 None）
    pub column_type: Option<ColumnType>,
}

impl GridColumn {
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: None,
        }
    }

    pub fn typed(name: impl Into<String>, column_type: ColumnType) -> Self {
        Self {
            name: name.into(),
            column_type: Some(column_type),
        }
    }
}

/// 表格：有序列 + 行
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetGrid {
    columns: Vec<GridColumn>,
    rows: Vec<Vec<CellValue>>,
}

impl SheetGrid {
    /// 构造表格，行宽不足补 Null，超出截断
    pub fn new(columns: Vec<GridColumn>, rows: Vec<Vec<CellValue>>) -> Self {
        let width = columns.len();
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(width, CellValue::Null);
                row
            })
            .collect();
        Self { columns, rows }
    }

    /// 以表头字符串构造无类型表格
    pub fn from_rows<S: Into<String>>(headers: Vec<S>, rows: Vec<Vec<CellValue>>) -> Self {
        let columns = headers.into_iter().map(GridColumn::untyped).collect();
        Self::new(columns, rows)
    }

    pub fn columns(&self) -> &[GridColumn] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<CellValue>] {
        &self.rows
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// 按列名查找第一个匹配列的下标
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// 某列全部值（按行顺序）
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &CellValue> + '_ {
        self.rows.iter().filter_map(move |row| row.get(index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rows_padded_and_truncated() {
        let grid = SheetGrid::from_rows(
            vec!["a", "b"],
            vec![
                vec![CellValue::Integer(1)],
                vec![
                    CellValue::Integer(1),
                    CellValue::Integer(2),
                    CellValue::Integer(3),
                ],
            ],
        );

        assert_eq!(grid.rows()[0], vec![CellValue::Integer(1), CellValue::Null]);
        assert_eq!(grid.rows()[1].len(), 2);
        assert_eq!(grid.column_count(), 2);
    }

    #[test]
    fn test_column_lookup() {
        let grid = SheetGrid::from_rows(vec!["id", "name"], vec![]);
        assert_eq!(grid.column_index("name"), Some(1));
        assert!(!grid.has_column("email"));
        assert_eq!(grid.column_names(), vec!["id", "name"]);
    }
}
