// ==========================================
// Excel 迁移工具 - Schema 描述
// ==========================================
// 职责: 将配置中的表结构渲染为可读文本（纯函数，无副作用）
// ==========================================

use crate::config::pipeline_config::SheetConfig;

/// 未配置索引列时的占位文本
pub const NO_INDEX_COLUMN: &str = "<none>";

/// 按配置顺序输出每张表: 表名 / 来源 sheet / 索引列 / 声明列及类型
pub fn describe_schema(sheets: &[SheetConfig]) -> String {
    let mut lines: Vec<String> = Vec::new();

    for sheet in sheets {
        lines.push(format!("Table: {}", sheet.table_name()));
        lines.push(format!("  Source sheet: {}", sheet.sheet_name));
        lines.push(format!(
            "  Index column: {}",
            sheet.index_column.as_deref().unwrap_or(NO_INDEX_COLUMN)
        ));

        if !sheet.dtypes.is_empty() {
            lines.push("  Columns:".to_string());
            for column in &sheet.dtypes {
                lines.push(format!("    - {}: {}", column.name, column.type_tag));
            }
        }
        lines.push(String::new());
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_schema() {
        let sheets = vec![
            SheetConfig::new("Customers")
                .with_table("customers")
                .with_index_column("customer_id")
                .with_dtype("customer_id", "int")
                .with_dtype("name", "string"),
            SheetConfig::new("Notes"),
        ];

        let expected = "Table: customers\n\
                        \x20 Source sheet: Customers\n\
                        \x20 Index column: customer_id\n\
                        \x20 Columns:\n\
                        \x20   - customer_id: int\n\
                        \x20   - name: string\n\
                        \n\
                        Table: Notes\n\
                        \x20 Source sheet: Notes\n\
                        \x20 Index column: <none>\n";

        assert_eq!(describe_schema(&sheets), expected);
    }

    #[test]
    fn test_describe_schema_is_deterministic() {
        let sheets = vec![SheetConfig::new("b"), SheetConfig::new("a")];
        let first = describe_schema(&sheets);
        assert_eq!(first, describe_schema(&sheets));
        assert!(first.find("Table: b").unwrap() < first.find("Table: a").unwrap());
    }
}
