// ==========================================
// Excel 迁移工具 - 迁移配置模型
// ==========================================
// 职责: YAML 配置加载 + 必填项校验
// 必填: excel_path / database_url / sheets（非空映射）
// 红线: 列名、类型标签的有效性不在此处校验，留到清洗阶段发现
// ==========================================

use crate::config::error::{ConfigError, ConfigResult};
use crate::domain::types::ColumnType;
use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// 必填顶层配置项
pub const REQUIRED_KEYS: [&str; 3] = ["excel_path", "database_url", "sheets"];

// ==========================================
// DeclaredColumn - 声明列（列名 → 类型标签）
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeclaredColumn {
    pub name: String,
    /// 配置中书写的原始标签（schema 描述原样输出）
    pub type_tag: String,
}

impl DeclaredColumn {
    pub fn new(name: impl Into<String>, type_tag: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_tag: type_tag.into(),
        }
    }

    pub fn column_type(&self) -> ColumnType {
        ColumnType::from_tag(&self.type_tag)
    }
}

// ==========================================
// SheetConfig - 单 sheet 配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct SheetConfig {
    pub sheet_name: String,
    /// 目标表名，缺省为 sheet 名
    pub table: Option<String>,
    /// 清洗后必须存在的索引列
    pub index_column: Option<String>,
    /// 有序的声明列；为空表示不限制列、不做类型转换
    pub dtypes: Vec<DeclaredColumn>,
}

impl SheetConfig {
    pub fn new(sheet_name: impl Into<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            ..Default::default()
        }
    }

    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = Some(table.into());
        self
    }

    pub fn with_index_column(mut self, column: impl Into<String>) -> Self {
        self.index_column = Some(column.into());
        self
    }

    pub fn with_dtype(mut self, column: impl Into<String>, type_tag: impl Into<String>) -> Self {
        self.dtypes.push(DeclaredColumn::new(column, type_tag));
        self
    }

    /// 解析后的目标表名
    pub fn table_name(&self) -> &str {
        self.table.as_deref().unwrap_or(&self.sheet_name)
    }
}

// YAML 中单个 sheet 条目的原始形态
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawSheetEntry {
    table: Option<Value>,
    index_column: Option<Value>,
    dtypes: Option<Mapping>,
}

// ==========================================
// Configuration - 迁移配置
// ==========================================
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Configuration {
    pub excel_path: PathBuf,
    pub database_url: String,
    /// 按配置书写顺序排列
    pub sheets: Vec<SheetConfig>,
}

impl Configuration {
    /// 以代码方式构造（sheets 不可为空）
    pub fn new(
        excel_path: impl Into<PathBuf>,
        database_url: impl Into<String>,
        sheets: Vec<SheetConfig>,
    ) -> ConfigResult<Self> {
        if sheets.is_empty() {
            return Err(ConfigError::EmptySheets);
        }
        Ok(Self {
            excel_path: excel_path.into(),
            database_url: database_url.into(),
            sheets,
        })
    }

    pub fn sheet(&self, sheet_name: &str) -> Option<&SheetConfig> {
        self.sheets.iter().find(|s| s.sheet_name == sheet_name)
    }

    pub fn sheet_names(&self) -> Vec<&str> {
        self.sheets.iter().map(|s| s.sheet_name.as_str()).collect()
    }

    /// 从 YAML 文本解析
    pub fn from_yaml_str(content: &str) -> ConfigResult<Self> {
        let doc: Value = serde_yaml::from_str(content)?;
        Self::from_yaml_value(doc)
    }

    /// 从 YAML 文档解析（空文档视为空映射）
    pub fn from_yaml_value(doc: Value) -> ConfigResult<Self> {
        let root = match doc {
            Value::Null => Mapping::new(),
            Value::Mapping(m) => m,
            _ => {
                return Err(ConfigError::InvalidValue {
                    key: "<root>".to_string(),
                    message: "顶层必须是映射".to_string(),
                })
            }
        };

        for key in REQUIRED_KEYS {
            if !root.contains_key(key) {
                return Err(ConfigError::MissingKey(key.to_string()));
            }
        }

        let excel_path = required_string(&root, "excel_path")?;
        let database_url = required_string(&root, "database_url")?;

        let sheets_map = match root.get("sheets") {
            Some(Value::Mapping(m)) if !m.is_empty() => m,
            _ => return Err(ConfigError::EmptySheets),
        };

        let mut sheets = Vec::with_capacity(sheets_map.len());
        for (key, entry) in sheets_map {
            let sheet_name = scalar_text(key).ok_or_else(|| ConfigError::InvalidValue {
                key: "sheets".to_string(),
                message: format!("sheet 名必须是标量: {:?}", key),
            })?;
            sheets.push(parse_sheet_entry(sheet_name, entry.clone())?);
        }

        Self::new(PathBuf::from(excel_path), database_url, sheets)
    }
}

/// 加载 YAML 配置文件
///
/// # 错误
/// - 文件不存在 / 读取失败
/// - 缺少 excel_path / database_url / sheets
/// - sheets 不是非空映射
pub fn load_config<P: AsRef<Path>>(path: P) -> ConfigResult<Configuration> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ConfigError::NotFound(path.display().to_string()));
    }

    let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let config = Configuration::from_yaml_str(&content)?;
    info!(
        config_path = %path.display(),
        sheets = config.sheets.len(),
        "配置加载完成"
    );
    Ok(config)
}

fn required_string(root: &Mapping, key: &str) -> ConfigResult<String> {
    match root.get(key) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(other) => Err(ConfigError::InvalidValue {
            key: key.to_string(),
            message: format!("期望字符串，实际 {:?}", other),
        }),
        None => Err(ConfigError::MissingKey(key.to_string())),
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

// 可选标量字段：数字 / 布尔按文本接受，null 视为未设置
fn optional_scalar(sheet_name: &str, key: &str, value: Option<Value>) -> ConfigResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(other) => scalar_text(&other)
            .map(Some)
            .ok_or_else(|| ConfigError::InvalidValue {
                key: format!("sheets.{}.{}", sheet_name, key),
                message: format!("必须是标量: {:?}", other),
            }),
    }
}

fn parse_sheet_entry(sheet_name: String, entry: Value) -> ConfigResult<SheetConfig> {
    // null 条目 = 全部缺省
    let raw: RawSheetEntry = if entry.is_null() {
        RawSheetEntry::default()
    } else {
        serde_yaml::from_value(entry).map_err(|e| ConfigError::InvalidValue {
            key: format!("sheets.{}", sheet_name),
            message: e.to_string(),
        })?
    };

    let mut dtypes = Vec::new();
    for (column, tag) in raw.dtypes.unwrap_or_default() {
        let name = scalar_text(&column).ok_or_else(|| ConfigError::InvalidValue {
            key: format!("sheets.{}.dtypes", sheet_name),
            message: format!("列名必须是标量: {:?}", column),
        })?;
        let type_tag = match tag {
            Value::Null => String::new(),
            other => scalar_text(&other).ok_or_else(|| ConfigError::InvalidValue {
                key: format!("sheets.{}.dtypes.{}", sheet_name, name),
                message: format!("类型标签必须是标量: {:?}", other),
            })?,
        };
        dtypes.push(DeclaredColumn { name, type_tag });
    }

    let table = optional_scalar(&sheet_name, "table", raw.table)?;
    let index_column = optional_scalar(&sheet_name, "index_column", raw.index_column)?;

    debug!(
        sheet = %sheet_name,
        declared_columns = dtypes.len(),
        "sheet 配置解析完成"
    );

    Ok(SheetConfig {
        sheet_name,
        table,
        index_column,
        dtypes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
excel_path: data/raw/sample.xlsx
database_url: sqlite:///data/warehouse.db
sheets:
  Customers:
    table: customers
    index_column: customer_id
    dtypes:
      customer_id: int
      name: string
      email: string
  Orders:
    dtypes:
      order_id: integer
      order_date: date
  Notes:
"#;

    #[test]
    fn test_parse_sample_config() {
        let config = Configuration::from_yaml_str(SAMPLE).unwrap();

        assert_eq!(config.excel_path, PathBuf::from("data/raw/sample.xlsx"));
        assert_eq!(config.database_url, "sqlite:///data/warehouse.db");
        assert_eq!(config.sheet_names(), vec!["Customers", "Orders", "Notes"]);

        let customers = config.sheet("Customers").unwrap();
        assert_eq!(customers.table_name(), "customers");
        assert_eq!(customers.index_column.as_deref(), Some("customer_id"));
        let declared: Vec<&str> = customers.dtypes.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(declared, vec!["customer_id", "name", "email"]);
        assert_eq!(customers.dtypes[0].column_type(), ColumnType::Integer);
    }

    #[test]
    fn test_table_defaults_to_sheet_name() {
        let config = Configuration::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(config.sheet("Orders").unwrap().table_name(), "Orders");

        let notes = config.sheet("Notes").unwrap();
        assert!(notes.dtypes.is_empty());
        assert!(notes.index_column.is_none());
    }

    #[test]
    fn test_missing_required_key() {
        let yaml = "excel_path: a.xlsx\nsheets:\n  s1: {}\n";
        let err = Configuration::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "database_url"));
    }

    #[test]
    fn test_empty_document_reports_first_missing_key() {
        let err = Configuration::from_yaml_str("").unwrap_err();
        assert!(matches!(err, ConfigError::MissingKey(ref k) if k == "excel_path"));
    }

    #[test]
    fn test_sheets_must_be_non_empty_mapping() {
        let empty = "excel_path: a.xlsx\ndatabase_url: sqlite://\nsheets: {}\n";
        assert!(matches!(
            Configuration::from_yaml_str(empty).unwrap_err(),
            ConfigError::EmptySheets
        ));

        let list = "excel_path: a.xlsx\ndatabase_url: sqlite://\nsheets: [a, b]\n";
        assert!(matches!(
            Configuration::from_yaml_str(list).unwrap_err(),
            ConfigError::EmptySheets
        ));
    }

    #[test]
    fn test_null_dtypes_and_numeric_sheet_name() {
        let yaml = "excel_path: a.xlsx\ndatabase_url: sqlite://\nsheets:\n  2024:\n    dtypes:\n";
        let config = Configuration::from_yaml_str(yaml).unwrap();
        let sheet = config.sheet("2024").unwrap();
        assert!(sheet.dtypes.is_empty());
    }

    #[test]
    fn test_numeric_table_and_index_column_accepted() {
        let yaml = "excel_path: a.xlsx\ndatabase_url: sqlite://\nsheets:\n  s:\n    table: 2024\n    index_column: 7\n  t:\n    table:\n";
        let config = Configuration::from_yaml_str(yaml).unwrap();

        let s = config.sheet("s").unwrap();
        assert_eq!(s.table_name(), "2024");
        assert_eq!(s.index_column.as_deref(), Some("7"));
        assert_eq!(config.sheet("t").unwrap().table_name(), "t");
    }

    #[test]
    fn test_unknown_type_tag_is_kept_verbatim() {
        let yaml = "excel_path: a.xlsx\ndatabase_url: sqlite://\nsheets:\n  s:\n    dtypes:\n      geo: Geometry\n";
        let config = Configuration::from_yaml_str(yaml).unwrap();
        let column = &config.sheet("s").unwrap().dtypes[0];
        assert_eq!(column.type_tag, "Geometry");
        assert_eq!(column.column_type(), ColumnType::Unknown);
    }

    #[test]
    fn test_load_config_file_not_found() {
        let err = load_config("definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::NotFound(_)));
    }

    #[test]
    fn test_load_config_from_file() {
        use std::io::Write;
        let mut temp_file = tempfile::NamedTempFile::new().unwrap();
        write!(temp_file, "{}", SAMPLE).unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.sheets.len(), 3);
    }

    #[test]
    fn test_new_rejects_empty_sheets() {
        let err = Configuration::new("a.xlsx", "sqlite://", vec![]).unwrap_err();
        assert!(matches!(err, ConfigError::EmptySheets));
    }
}
