// ==========================================
// Excel 迁移工具 - 领域类型定义
// ==========================================
// 职责: 列类型标签 / 运行模式 / 流水线阶段
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 列类型 (Column Type)
// ==========================================
// 由配置中的类型标签解析而来
// Unknown: 未识别标签，原样透传（不是错误）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    Integer,
    Float,
    String,
    Boolean,
    Date,
    Category,
    Unknown,
}

impl ColumnType {
    /// 从配置标签解析（大小写不敏感，支持别名）
    pub fn from_tag(tag: &str) -> Self {
        match tag.trim().to_lowercase().as_str() {
            "int" | "integer" => ColumnType::Integer,
            "float" | "decimal" | "number" => ColumnType::Float,
            "string" | "str" | "text" => ColumnType::String,
            "bool" | "boolean" => ColumnType::Boolean,
            "date" | "datetime" => ColumnType::Date,
            "category" | "categorical" => ColumnType::Category,
            _ => ColumnType::Unknown,
        }
    }

    /// 建表时使用的 SQLite 列类型
    ///
    /// Unknown 返回 None，由列值推断
    pub fn sql_type(&self) -> Option<&'static str> {
        match self {
            ColumnType::Integer => Some("INTEGER"),
            ColumnType::Float => Some("REAL"),
            ColumnType::String | ColumnType::Category => Some("TEXT"),
            ColumnType::Boolean => Some("BOOLEAN"),
            ColumnType::Date => Some("TIMESTAMP"),
            ColumnType::Unknown => None,
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnType::Integer => write!(f, "integer"),
            ColumnType::Float => write!(f, "float"),
            ColumnType::String => write!(f, "string"),
            ColumnType::Boolean => write!(f, "boolean"),
            ColumnType::Date => write!(f, "date"),
            ColumnType::Category => write!(f, "category"),
            ColumnType::Unknown => write!(f, "unknown"),
        }
    }
}

// ==========================================
// 运行模式 (Run Mode)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    DryRun, // 只抽取+清洗，不触碰数据库
    Full,   // 抽取 → 清洗 → 落库 → 校验
}

impl fmt::Display for RunMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RunMode::DryRun => write!(f, "dry_run"),
            RunMode::Full => write!(f, "full"),
        }
    }
}

// ==========================================
// 流水线阶段 (Pipeline Stage)
// ==========================================
// 严格顺序推进，不回退:
// Configured → Extracted → Transformed → {DryRunDone | Loaded → Validated}
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PipelineStage {
    Configured,
    Extracted,
    Transformed,
    DryRunDone,
    Loaded,
    Validated,
}

impl PipelineStage {
    /// 判断 self → next 是否为合法迁移
    pub fn can_advance_to(&self, next: PipelineStage) -> bool {
        matches!(
            (self, next),
            (PipelineStage::Configured, PipelineStage::Extracted)
                | (PipelineStage::Extracted, PipelineStage::Transformed)
                | (PipelineStage::Transformed, PipelineStage::DryRunDone)
                | (PipelineStage::Transformed, PipelineStage::Loaded)
                | (PipelineStage::Loaded, PipelineStage::Validated)
        )
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PipelineStage::Configured => write!(f, "CONFIGURED"),
            PipelineStage::Extracted => write!(f, "EXTRACTED"),
            PipelineStage::Transformed => write!(f, "TRANSFORMED"),
            PipelineStage::DryRunDone => write!(f, "DRY_RUN_DONE"),
            PipelineStage::Loaded => write!(f, "LOADED"),
            PipelineStage::Validated => write!(f, "VALIDATED"),
        }
    }
}
