// ==========================================
// Excel 迁移工具 - 统计与结果记录
// ==========================================
// 职责: 清洗统计 / 行数校验结果 / 校验汇总 / 流水线结果
// 约定: 以 (名称, 值) 有序列表保存，序列化为 JSON 对象（保持配置顺序）
// ==========================================

use crate::domain::types::RunMode;
use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

// ==========================================
// SheetStats - 单 sheet 清洗统计
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct SheetStats {
    /// 清洗后剩余行数
    pub rows_clean: usize,
    /// 原始行数
    pub rows_raw: usize,
    /// 被剔除的全空行数
    pub blank_rows_dropped: usize,
    /// 因类型转换失败而置空的单元格数
    pub coerced_to_null: usize,
}

// ==========================================
// RowCountCheck - 单表行数校验结果
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RowCountCheck {
    pub expected: u64,
    pub actual: u64,
    #[serde(rename = "match")]
    pub matched: bool,
}

impl RowCountCheck {
    pub fn new(expected: u64, actual: u64) -> Self {
        Self {
            expected,
            actual,
            matched: expected == actual,
        }
    }
}

// ==========================================
// ValidationSummary - 校验汇总
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValidationSummary {
    pub total_tables: usize,
    pub matching_tables: usize,
    pub all_match: bool,
}

impl ValidationSummary {
    /// 由逐表结果折叠得到（确定性）
    pub fn from_checks(checks: &[(String, RowCountCheck)]) -> Self {
        let total_tables = checks.len();
        let matching_tables = checks.iter().filter(|(_, c)| c.matched).count();
        Self {
            total_tables,
            matching_tables,
            all_match: matching_tables == total_tables,
        }
    }
}

// ==========================================
// PipelineReport - 流水线结果记录
// ==========================================
// 每次运行返回一次，核心不落盘
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PipelineReport {
    pub run_id: String,
    pub mode: RunMode,
    pub excel_path: String,
    pub database_url: String,
    /// 配置 schema 描述文本
    pub schema: String,
    #[serde(serialize_with = "serialize_entries")]
    pub transform_stats: Vec<(String, SheetStats)>,
    #[serde(serialize_with = "serialize_entries")]
    pub load_stats: Vec<(String, usize)>,
    #[serde(serialize_with = "serialize_entries")]
    pub row_counts: Vec<(String, RowCountCheck)>,
    /// dry-run 时为 None，序列化为 {}
    #[serde(serialize_with = "serialize_summary")]
    pub validation_summary: Option<ValidationSummary>,
}

impl PipelineReport {
    pub fn sheet_stats(&self, sheet_name: &str) -> Option<&SheetStats> {
        lookup(&self.transform_stats, sheet_name)
    }

    pub fn loaded_rows(&self, table: &str) -> Option<usize> {
        lookup(&self.load_stats, table).copied()
    }

    pub fn row_count_check(&self, table: &str) -> Option<&RowCountCheck> {
        lookup(&self.row_counts, table)
    }

    pub fn is_dry_run(&self) -> bool {
        self.mode == RunMode::DryRun
    }
}

fn lookup<'a, V>(entries: &'a [(String, V)], key: &str) -> Option<&'a V> {
    entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
}

#[allow(clippy::ptr_arg)]
fn serialize_entries<V, S>(entries: &Vec<(String, V)>, serializer: S) -> Result<S::Ok, S::Error>
where
    V: Serialize,
    S: Serializer,
{
    serializer.collect_map(entries.iter().map(|(k, v)| (k, v)))
}

fn serialize_summary<S>(
    summary: &Option<ValidationSummary>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match summary {
        Some(summary) => summary.serialize(serializer),
        None => serializer.serialize_map(Some(0))?.end(),
    }
}
