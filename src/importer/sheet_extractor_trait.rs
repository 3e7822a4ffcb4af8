// ==========================================
// Excel 迁移工具 - 表格抽取 Trait
// ==========================================
// 职责: 定义"工作簿 → 每个 sheet 一张原始表格"的接口（不包含实现）
// 红线: 保留原始表头与单元格值，不做任何清洗
// ==========================================

use crate::domain::grid::SheetGrid;
use crate::importer::error::ExtractResult;
use std::path::Path;

/// 单个 sheet 的原始抽取结果
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedSheet {
    pub sheet_name: String,
    pub grid: SheetGrid,
}

// ==========================================
// SheetExtractor Trait
// ==========================================
// 用途: 流水线抽取阶段
// 实现者: ExcelSheetExtractor（calamine）
pub trait SheetExtractor {
    /// 读取指定 sheet
    ///
    /// # 参数
    /// - workbook_path: 工作簿路径
    /// - sheet_names: 需要读取的 sheet（按此顺序返回）
    ///
    /// # 返回
    /// - Ok(Vec<ExtractedSheet>): 每个 sheet 一张表格
    /// - Err: 工作簿不存在 / sheet 不存在 / 解析失败
    fn extract(
        &self,
        workbook_path: &Path,
        sheet_names: &[&str],
    ) -> ExtractResult<Vec<ExtractedSheet>>;
}
