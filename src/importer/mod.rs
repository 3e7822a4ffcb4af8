// ==========================================
// Excel 迁移工具 - 抽取层
// ==========================================
// 职责: 工作簿 → 原始表格（每个配置 sheet 一张）
// 支持: Excel / ODS
// ==========================================

// 模块声明
pub mod error;
pub mod excel_extractor;
pub mod sheet_extractor_trait;

// 重导出核心类型
pub use error::{ExtractResult, ExtractionError};
pub use excel_extractor::ExcelSheetExtractor;

// 重导出 Trait 接口
pub use sheet_extractor_trait::{ExtractedSheet, SheetExtractor};
