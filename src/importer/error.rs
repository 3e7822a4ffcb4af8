// ==========================================
// Excel 迁移工具 - 抽取层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 抽取错误：工作簿或 sheet 缺失，整次运行中止
#[derive(Error, Debug)]
pub enum ExtractionError {
    // ===== 文件相关错误 =====
    #[error("Excel 文件不存在: {0}")]
    WorkbookNotFound(String),

    #[error("Excel 解析失败: {0}")]
    ExcelParseError(String),

    // ===== Sheet 相关错误 =====
    #[error("工作表不存在: '{sheet}'（可用: {available}）")]
    SheetNotFound { sheet: String, available: String },

    #[error("工作表读取失败 ('{sheet}'): {message}")]
    SheetReadError { sheet: String, message: String },
}

// 实现 From<calamine::Error>
impl From<calamine::Error> for ExtractionError {
    fn from(err: calamine::Error) -> Self {
        ExtractionError::ExcelParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ExtractResult<T> = Result<T, ExtractionError>;
