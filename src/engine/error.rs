// ==========================================
// Excel 迁移工具 - 清洗层错误类型
// ==========================================
// 结构性错误（声明列缺失 / 索引列缺失）整次运行中止
// 单元格级脏数据不是错误，转换为空值
// ==========================================

use thiserror::Error;

/// 清洗错误
#[derive(Error, Debug)]
pub enum TransformError {
    // ===== 结构错误 =====
    #[error("Sheet '{sheet}' 缺少声明列: {}", .missing.join(", "))]
    MissingColumns { sheet: String, missing: Vec<String> },

    #[error("索引列 '{column}' 不在清洗后的 sheet '{sheet}' 中")]
    MissingIndexColumn { sheet: String, column: String },

    #[error("Sheet '{0}' 未被抽取，无法清洗")]
    SheetNotExtracted(String),

    // ===== 中间快照错误 =====
    #[error("中间快照写入失败 ({path}): {message}")]
    SnapshotWriteError { path: String, message: String },
}

/// Result 类型别名
pub type TransformResult<T> = Result<T, TransformError>;
