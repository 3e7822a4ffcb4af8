// ==========================================
// Excel 迁移工具 - 清洗层
// ==========================================
// 职责: 原始表格 → 清洗后表格 + 统计
// 红线: 不接触目标数据库，单元格脏数据不报错
// ==========================================

pub mod error;
pub mod header_normalizer;
pub mod sheet_cleaner;
pub mod snapshot_writer;
pub mod transformer;
pub mod type_coercion;

// 重导出核心类型
pub use error::{TransformError, TransformResult};
pub use header_normalizer::{normalize_header, normalize_headers};
pub use sheet_cleaner::{
    coerce_declared, drop_blank_rows, ensure_index_column, restrict_to_declared, CleanedSheet,
    CoercionOutcome, SheetCleaner,
};
pub use snapshot_writer::SnapshotWriter;
pub use transformer::{TransformOutput, Transformer};
pub use type_coercion::coerce_value;
