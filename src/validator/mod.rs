// ==========================================
// Excel 迁移工具 - 校验层
// ==========================================
// 职责: 落库后逐表行数比对 + 汇总
// ==========================================

pub mod row_count_validator;

pub use row_count_validator::RowCountValidator;
