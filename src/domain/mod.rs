// ==========================================
// Excel 迁移工具 - 领域模型层
// ==========================================
// 职责: 单元格值、表格、列类型、统计与结果记录
// 红线: 不含 I/O，不含数据访问逻辑
// ==========================================

pub mod cell;
pub mod grid;
pub mod report;
pub mod types;

// 重导出核心类型
pub use cell::CellValue;
pub use grid::{GridColumn, SheetGrid};
pub use report::{PipelineReport, RowCountCheck, SheetStats, ValidationSummary};
pub use types::{ColumnType, PipelineStage, RunMode};
