// ==========================================
// Excel 迁移工具 - 流水线层
// ==========================================
// 职责: 串联 抽取 → 清洗 → 落库 → 校验，产出结果记录
// ==========================================

pub mod error;
pub mod orchestrator;
pub mod report;

pub use error::{PipelineError, PipelineResult};
pub use orchestrator::{run_pipeline, MigrationPipeline, PipelineOptions};
pub use report::{render_text, ReportText};
