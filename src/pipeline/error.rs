// ==========================================
// Excel 迁移工具 - 流水线错误
// ==========================================
// 各层错误原样上抛，保留 sheet / 列 / 表等标识
// ==========================================

use crate::config::error::ConfigError;
use crate::domain::types::PipelineStage;
use crate::engine::error::TransformError;
use crate::importer::error::ExtractionError;
use crate::repository::error::StoreError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),

    #[error("抽取失败: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("清洗失败: {0}")]
    Transform(#[from] TransformError),

    #[error("落库失败: {0}")]
    Store(#[from] StoreError),

    #[error("非法的阶段迁移: {from} → {to}")]
    InvalidStageTransition {
        from: PipelineStage,
        to: PipelineStage,
    },
}

/// Result 类型别名
pub type PipelineResult<T> = Result<T, PipelineError>;
