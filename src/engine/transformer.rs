// ==========================================
// Excel 迁移工具 - 清洗编排
// ==========================================
// 职责: 按配置顺序清洗全部 sheet，可选写出中间快照
// 红线: 纯内存计算，不接触目标数据库
// ==========================================

use crate::config::pipeline_config::Configuration;
use crate::engine::error::{TransformError, TransformResult};
use crate::engine::sheet_cleaner::{CleanedSheet, SheetCleaner};
use crate::engine::snapshot_writer::SnapshotWriter;
use crate::importer::sheet_extractor_trait::ExtractedSheet;
use std::path::Path;
use tracing::{info, instrument};

/// 清洗阶段输出
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformOutput {
    /// 按配置顺序排列
    pub sheets: Vec<CleanedSheet>,
}

impl TransformOutput {
    pub fn sheet(&self, sheet_name: &str) -> Option<&CleanedSheet> {
        self.sheets.iter().find(|s| s.sheet_name == sheet_name)
    }
}

pub struct Transformer {
    cleaner: SheetCleaner,
}

impl Default for Transformer {
    fn default() -> Self {
        Self::new()
    }
}

impl Transformer {
    pub fn new() -> Self {
        Self {
            cleaner: SheetCleaner,
        }
    }

    /// 清洗全部配置的 sheet
    ///
    /// # 参数
    /// - extracted: 抽取结果（需覆盖所有配置 sheet）
    /// - snapshot_dir: Some 时写出 <sheet>_clean.csv
    #[instrument(skip_all, fields(sheets = config.sheets.len()))]
    pub fn transform_all(
        &self,
        extracted: &[ExtractedSheet],
        config: &Configuration,
        snapshot_dir: Option<&Path>,
    ) -> TransformResult<TransformOutput> {
        let snapshots = match snapshot_dir {
            Some(dir) => {
                let writer = SnapshotWriter::new(dir);
                writer.prepare()?;
                Some(writer)
            }
            None => None,
        };

        let mut sheets = Vec::with_capacity(config.sheets.len());

        for sheet_config in &config.sheets {
            let raw = extracted
                .iter()
                .find(|e| e.sheet_name == sheet_config.sheet_name)
                .ok_or_else(|| TransformError::SheetNotExtracted(sheet_config.sheet_name.clone()))?;

            let cleaned = self.cleaner.clean(&raw.grid, sheet_config)?;

            if let Some(writer) = &snapshots {
                writer.write(&cleaned.sheet_name, &cleaned.grid)?;
            }

            info!(
                sheet = %cleaned.sheet_name,
                rows_clean = cleaned.stats.rows_clean,
                "sheet 清洗完成"
            );
            sheets.push(cleaned);
        }

        Ok(TransformOutput { sheets })
    }
}
