// ==========================================
// Excel 迁移工具 - 中间快照写入
// ==========================================
// 输出: <dir>/<sheet>_clean.csv，含表头，空值写为空字段
// 快照是附带产物，写失败视为清洗失败
// ==========================================

use crate::domain::grid::SheetGrid;
use crate::engine::error::{TransformError, TransformResult};
use std::fs;
use std::path::PathBuf;
use tracing::debug;

pub struct SnapshotWriter {
    dir: PathBuf,
}

impl SnapshotWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// 确保目录存在
    pub fn prepare(&self) -> TransformResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| TransformError::SnapshotWriteError {
            path: self.dir.display().to_string(),
            message: e.to_string(),
        })
    }

    /// sheet 名中的路径分隔符替换为下划线
    pub fn snapshot_path(&self, sheet_name: &str) -> PathBuf {
        let safe: String = sheet_name
            .chars()
            .map(|c| if c == '/' || c == '\\' { '_' } else { c })
            .collect();
        self.dir.join(format!("{safe}_clean.csv"))
    }

    /// 写出单个 sheet 的快照，返回文件路径
    pub fn write(&self, sheet_name: &str, grid: &SheetGrid) -> TransformResult<PathBuf> {
        let path = self.snapshot_path(sheet_name);
        let to_error = |message: String| TransformError::SnapshotWriteError {
            path: path.display().to_string(),
            message,
        };

        let mut writer = csv::Writer::from_path(&path).map_err(|e| to_error(e.to_string()))?;

        writer
            .write_record(grid.column_names())
            .map_err(|e| to_error(e.to_string()))?;

        for row in grid.rows() {
            writer
                .write_record(row.iter().map(|v| v.to_field_text()))
                .map_err(|e| to_error(e.to_string()))?;
        }

        writer.flush().map_err(|e| to_error(e.to_string()))?;

        debug!(sheet = sheet_name, path = %path.display(), rows = grid.row_count(), "中间快照已写出");
        Ok(path)
    }
}
