// ==========================================
// Excel 迁移工具 - 清洗结果落库
// ==========================================
// 职责: 每个清洗后的 sheet 写入其目标表，返回 (表名, 写入行数)
// 多个 sheet 指向同一张表时后写覆盖前写，统计只保留一条
// 红线: 任何写入失败立即中止，不做跨表回滚
// ==========================================

use crate::config::pipeline_config::Configuration;
use crate::engine::sheet_cleaner::CleanedSheet;
use crate::repository::error::StoreResult;
use crate::repository::table_store::TableStore;
use tracing::{info, instrument, warn};

pub struct TableLoader;

impl TableLoader {
    /// 按清洗结果顺序写入目标表
    #[instrument(skip_all, fields(sheets = cleaned.len()))]
    pub fn load(
        &self,
        cleaned: &[CleanedSheet],
        config: &Configuration,
        store: &mut dyn TableStore,
    ) -> StoreResult<Vec<(String, usize)>> {
        let mut load_stats: Vec<(String, usize)> = Vec::with_capacity(cleaned.len());

        for sheet in cleaned {
            let table = config
                .sheet(&sheet.sheet_name)
                .map(|c| c.table_name())
                .unwrap_or(sheet.sheet_name.as_str())
                .to_string();

            let written = store.replace_table(&table, &sheet.grid)?;
            info!(sheet = %sheet.sheet_name, table = %table, rows = written, "表写入完成");

            match load_stats.iter_mut().find(|(t, _)| *t == table) {
                Some(entry) => {
                    warn!(table = %table, sheet = %sheet.sheet_name, "多个 sheet 写入同一张表，保留最后一次写入");
                    entry.1 = written;
                }
                None => load_stats.push((table, written)),
            }
        }

        Ok(load_stats)
    }
}
