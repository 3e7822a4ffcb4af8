// ==========================================
// Excel 迁移工具 - 表存储接口
// ==========================================
// 职责: 定义落库层与具体数据库之间的边界
// 约束: 编排层只通过 StoreConnector 获取连接，dry-run 从不调用
// ==========================================

use crate::domain::grid::SheetGrid;
use crate::repository::error::StoreResult;

/// 目标数据库上的表操作
pub trait TableStore {
    /// 以替换语义写入整张表（已存在则先删除），返回写入行数
    fn replace_table(&mut self, table: &str, grid: &SheetGrid) -> StoreResult<usize>;

    /// 当前表行数
    fn count_rows(&self, table: &str) -> StoreResult<u64>;

    /// 释放连接
    fn close(self: Box<Self>) -> StoreResult<()>;
}

/// 按 database_url 建立连接
pub trait StoreConnector {
    fn connect(&self, database_url: &str) -> StoreResult<Box<dyn TableStore>>;
}
