// ==========================================
// Excel 迁移工具 - 落库层
// ==========================================
// 职责: 清洗后表格 → 目标数据库表（替换语义）
// 约束: 值全部参数化，标识符全部加引号
// ==========================================

pub mod error;
pub mod sqlite_table_store;
pub mod table_loader;
pub mod table_store;

// 重导出核心类型
pub use error::{StoreError, StoreResult};
pub use sqlite_table_store::{SqliteConnector, SqliteTableStore};
pub use table_loader::TableLoader;

// 重导出 Trait 接口
pub use table_store::{StoreConnector, TableStore};
