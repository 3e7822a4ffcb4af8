// ==========================================
// Excel 迁移工具 - 落库层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 红线: 落库 / 校验阶段的任何错误都中止整次运行
// ==========================================

use thiserror::Error;

/// 落库层错误类型
#[derive(Error, Debug)]
pub enum StoreError {
    // ===== 连接错误 =====
    #[error("数据库连接失败 ({url}): {message}")]
    ConnectionError { url: String, message: String },

    #[error("不支持的数据库地址方案 '{scheme}': {url}")]
    UnsupportedDatabaseUrl { url: String, scheme: String },

    // ===== 写入错误 =====
    #[error("写入表 '{table}' 失败: {message}")]
    WriteError { table: String, message: String },

    #[error("表 '{table}' 没有任何列，无法建表")]
    EmptySchema { table: String },

    // ===== 查询错误 =====
    #[error("查询表 '{table}' 失败: {message}")]
    QueryError { table: String, message: String },

    #[error("数据库操作失败: {0}")]
    DatabaseError(String),
}

// 未带表名上下文的底层错误
impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::SqliteFailure(_, Some(msg)) => StoreError::DatabaseError(msg),
            _ => StoreError::DatabaseError(err.to_string()),
        }
    }
}

/// Result 类型别名
pub type StoreResult<T> = Result<T, StoreError>;
