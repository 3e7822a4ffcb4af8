// ==========================================
// Excel 迁移工具 - 数据库地址解析与 SQLite 连接初始化
// ==========================================
// 目标:
// - 统一解析 database_url（sqlite:///rel / sqlite:////abs / 内存库 / 裸路径）
// - 统一 busy_timeout，所有 Connection::open 都走这里
// ==========================================

use rusqlite::Connection;
use std::path::PathBuf;
use std::time::Duration;

/// 默认 busy_timeout（毫秒）
pub const DEFAULT_BUSY_TIMEOUT_MS: u64 = 5_000;

const SQLITE_SCHEME: &str = "sqlite";
const MEMORY_PATH: &str = ":memory:";

/// 解析后的数据库目标
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatabaseTarget {
    InMemory,
    File(PathBuf),
}

/// database_url 解析失败（非 sqlite 方案）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnsupportedScheme(pub String);

/// 解析 database_url
///
/// 规则:
/// - `sqlite://` 或 `sqlite:///:memory:` → 内存库
/// - `sqlite:///data/out.db` → 相对路径 data/out.db
/// - `sqlite:////var/out.db` → 绝对路径 /var/out.db
/// - 无 `://` 的字符串视为文件路径
/// - `?` 之后的查询参数忽略
pub fn parse_database_url(url: &str) -> Result<DatabaseTarget, UnsupportedScheme> {
    let url = url.trim();
    let without_query = url.split_once('?').map_or(url, |(head, _)| head);

    let Some((scheme, rest)) = without_query.split_once("://") else {
        return Ok(path_target(without_query));
    };

    // sqlite+pysqlite:// 之类的驱动后缀同样按 sqlite 处理
    let base_scheme = scheme.split('+').next().unwrap_or(scheme);
    if !base_scheme.eq_ignore_ascii_case(SQLITE_SCHEME) {
        return Err(UnsupportedScheme(scheme.to_string()));
    }

    // sqlite://<host>/<path>，host 恒为空
    let path = rest.strip_prefix('/').unwrap_or(rest);
    Ok(path_target(path))
}

fn path_target(path: &str) -> DatabaseTarget {
    if path.is_empty() || path == MEMORY_PATH {
        DatabaseTarget::InMemory
    } else {
        DatabaseTarget::File(PathBuf::from(path))
    }
}

/// 配置 SQLite 连接的统一 PRAGMA
///
/// busy_timeout 需要每个连接单独配置
pub fn configure_sqlite_connection(conn: &Connection) -> rusqlite::Result<()> {
    conn.busy_timeout(Duration::from_millis(DEFAULT_BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// 按目标打开 SQLite 连接并应用统一配置
pub fn open_sqlite_connection(target: &DatabaseTarget) -> rusqlite::Result<Connection> {
    let conn = match target {
        DatabaseTarget::InMemory => Connection::open_in_memory()?,
        DatabaseTarget::File(path) => Connection::open(path)?,
    };
    configure_sqlite_connection(&conn)?;
    Ok(conn)
}
