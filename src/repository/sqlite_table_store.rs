// ==========================================
// Excel 迁移工具 - SQLite 表存储
// ==========================================
// 替换语义: 单表事务内 DROP → CREATE → 批量 INSERT
// 列亲和类型: 声明类型优先，未声明的列按值推断
// 约束: 标识符一律加双引号，值一律参数化
// ==========================================

use crate::db::{open_sqlite_connection, parse_database_url};
use crate::domain::cell::{CellValue, DATETIME_TEXT_FORMAT};
use crate::domain::grid::{GridColumn, SheetGrid};
use crate::perf::install_sqlite_tracing;
use crate::repository::error::{StoreError, StoreResult};
use crate::repository::table_store::{StoreConnector, TableStore};
use rusqlite::types::{ToSqlOutput, Value};
use rusqlite::{params_from_iter, Connection, ToSql};
use tracing::{debug, info};

impl ToSql for CellValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        let value = match self {
            CellValue::Null => Value::Null,
            CellValue::Integer(i) => Value::Integer(*i),
            CellValue::Float(f) => Value::Real(*f),
            CellValue::Text(s) => return Ok(ToSqlOutput::from(s.as_str())),
            CellValue::Boolean(b) => Value::Integer(i64::from(*b)),
            CellValue::DateTime(dt) => Value::Text(dt.format(DATETIME_TEXT_FORMAT).to_string()),
        };
        Ok(ToSqlOutput::Owned(value))
    }
}

/// 标识符加双引号（内部双引号转义）
pub fn quote_identifier(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// 未声明类型的列按值推断亲和类型
///
/// 全部整数 → INTEGER；整数与浮点 → REAL；全部布尔 → BOOLEAN；
/// 全部日期时间 → TIMESTAMP；全空或其他组合 → TEXT
fn infer_affinity<'a>(values: impl Iterator<Item = &'a CellValue>) -> &'static str {
    let (mut ints, mut reals, mut bools, mut datetimes, mut others) = (0, 0, 0, 0, 0);

    for value in values {
        match value {
            CellValue::Null => {}
            CellValue::Integer(_) => ints += 1,
            CellValue::Float(_) => reals += 1,
            CellValue::Boolean(_) => bools += 1,
            CellValue::DateTime(_) => datetimes += 1,
            CellValue::Text(_) => others += 1,
        }
    }

    match (ints, reals, bools, datetimes, others) {
        (0, 0, 0, 0, 0) => "TEXT",
        (_, 0, 0, 0, 0) => "INTEGER",
        (_, _, 0, 0, 0) => "REAL",
        (0, 0, _, 0, 0) => "BOOLEAN",
        (0, 0, 0, _, 0) => "TIMESTAMP",
        _ => "TEXT",
    }
}

fn column_affinity(grid: &SheetGrid, index: usize, column: &GridColumn) -> &'static str {
    column
        .column_type
        .and_then(|t| t.sql_type())
        .unwrap_or_else(|| infer_affinity(grid.column_values(index)))
}

/// CREATE TABLE 语句
pub fn create_table_sql(table: &str, grid: &SheetGrid) -> String {
    let columns: Vec<String> = grid
        .columns()
        .iter()
        .enumerate()
        .map(|(idx, column)| {
            format!(
                "{} {}",
                quote_identifier(&column.name),
                column_affinity(grid, idx, column)
            )
        })
        .collect();

    format!(
        "CREATE TABLE {} ({})",
        quote_identifier(table),
        columns.join(", ")
    )
}

fn insert_sql(table: &str, grid: &SheetGrid) -> String {
    let names: Vec<String> = grid
        .columns()
        .iter()
        .map(|c| quote_identifier(&c.name))
        .collect();
    let placeholders: Vec<String> = (1..=grid.column_count()).map(|i| format!("?{i}")).collect();

    format!(
        "INSERT INTO {} ({}) VALUES ({})",
        quote_identifier(table),
        names.join(", "),
        placeholders.join(", ")
    )
}

// ==========================================
// SqliteTableStore - SQLite 表存储
// ==========================================
pub struct SqliteTableStore {
    conn: Connection,
}

impl SqliteTableStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// 供测试 / 调用方直接查询
    pub fn connection(&self) -> &Connection {
        &self.conn
    }

    fn write_table(&mut self, table: &str, grid: &SheetGrid) -> rusqlite::Result<usize> {
        let tx = self.conn.transaction()?;

        tx.execute_batch(&format!("DROP TABLE IF EXISTS {}", quote_identifier(table)))?;
        tx.execute_batch(&create_table_sql(table, grid))?;

        let mut count = 0;
        {
            let mut stmt = tx.prepare(&insert_sql(table, grid))?;
            for row in grid.rows() {
                count += stmt.execute(params_from_iter(row.iter()))?;
            }
        }

        tx.commit()?;
        Ok(count)
    }
}

impl TableStore for SqliteTableStore {
    fn replace_table(&mut self, table: &str, grid: &SheetGrid) -> StoreResult<usize> {
        if grid.column_count() == 0 {
            return Err(StoreError::EmptySchema {
                table: table.to_string(),
            });
        }

        let count = self
            .write_table(table, grid)
            .map_err(|e| StoreError::WriteError {
                table: table.to_string(),
                message: e.to_string(),
            })?;

        debug!(table, rows = count, "表已替换写入");
        Ok(count)
    }

    fn count_rows(&self, table: &str) -> StoreResult<u64> {
        let sql = format!("SELECT COUNT(*) FROM {}", quote_identifier(table));
        let count: i64 = self
            .conn
            .query_row(&sql, [], |row| row.get(0))
            .map_err(|e| StoreError::QueryError {
                table: table.to_string(),
                message: e.to_string(),
            })?;
        Ok(count.max(0) as u64)
    }

    fn close(self: Box<Self>) -> StoreResult<()> {
        self.conn.close().map_err(|(_, e)| StoreError::from(e))
    }
}

// ==========================================
// SqliteConnector - 按 database_url 打开 SQLite
// ==========================================
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteConnector;

impl SqliteConnector {
    /// 打开具体类型的存储（测试中需要直接查询时使用）
    pub fn open(&self, database_url: &str) -> StoreResult<SqliteTableStore> {
        let target =
            parse_database_url(database_url).map_err(|e| StoreError::UnsupportedDatabaseUrl {
                url: database_url.to_string(),
                scheme: e.0,
            })?;

        let mut conn =
            open_sqlite_connection(&target).map_err(|e| StoreError::ConnectionError {
                url: database_url.to_string(),
                message: e.to_string(),
            })?;
        install_sqlite_tracing(&mut conn);

        info!(database_url, target = ?target, "已连接目标数据库");
        Ok(SqliteTableStore::new(conn))
    }
}

impl StoreConnector for SqliteConnector {
    fn connect(&self, database_url: &str) -> StoreResult<Box<dyn TableStore>> {
        Ok(Box::new(self.open(database_url)?))
    }
}
