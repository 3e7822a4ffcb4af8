// ==========================================
// Excel 迁移工具 - 阶段耗时与 SQL 统计
// ==========================================
// StageTimer: 每个流水线阶段一个，结束时输出耗时 / 处理行数 / SQL 语句数
// install_sqlite_tracing: 给落库连接挂 trace/profile 回调
// 约定: 流水线单线程运行，统计状态全部线程局部
// ==========================================

use crate::domain::types::PipelineStage;
use rusqlite::Connection;
use std::cell::Cell;
use std::time::{Duration, Instant};

/// 强制开启 / 关闭 SQL 统计
pub const PERF_SQL_ENV: &str = "EXCEL_DB_MIGRATE_PERF_SQL";
/// 慢 SQL 阈值（毫秒）
pub const SLOW_SQL_MS_ENV: &str = "EXCEL_DB_MIGRATE_SLOW_SQL_MS";

/// SQL 统计设置
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SqlTracingSettings {
    pub enabled: bool,
    pub slow_threshold: Duration,
}

impl SqlTracingSettings {
    const DISABLED: Self = Self {
        enabled: false,
        slow_threshold: Duration::ZERO,
    };

    /// 读取进程环境变量
    pub fn from_env() -> Self {
        Self::from_values(
            std::env::var(PERF_SQL_ENV).ok().as_deref(),
            std::env::var(SLOW_SQL_MS_ENV).ok().as_deref(),
        )
    }

    /// Debug 构建默认开启，Release 默认关闭；阈值默认 50ms / 200ms
    pub fn from_values(perf_sql: Option<&str>, slow_sql_ms: Option<&str>) -> Self {
        let enabled = perf_sql.map_or(cfg!(debug_assertions), |v| {
            matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on")
        });
        let default_ms = if cfg!(debug_assertions) { 50 } else { 200 };
        let ms = slow_sql_ms
            .and_then(|v| v.trim().parse::<u64>().ok())
            .unwrap_or(default_ms);
        Self {
            enabled,
            slow_threshold: Duration::from_millis(ms),
        }
    }

    fn is_slow(&self, elapsed: Duration) -> bool {
        !self.slow_threshold.is_zero() && elapsed >= self.slow_threshold
    }
}

/// 线程内累计的 SQL 计数
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
struct SqlCounters {
    statements: u64,
    slow_statements: u64,
}

thread_local! {
    static SETTINGS: Cell<SqlTracingSettings> = const { Cell::new(SqlTracingSettings::DISABLED) };
    static COUNTERS: Cell<SqlCounters> = const {
        Cell::new(SqlCounters { statements: 0, slow_statements: 0 })
    };
    static OPEN_TIMERS: Cell<u32> = const { Cell::new(0) };
}

fn counters() -> SqlCounters {
    COUNTERS.with(Cell::get)
}

fn bump(update: impl FnOnce(&mut SqlCounters)) {
    // 只统计阶段内的语句
    if OPEN_TIMERS.with(Cell::get) == 0 {
        return;
    }
    COUNTERS.with(|c| {
        let mut value = c.get();
        update(&mut value);
        c.set(value);
    });
}

/// 给落库连接安装 SQL 计数 + 慢查询日志回调
pub fn install_sqlite_tracing(conn: &mut Connection) {
    let settings = SqlTracingSettings::from_env();
    SETTINGS.with(|s| s.set(settings));

    if settings.enabled {
        conn.trace(Some(on_statement));
        conn.profile(Some(on_profiled));
    } else {
        conn.trace(None);
        conn.profile(None);
    }
}

fn on_statement(_sql: &str) {
    if SETTINGS.with(Cell::get).enabled {
        bump(|c| c.statements = c.statements.saturating_add(1));
    }
}

fn on_profiled(sql: &str, elapsed: Duration) {
    let settings = SETTINGS.with(Cell::get);
    if !settings.enabled || !settings.is_slow(elapsed) {
        return;
    }

    let flat = sql.split_whitespace().collect::<Vec<_>>().join(" ");
    let statement: String = flat.chars().take(240).collect();
    tracing::warn!(
        target: "slow_sql",
        elapsed_ms = elapsed.as_millis() as u64,
        sql = %statement,
        "慢 SQL"
    );
    bump(|c| c.slow_statements = c.slow_statements.saturating_add(1));
}

/// 单个阶段的统计结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StageTiming {
    pub stage: PipelineStage,
    pub elapsed: Duration,
    pub rows: Option<usize>,
    pub sql_statements: u64,
    pub slow_statements: u64,
}

// ==========================================
// StageTimer - 阶段计时器
// ==========================================
// drop 时输出一条 target="perf" 日志（阶段失败时同样输出）
pub struct StageTimer {
    stage: PipelineStage,
    started: Instant,
    baseline: SqlCounters,
    rows: Option<usize>,
}

impl StageTimer {
    /// 开始统计，stage 为该阶段完成后到达的状态
    pub fn start(stage: PipelineStage) -> Self {
        OPEN_TIMERS.with(|n| n.set(n.get().saturating_add(1)));
        Self {
            stage,
            started: Instant::now(),
            baseline: counters(),
            rows: None,
        }
    }

    /// 记录本阶段处理的行数
    pub fn record_rows(&mut self, rows: usize) {
        self.rows = Some(rows);
    }

    pub fn timing(&self) -> StageTiming {
        let now = counters();
        StageTiming {
            stage: self.stage,
            elapsed: self.started.elapsed(),
            rows: self.rows,
            sql_statements: now.statements.saturating_sub(self.baseline.statements),
            slow_statements: now
                .slow_statements
                .saturating_sub(self.baseline.slow_statements),
        }
    }
}

impl Drop for StageTimer {
    fn drop(&mut self) {
        let timing = self.timing();
        tracing::info!(
            target: "perf",
            stage = %timing.stage,
            elapsed_ms = timing.elapsed.as_millis() as u64,
            rows = timing.rows,
            sql_statements = timing.sql_statements,
            slow_statements = timing.slow_statements,
            "阶段结束"
        );
        OPEN_TIMERS.with(|n| n.set(n.get().saturating_sub(1)));
    }
}
