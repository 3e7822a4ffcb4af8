// ==========================================
// Excel 迁移工具 - 核心库
// ==========================================
// 流程: 配置 → 抽取 → 清洗 → 落库 → 校验
// 技术栈: calamine + rusqlite(SQLite) + serde_yaml
// 系统定位: 可重复执行的配置驱动 ETL 步骤（全表替换，不做增量）
// ==========================================

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 单元格 / 表格 / 统计
pub mod domain;

// 配置层 - YAML 配置与 schema 描述
pub mod config;

// 抽取层 - 工作簿读取
pub mod importer;

// 清洗层 - 表头规范化与类型转换
pub mod engine;

// 落库层 - 表存储
pub mod repository;

// 校验层 - 行数比对
pub mod validator;

// 流水线层 - 阶段编排
pub mod pipeline;

// 数据库基础设施（地址解析 / 连接初始化）
pub mod db;

// 日志系统
pub mod logging;

// 阶段耗时与 SQL 统计
pub mod perf;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::{
    CellValue, ColumnType, GridColumn, PipelineReport, PipelineStage, RowCountCheck, RunMode,
    SheetGrid, SheetStats, ValidationSummary,
};

// 配置
pub use config::{describe_schema, load_config, Configuration, SheetConfig};

// 流水线
pub use pipeline::{render_text, run_pipeline, MigrationPipeline, PipelineError, PipelineOptions};

// ==========================================
// 常量定义
// ==========================================

// 版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 名称
pub const APP_NAME: &str = "excel-db-migrate";
