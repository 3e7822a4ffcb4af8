// ==========================================
// Excel 迁移工具 - 配置层
// ==========================================
// 职责: 迁移配置加载、sheet 配置模型、schema 描述
// 存储: YAML 文件
// ==========================================

pub mod error;
pub mod pipeline_config;
pub mod schema_describer;

// 重导出核心类型
pub use error::{ConfigError, ConfigResult};
pub use pipeline_config::{load_config, Configuration, DeclaredColumn, SheetConfig};
pub use schema_describer::describe_schema;
