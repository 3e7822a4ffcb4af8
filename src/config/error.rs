// ==========================================
// Excel 迁移工具 - 配置层错误类型
// ==========================================
// 工具: thiserror 派生宏
// ==========================================

use thiserror::Error;

/// 配置错误（在访问工作簿 / 数据库之前抛出）
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("配置文件不存在: {0}")]
    NotFound(String),

    #[error("配置文件读取失败 ({path}): {message}")]
    ReadError { path: String, message: String },

    #[error("配置文件 YAML 解析失败: {0}")]
    ParseError(String),

    #[error("配置缺少必填项: {0}")]
    MissingKey(String),

    #[error("配置值格式错误 (key: {key}): {message}")]
    InvalidValue { key: String, message: String },

    #[error("'sheets' 必须是非空映射")]
    EmptySheets,
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

/// Result 类型别名
pub type ConfigResult<T> = Result<T, ConfigError>;
