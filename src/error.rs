//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了铃声列表同步系统的错误类型和处理机制。

use thiserror::Error;

/// 同步系统错误类型枚举
///
/// 定义了缓存、网络、上传和媒体存储中可能发生的各种错误类型
#[derive(Error, Debug)]
pub enum SoundError {
    /// 序列化错误
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// 缓存引擎操作失败
    #[error("Cache operation failed: {0}")]
    CacheError(String),

    /// 远程服务请求失败
    #[error("Transport error: {0}")]
    Transport(String),

    /// 服务器拒绝请求
    #[error("Remote service rejected request: {0}")]
    Rejected(String),

    /// 分片上传失败
    #[error("Upload failed: {0}")]
    UploadError(String),

    /// 媒体资源获取或存储失败
    #[error("Media error: {0}")]
    MediaError(String),

    /// 配置错误
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// 输入参数不合法
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 操作不支持
    #[error("Operation not supported: {0}")]
    NotSupported(String),

    /// IO错误
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// 后台任务异常退出
    #[error("Task failed: {0}")]
    TaskError(String),
}

/// 同步系统结果类型别名
pub type Result<T> = std::result::Result<T, SoundError>;

/// 铃声变更操作的错误
///
/// 调用方只会看到成功或通用失败两种结果，附带的字符串仅用于诊断日志
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MutationError {
    /// 通用失败
    #[error("Sound mutation failed: {0}")]
    Generic(String),
}

impl From<SoundError> for MutationError {
    fn from(err: SoundError) -> Self {
        MutationError::Generic(err.to_string())
    }
}
