//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步代理的配置结构和解析逻辑。

use crate::error::{Result, SoundError};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const CONFIG_VERSION: u32 = 1;

/// 默认轮询间隔：一小时
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 60 * 60;

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_version: Option<u32>,
    #[serde(default)]
    pub sync: SyncConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub upload: UploadConfig,
}

/// 同步循环配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct SyncConfig {
    /// 两次轮询之间的空闲时间（秒）
    pub poll_interval_secs: u64,
    /// 空闲期间检查挂钟时间的间隔（秒），用于感知进程挂起
    pub suspend_check_secs: u64,
    /// 单次轮询异常后重启周期前的等待时间（秒）
    pub retry_delay_secs: u64,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            poll_interval_secs: DEFAULT_POLL_INTERVAL_SECS,
            suspend_check_secs: 30,
            retry_delay_secs: 30,
        }
    }
}

impl SyncConfig {
    pub fn poll_interval(&self) -> Duration {
        Duration::from_secs(self.poll_interval_secs)
    }

    pub fn suspend_check(&self) -> Duration {
        Duration::from_secs(self.suspend_check_secs)
    }

    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// 条目缓存配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct CacheConfig {
    /// 缓存引擎最大条目数
    pub max_capacity: u64,
    /// 是否压缩缓存条目
    pub compress: bool,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            max_capacity: 1024,
            compress: false,
        }
    }
}

/// 上传配置
#[derive(Deserialize, Clone, Debug)]
#[serde(default)]
pub struct UploadConfig {
    /// 分片大小（字节），必须是1KB的整数倍
    pub part_size: usize,
    /// 允许上传的最大文件大小（字节）
    pub max_file_size: usize,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            part_size: 32 * 1024,
            max_file_size: 1024 * 1024 * 10, // 10MB
        }
    }
}

impl Config {
    /// 从TOML字符串解析并验证配置
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Config =
            toml::from_str(raw).map_err(|e| SoundError::ConfigError(e.to_string()))?;
        config.validate().map_err(SoundError::ConfigError)?;
        Ok(config)
    }

    /// 从TOML文件加载配置
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// 验证配置
    ///
    /// 检查配置的有效性，确保所有值在合理范围内
    pub fn validate(&self) -> std::result::Result<(), String> {
        if let Some(version) = &self.config_version {
            if *version > CONFIG_VERSION {
                return Err(format!(
                    "Configuration version {} is not supported. Current version is {}.",
                    version, CONFIG_VERSION
                ));
            }
        }

        if self.sync.poll_interval_secs == 0 {
            return Err("sync.poll_interval_secs cannot be zero".to_string());
        }

        if self.sync.poll_interval_secs > 86400 * 7 {
            return Err("sync.poll_interval_secs cannot exceed 7 days".to_string());
        }

        if self.sync.suspend_check_secs == 0 {
            return Err("sync.suspend_check_secs cannot be zero".to_string());
        }

        if self.sync.suspend_check_secs > self.sync.poll_interval_secs {
            return Err(format!(
                "sync.suspend_check_secs ({}) cannot exceed sync.poll_interval_secs ({})",
                self.sync.suspend_check_secs, self.sync.poll_interval_secs
            ));
        }

        if self.sync.retry_delay_secs == 0 {
            return Err("sync.retry_delay_secs cannot be zero".to_string());
        }

        if self.cache.max_capacity == 0 {
            return Err("cache.max_capacity cannot be zero".to_string());
        }

        if self.upload.part_size == 0 || self.upload.part_size % 1024 != 0 {
            return Err("upload.part_size must be a non-zero multiple of 1024".to_string());
        }

        if self.upload.part_size > 512 * 1024 {
            return Err("upload.part_size cannot exceed 512KB".to_string());
        }

        if self.upload.max_file_size == 0 {
            return Err("upload.max_file_size cannot be zero".to_string());
        }

        Ok(())
    }
}
