//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 统一工具模块
//!
//! 提供测试和命令行共用的工具函数，包括：
//! - 日志设置工具
//! - 输入验证工具

use crate::error::SoundError;
use std::sync::Once;
use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

pub fn setup_logging() {
    INIT.call_once(|| {
        tracing_subscriber::fmt()
            .with_span_events(FmtSpan::CLOSE)
            .with_env_filter(EnvFilter::new("debug"))
            .try_init()
            .ok();
    });
}

/// 验证铃声标题
///
/// 只拒绝空白标题；其余内容原样交给服务器判断
pub fn validate_sound_title(title: &str) -> Result<(), SoundError> {
    if title.trim().is_empty() {
        return Err(SoundError::InvalidInput(
            "Sound title cannot be empty".to_string(),
        ));
    }

    Ok(())
}
