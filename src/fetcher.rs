//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了资源获取适配器：按铃声触发媒体下载，并隔离每个资源的失败。

use crate::error::Result;
use crate::media::MediaStore;
use crate::model::Sound;
use futures::future::join_all;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, instrument, warn};

/// 一次批量获取的结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FetchSummary {
    pub fetched: usize,
    pub failed: usize,
    pub cancelled: usize,
}

impl FetchSummary {
    pub fn attempted(&self) -> usize {
        self.fetched + self.failed + self.cancelled
    }
}

enum FetchOutcome {
    Fetched,
    Failed,
    Cancelled,
}

/// 资源获取器
#[derive(Clone)]
pub struct ResourceFetcher {
    media: Arc<dyn MediaStore>,
}

impl ResourceFetcher {
    pub fn new(media: Arc<dyn MediaStore>) -> Self {
        Self { media }
    }

    pub fn media(&self) -> &Arc<dyn MediaStore> {
        &self.media
    }

    /// 确保单个铃声的媒体数据在本地存在
    pub async fn fetch(&self, sound: &Sound) -> Result<()> {
        self.media.fetch_resource(&sound.file().resource).await
    }

    /// 并发获取所有铃声的媒体数据
    ///
    /// 每个资源独立执行：单个失败被记录后丢弃，不影响其他资源，也不会让调用失败。
    /// 所有尝试结束（成功、失败或被取消）后才返回。
    #[instrument(skip(self, sounds, cancel), level = "debug", fields(count = sounds.len()))]
    pub async fn fetch_all(&self, sounds: &[Sound], cancel: &CancellationToken) -> FetchSummary {
        let attempts = sounds.iter().map(|sound| async move {
            tokio::select! {
                biased;
                _ = cancel.cancelled() => FetchOutcome::Cancelled,
                result = self.fetch(sound) => match result {
                    Ok(()) => FetchOutcome::Fetched,
                    Err(e) => {
                        warn!(resource = %sound.resource_id(), error = %e, "resource fetch failed, skipping");
                        FetchOutcome::Failed
                    }
                },
            }
        });

        let summary = join_all(attempts)
            .await
            .into_iter()
            .fold(FetchSummary::default(), |mut summary, outcome| {
                match outcome {
                    FetchOutcome::Fetched => summary.fetched += 1,
                    FetchOutcome::Failed => summary.failed += 1,
                    FetchOutcome::Cancelled => summary.cancelled += 1,
                }
                summary
            });

        debug!(
            "resource fan-out settled: fetched={}, failed={}, cancelled={}",
            summary.fetched, summary.failed, summary.cancelled
        );
        summary
    }
}
