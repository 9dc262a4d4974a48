//! Copyright (c) 2025, Kirky.X
//!
//! MIT License
//!
//! 该模块实现单次轮询：条件请求、缓存更新和资源扇出获取。

use super::SyncContext;
use crate::error::Result;
use crate::fetcher::FetchSummary;
use crate::model::{Sound, SoundList};
use crate::remote::SavedRingtones;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, instrument, warn};

/// 单次轮询对缓存的影响
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// 服务器返回新列表，缓存已覆盖
    Updated {
        version: i64,
        sounds: usize,
        dropped: usize,
    },
    /// 服务器确认缓存版本仍是最新
    NotModified,
    /// 请求失败，按未修改处理
    Unreachable,
    /// 会话关闭，本次轮询被放弃
    Cancelled,
}

/// 单次轮询报告
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollReport {
    pub outcome: PollOutcome,
    pub fetch: FetchSummary,
}

/// 执行一次铃声列表轮询
///
/// 按顺序：读取缓存版本 → 条件请求 → 按需覆盖缓存 → 对缓存中的每个铃声获取媒体。
/// 请求失败和单个资源获取失败都在这里被吞掉；只有缓存本身的错误会返回给调用方。
#[instrument(skip(ctx, cancel), level = "debug")]
pub async fn poll_sound_list(ctx: &SyncContext, cancel: &CancellationToken) -> Result<PollReport> {
    let cached_version = ctx
        .store
        .get()
        .await?
        .map(|list| list.version())
        .unwrap_or(0);

    let response = tokio::select! {
        biased;
        _ = cancel.cancelled() => None,
        response = ctx.remote.get_saved_ringtones(cached_version) => Some(response),
    };
    let Some(response) = response else {
        debug!("sound list poll cancelled before response");
        return Ok(PollReport {
            outcome: PollOutcome::Cancelled,
            fetch: FetchSummary::default(),
        });
    };

    let outcome = match response {
        Err(e) => {
            // 网络失败与“未修改”等价，循环不能因此终止
            warn!("sound list request failed, keeping cached version {}: {}", cached_version, e);
            PollOutcome::Unreachable
        }
        Ok(SavedRingtones::NotModified) => {
            debug!("sound list not modified since version {}", cached_version);
            PollOutcome::NotModified
        }
        Ok(SavedRingtones::Modified { hash, ringtones }) => {
            let total = ringtones.len();
            let sounds: Vec<Sound> = ringtones.iter().filter_map(Sound::from_raw).collect();
            let dropped = total - sounds.len();
            if dropped > 0 {
                debug!("dropped {} unparseable ringtone documents", dropped);
            }

            let list = SoundList::new(hash, sounds);
            ctx.store.put(&list).await?;
            info!(
                "sound list updated: version {} -> {}, {} sounds",
                cached_version,
                hash,
                list.len()
            );
            PollOutcome::Updated {
                version: hash,
                sounds: list.len(),
                dropped,
            }
        }
    };

    let fetch = match ctx.store.get().await? {
        Some(list) => ctx.fetcher.fetch_all(list.sounds(), cancel).await,
        None => FetchSummary::default(),
    };

    ctx.stats.record_poll(&outcome, &fetch);
    Ok(PollReport { outcome, fetch })
}
