//! Copyright (c) 2025-2026, Kirky.X
//!
//! MIT License
//!
//! 该模块定义了同步会话：持有所有协作者和后台同步任务，并提供关闭路径。

use crate::backend::ItemCacheBackend;
use crate::config::Config;
use crate::error::{MutationError, Result, SoundError};
use crate::fetcher::ResourceFetcher;
use crate::media::MediaStore;
use crate::metrics::{StatsSnapshot, SyncStats};
use crate::model::{MediaFile, Sound, SoundList};
use crate::mutation;
use crate::remote::RemoteService;
use crate::serialization::SerializerEnum;
use crate::store::SoundListStore;
use crate::sync::{managed_sync, poll_sound_list, PollReport, SyncContext};
use crate::upload::{MultipartUploader, Uploader};
use std::sync::Arc;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tracing::{info, instrument, warn};

/// 铃声同步会话
///
/// 会话被丢弃时取消后台任务；需要等待任务退出时调用 `shutdown`
pub struct SoundSession {
    ctx: SyncContext,
    cancel: CancellationToken,
    sync_handle: Mutex<Option<JoinHandle<()>>>,
}

impl SoundSession {
    /// 使用默认分片上传器创建会话
    pub fn new(
        config: Config,
        remote: Arc<dyn RemoteService>,
        media: Arc<dyn MediaStore>,
    ) -> Result<Self> {
        let uploader: Arc<dyn Uploader> =
            Arc::new(MultipartUploader::new(remote.clone(), &config.upload));
        Self::with_uploader(config, remote, media, uploader)
    }

    /// 使用指定的上传器创建会话
    pub fn with_uploader(
        config: Config,
        remote: Arc<dyn RemoteService>,
        media: Arc<dyn MediaStore>,
        uploader: Arc<dyn Uploader>,
    ) -> Result<Self> {
        config.validate().map_err(SoundError::ConfigError)?;

        let cache = Arc::new(ItemCacheBackend::new(config.cache.max_capacity));
        let store = SoundListStore::new(cache, SerializerEnum::json(config.cache.compress));

        let ctx = SyncContext {
            remote,
            store,
            fetcher: ResourceFetcher::new(media),
            uploader,
            config: Arc::new(config),
            stats: Arc::new(SyncStats::default()),
        };

        Ok(Self {
            ctx,
            cancel: CancellationToken::new(),
            sync_handle: Mutex::new(None),
        })
    }

    pub fn context(&self) -> &SyncContext {
        &self.ctx
    }

    /// 启动后台同步循环
    ///
    /// 已经在运行或会话已关闭时返回false
    #[instrument(skip(self), level = "info")]
    pub async fn start(&self) -> bool {
        if self.cancel.is_cancelled() {
            warn!("cannot start sound sync on a closed session");
            return false;
        }

        let mut handle = self.sync_handle.lock().await;
        if handle.as_ref().is_some_and(|h| !h.is_finished()) {
            return false;
        }

        let ctx = self.ctx.clone();
        let cancel = self.cancel.child_token();
        *handle = Some(tokio::spawn(managed_sync(ctx, cancel)));
        true
    }

    /// 关闭会话：取消后台循环和所有进行中的请求，并等待后台任务退出
    #[instrument(skip(self), level = "info")]
    pub async fn shutdown(&self) -> Result<()> {
        self.cancel.cancel();

        let handle = self.sync_handle.lock().await.take();
        if let Some(handle) = handle {
            match handle.await {
                Ok(()) => {}
                Err(e) if e.is_cancelled() => {}
                Err(e) => {
                    return Err(SoundError::TaskError(format!(
                        "sound sync task ended abnormally: {}",
                        e
                    )))
                }
            }
        }
        info!("sound session closed");
        Ok(())
    }

    pub fn is_closed(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// 读取当前缓存的铃声列表快照
    pub async fn cached_list(&self) -> Result<Option<SoundList>> {
        self.ctx.store.get().await
    }

    /// 立即执行一次轮询
    pub async fn poll_once(&self) -> Result<PollReport> {
        poll_sound_list(&self.ctx, &self.cancel).await
    }

    pub async fn save_sound(&self, file: &MediaFile) -> std::result::Result<(), MutationError> {
        mutation::save_sound(&self.ctx, file, &self.cancel).await
    }

    pub async fn remove_sound(&self, file: &MediaFile) -> std::result::Result<(), MutationError> {
        mutation::remove_sound(&self.ctx, file, &self.cancel).await
    }

    pub async fn upload_sound(
        &self,
        title: &str,
        data: Vec<u8>,
    ) -> std::result::Result<Sound, MutationError> {
        mutation::upload_sound(&self.ctx, title, data).await
    }

    pub fn stats(&self) -> StatsSnapshot {
        self.ctx.stats.snapshot()
    }
}

impl Drop for SoundSession {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
